//! The catalogue engine: types, identity reconciliation, batch scheduling, review
//! bookkeeping and SQLite persistence.

pub mod recent;
pub mod reconcile;
pub mod repository;
pub mod review;
pub mod schedule;
pub mod service;
pub mod stats;
pub mod types;

pub use reconcile::{collapse_duplicate_names, merge};
pub use review::{apply_review, ReviewError};
pub use schedule::{BatchScheduler, ScheduleError};
pub use service::MaterialService;
pub use types::{Batch, Category, Item, UNASSIGNED};
