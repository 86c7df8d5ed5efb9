//! Spindle: rotating review batches over a catalogue of learning material.
//!
//! Content is organised into categories (a directory of images, or one line of a
//! vocabulary file) holding items. Each review shows a small batch of a category's
//! items, preferring the least-viewed ones, and counts the view. A category is
//! completed once every item has reached the view budget.
//!
//! | Setting | Meaning | Default |
//! |---------|---------|---------|
//! | `batch_size` | Items per batch | 5 |
//! | `max_views` | View budget per item | 5 |
//! | `refresh_rate` | Granularity of the already-seen prefix kept in rotation | 3 |
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`material`]: Reconciliation, scheduling, review, and persistence
//! - [`scan`]: Discovery of categories from a content directory

pub mod config;
pub mod db;
pub mod material;
pub mod scan;
