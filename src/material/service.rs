//! Read-merge-write and schedule-review-write cycles over one connection.
//!
//! [`MaterialService`] borrows the connection for its lifetime. Each cycle that
//! writes runs in one `IMMEDIATE` transaction, taken before the read, so handles
//! on other connections wait for it (see `busy_timeout` in [`crate::db`]) instead
//! of writing counters derived from a stale read.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};

use super::recent::select_recent;
use super::reconcile::{collapse_duplicate_names, merge};
use super::repository::{self, SyncResult};
use super::review::apply_review;
use super::schedule::BatchScheduler;
use super::stats::{material_stats, StatsResponse};
use super::types::{Batch, Category, Item};
use crate::config::ScheduleConfig;

pub struct MaterialService<'a> {
    conn: &'a mut Connection,
    scheduler: BatchScheduler,
    recent_days: u32,
    recent_count: usize,
}

impl<'a> MaterialService<'a> {
    /// Build a service from the `[schedule]` settings. Invalid settings fail here.
    pub fn new(conn: &'a mut Connection, config: &ScheduleConfig) -> Result<Self> {
        let scheduler =
            BatchScheduler::try_from(config).context("invalid [schedule] configuration")?;
        Ok(Self {
            conn,
            scheduler,
            recent_days: config.recent_days,
            recent_count: config.recent_count,
        })
    }

    pub fn with_scheduler(conn: &'a mut Connection, scheduler: BatchScheduler) -> Self {
        let defaults = ScheduleConfig::default();
        Self {
            conn,
            scheduler,
            recent_days: defaults.recent_days,
            recent_count: defaults.recent_count,
        }
    }

    pub fn scheduler(&self) -> &BatchScheduler {
        &self.scheduler
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        repository::load_categories(self.conn)
    }

    pub fn category(&self, category_id: u32) -> Result<Category> {
        repository::load_category(self.conn, category_id)
    }

    pub fn item(&self, category_id: u32, item_id: u32) -> Result<Item> {
        match repository::find_item(self.conn, category_id, item_id)? {
            Some(item) => Ok(item),
            None => bail!("item not found: {category_id}/{item_id}"),
        }
    }

    /// Reconcile freshly discovered content with the stored catalogue and store
    /// the result as the new book of record.
    ///
    /// Of several categories sharing a name only the last one is stored.
    pub fn sync(&mut self, current: Vec<Category>) -> Result<(Vec<Category>, SyncResult)> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let previous = repository::load_categories(&tx)?;
        let merged = collapse_duplicate_names(merge(&previous, current));
        let result = repository::save_categories(&tx, &merged)?;
        tx.commit()?;
        Ok((merged, result))
    }

    /// Next batch for a category. Exhausted categories are flagged in storage.
    pub fn batch(&mut self, category_id: u32) -> Result<Batch> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let category = repository::load_category(&tx, category_id)?;
        let batch = schedule(&self.scheduler, &tx, &category)?;
        tx.commit()?;
        Ok(batch)
    }

    /// Build the next batch, count it as reviewed at `now`, and persist the counters.
    ///
    /// Returns the batch with post-review counters. A completed batch is returned
    /// as is and nothing is counted.
    pub fn review(&mut self, category_id: u32, now: DateTime<Utc>) -> Result<Batch> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut category = repository::load_category(&tx, category_id)?;
        let batch = schedule(&self.scheduler, &tx, &category)?;
        if batch.completed {
            tx.commit()?;
            return Ok(batch);
        }

        let updated = apply_review(&mut category, &batch, now)?;
        repository::save_review(&tx, &category, &batch)?;
        tx.commit()?;
        tracing::info!(category_id, updated, "batch reviewed");

        let items = batch
            .items
            .iter()
            .filter_map(|entry| category.items.iter().find(|i| i.same_entry(entry)).cloned())
            .collect();
        Ok(Batch::from_items(&category, items))
    }

    /// Batches for the recently used categories.
    pub fn recent_batches(&mut self, now: DateTime<Utc>) -> Result<Vec<Batch>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let categories = repository::load_categories(&tx)?;
        let recent = select_recent(&categories, now, self.recent_days, self.recent_count);
        let batches = recent
            .into_iter()
            .map(|c| schedule(&self.scheduler, &tx, c))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;
        Ok(batches)
    }

    pub fn stats(&self, db_path: Option<&Path>) -> Result<StatsResponse> {
        material_stats(self.conn, self.scheduler.max_views(), db_path)
    }
}

fn schedule(scheduler: &BatchScheduler, conn: &Connection, category: &Category) -> Result<Batch> {
    let batch = scheduler.build_batch(category);
    if batch.completed && !category.completed {
        repository::mark_completed(conn, category.id)?;
    }
    Ok(batch)
}
