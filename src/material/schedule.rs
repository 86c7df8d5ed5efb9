//! Batch selection for review sessions.
//!
//! [`BatchScheduler::build_batch`] is a pure function of a category snapshot and
//! the scheduler settings. Items are rotated by view count: once some items reach
//! `max_views`, the selection window starts at the first item still below the
//! budget and advances in steps of `refresh_rate`.

use thiserror::Error;

use super::types::{Batch, Category, Item};
use crate::config::ScheduleConfig;

/// Rejected scheduler settings. Every value must be positive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("batch_size must be greater than zero")]
    InvalidBatchSize,
    #[error("max_views must be greater than zero")]
    InvalidMaxViews,
    #[error("refresh_rate must be at least one")]
    InvalidRefreshRate,
}

/// Validated batch selection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchScheduler {
    batch_size: usize,
    max_views: u32,
    refresh_rate: usize,
}

impl BatchScheduler {
    pub fn new(batch_size: usize, max_views: u32, refresh_rate: usize) -> Result<Self, ScheduleError> {
        if batch_size == 0 {
            return Err(ScheduleError::InvalidBatchSize);
        }
        if max_views == 0 {
            return Err(ScheduleError::InvalidMaxViews);
        }
        if refresh_rate == 0 {
            return Err(ScheduleError::InvalidRefreshRate);
        }
        Ok(Self {
            batch_size,
            max_views,
            refresh_rate,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn max_views(&self) -> u32 {
        self.max_views
    }

    pub fn refresh_rate(&self) -> usize {
        self.refresh_rate
    }

    /// Items that have not yet reached the view budget.
    pub fn to_view<'a>(&self, category: &'a Category) -> impl Iterator<Item = &'a Item> + 'a {
        let max_views = self.max_views;
        category.items.iter().filter(move |i| i.views < max_views)
    }

    /// Select the next batch from `category`. The category is not modified.
    pub fn build_batch(&self, category: &Category) -> Batch {
        if self.to_view(category).next().is_none() {
            return Batch::completed(category);
        }

        // Small categories are never split, even when some items are exhausted.
        if category.items.len() <= self.batch_size {
            return Batch::from_items(category, category.items.clone());
        }

        // Stable: equal view counts keep category order.
        let mut sorted = category.items.clone();
        sorted.sort_by(|a, b| b.views.cmp(&a.views));

        if sorted[0].views < self.max_views {
            sorted.truncate(self.batch_size);
            return Batch::from_items(category, sorted);
        }

        let Some(mut pos) = sorted.iter().position(|i| i.views < self.max_views) else {
            return Batch::completed(category);
        };
        if pos > self.refresh_rate {
            pos -= pos % self.refresh_rate;
        }

        let start = if sorted.len() - pos >= self.batch_size {
            pos
        } else {
            sorted.len() - self.batch_size
        };
        let items = sorted[start..start + self.batch_size].to_vec();
        Batch::from_items(category, items)
    }
}

impl TryFrom<&ScheduleConfig> for BatchScheduler {
    type Error = ScheduleError;

    fn try_from(config: &ScheduleConfig) -> Result<Self, Self::Error> {
        Self::new(config.batch_size, config.max_views, config.refresh_rate)
    }
}
