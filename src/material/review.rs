//! View counter updates after a reviewed batch.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::types::{Batch, Category};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("batch for category {batch_id} ({batch_name}) cannot be applied to category {category_id} ({category_name})")]
    CategoryMismatch {
        batch_id: u32,
        batch_name: String,
        category_id: u32,
        category_name: String,
    },
}

/// Record one review of `batch` into its source `category`.
///
/// Every category item present in the batch gets `views + 1` and
/// `last_viewed = now`; the category itself is stamped with `now` even when the
/// batch is empty. Returns the number of items updated.
///
/// Not idempotent: applying the same batch twice counts two reviews.
pub fn apply_review(
    category: &mut Category,
    batch: &Batch,
    now: DateTime<Utc>,
) -> Result<usize, ReviewError> {
    if batch.category_id != category.id || batch.category_name != category.name {
        return Err(ReviewError::CategoryMismatch {
            batch_id: batch.category_id,
            batch_name: batch.category_name.clone(),
            category_id: category.id,
            category_name: category.name.clone(),
        });
    }

    let mut updated = 0;
    for reviewed in &batch.items {
        if let Some(item) = category.items.iter_mut().find(|i| i.same_entry(reviewed)) {
            item.views += 1;
            item.last_viewed = Some(now);
            updated += 1;
        }
    }
    category.last_viewed = Some(now);

    Ok(updated)
}
