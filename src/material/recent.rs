//! Recently used category selection.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};

use super::types::Category;

/// Categories viewed within the last `days` days, or never viewed at all.
///
/// Most recently viewed first, never-viewed categories last, ties by id. At
/// most `count` categories are returned.
pub fn select_recent(
    categories: &[Category],
    now: DateTime<Utc>,
    days: u32,
    count: usize,
) -> Vec<&Category> {
    let cutoff = now - Duration::days(i64::from(days));

    let mut recent: Vec<&Category> = categories
        .iter()
        .filter(|c| c.last_viewed.map_or(true, |seen| seen > cutoff))
        .collect();

    recent.sort_by(|a, b| match (a.last_viewed, b.last_viewed) {
        (Some(x), Some(y)) => y.cmp(&x).then(a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
    recent.truncate(count);
    recent
}
