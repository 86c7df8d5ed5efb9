#![allow(dead_code)]

use rusqlite::Connection;
use spindle::db;
use spindle::material::schedule::BatchScheduler;
use spindle::material::types::{Category, Item};

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Scheduler with the rotation settings used across the integration tests.
pub fn test_scheduler() -> BatchScheduler {
    BatchScheduler::new(5, 3, 3).unwrap()
}

/// Unreconciled text category whose items carry the given view counts.
///
/// Items are titled `w1`, `w2`, ... in order.
pub fn words_with_views(name: &str, views: &[u32]) -> Category {
    let items = views
        .iter()
        .enumerate()
        .map(|(n, &v)| Item::new(format!("w{}", n + 1)).with_views(v))
        .collect();
    Category::new(name, items)
}

/// Unreconciled image category with one item per media path.
pub fn images(name: &str, paths: &[&str]) -> Category {
    let items = paths
        .iter()
        .map(|p| {
            let stem = p.rsplit('/').next().unwrap_or(p);
            Item::with_media(stem, *p)
        })
        .collect();
    Category::new(name, items)
}

/// View counts of a category's items in id order.
pub fn views_by_id(category: &Category) -> Vec<u32> {
    let mut items: Vec<_> = category.items.iter().collect();
    items.sort_by_key(|i| i.id);
    items.iter().map(|i| i.views).collect()
}
