use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;

/// Response from material_stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_categories: u64,
    pub completed_categories: u64,
    pub total_items: u64,
    /// Items with `views >= max_views`.
    pub exhausted_items: u64,
    pub unseen_items: u64,
    pub total_views: u64,
    pub db_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<String>,
}

/// Compute catalogue statistics.
///
/// `db_path` is used for file size calculation; pass None for in-memory databases.
pub fn material_stats(
    conn: &Connection,
    max_views: u32,
    db_path: Option<&Path>,
) -> Result<StatsResponse> {
    let (total_categories, completed_categories): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM categories",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let (total_items, exhausted_items, unseen_items, total_views): (i64, i64, i64, i64) = conn
        .query_row(
            "SELECT COUNT(*), \
                    COALESCE(SUM(views >= ?1), 0), \
                    COALESCE(SUM(views = 0), 0), \
                    COALESCE(SUM(views), 0) \
             FROM items",
            params![max_views],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

    let last_review: Option<String> = conn.query_row(
        "SELECT MAX(created_at) FROM review_log WHERE operation = 'review'",
        [],
        |row| row.get(0),
    )?;

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StatsResponse {
        total_categories: total_categories as u64,
        completed_categories: completed_categories as u64,
        total_items: total_items as u64,
        exhausted_items: exhausted_items as u64,
        unseen_items: unseen_items as u64,
        total_views: total_views as u64,
        db_size_bytes,
        last_review,
    })
}
