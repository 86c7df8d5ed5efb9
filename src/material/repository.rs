//! SQLite persistence for the reconciled catalogue.
//!
//! The database is the book of record after reconciliation: [`save_categories`]
//! replaces it wholesale, [`save_review`] writes back the counters touched by one
//! reviewed batch. Both run inside the caller's transaction, which must also cover
//! the read the written values were derived from. Every write leaves an entry in
//! `review_log`. Timestamps are stored as RFC 3339 text.

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use serde::Serialize;

use super::types::{Batch, Category, Item};

/// Result returned from [`save_categories`].
#[derive(Debug, Serialize)]
pub struct SyncResult {
    pub categories: usize,
    pub items: usize,
    /// Previously stored categories that are no longer part of the catalogue.
    pub removed_categories: usize,
}

/// Load every category with its items, categories by id, items in stored order.
pub fn load_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, last_viewed, completed FROM categories ORDER BY id",
    )?;
    let mut categories: Vec<Category> = stmt
        .query_map([], category_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT category_id, id, title, media_ref, views, last_viewed \
         FROM items ORDER BY category_id, position",
    )?;
    let rows: Vec<(u32, Item)> = stmt
        .query_map([], |row| Ok((row.get(0)?, item_from_row(row, 1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let index: HashMap<u32, usize> = categories
        .iter()
        .enumerate()
        .map(|(n, c)| (c.id, n))
        .collect();
    for (category_id, item) in rows {
        if let Some(&n) = index.get(&category_id) {
            categories[n].items.push(item);
        }
    }

    Ok(categories)
}

/// Load one category with its items.
pub fn load_category(conn: &Connection, category_id: u32) -> Result<Category> {
    let category = conn
        .query_row(
            "SELECT id, name, last_viewed, completed FROM categories WHERE id = ?1",
            params![category_id],
            category_from_row,
        )
        .optional()?;
    let Some(mut category) = category else {
        bail!("category not found: {category_id}");
    };

    let mut stmt = conn.prepare(
        "SELECT id, title, media_ref, views, last_viewed FROM items \
         WHERE category_id = ?1 ORDER BY position",
    )?;
    category.items = stmt
        .query_map(params![category_id], |row| item_from_row(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(category)
}

/// Look up a single item. `None` when either the category or the item is unknown.
pub fn find_item(conn: &Connection, category_id: u32, item_id: u32) -> Result<Option<Item>> {
    let item = conn
        .query_row(
            "SELECT id, title, media_ref, views, last_viewed FROM items \
             WHERE category_id = ?1 AND id = ?2",
            params![category_id, item_id],
            |row| item_from_row(row, 0),
        )
        .optional()?;
    Ok(item)
}

/// Replace the stored catalogue with `categories`.
///
/// Every category and item must carry an assigned id (run the reconciler first).
/// Categories missing from the list are deleted together with their items.
pub fn save_categories(tx: &Transaction<'_>, categories: &[Category]) -> Result<SyncResult> {
    for category in categories {
        if !category.is_assigned() {
            bail!("category {:?} has no id; reconcile before saving", category.name);
        }
        if let Some(item) = category.items.iter().find(|i| !i.is_assigned()) {
            bail!(
                "item {:?} in category {:?} has no id; reconcile before saving",
                item.title,
                category.name
            );
        }
    }

    let kept: HashSet<u32> = categories.iter().map(|c| c.id).collect();
    let existing: Vec<u32> = tx
        .prepare("SELECT id FROM categories")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    let removed_categories = existing.iter().filter(|id| !kept.contains(*id)).count();

    tx.execute("DELETE FROM items", [])?;
    tx.execute("DELETE FROM categories", [])?;

    let mut items = 0usize;
    {
        let mut insert_category = tx.prepare(
            "INSERT INTO categories (id, name, last_viewed, completed) VALUES (?1, ?2, ?3, 0)",
        )?;
        let mut insert_item = tx.prepare(
            "INSERT INTO items (category_id, id, position, title, media_ref, views, last_viewed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for category in categories {
            insert_category
                .execute(params![
                    category.id,
                    category.name,
                    category.last_viewed.map(|t| t.to_rfc3339()),
                ])
                .with_context(|| format!("failed to store category {:?}", category.name))?;

            for (position, item) in category.items.iter().enumerate() {
                insert_item
                    .execute(params![
                        category.id,
                        item.id,
                        position as i64,
                        item.title,
                        item.media_ref,
                        item.views,
                        item.last_viewed.map(|t| t.to_rfc3339()),
                    ])
                    .with_context(|| {
                        format!("failed to store item {} of category {:?}", item.id, category.name)
                    })?;
                items += 1;
            }
        }
    }

    write_log(
        tx,
        "sync",
        None,
        Some(&serde_json::json!({
            "categories": categories.len(),
            "items": items,
            "removed_categories": removed_categories,
        })),
    )?;

    tracing::info!(categories = categories.len(), items, removed_categories, "catalogue saved");

    Ok(SyncResult {
        categories: categories.len(),
        items,
        removed_categories,
    })
}

/// Persist the counters of a reviewed `batch` from its updated `category`.
pub fn save_review(tx: &Transaction<'_>, category: &Category, batch: &Batch) -> Result<()> {
    let updated = tx.execute(
        "UPDATE categories SET last_viewed = ?1, completed = 0 WHERE id = ?2",
        params![category.last_viewed.map(|t| t.to_rfc3339()), category.id],
    )?;
    if updated == 0 {
        bail!("category not found: {}", category.id);
    }

    let mut reviewed = Vec::with_capacity(batch.items.len());
    {
        let mut update_item = tx.prepare(
            "UPDATE items SET views = ?1, last_viewed = ?2 WHERE category_id = ?3 AND id = ?4",
        )?;
        for entry in &batch.items {
            let Some(item) = category.items.iter().find(|i| i.same_entry(entry)) else {
                continue;
            };
            update_item.execute(params![
                item.views,
                item.last_viewed.map(|t| t.to_rfc3339()),
                category.id,
                item.id,
            ])?;
            reviewed.push(item.id);
        }
    }

    write_log(
        tx,
        "review",
        Some(category.id),
        Some(&serde_json::json!({ "items": reviewed })),
    )?;

    Ok(())
}

/// Flag a category as exhausted. Logged once per transition.
pub fn mark_completed(conn: &Connection, category_id: u32) -> Result<()> {
    let completed: Option<bool> = conn
        .query_row(
            "SELECT completed FROM categories WHERE id = ?1",
            params![category_id],
            |row| row.get(0),
        )
        .optional()?;

    match completed {
        None => bail!("category not found: {category_id}"),
        Some(true) => Ok(()),
        Some(false) => {
            conn.execute(
                "UPDATE categories SET completed = 1 WHERE id = ?1",
                params![category_id],
            )?;
            write_log(conn, "complete", Some(category_id), None)?;
            tracing::info!(category_id, "category completed");
            Ok(())
        }
    }
}

/// Append an entry to the review log.
pub fn write_log(
    conn: &Connection,
    operation: &str,
    category_id: Option<u32>,
    details: Option<&serde_json::Value>,
) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let details_json = details.map(serde_json::to_string).transpose()?;
    conn.execute(
        "INSERT INTO review_log (operation, category_id, details, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![operation, category_id, details_json, now],
    )?;
    Ok(())
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        items: Vec::new(),
        last_viewed: parse_time(row, 2)?,
        completed: row.get(3)?,
    })
}

/// Map item columns `id, title, media_ref, views, last_viewed` starting at `first`.
fn item_from_row(row: &Row<'_>, first: usize) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(first)?,
        title: row.get(first + 1)?,
        media_ref: row.get(first + 2)?,
        views: row.get(first + 3)?,
        last_viewed: parse_time(row, first + 4)?,
    })
}

fn parse_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let Some(raw) = row.get::<_, Option<String>>(idx)? else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
