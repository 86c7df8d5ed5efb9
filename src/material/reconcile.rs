//! Identity reconciliation between a fresh content scan and the persisted catalogue.
//!
//! [`merge`] matches categories by name and items by their identity key (media path
//! or title), copies previously assigned ids onto the matches, and then mints fresh
//! ids for everything still unassigned. Matching never relies on hash iteration
//! order: maps are only used for lookups, assignment follows encounter order.
//!
//! A renamed category has no name match and is treated as a new category.

use std::collections::{HashMap, HashSet};

use super::types::{Category, Item, UNASSIGNED};

/// Merge `current` (freshly discovered) against `previous` (last persisted list).
///
/// Returns `current` with every category and item id populated. `previous` is
/// only read. Duplicate names resolve last-write-wins on both sides: the last
/// previous category of a name is the match, and the last current category of
/// that name receives its id.
pub fn merge(previous: &[Category], mut current: Vec<Category>) -> Vec<Category> {
    let previous_by_name: HashMap<&str, &Category> =
        previous.iter().map(|c| (c.name.as_str(), c)).collect();
    let previous_items: HashMap<&str, &Item> = previous
        .iter()
        .flat_map(|c| c.items.iter())
        .map(|i| (i.identity_key(), i))
        .collect();

    let mut matched_categories = 0usize;
    let mut matched_items = 0usize;

    // 1. Category ids by name. Walked back to front so that of several
    // same-named categories the last one takes the previous id.
    let mut taken = reserve_ids(current.iter_mut().map(|c| &mut c.id));
    for category in current.iter_mut().rev() {
        let Some(prev) = previous_by_name.get(category.name.as_str()) else {
            continue;
        };
        if !category.is_assigned() && prev.is_assigned() && taken.insert(prev.id) {
            category.id = prev.id;
            matched_categories += 1;
        }
        if category.last_viewed.is_none() {
            category.last_viewed = prev.last_viewed;
        }
    }

    // 2. Item ids by identity key, same-named category first.
    for category in &mut current {
        let local: HashMap<&str, &Item> = previous_by_name
            .get(category.name.as_str())
            .map(|prev| prev.items.iter().map(|i| (i.identity_key(), i)).collect())
            .unwrap_or_default();

        let mut taken = reserve_ids(category.items.iter_mut().map(|i| &mut i.id));
        for item in &mut category.items {
            if item.is_assigned() {
                continue;
            }
            let key = item.identity_key();
            let Some(prev) = local.get(key).or_else(|| previous_items.get(key)) else {
                continue;
            };
            if !prev.is_assigned() || !taken.insert(prev.id) {
                continue;
            }
            item.id = prev.id;
            if item.views == 0 && item.last_viewed.is_none() {
                item.views = prev.views;
                item.last_viewed = prev.last_viewed;
            }
            matched_items += 1;
        }
    }

    // 3. Fresh ids. Category and item ids are separate numbering spaces.
    let mut category_ids = IdAllocator::new(
        previous
            .iter()
            .map(|c| c.id)
            .chain(current.iter().map(|c| c.id)),
    );
    let mut item_ids = IdAllocator::new(
        previous
            .iter()
            .chain(current.iter())
            .flat_map(|c| c.items.iter().map(|i| i.id)),
    );

    let mut new_categories = 0usize;
    let mut new_items = 0usize;
    for category in &mut current {
        if !category.is_assigned() {
            category.id = category_ids.next_id();
            new_categories += 1;
        }
        for item in category.items.iter_mut().filter(|i| !i.is_assigned()) {
            item.id = item_ids.next_id();
            new_items += 1;
        }
    }

    tracing::debug!(
        matched_categories,
        new_categories,
        matched_items,
        new_items,
        "reconciled catalogue"
    );

    current
}

/// Keep only the last category of each name, in encounter order.
///
/// [`merge`] tolerates duplicate names; storage keys categories by name, so a
/// list is collapsed before it becomes the book of record.
pub fn collapse_duplicate_names(categories: Vec<Category>) -> Vec<Category> {
    let last: HashMap<String, usize> = categories
        .iter()
        .enumerate()
        .map(|(n, c)| (c.name.clone(), n))
        .collect();
    if last.len() == categories.len() {
        return categories;
    }

    categories
        .into_iter()
        .enumerate()
        .filter_map(|(n, category)| {
            if last[&category.name] == n {
                Some(category)
            } else {
                tracing::warn!(category = %category.name, id = category.id, "duplicate category name dropped");
                None
            }
        })
        .collect()
}

/// Collect the ids already present. Later duplicates are released (set to 0) so
/// they are matched or minted again instead of colliding.
fn reserve_ids<'a>(ids: impl Iterator<Item = &'a mut u32>) -> HashSet<u32> {
    let mut taken = HashSet::new();
    for id in ids {
        if *id != UNASSIGNED && !taken.insert(*id) {
            tracing::debug!(id = *id, "duplicate id released for reassignment");
            *id = UNASSIGNED;
        }
    }
    taken
}

/// Hands out the lowest ids not in use, scanning upward from 1.
struct IdAllocator {
    used: HashSet<u32>,
    cursor: u32,
}

impl IdAllocator {
    fn new(used: impl IntoIterator<Item = u32>) -> Self {
        Self {
            used: used.into_iter().collect(),
            cursor: 1,
        }
    }

    fn next_id(&mut self) -> u32 {
        while self.used.contains(&self.cursor) {
            self.cursor += 1;
        }
        let id = self.cursor;
        self.used.insert(id);
        self.cursor += 1;
        id
    }
}
