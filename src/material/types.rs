//! Core material type definitions.
//!
//! Defines [`Item`] (one reviewable element), [`Category`] (an ordered group of
//! items, the unit of scheduling) and [`Batch`] (the derived subset of a category
//! presented in one review session).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier value meaning "not yet assigned by the reconciler".
pub const UNASSIGNED: u32 = 0;

/// A single reviewable element: a text, optionally backed by an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier, unique within the owning category. `0` until reconciled.
    #[serde(default)]
    pub id: u32,
    /// Display text (word, caption, image stem).
    pub title: String,
    /// Path of the associated image relative to the content root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_ref: Option<String>,
    /// Number of times the item has been part of a reviewed batch.
    #[serde(default)]
    pub views: u32,
    /// Time of the last review that included this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed: Option<DateTime<Utc>>,
}

impl Item {
    /// Text-only item.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED,
            title: title.into(),
            media_ref: None,
            views: 0,
            last_viewed: None,
        }
    }

    /// Item backed by an image at `media_ref`.
    pub fn with_media(title: impl Into<String>, media_ref: impl Into<String>) -> Self {
        Self {
            media_ref: Some(media_ref.into()),
            ..Self::new(title)
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_views(mut self, views: u32) -> Self {
        self.views = views;
        self
    }

    /// Durable matching key: the media path, or the title for text-only items.
    ///
    /// Ids are volatile across rescans, so reconciliation never matches on them.
    pub fn identity_key(&self) -> &str {
        self.media_ref.as_deref().unwrap_or(&self.title)
    }

    pub fn is_assigned(&self) -> bool {
        self.id != UNASSIGNED
    }

    /// Whether `other` denotes the same entry of a category.
    ///
    /// Assigned items compare by id; unassigned ones fall back to the identity key.
    pub fn same_entry(&self, other: &Item) -> bool {
        match (self.is_assigned(), other.is_assigned()) {
            (true, true) => self.id == other.id,
            (false, false) => self.identity_key() == other.identity_key(),
            _ => false,
        }
    }
}

/// A named, ordered group of items. The name is the reconciliation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier, unique across the category list. `0` until reconciled.
    #[serde(default)]
    pub id: u32,
    /// Unique among sibling categories.
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Time of the last review of any batch from this category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed: Option<DateTime<Utc>>,
    /// Set from scheduler output only; never read back as scheduling input.
    #[serde(default)]
    pub completed: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            id: UNASSIGNED,
            name: name.into(),
            items,
            last_viewed: None,
            completed: false,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.id != UNASSIGNED
    }

    pub fn find_item(&self, item_id: u32) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }
}

/// The subset of a category selected for one review session.
///
/// Items are copies of the category's items at scheduling time; review results
/// are written back into the source [`Category`], never into the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    pub category_id: u32,
    pub category_name: String,
    pub items: Vec<Item>,
    /// `true` when every item of the category has reached the view budget.
    pub completed: bool,
}

impl Batch {
    /// An empty batch signalling an exhausted category.
    pub fn completed(category: &Category) -> Self {
        Self {
            category_id: category.id,
            category_name: category.name.clone(),
            items: Vec::new(),
            completed: true,
        }
    }

    pub fn from_items(category: &Category, items: Vec<Item>) -> Self {
        Self {
            category_id: category.id,
            category_name: category.name.clone(),
            items,
            completed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// View counters of the batch items, in batch order.
    pub fn views(&self) -> Vec<u32> {
        self.items.iter().map(|i| i.views).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_key_prefers_media_ref() {
        let image = Item::with_media("flag", "flags/es.png");
        assert_eq!(image.identity_key(), "flags/es.png");

        let word = Item::new("casa");
        assert_eq!(word.identity_key(), "casa");
    }

    #[test]
    fn same_entry_uses_id_when_assigned() {
        let a = Item::new("one").with_id(3);
        let b = Item::new("renamed").with_id(3);
        assert!(a.same_entry(&b));

        let unassigned = Item::new("one");
        assert!(!a.same_entry(&unassigned));
        assert!(unassigned.same_entry(&Item::new("one")));
    }

    #[test]
    fn category_deserializes_with_defaults() {
        let json = r#"{"name": "Flags", "items": [{"title": "es", "media_ref": "flags/es.png"}]}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.id, UNASSIGNED);
        assert!(!category.completed);
        assert_eq!(category.items[0].views, 0);
        assert!(category.items[0].last_viewed.is_none());
    }
}
