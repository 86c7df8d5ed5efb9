//! Content discovery: turns a directory tree into unreconciled categories.
//!
//! - Every directory holding images becomes a category named after its path
//!   relative to the root, components joined with `_` (the root itself uses its
//!   own directory name). Items carry the image stem as title and the relative
//!   image path as media reference.
//! - Vocabulary files (`*.txt`) hold lines of the form `category: word, word, ...`
//!   and contribute text-only items to the named category.
//!
//! Output ids are all zero; [`crate::material::reconcile::merge`] assigns them.
//! The walk is sorted by file name, so the same tree always yields the same list.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::material::types::{Category, Item};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
pub const VOCABULARY_EXTENSION: &str = "txt";

/// Discover all categories under `root`.
pub fn discover(root: &Path) -> Result<Vec<Category>> {
    discover_with_progress(root, |_| {})
}

/// Like [`discover`], calling `on_entry` with the number of entries visited so far.
pub fn discover_with_progress<F>(root: &Path, mut on_entry: F) -> Result<Vec<Category>>
where
    F: FnMut(usize),
{
    if !root.is_dir() {
        info!(root = %root.display(), "content directory not found");
        return Ok(Vec::new());
    }

    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());

    let mut catalogue = CatalogueBuilder::default();
    let mut image_dirs: HashMap<String, PathBuf> = HashMap::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for (visited, entry) in walker.enumerate() {
        on_entry(visited + 1);
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(extension) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
            continue;
        };

        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            let Some(relative) = relative_path(root, path) else {
                continue;
            };
            let dir = path.parent().unwrap_or(root);
            let name = category_name(root, dir, &root_name);
            let clash = image_dirs
                .get(&name)
                .filter(|seen| seen.as_path() != dir)
                .cloned();
            match clash {
                Some(seen) => warn!(
                    category = %name,
                    first = %seen.display(),
                    second = %dir.display(),
                    "two directories share a category name; items are merged"
                ),
                None => {
                    image_dirs
                        .entry(name.clone())
                        .or_insert_with(|| dir.to_path_buf());
                }
            }
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            catalogue.push(&name, Item::with_media(title, relative));
        } else if extension == VOCABULARY_EXTENSION {
            load_vocabulary(path, &mut catalogue);
        }
    }

    let categories = catalogue.finish();
    info!(
        root = %root.display(),
        categories = categories.len(),
        items = categories.iter().map(|c| c.items.len()).sum::<usize>(),
        "content scanned"
    );
    Ok(categories)
}

/// Parse one vocabulary line: `category: word1, word2, ...`.
///
/// Returns `None` for malformed lines (no `:`, empty name, or no words).
pub fn parse_vocabulary_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let (name, words) = line.split_once(':')?;
    let name = name.trim();
    let words: Vec<&str> = words
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .collect();
    if name.is_empty() || words.is_empty() {
        return None;
    }
    Some((name, words))
}

fn load_vocabulary(path: &Path, catalogue: &mut CatalogueBuilder) {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping unreadable vocabulary file");
            return;
        }
    };

    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_vocabulary_line(line) {
            Some((name, words)) => {
                for word in words {
                    catalogue.push(name, Item::new(word));
                }
            }
            None => warn!(path = %path.display(), line = number + 1, "malformed vocabulary line"),
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// `/`-separated path of `path` relative to `root`.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    Some(components(relative).join("/"))
}

/// `/`-joined path of `dir` below `root`, or the root's own name. A `/` cannot
/// occur inside a directory name, so distinct subdirectories never collide.
fn category_name(root: &Path, dir: &Path, root_name: &str) -> String {
    let parts = dir
        .strip_prefix(root)
        .map(components)
        .unwrap_or_default();
    if parts.is_empty() {
        root_name.to_string()
    } else {
        parts.join("/")
    }
}

/// Collects items per category name, keeping first-seen order and dropping
/// repeated identity keys inside a category.
#[derive(Default)]
struct CatalogueBuilder {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
    keys: Vec<HashSet<String>>,
}

impl CatalogueBuilder {
    fn push(&mut self, name: &str, item: Item) {
        let n = match self.index.get(name) {
            Some(&n) => n,
            None => {
                self.categories.push(Category::new(name, Vec::new()));
                self.keys.push(HashSet::new());
                self.index.insert(name.to_string(), self.categories.len() - 1);
                self.categories.len() - 1
            }
        };
        if !self.keys[n].insert(item.identity_key().to_string()) {
            debug!(category = name, key = item.identity_key(), "duplicate item skipped");
            return;
        }
        self.categories[n].items.push(item);
    }

    fn finish(self) -> Vec<Category> {
        self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vocabulary_lines() {
        let (name, words) = parse_vocabulary_line("animals: perro, gato ,  ,pez").unwrap();
        assert_eq!(name, "animals");
        assert_eq!(words, vec!["perro", "gato", "pez"]);
    }

    #[test]
    fn rejects_malformed_vocabulary_lines() {
        assert!(parse_vocabulary_line("no separator here").is_none());
        assert!(parse_vocabulary_line(": orphan, words").is_none());
        assert!(parse_vocabulary_line("empty:  , ").is_none());
    }

    #[test]
    fn builder_merges_names_and_drops_duplicates() {
        let mut builder = CatalogueBuilder::default();
        builder.push("a", Item::new("x"));
        builder.push("b", Item::new("y"));
        builder.push("a", Item::new("x"));
        builder.push("a", Item::new("z"));

        let categories = builder.finish();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "a");
        let titles: Vec<&str> = categories[0].items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["x", "z"]);
    }

    #[test]
    fn nested_and_underscored_directories_stay_apart() {
        let root = Path::new("/content");
        assert_eq!(category_name(root, Path::new("/content/a/b"), "content"), "a/b");
        assert_eq!(category_name(root, Path::new("/content/a_b"), "content"), "a_b");
        assert_eq!(category_name(root, root, "content"), "content");
    }
}
