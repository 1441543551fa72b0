//! Filesystem-backed item source.
//!
//! Notes live as markdown files under `<user_dir>/data`, optionally starting
//! with a YAML frontmatter block:
//!
//! ```markdown
//! ---
//! id: 12
//! title: Bread recipe
//! ---
//!
//! flour, water, salt
//! ```
//!
//! Files without an `id` use their file stem (parsed as an integer when
//! possible); files without a `title` use the file stem as title.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use async_walkdir::WalkDir;
use futures::StreamExt;
use serde::Deserialize;

use crate::item::{Item, ItemId, ItemSource};
use crate::{Error, Result};

/// Frontmatter delimiter line.
const DELIMITER: &str = "---";

/// File extension of note files.
const NOTE_EXTENSION: &str = "md";

#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    id: Option<ItemId>,
    title: Option<String>,
}

/// Item source that walks a directory of markdown notes.
#[derive(Debug, Clone)]
pub struct DirectoryItemSource {
    root: PathBuf,
}

impl DirectoryItemSource {
    /// Create a source rooted at `root` (usually `<user_dir>/data`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ItemSource for DirectoryItemSource {
    async fn items(&self) -> Result<Vec<Item>> {
        if !self.root.exists() {
            return Err(Error::not_found(
                self.root.to_string_lossy(),
                "item directory",
            ));
        }

        let mut items = Vec::new();
        let mut walker = WalkDir::new(&self.root);

        while let Some(entry) = walker.next().await {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("Walk error: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if path.is_dir() || !has_note_extension(&path) {
                continue;
            }

            let raw = match tokio::fs::read_to_string(&path).await {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("Failed to read {:?}: {}", path, e);
                    continue;
                }
            };

            match parse_note(&path, &raw) {
                Some(item) => items.push(item),
                None => log::debug!("Skipped {:?} (no usable file stem)", path),
            }
        }

        items.sort_by(|a, b| a.id.cmp(&b.id));
        log::debug!("Loaded {} items from {:?}", items.len(), self.root);

        Ok(items)
    }
}

fn has_note_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(NOTE_EXTENSION))
        .unwrap_or(false)
}

/// Build an item from a note file's path and raw text.
///
/// Returns `None` only when the path has no usable file stem.
pub fn parse_note(path: &Path, raw: &str) -> Option<Item> {
    let stem = path.file_stem()?.to_string_lossy().to_string();
    let (frontmatter, body) = split_frontmatter(raw);

    let meta = match frontmatter {
        Some(yaml) => match serde_yaml::from_str::<Frontmatter>(yaml) {
            Ok(meta) => meta,
            Err(e) => {
                log::warn!("Invalid frontmatter in {:?}: {}", path, e);
                Frontmatter::default()
            }
        },
        None => Frontmatter::default(),
    };

    let id = meta.id.unwrap_or_else(|| match stem.parse::<i64>() {
        Ok(n) => ItemId::Int(n),
        Err(_) => ItemId::Text(stem.clone()),
    });
    let title = meta.title.unwrap_or(stem);

    Some(Item {
        id,
        title,
        content: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}

/// Split a note into its frontmatter block (if any) and body.
fn split_frontmatter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw.strip_prefix(DELIMITER) else {
        return (None, raw);
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return (None, raw);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, raw)
}
