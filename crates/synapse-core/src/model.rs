use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Handle to a note owned by the storage collaborator.
///
/// The core never owns note content; it keeps the path as a lookup key and
/// the case-preserved base name for display and link rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteHandle {
    pub path: PathBuf,
    pub name: String,
}

impl NoteHandle {
    /// Build a handle from a path, deriving the name from the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An atomic concept card produced by the external generator.
///
/// The core only consumes this shape: relations get resolved against the
/// corpus, and the card is rendered to markdown when materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomicCard {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub content: String,
    pub explanation: String,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub position: CardPosition,
}

/// A logic word plus the free-text concept name it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub logic: String,
    pub concept: String,
}

impl Relation {
    pub fn new(logic: impl Into<String>, concept: impl Into<String>) -> Self {
        Self {
            logic: logic.into(),
            concept: concept.into(),
        }
    }
}

/// Where a card sits relative to its siblings: one optional parent to trace
/// up to, zero or more children it decomposes into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPosition {
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}
