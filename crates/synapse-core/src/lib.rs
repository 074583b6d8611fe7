//! Synapse Core Library
//!
//! Core logic for turning note text into cross-linked atomic concept cards:
//! corpus indexing, fuzzy concept resolution, and a transactional operation
//! log with undo/redo. No host or UI dependencies; the surrounding tool
//! drives everything through the `Engine` facade and the `FileSystem`
//! boundary.

pub mod canvas;
pub mod cards;
pub mod config;
pub mod engine;
pub mod history;
pub mod index;
pub mod model;
pub mod oplog;
pub mod resolver;
pub mod vfs;

pub use config::Settings;
pub use engine::{Engine, MaterializeOutcome};
pub use history::{HistoryEntry, HistoryLog, HistoryStatus};
pub use index::NoteCorpusIndex;
pub use model::{AtomicCard, CardPosition, NoteHandle, Relation};
pub use oplog::{FileOperation, LogOutcome, OpAction, OpReport, OpStatus, OperationLog};
pub use resolver::ConceptResolver;
pub use vfs::{FileSystem, PhysicalFileSystem};
