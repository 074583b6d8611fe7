use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::canvas;
use crate::cards;
use crate::config::Settings;
use crate::history::{HistoryEntry, HistoryLog, HistoryStatus};
use crate::index::NoteCorpusIndex;
use crate::model::AtomicCard;
use crate::oplog::{FileOperation, LogOutcome, OperationLog};
use crate::resolver::ConceptResolver;
use crate::vfs::FileSystem;

#[cfg(test)]
mod tests;

/// Outcome of one materialization run, suitable for user notification.
#[derive(Debug, Clone)]
pub struct MaterializeOutcome {
    /// Files actually created (cards, plus the canvas when enabled).
    pub created: Vec<PathBuf>,
    /// Cards whose file could not be created.
    pub failed: usize,
    pub folder: PathBuf,
    pub message: String,
}

/// The Engine acts as the high-level facade for the core.
///
/// # Architecture Decision: Action vs Query Separation
///
/// *   **Actions (Write/Mutation)**: Unified in `Engine`.
///     Everything that mutates state (index rebuilds, card materialization,
///     undo/redo) goes through methods here, so there is a single entry
///     point for logic that touches the FileSystem.
///
/// *   **Queries (Read)**: Access the fields directly.
///     Read-only lookups (index queries, history listing, stack depths) do
///     not need wrapping; callers use `engine.index`, `engine.oplog` and
///     friends, or the borrow-scoped `resolver()`.
pub struct Engine {
    pub settings: Settings,
    pub index: NoteCorpusIndex,
    pub oplog: OperationLog,
    pub history: HistoryLog,
    pub fs: Arc<dyn FileSystem>,
}

impl Engine {
    pub fn new(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let history = HistoryLog::new(settings.history_limit);
        Self {
            settings,
            index: NoteCorpusIndex::new(),
            oplog: OperationLog::new(),
            history,
            fs,
        }
    }

    // ------------------------------------------------------------------------
    // Corpus sync (changes coming FROM disk)
    // ------------------------------------------------------------------------

    /// Rebuild the corpus index from the notes under `root`. Hosts call
    /// this on every create/delete/rename event and are responsible for
    /// coalescing rapid successive triggers; an overlapping rebuild can
    /// expose an empty or partial index to an interleaved resolver call.
    pub fn rebuild_index(&mut self, root: &Path) {
        self.index.rebuild_from(&*self.fs, root);
    }

    /// Borrow-scoped resolver over the current index.
    pub fn resolver(&self) -> ConceptResolver<'_> {
        ConceptResolver::new(&self.index)
    }

    // ------------------------------------------------------------------------
    // Materialization (changes GOING TO disk)
    // ------------------------------------------------------------------------

    /// Write the generated cards next to their source note, as one
    /// transaction.
    ///
    /// Creates `<folder>/<source stem>-atomic/`, one markdown file per
    /// card, optionally a canvas file, and optionally appends the banner to
    /// the source note (its prior content is captured before the write).
    /// Per-card I/O failures are logged and skipped; siblings continue.
    /// Whatever succeeded is recorded as a single transaction on the
    /// operation log and as a history entry.
    ///
    /// Relations are expected to have been resolved by the caller through
    /// the resolver entry points before the cards arrive here.
    pub fn materialize_cards(
        &mut self,
        source_path: &Path,
        cards: &[AtomicCard],
    ) -> MaterializeOutcome {
        let folder = self.card_folder(source_path);

        if cards.is_empty() {
            return MaterializeOutcome {
                created: Vec::new(),
                failed: 0,
                folder,
                message: "No cards to create".to_string(),
            };
        }

        if let Err(err) = self.fs.create_dir_all(&folder) {
            log::warn!(
                "materialize: cannot create folder {}: {err}",
                folder.display()
            );
            let message = format!("Could not create card folder {}", folder.display());
            return MaterializeOutcome {
                created: Vec::new(),
                failed: cards.len(),
                folder,
                message,
            };
        }

        let source_content = match self.fs.read_to_string(source_path) {
            Ok(content) => Some(content),
            Err(err) => {
                log::warn!(
                    "materialize: cannot read source {}: {err}",
                    source_path.display()
                );
                None
            }
        };

        let mut ops: Vec<FileOperation> = Vec::new();
        let mut created: Vec<PathBuf> = Vec::new();
        let mut failed = 0usize;

        for card in cards {
            let path = folder.join(format!("{}.md", cards::card_file_name(&card.title)));
            match self.fs.create(&path, &cards::render_card(card)) {
                Ok(()) => {
                    ops.push(FileOperation::create(&path));
                    created.push(path);
                }
                Err(err) => {
                    log::warn!("materialize: could not create {}: {err}", path.display());
                    failed += 1;
                }
            }
        }

        let card_count = created.len();

        if self.settings.generate_canvas && !created.is_empty() {
            let canvas_path = folder.join(format!("{}.canvas", source_stem(source_path)));
            let data = canvas::generate_canvas(source_path, &created);
            match serde_json::to_string_pretty(&data) {
                Ok(json) => match self.fs.create(&canvas_path, &json) {
                    Ok(()) => {
                        ops.push(FileOperation::create(&canvas_path));
                        created.push(canvas_path);
                    }
                    Err(err) => log::warn!(
                        "materialize: could not write canvas {}: {err}",
                        canvas_path.display()
                    ),
                },
                Err(err) => log::warn!("materialize: canvas serialization failed: {err}"),
            }
        }

        // Banner links every requested card; links to cards that failed to
        // materialize stay behind as stub references.
        if self.settings.add_banner && self.settings.keep_original_note && card_count > 0 {
            if let Some(prior) = &source_content {
                let updated = format!("{prior}{}", cards::render_banner(cards));
                match self.fs.write(source_path, &updated) {
                    Ok(()) => ops.push(FileOperation::modify(source_path, prior.clone())),
                    Err(err) => log::warn!(
                        "materialize: could not update source {}: {err}",
                        source_path.display()
                    ),
                }
            }
        }

        let status = if failed == 0 {
            HistoryStatus::Completed
        } else {
            HistoryStatus::Partial
        };
        self.history.record(HistoryEntry::new(
            source_path,
            card_count,
            status,
            source_content.as_deref().unwrap_or(""),
        ));

        self.oplog.add_transaction(ops);

        let message = if failed == 0 {
            format!("Created {card_count} card(s) in {}", folder.display())
        } else {
            format!(
                "Created {card_count} card(s) in {} ({failed} failed)",
                folder.display()
            )
        };
        log::info!("materialize: {message}");

        MaterializeOutcome {
            created,
            failed,
            folder,
            message,
        }
    }

    // ------------------------------------------------------------------------
    // Undo / Redo
    // ------------------------------------------------------------------------

    pub fn undo(&mut self) -> LogOutcome {
        self.oplog.undo(&*self.fs)
    }

    pub fn redo(&mut self) -> LogOutcome {
        self.oplog.redo(&*self.fs)
    }

    /// Decomposition runs, newest first.
    pub fn history(&self) -> Vec<&HistoryEntry> {
        self.history.entries().collect()
    }

    fn card_folder(&self, source_path: &Path) -> PathBuf {
        let base = if self.settings.default_folder.is_empty() {
            source_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        } else {
            PathBuf::from(&self.settings.default_folder)
        };
        base.join(format!("{}-atomic", source_stem(source_path)))
    }
}

fn source_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
