use std::path::{Path, PathBuf};

use crate::vfs::FileSystem;

/// A single reversible file mutation recorded by the orchestrator.
///
/// Closed set of variants so every site that interprets operations is forced
/// to handle both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    /// File created during the forward transaction. `content` is `None`
    /// when recorded forward (the bytes are already on disk); an inverse
    /// built by `undo` carries the captured content so `redo` can recreate
    /// the file.
    Create {
        path: PathBuf,
        content: Option<String>,
    },
    /// File rewritten during the forward transaction. `prior_content` is
    /// the content before the forward change, captured before the write;
    /// without that discipline the operation is not invertible.
    Modify {
        path: PathBuf,
        prior_content: String,
    },
}

impl FileOperation {
    pub fn create(path: impl Into<PathBuf>) -> Self {
        FileOperation::Create {
            path: path.into(),
            content: None,
        }
    }

    pub fn modify(path: impl Into<PathBuf>, prior_content: impl Into<String>) -> Self {
        FileOperation::Modify {
            path: path.into(),
            prior_content: prior_content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileOperation::Create { path, .. } => path,
            FileOperation::Modify { path, .. } => path,
        }
    }
}

/// What reversing (or reapplying) an operation did to its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpAction {
    DeletedFile,
    RestoredContent,
    RecreatedFile,
}

/// Per-operation result. `Skipped` marks an irreversible operation whose
/// target was missing at reversal time: accepted information loss, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpStatus {
    Applied,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct OpReport {
    pub path: PathBuf,
    pub action: OpAction,
    pub status: OpStatus,
}

/// Outcome of an `undo`/`redo` call: count of affected files, a message
/// suitable for user notification, and per-operation reports in application
/// order so callers can see exactly which operations were irreversible.
#[derive(Debug, Clone)]
pub struct LogOutcome {
    pub affected: usize,
    pub message: String,
    pub reports: Vec<OpReport>,
}

impl LogOutcome {
    fn empty(message: &str) -> Self {
        Self {
            affected: 0,
            message: message.to_string(),
            reports: Vec::new(),
        }
    }
}

/// Dual-stack transactional log of file mutations.
///
/// Each transaction is an ordered list of operations treated as one
/// undo/redo unit. Undo applies inverses in reverse order (later operations
/// may depend on earlier ones), redo reapplies in forward order; both build
/// the inverse transaction for the opposite stack as they go, capturing
/// current content before every write. Individual failures and skips never
/// abort sibling operations; transactions apply partially rather than
/// rolling back.
///
/// Both stacks are in-memory only and live for the hosting session.
#[derive(Default)]
pub struct OperationLog {
    undo_stack: Vec<Vec<FileOperation>>,
    redo_stack: Vec<Vec<FileOperation>>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed forward transaction. Empty transactions are
    /// dropped. A genuinely new forward action invalidates redo history;
    /// the inverse transactions `undo`/`redo` build are pushed onto the
    /// stacks directly and do not pass through here.
    pub fn add_transaction(&mut self, ops: Vec<FileOperation>) {
        if ops.is_empty() {
            return;
        }
        self.undo_stack.push(ops);
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Reverse the most recent transaction, last-performed-first-undone.
    pub fn undo(&mut self, fs: &dyn FileSystem) -> LogOutcome {
        let Some(ops) = self.undo_stack.pop() else {
            return LogOutcome::empty("Nothing to undo");
        };

        let mut inverse = Vec::new();
        let mut reports = Vec::new();
        let mut affected = 0usize;

        for op in ops.iter().rev() {
            let report = match op {
                FileOperation::Create { path, .. } => revert_create(fs, path, &mut inverse),
                FileOperation::Modify {
                    path,
                    prior_content,
                } => restore_content(
                    fs,
                    path,
                    prior_content,
                    &mut inverse,
                    OpAction::RestoredContent,
                ),
            };
            if report.status == OpStatus::Applied {
                affected += 1;
            }
            reports.push(report);
        }

        if !inverse.is_empty() {
            self.redo_stack.push(inverse);
        }

        LogOutcome {
            affected,
            message: format!("Reverted {affected} file operation(s)"),
            reports,
        }
    }

    /// Reapply the most recently undone transaction in original forward
    /// order, mirroring `undo`.
    pub fn redo(&mut self, fs: &dyn FileSystem) -> LogOutcome {
        let Some(ops) = self.redo_stack.pop() else {
            return LogOutcome::empty("Nothing to redo");
        };

        let mut inverse = Vec::new();
        let mut reports = Vec::new();
        let mut affected = 0usize;

        for op in &ops {
            let report = match op {
                FileOperation::Create { path, content } => {
                    recreate_file(fs, path, content.as_deref(), &mut inverse)
                }
                FileOperation::Modify {
                    path,
                    prior_content,
                } => restore_content(
                    fs,
                    path,
                    prior_content,
                    &mut inverse,
                    OpAction::RestoredContent,
                ),
            };
            if report.status == OpStatus::Applied {
                affected += 1;
            }
            reports.push(report);
        }

        if !inverse.is_empty() {
            self.undo_stack.push(inverse);
        }

        LogOutcome {
            affected,
            message: format!("Reapplied {affected} file operation(s)"),
            reports,
        }
    }
}

/// Undo of `Create`: capture current content for redo, then delete. A
/// missing file has no clean inverse and is skipped, contributing no redo
/// entry.
fn revert_create(
    fs: &dyn FileSystem,
    path: &Path,
    inverse: &mut Vec<FileOperation>,
) -> OpReport {
    if !fs.exists(path) {
        log::warn!("undo: {} already gone, skipping delete", path.display());
        return OpReport {
            path: path.to_path_buf(),
            action: OpAction::DeletedFile,
            status: OpStatus::Skipped,
        };
    }

    let captured = match fs.read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("undo: cannot read {}: {err}", path.display());
            return OpReport {
                path: path.to_path_buf(),
                action: OpAction::DeletedFile,
                status: OpStatus::Failed(err.to_string()),
            };
        }
    };

    if let Err(err) = fs.remove_file(path) {
        log::warn!("undo: cannot delete {}: {err}", path.display());
        return OpReport {
            path: path.to_path_buf(),
            action: OpAction::DeletedFile,
            status: OpStatus::Failed(err.to_string()),
        };
    }

    inverse.push(FileOperation::Create {
        path: path.to_path_buf(),
        content: Some(captured),
    });
    OpReport {
        path: path.to_path_buf(),
        action: OpAction::DeletedFile,
        status: OpStatus::Applied,
    }
}

/// Shared by undo-of-`Modify` and redo-of-`Modify`: capture current content
/// for the opposite stack, then write the recorded content back.
fn restore_content(
    fs: &dyn FileSystem,
    path: &Path,
    recorded: &str,
    inverse: &mut Vec<FileOperation>,
    action: OpAction,
) -> OpReport {
    if !fs.exists(path) {
        log::warn!("{} missing, skipping content restore", path.display());
        return OpReport {
            path: path.to_path_buf(),
            action,
            status: OpStatus::Skipped,
        };
    }

    let captured = match fs.read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("cannot read {}: {err}", path.display());
            return OpReport {
                path: path.to_path_buf(),
                action,
                status: OpStatus::Failed(err.to_string()),
            };
        }
    };

    if let Err(err) = fs.write(path, recorded) {
        log::warn!("cannot write {}: {err}", path.display());
        return OpReport {
            path: path.to_path_buf(),
            action,
            status: OpStatus::Failed(err.to_string()),
        };
    }

    inverse.push(FileOperation::modify(path, captured));
    OpReport {
        path: path.to_path_buf(),
        action,
        status: OpStatus::Applied,
    }
}

/// Redo of `Create`: recreate the file from captured content. Skipped when
/// the content was never captured or a file already lives at the path.
fn recreate_file(
    fs: &dyn FileSystem,
    path: &Path,
    content: Option<&str>,
    inverse: &mut Vec<FileOperation>,
) -> OpReport {
    let Some(content) = content else {
        log::warn!("redo: no captured content for {}", path.display());
        return OpReport {
            path: path.to_path_buf(),
            action: OpAction::RecreatedFile,
            status: OpStatus::Skipped,
        };
    };

    if fs.exists(path) {
        log::warn!("redo: {} already exists, skipping create", path.display());
        return OpReport {
            path: path.to_path_buf(),
            action: OpAction::RecreatedFile,
            status: OpStatus::Skipped,
        };
    }

    if let Err(err) = fs.create(path, content) {
        log::warn!("redo: cannot create {}: {err}", path.display());
        return OpReport {
            path: path.to_path_buf(),
            action: OpAction::RecreatedFile,
            status: OpStatus::Failed(err.to_string()),
        };
    }

    inverse.push(FileOperation::create(path));
    OpReport {
        path: path.to_path_buf(),
        action: OpAction::RecreatedFile,
        status: OpStatus::Applied,
    }
}
