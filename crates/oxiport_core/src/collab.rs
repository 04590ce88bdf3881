//! Boundaries to the host environment: selection UI, notifications,
//! filesystem change events, the optional linter hook, and cooperative
//! cancellation. The engine only ever talks to these traits; dismissal of a
//! selection (`None`) is the normal abort path for an in-flight operation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

use crate::edit::SourceSpan;

/// One row offered to the user by a selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    pub label: String,
    pub description: String,
}

impl SelectionItem {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> SelectionItem {
        SelectionItem { label: label.into(), description: description.into() }
    }
}

/// Presents a list of items and returns the chosen index, or `None` when the
/// user dismisses the prompt. Every call site treats `None` as "abort the
/// whole operation, leave the document untouched".
pub trait SelectionProvider {
    fn pick(&mut self, prompt: &str, items: &[SelectionItem]) -> Option<usize>;
}

/// Receives user-facing messages. `focus` is a best-effort request to move
/// the cursor/viewport to a location, used with "already imported".
pub trait Notifier {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn focus(&self, _span: SourceSpan) {}
}

/// Best-effort post-edit hook (eslint --fix style). Failure or absence is
/// silently ignored by callers.
pub trait LintFixer {
    fn fix(&self, path: &Path) -> Result<()>;
}

/// Filesystem change notification consumed by the workspace index.
/// `Invalidate` stands for any structural event without a usable path
/// (renames, overflow), which must clear the cache instead of patching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    Created(PathBuf),
    Deleted(PathBuf),
    Invalidate,
}

/// Shared cancellation handle checked between batch entries. Cloning shares
/// the underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> CancelFlag {
        CancelFlag::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
