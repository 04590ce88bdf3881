//! Broken-import repair for the oxiport tools.
//!
//! Scans a document for relative imports that no longer resolve, relocates
//! their targets by base name across the workspace, and rewrites the path
//! literals in place, asking the user to choose when a name is ambiguous.

mod fixer;
mod reporter;
mod search;

// Re-export public API
pub use fixer::{FixContext, FixReport, run_fix_imports};
pub use reporter::print_fix_report;
pub use search::FuzzySearch;
