//! Add-import engine for the oxiport tools.
//!
//! Given a document and a workspace, this crate builds the candidate list
//! (workspace files plus declared packages), filters and orders it for the
//! requesting document, and synthesizes the import statement for whichever
//! candidate the user picks, merging into an existing import of the same
//! path when grouping is enabled.

mod engine;
mod filter;
mod index;
mod naming;
mod options;
mod recency;
mod sorting;
mod synthesizer;

// Re-export public API
pub use engine::{AddImportEngine, AddImportOutcome, EngineContext};
pub use filter::filter_candidates;
pub use index::{PackageIndex, WorkspaceIndex};
pub use naming::binding_identifier;
pub use options::{FilterRule, ImportOptions, ImportSyntax, NamingConvention, NamingRule};
pub use recency::RecencyTracker;
pub use sorting::sort_candidates;
pub use synthesizer::{Synthesis, SynthesisRequest, synthesize};
