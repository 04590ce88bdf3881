//! Core utilities for the oxiport import tools.
//!
//! This crate provides shared functionality for analyzing JavaScript/TypeScript
//! documents and workspaces:
//! - OS-independent path decomposition and relative-path algebra
//! - Scanning a document's existing import/require statements
//! - Statically resolving a file's export surface, re-exports included
//! - Relative module resolution (extension probing, index files)
//! - Manifest (`package.json`) discovery and dependency enumeration
//! - The candidate data model, language plugin registry, and host
//!   collaborator traits

mod collab;
mod constants;
mod edit;
mod exports;
mod manifest;
mod path_info;
mod plugin;
mod resolve;
mod scanner;
mod types;

// Re-export public API
pub use collab::{CancelFlag, FsEvent, LintFixer, Notifier, SelectionItem, SelectionProvider};
pub use constants::{
    ASSET_EXTENSIONS, INDEX_FILES, JS_TS_EXTENSIONS, RESOLVE_EXTENSIONS, TS_ONLY_EXTENSIONS,
    is_index_name, is_script_extension,
};
pub use edit::{SourceSpan, TextEdit, apply_edits, line_col};
pub use exports::{exported_variables, exports_through_index, has_default_export};
pub use manifest::{
    PackageDependency, find_nearest_manifest, find_workspace_root, installed_packages,
};
pub use path_info::{PathInfo, relative_path, to_posix};
pub use plugin::{LanguagePlugin, PLUGINS, PluginOp, plugin_for};
pub use resolve::{is_relative_request, resolve_candidate, resolve_relative};
pub use scanner::{
    DeclaredBinding, ExistingImport, ImportStatementKind, NamedBinding, ScannedDocument, scan,
    source_type_for,
};
pub use types::{Candidate, CandidateKind, INDEX_SORT_SENTINEL, PACKAGE_ID_PREFIX, file_candidate_id};
