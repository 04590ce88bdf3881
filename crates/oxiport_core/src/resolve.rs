use log::trace;
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::constants::{INDEX_FILES, RESOLVE_EXTENSIONS};

/// Resolve a relative module request against the importing file.
///
/// Only relative-path markers are handled here; package requests are resolved
/// by the manifest side. Returns `None` for a request that matches no file.
pub fn resolve_relative(from_file: &Path, request: &str) -> Option<PathBuf> {
    if !is_relative_request(request) {
        return None;
    }
    let base = from_file.parent()?;
    let joined = clean(base.join(request));
    trace!("Resolving '{}' from {} as {}", request, from_file.display(), joined.display());
    resolve_candidate(&joined)
}

/// True when the request starts with a relative-path marker
pub fn is_relative_request(request: &str) -> bool {
    request.starts_with("./") || request.starts_with("../") || request.starts_with('/')
}

/// Resolve a cleaned path to an existing file: exact match first, then with
/// each module extension appended, then as a directory with an index file.
pub fn resolve_candidate(p: &Path) -> Option<PathBuf> {
    if p.is_file() {
        return Some(p.to_path_buf());
    }

    for ext in RESOLVE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{}.{}", p.display(), ext));
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    for index_file in INDEX_FILES {
        let candidate = p.join(index_file);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}
