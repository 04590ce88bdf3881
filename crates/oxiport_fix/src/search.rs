use dashmap::DashMap;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Path, PathBuf};

use oxiport_core::{ASSET_EXTENSIONS, JS_TS_EXTENSIONS, PathInfo};

/// Workspace-wide search for files by base name, used to relocate the target
/// of a broken import. Results are cached per needle for the lifetime of the
/// search, which spans one fix run.
pub struct FuzzySearch {
    root: PathBuf,
    cache: DashMap<String, Vec<PathBuf>>,
}

impl FuzzySearch {
    pub fn new(root: impl Into<PathBuf>) -> FuzzySearch {
        FuzzySearch { root: root.into(), cache: DashMap::new() }
    }

    /// All importable files under the root whose extension-stripped base name
    /// equals `needle`. Results are sorted for stable presentation.
    pub fn find(&self, needle: &str) -> Vec<PathBuf> {
        if let Some(hit) = self.cache.get(needle) {
            trace!("Search cache hit for '{}'", needle);
            return hit.clone();
        }

        debug!("Searching workspace for '{}'", needle);
        let walker =
            WalkBuilder::new(&self.root).hidden(false).ignore(true).git_ignore(true).build();

        let mut matches: Vec<PathBuf> = Vec::new();
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || path.to_string_lossy().contains("/node_modules/") {
                continue;
            }
            let info = PathInfo::new(path);
            if info.base_name == needle
                && (JS_TS_EXTENSIONS.contains(&info.extension.as_str())
                    || ASSET_EXTENSIONS.contains(&info.extension.as_str()))
            {
                matches.push(path.to_path_buf());
            }
        }
        matches.sort();

        self.cache.insert(needle.to_string(), matches.clone());
        matches
    }
}
