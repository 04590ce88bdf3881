use ignore::WalkBuilder;
use log::{debug, trace};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use oxiport_core::{
    ASSET_EXTENSIONS, Candidate, FsEvent, JS_TS_EXTENSIONS, file_candidate_id,
    find_nearest_manifest, installed_packages,
};

/// Lazily built index of importable files under a workspace root.
///
/// The file list is built on first request and cached; incremental updates
/// are keyed by candidate id (the POSIX path), and any event without a
/// usable path invalidates the whole cache for a lazy rebuild.
pub struct WorkspaceIndex {
    root: PathBuf,
    files: Option<Vec<Candidate>>,
}

impl WorkspaceIndex {
    pub fn new(root: impl Into<PathBuf>) -> WorkspaceIndex {
        WorkspaceIndex { root: root.into(), files: None }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File candidates, building the index on first use
    pub fn candidates(&mut self) -> &[Candidate] {
        if self.files.is_none() {
            self.files = Some(build_file_candidates(&self.root));
        }
        self.files.as_deref().unwrap_or_default()
    }

    pub fn is_built(&self) -> bool {
        self.files.is_some()
    }

    /// Incrementally add a file; only applied when the cache exists
    pub fn add(&mut self, path: &Path) {
        let Some(files) = &mut self.files else {
            return;
        };
        if !is_candidate_file(path) {
            return;
        }
        let candidate = Candidate::file(path, &self.root);
        trace!("Index add: {}", candidate.id);
        match files.iter_mut().find(|c| c.id == candidate.id) {
            Some(existing) => *existing = candidate,
            None => files.push(candidate),
        }
    }

    /// Incrementally remove a file by id; only applied when the cache exists
    pub fn remove(&mut self, path: &Path) {
        let Some(files) = &mut self.files else {
            return;
        };
        let id = file_candidate_id(path);
        trace!("Index remove: {}", id);
        files.retain(|c| c.id != id);
    }

    /// Clear the cache; it is rebuilt lazily on the next request
    pub fn invalidate(&mut self) {
        debug!("Invalidating workspace index");
        self.files = None;
    }

    pub fn apply_event(&mut self, event: FsEvent) {
        match event {
            FsEvent::Created(path) => self.add(&path),
            FsEvent::Deleted(path) => self.remove(&path),
            FsEvent::Invalidate => self.invalidate(),
        }
    }
}

fn is_candidate_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    JS_TS_EXTENSIONS.contains(&ext) || ASSET_EXTENSIONS.contains(&ext)
}

fn build_file_candidates(root: &Path) -> Vec<Candidate> {
    debug!("Building file index from root: {}", root.display());
    let walker = WalkBuilder::new(root).hidden(false).ignore(true).git_ignore(true).build();

    let mut paths: Vec<PathBuf> = Vec::new();
    for res in walker.filter_map(|e| e.ok()) {
        let p = res.path();
        if !p.is_file() {
            continue;
        }
        // node_modules contents are offered through the package index instead
        if p.to_string_lossy().contains("/node_modules/") {
            continue;
        }
        if is_candidate_file(p) {
            paths.push(p.to_path_buf());
        }
    }

    let candidates: Vec<Candidate> =
        paths.par_iter().map(|p| Candidate::file(p, root)).collect();
    debug!("Indexed {} file candidates", candidates.len());
    candidates
}

/// Candidates from the nearest manifest's declared dependencies. Cached per
/// manifest until invalidated.
#[derive(Default)]
pub struct PackageIndex {
    cached: Option<(PathBuf, Vec<Candidate>)>,
}

impl PackageIndex {
    pub fn new() -> PackageIndex {
        PackageIndex::default()
    }

    /// Package candidates for the document, walking upward to the nearest
    /// `package.json` bounded by the workspace root. A missing or malformed
    /// manifest yields no candidates.
    pub fn candidates(&mut self, document: &Path, workspace_root: &Path) -> &[Candidate] {
        let start_dir = document.parent().unwrap_or(workspace_root);
        let Some(manifest) = find_nearest_manifest(start_dir, workspace_root) else {
            self.cached = None;
            return &[];
        };

        let stale = !matches!(&self.cached, Some((m, _)) if *m == manifest);
        if stale {
            let candidates = match installed_packages(&manifest) {
                Ok(packages) => packages
                    .iter()
                    .map(|p| Candidate::package(&p.name, p.version.as_deref()))
                    .collect(),
                Err(e) => {
                    debug!("Ignoring unreadable manifest {}: {}", manifest.display(), e);
                    Vec::new()
                }
            };
            self.cached = Some((manifest, candidates));
        }

        self.cached.as_ref().map(|(_, c)| c.as_slice()).unwrap_or_default()
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_lazy_build_lists_script_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/a.ts", "");
        create_test_file(root, "src/b.js", "");
        create_test_file(root, "src/styles.css", "");
        create_test_file(root, "README.md", "");

        let mut index = WorkspaceIndex::new(root);
        assert!(!index.is_built());
        let labels: Vec<String> =
            index.candidates().iter().map(|c| c.label.clone()).collect();
        assert!(index.is_built());
        assert_eq!(labels.len(), 3);
        assert!(labels.contains(&"a.ts".to_string()));
        assert!(labels.contains(&"styles.css".to_string()));
        assert!(!labels.contains(&"README.md".to_string()));
    }

    #[test]
    fn test_add_remove_keyed_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/a.ts", "");

        let mut index = WorkspaceIndex::new(root);
        index.candidates();

        let b = create_test_file(root, "src/b.ts", "");
        index.add(&b);
        assert_eq!(index.candidates().len(), 2);

        // Adding the same path again replaces, not duplicates
        index.add(&b);
        assert_eq!(index.candidates().len(), 2);

        index.remove(&b);
        assert_eq!(index.candidates().len(), 1);
    }

    #[test]
    fn test_add_ignored_when_not_built() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = create_test_file(root, "src/a.ts", "");

        let mut index = WorkspaceIndex::new(root);
        index.add(&a);
        assert!(!index.is_built());
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/a.ts", "");

        let mut index = WorkspaceIndex::new(root);
        assert_eq!(index.candidates().len(), 1);

        create_test_file(root, "src/b.ts", "");
        index.apply_event(FsEvent::Invalidate);
        assert!(!index.is_built());
        assert_eq!(index.candidates().len(), 2);
    }

    #[test]
    fn test_fs_events() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let a = create_test_file(root, "src/a.ts", "");

        let mut index = WorkspaceIndex::new(root);
        index.candidates();

        let b = create_test_file(root, "src/b.ts", "");
        index.apply_event(FsEvent::Created(b));
        assert_eq!(index.candidates().len(), 2);
        index.apply_event(FsEvent::Deleted(a));
        assert_eq!(index.candidates().len(), 1);
    }

    #[test]
    fn test_package_index_reads_nearest_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "package.json",
            r#"{ "dependencies": { "react": "^18.0.0" }, "devDependencies": { "jest": "^29.0.0" } }"#,
        );
        let doc = create_test_file(root, "src/a.ts", "");

        let mut packages = PackageIndex::new();
        let candidates = packages.candidates(&doc, root);
        let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels.len(), 2);
        assert!(labels.contains(&"react"));
        assert!(labels.contains(&"jest"));
    }

    #[test]
    fn test_package_index_no_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let doc = create_test_file(temp_dir.path(), "src/a.ts", "");
        let mut packages = PackageIndex::new();
        assert!(packages.candidates(&doc, temp_dir.path()).is_empty());
    }
}
