use std::path::{Path, PathBuf};

use crate::constants::is_index_name;
use crate::path_info::{to_posix, PathInfo};

/// Stable identity prefix for package candidates
pub const PACKAGE_ID_PREFIX: &str = "pkg://";

/// Sentinel sort key that orders index files before every sibling name
pub const INDEX_SORT_SENTINEL: &str = "\u{0}";

/// An importable entity offered to the user: a workspace file or an installed
/// package name. Immutable once constructed; `id` is the identity used by
/// incremental index updates and the recency tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// POSIX absolute path, or `pkg://` + package name
    pub id: String,
    pub label: String,
    /// Containing directory (files) or installed version (packages)
    pub description: String,
    /// POSIX directory used by the proximity sort, empty for packages
    pub sort_dir: String,
    /// Case-insensitive name key; index files get a sentinel that sorts first
    pub sort_name_key: String,
    pub kind: CandidateKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    File(PathBuf),
    Package(String),
}

impl Candidate {
    pub fn file(path: &Path, workspace_root: &Path) -> Candidate {
        let info = PathInfo::new(path);
        let description = path
            .parent()
            .and_then(|d| d.strip_prefix(workspace_root).ok())
            .map(to_posix)
            .unwrap_or_else(|| info.directory.clone());

        let sort_name_key = if is_index_name(&info.base_name, &info.extension) {
            INDEX_SORT_SENTINEL.to_string()
        } else {
            info.file_name.to_lowercase()
        };

        Candidate {
            id: info.full_path.clone(),
            label: info.file_name.clone(),
            description,
            sort_dir: info.directory.clone(),
            sort_name_key,
            kind: CandidateKind::File(path.to_path_buf()),
        }
    }

    pub fn package(name: &str, version: Option<&str>) -> Candidate {
        Candidate {
            id: format!("{}{}", PACKAGE_ID_PREFIX, name),
            label: name.to_string(),
            description: version.unwrap_or_default().to_string(),
            sort_dir: String::new(),
            sort_name_key: name.to_lowercase(),
            kind: CandidateKind::Package(name.to_string()),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, CandidateKind::File(_))
    }
}

/// Derive the candidate id for a workspace file path
pub fn file_candidate_id(path: &Path) -> String {
    to_posix(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_candidate_identity_and_labels() {
        let c = Candidate::file(
            Path::new("/project/src/utils/helpers.ts"),
            Path::new("/project"),
        );
        assert_eq!(c.id, "/project/src/utils/helpers.ts");
        assert_eq!(c.label, "helpers.ts");
        assert_eq!(c.description, "src/utils");
        assert_eq!(c.sort_name_key, "helpers.ts");
        assert!(c.is_file());
    }

    #[test]
    fn test_index_file_gets_sentinel_key() {
        let c = Candidate::file(Path::new("/project/src/index.ts"), Path::new("/project"));
        assert_eq!(c.sort_name_key, INDEX_SORT_SENTINEL);
    }

    #[test]
    fn test_package_candidate_identity() {
        let c = Candidate::package("lodash", Some("4.17.21"));
        assert_eq!(c.id, "pkg://lodash");
        assert_eq!(c.label, "lodash");
        assert_eq!(c.description, "4.17.21");
        assert!(!c.is_file());
    }
}
