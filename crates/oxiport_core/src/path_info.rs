use std::path::{Component, Path, PathBuf};

/// OS-independent decomposition of a file path.
///
/// All string fields use POSIX separators so they can be compared and pattern
/// matched regardless of the host OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    /// Containing directory, POSIX separators
    pub directory: String,
    /// File name including extension
    pub file_name: String,
    /// File name without extension
    pub base_name: String,
    /// Extension without the leading dot, empty if none
    pub extension: String,
    /// Full path, POSIX separators
    pub full_path: String,
}

impl PathInfo {
    pub fn new(path: &Path) -> PathInfo {
        let full_path = to_posix(path);
        let file_name = path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let base_name = path.file_stem().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let extension = path.extension().map(|e| e.to_string_lossy().to_string()).unwrap_or_default();
        let directory = path.parent().map(to_posix).unwrap_or_default();

        PathInfo { directory, file_name, base_name, extension, full_path }
    }

    /// Relative path from `from_dir` to this file, POSIX style.
    ///
    /// Never empty; a path that would not otherwise start with `.` or `/` is
    /// prefixed with `./` so it cannot be mistaken for a bare package name.
    pub fn relative_from(&self, from_dir: &Path) -> String {
        relative_path(Path::new(&self.full_path), from_dir)
    }
}

/// Normalize a path to forward slashes
pub fn to_posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Create a POSIX relative path from `base_dir` to `target`.
///
/// Same-directory targets come out as `./name`; a target equal to the base
/// directory comes out as `.`.
pub fn relative_path(target: &Path, base_dir: &Path) -> String {
    let rel = match make_relative(target, base_dir) {
        Some(r) => r,
        None => return to_posix(target),
    };

    let rel = to_posix(&rel);
    if rel.is_empty() || rel == "." {
        return ".".to_string();
    }
    if rel.starts_with('.') || rel.starts_with('/') {
        rel
    } else {
        format!("./{}", rel)
    }
}

/// Component-walk relative path computation between two absolute paths
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut target_components = target.components();
    let mut base_components = base.components();

    let mut common_prefix_len = 0;
    let mut target_parts = Vec::new();
    let mut base_parts = Vec::new();

    // Find common prefix
    loop {
        match (target_components.next(), base_components.next()) {
            (Some(t), Some(b)) if t == b => {
                common_prefix_len += 1;
            }
            (Some(t), Some(b)) => {
                target_parts.push(t);
                base_parts.push(b);
                break;
            }
            (Some(t), None) => {
                target_parts.push(t);
                break;
            }
            (None, Some(_)) => {
                // target is a prefix of base, need to go up
                return Some(PathBuf::from("."));
            }
            (None, None) => {
                // They are the same
                return Some(PathBuf::from("."));
            }
        }
    }

    // Collect remaining components
    target_parts.extend(target_components);
    base_parts.extend(base_components);

    // If there's no common prefix, check the paths at least share a root
    if common_prefix_len == 0 {
        let target_root = target.components().next();
        let base_root = base.components().next();
        if target_root != base_root {
            return None;
        }
    }

    // Build the relative path: "../" for each remaining base component,
    // then append all remaining target components
    let mut result = PathBuf::new();
    for _ in &base_parts {
        result.push("..");
    }
    for component in target_parts {
        match component {
            Component::Normal(p) => result.push(p),
            Component::CurDir => {}
            Component::ParentDir => result.push(".."),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_clean::clean;

    #[test]
    fn test_path_info_fields() {
        let info = PathInfo::new(Path::new("/project/src/utils/helpers.ts"));
        assert_eq!(info.directory, "/project/src/utils");
        assert_eq!(info.file_name, "helpers.ts");
        assert_eq!(info.base_name, "helpers");
        assert_eq!(info.extension, "ts");
        assert_eq!(info.full_path, "/project/src/utils/helpers.ts");
    }

    #[test]
    fn test_path_info_no_extension() {
        let info = PathInfo::new(Path::new("/project/LICENSE"));
        assert_eq!(info.base_name, "LICENSE");
        assert_eq!(info.extension, "");
    }

    #[test]
    fn test_relative_same_dir_gets_dot_slash_prefix() {
        let rel =
            relative_path(Path::new("/project/src/helpers.ts"), Path::new("/project/src"));
        assert_eq!(rel, "./helpers.ts");
    }

    #[test]
    fn test_relative_child_dir() {
        let rel = relative_path(
            Path::new("/project/src/utils/helpers.ts"),
            Path::new("/project/src"),
        );
        assert_eq!(rel, "./utils/helpers.ts");
    }

    #[test]
    fn test_relative_parent_dir_keeps_dots() {
        let rel = relative_path(
            Path::new("/project/src/file.ts"),
            Path::new("/project/src/components"),
        );
        assert_eq!(rel, "../file.ts");
    }

    #[test]
    fn test_relative_sibling_dir() {
        let rel = relative_path(Path::new("/project/apps/web/index.ts"), Path::new("/project/apps/api"));
        assert_eq!(rel, "../web/index.ts");
    }

    #[test]
    fn test_relative_never_empty() {
        let rel = relative_path(Path::new("/project/src"), Path::new("/project/src"));
        assert_eq!(rel, ".");
    }

    #[test]
    fn test_relative_round_trip() {
        // Re-resolving the relative path against the base reproduces the target
        let target = Path::new("/project/src/utils/helpers.ts");
        let base = Path::new("/project/apps/web");
        let rel = relative_path(target, base);
        let resolved = clean(base.join(&rel));
        assert_eq!(resolved, target);
    }

    #[test]
    fn test_relative_round_trip_same_dir() {
        let target = Path::new("/project/src/a.ts");
        let base = Path::new("/project/src");
        let rel = relative_path(target, base);
        let resolved = clean(base.join(&rel));
        assert_eq!(resolved, target);
    }
}
