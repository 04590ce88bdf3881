use anyhow::{Context, Result, anyhow};
use log::{debug, trace};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// One installed package declared by a manifest, with a best-effort
/// installed version read from the package's own manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDependency {
    pub name: String,
    pub version: Option<String>,
}

/// Locate the nearest ancestor directory containing `package.json`, walking
/// upward from `start_dir` and stopping at the workspace root.
pub fn find_nearest_manifest(start_dir: &Path, workspace_root: &Path) -> Option<PathBuf> {
    let mut current = start_dir;
    loop {
        let manifest = current.join("package.json");
        trace!("Checking for manifest at: {:?}", manifest);
        if manifest.is_file() {
            debug!("Found manifest at: {:?}", manifest);
            return Some(manifest);
        }
        if current == workspace_root {
            return None;
        }
        current = current.parent()?;
    }
}

/// Enumerate the runtime and development dependency names declared by a
/// manifest, deduplicated, each with a best-effort installed version from
/// `node_modules/<name>/package.json`. Version absence is not an error.
pub fn installed_packages(manifest_path: &Path) -> Result<Vec<PackageDependency>> {
    let txt = fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&txt)
        .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;

    let manifest_dir = manifest_path.parent().unwrap_or(Path::new("."));

    let mut packages: Vec<PackageDependency> = Vec::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(deps) = json.get(section).and_then(|d| d.as_object()) {
            for name in deps.keys() {
                if packages.iter().any(|p| p.name == *name) {
                    continue;
                }
                let version = installed_version(manifest_dir, name);
                trace!("Found dependency '{}' (installed: {:?})", name, version);
                packages.push(PackageDependency { name: name.clone(), version });
            }
        }
    }

    debug!("Manifest {} declares {} packages", manifest_path.display(), packages.len());
    Ok(packages)
}

fn installed_version(manifest_dir: &Path, name: &str) -> Option<String> {
    // Scoped names like @scope/pkg join naturally into node_modules
    let pkg_json = manifest_dir.join("node_modules").join(name).join("package.json");
    let txt = fs::read_to_string(&pkg_json).ok()?;
    let json: serde_json::Value = serde_json::from_str(&txt).ok()?;
    json.get("version").and_then(|v| v.as_str()).map(|v| v.to_string())
}

/// Find the workspace root by walking upward from the current directory
/// looking for a `.git` directory.
pub fn find_workspace_root() -> Result<PathBuf> {
    debug!("Searching for workspace root");
    let mut current_dir = env::current_dir()?;

    loop {
        if current_dir.join(".git").exists() {
            debug!("Found workspace root at: {:?}", current_dir);
            return Ok(current_dir);
        }
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                return Err(anyhow!("Could not find .git directory in any parent folder"));
            }
        }
    }
}
