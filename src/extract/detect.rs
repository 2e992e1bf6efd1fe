//! Tree scanning and ecosystem detection.
//!
//! One walk over a checked-out tree collects the manifest files and
//! candidate source files that the extractors consume. Detection is
//! simply manifest presence: an ecosystem is present when at least one of
//! its registered manifest filenames exists anywhere in the (filtered)
//! tree. The same traversal rules apply at every commit so the time
//! series stays comparable.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::registry::{self, Ecosystem};

/// Directory names excluded from every scan: vendored dependencies,
/// frontend bundles, build output, and test fixtures. Matched by exact
/// path component.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "frontend",
    "client",
    "web",
    "ui",
    "dist",
    "build",
    "target",
    "__mocks__",
    "test",
    "tests",
];

/// Files gathered from one pass over a checked-out tree.
#[derive(Debug, Default)]
pub struct TreeInventory {
    /// Manifest paths grouped by the ecosystem that claims them.
    pub manifests: BTreeMap<Ecosystem, Vec<PathBuf>>,
    /// All files whose extension is claimed by any registered ecosystem,
    /// sorted for deterministic scan order.
    pub sources: Vec<PathBuf>,
}

impl TreeInventory {
    /// Ecosystems with at least one manifest present. Empty is valid: the
    /// snapshot then has all-empty sets.
    #[must_use]
    pub fn detected(&self) -> BTreeSet<Ecosystem> {
        self.manifests.keys().copied().collect()
    }

    /// Source files claimed by the given extensions.
    pub fn sources_with_extensions<'a>(
        &'a self,
        extensions: &'a [&'a str],
    ) -> impl Iterator<Item = &'a PathBuf> {
        self.sources.iter().filter(move |p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e))
        })
    }
}

/// Walks the tree under `root` and gathers manifests and candidate
/// sources in a single pass.
///
/// Excluded and hidden directories are pruned; unreadable entries are
/// skipped. Never fails: an unreadable tree yields an empty inventory.
#[must_use]
pub fn scan_tree(root: &Path) -> TreeInventory {
    let mut inventory = TreeInventory::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_pruned_dir(e.path(), e.file_type().is_dir()));

    for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if let Some(ecosystem) = registry::ecosystem_for_manifest(name) {
            inventory.manifests.entry(ecosystem).or_default().push(path.to_path_buf());
        }

        if has_registered_extension(path) {
            inventory.sources.push(path.to_path_buf());
        }
    }

    for paths in inventory.manifests.values_mut() {
        paths.sort();
    }
    inventory.sources.sort();
    inventory
}

/// Whether a directory is pruned from traversal (excluded name or hidden).
fn is_pruned_dir(path: &Path, is_dir: bool) -> bool {
    if !is_dir {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name)
}

fn has_registered_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    registry::PROFILES.iter().any(|p| p.extensions.contains(&ext))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn detects_ecosystems_by_manifest_presence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::create_dir_all(dir.path().join("svc")).unwrap();
        fs::write(dir.path().join("svc/pom.xml"), "<project/>").unwrap();

        let inventory = scan_tree(dir.path());
        let detected = inventory.detected();
        assert!(detected.contains(&Ecosystem::Node));
        assert!(detected.contains(&Ecosystem::Maven));
        assert_eq!(detected.len(), 2);
    }

    #[test]
    fn empty_tree_detects_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = scan_tree(dir.path());
        assert!(inventory.detected().is_empty());
        assert!(inventory.sources.is_empty());
    }

    #[test]
    fn excluded_directories_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/package.json"), "{}").unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/server.js"), "x").unwrap();

        let inventory = scan_tree(dir.path());
        assert!(inventory.detected().is_empty());
        assert_eq!(inventory.sources.len(), 1);
        assert!(inventory.sources[0].ends_with("src/server.js"));
    }

    #[test]
    fn hidden_directories_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config.py"), "x").unwrap();

        let inventory = scan_tree(dir.path());
        assert!(inventory.sources.is_empty());
    }

    #[test]
    fn sources_filtered_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "x").unwrap();
        fs::write(dir.path().join("b.js"), "x").unwrap();
        fs::write(dir.path().join("c.txt"), "x").unwrap();

        let inventory = scan_tree(dir.path());
        assert_eq!(inventory.sources.len(), 2);
        let py: Vec<_> = inventory.sources_with_extensions(&["py"]).collect();
        assert_eq!(py.len(), 1);
    }
}
