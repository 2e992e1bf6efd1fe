//! Static extraction over one checked-out tree.
//!
//! One call to [`extract_tree`] runs the full pipeline for the currently
//! materialized commit: scan the tree, detect ecosystems, parse
//! manifests, and pattern-scan candidate sources. Every source file is
//! read once; unreadable or non-UTF-8 files are skipped (recoverable by
//! design, absorbed here).

pub mod calls;
pub mod dependencies;
pub mod detect;
pub mod endpoints;

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::registry;
use crate::snapshot::{CallRef, DependencyRef, EndpointRef};

/// Extraction knobs resolved from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Rewrite `{id}`/`:id`/`<id>` placeholders to `{param}` before
    /// endpoint identity is computed.
    pub normalize_path_params: bool,
}

/// The three extracted sets for one tree state.
#[derive(Debug, Default)]
pub struct TreeExtraction {
    /// Declared dependencies across all detected ecosystems.
    pub dependencies: BTreeSet<DependencyRef>,
    /// Exposed API endpoints.
    pub endpoints: BTreeSet<EndpointRef>,
    /// Outbound cross-service calls.
    pub calls: BTreeSet<CallRef>,
}

/// Runs detection and all three extractors over the tree at `root`.
#[must_use]
pub fn extract_tree(root: &Path, options: ExtractOptions) -> TreeExtraction {
    let inventory = detect::scan_tree(root);
    let detected = inventory.detected();

    let mut extraction = TreeExtraction {
        dependencies: dependencies::extract_dependencies(&inventory),
        ..TreeExtraction::default()
    };

    let profiles: Vec<_> = registry::compiled()
        .iter()
        .filter(|p| detected.contains(&p.ecosystem))
        .collect();

    for file in &inventory.sources {
        let claiming: Vec<_> = profiles
            .iter()
            .filter(|p| {
                file.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| p.extensions.contains(&e))
            })
            .collect();
        if claiming.is_empty() {
            continue;
        }

        let Ok(content) = std::fs::read_to_string(file) else {
            debug!(file = %file.display(), "skipping unreadable source file");
            continue;
        };
        let rel = file
            .strip_prefix(root)
            .unwrap_or(file)
            .to_string_lossy()
            .into_owned();

        for profile in &claiming {
            extraction.endpoints.extend(endpoints::endpoints_in_content(
                &content,
                profile,
                &rel,
                options.normalize_path_params,
            ));
            extraction
                .calls
                .extend(calls::calls_in_content(&content, &profile.calls, &rel));
        }
        extraction
            .calls
            .extend(calls::calls_in_content(&content, registry::compiled_common_calls(), &rel));
    }

    extraction
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn manifest_plus_route_yields_one_dep_and_one_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"express": "^4.18.0"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("server.js"), "app.get('/users', list);\n").unwrap();

        let extraction = extract_tree(dir.path(), ExtractOptions::default());
        assert_eq!(extraction.dependencies.len(), 1);
        assert_eq!(extraction.endpoints.len(), 1);
        assert_eq!(
            extraction.endpoints.iter().next().unwrap().to_string(),
            "GET /users"
        );
        assert!(extraction.calls.is_empty());
    }

    #[test]
    fn literal_call_target_is_protocol_qualified() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"axios": "^1.0.0", "express": "^4.18.0"}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("health.js"),
            "app.get('/health', h);\naxios.get('http://payment-service/charge');\n",
        )
        .unwrap();

        let extraction = extract_tree(dir.path(), ExtractOptions::default());
        assert_eq!(extraction.dependencies.len(), 2);
        let endpoints: Vec<String> =
            extraction.endpoints.iter().map(ToString::to_string).collect();
        assert_eq!(endpoints, vec!["GET /health"]);
        let calls: Vec<String> = extraction.calls.iter().map(ToString::to_string).collect();
        assert!(calls.contains(&"http:http://payment-service/charge".to_string()));
    }

    #[test]
    fn undetected_ecosystem_sources_are_not_scanned() {
        let dir = tempfile::tempdir().unwrap();
        // A .py file with a route, but no python manifest anywhere.
        fs::write(dir.path().join("app.py"), "@app.route('/users')\n").unwrap();

        let extraction = extract_tree(dir.path(), ExtractOptions::default());
        assert!(extraction.endpoints.is_empty());
        assert!(extraction.calls.is_empty());
    }

    #[test]
    fn tree_without_manifests_yields_all_empty_sets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "# svc").unwrap();

        let extraction = extract_tree(dir.path(), ExtractOptions::default());
        assert!(extraction.dependencies.is_empty());
        assert!(extraction.endpoints.is_empty());
        assert!(extraction.calls.is_empty());
    }
}
