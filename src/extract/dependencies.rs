//! Dependency extraction: manifest files to [`DependencyRef`] sets.
//!
//! Each detected ecosystem's manifests are parsed with a format-specific
//! routine. A manifest that cannot be parsed contributes nothing for this
//! snapshot: the error is logged at warn level and extraction continues
//! (best-effort, absorbed at the scope of the one file).

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::error::ManifestParseError;
use crate::extract::detect::TreeInventory;
use crate::registry::Ecosystem;
use crate::snapshot::DependencyRef;

/// Maven dependency scopes that do not ship with the service.
const SKIPPED_MAVEN_SCOPES: &[&str] = &["test", "provided", "system", "import"];

/// Extracts declared dependencies for every detected ecosystem, merged
/// into one deduplicated set.
#[must_use]
pub fn extract_dependencies(inventory: &TreeInventory) -> BTreeSet<DependencyRef> {
    let mut deps = BTreeSet::new();
    for (&ecosystem, manifests) in &inventory.manifests {
        for manifest in manifests {
            match parse_manifest(ecosystem, manifest) {
                Ok(parsed) => deps.extend(parsed),
                Err(err) => {
                    warn!(manifest = %manifest.display(), %err, "skipping unparsable manifest");
                }
            }
        }
    }
    deps
}

/// Parses one manifest file according to its ecosystem's format.
///
/// # Errors
///
/// Returns [`ManifestParseError`] when the file is unreadable or
/// structurally malformed for its format.
pub fn parse_manifest(
    ecosystem: Ecosystem,
    path: &Path,
) -> Result<Vec<DependencyRef>, ManifestParseError> {
    // setup.py marks python as detected but is never parsed for
    // dependencies; requirements.txt carries them.
    if path.file_name().and_then(|n| n.to_str()) == Some("setup.py") {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    match ecosystem {
        Ecosystem::Maven => parse_pom(&content),
        Ecosystem::Gradle => Ok(parse_gradle(&content)),
        Ecosystem::Node => parse_json_maps(&content, Ecosystem::Node, &["dependencies", "devDependencies"]),
        Ecosystem::Python => Ok(parse_requirements(&content)),
        Ecosystem::Go => Ok(parse_go_mod(&content)),
        Ecosystem::Php => parse_json_maps(&content, Ecosystem::Php, &["require", "require-dev"]),
    }
}

/// Lexical scan of a `pom.xml`: every `<dependency>` block yields a
/// `groupId:artifactId` identifier unless its scope is test/provided/
/// system/import.
fn parse_pom(content: &str) -> Result<Vec<DependencyRef>, ManifestParseError> {
    if !content.contains("<project") {
        return Err(ManifestParseError::Malformed("missing <project> root element".into()));
    }

    static BLOCK: OnceLock<Regex> = OnceLock::new();
    let block = BLOCK
        .get_or_init(|| Regex::new(r"(?s)<dependency>(.*?)</dependency>").expect("static pattern"));

    let mut deps = Vec::new();
    for caps in block.captures_iter(content) {
        let body = &caps[1];
        let scope = pom_element(body, "scope");
        if scope.as_deref().is_some_and(|s| SKIPPED_MAVEN_SCOPES.contains(&s)) {
            continue;
        }
        let (Some(group), Some(artifact)) =
            (pom_element(body, "groupId"), pom_element(body, "artifactId"))
        else {
            continue;
        };
        let name = format!("{group}:{artifact}");
        deps.push(match pom_element(body, "version") {
            Some(version) => DependencyRef::versioned(Ecosystem::Maven, name, version),
            None => DependencyRef::new(Ecosystem::Maven, name),
        });
    }
    Ok(deps)
}

/// Extracts the text of one child element from a dependency block.
fn pom_element(body: &str, element: &str) -> Option<String> {
    let open = format!("<{element}>");
    let close = format!("</{element}>");
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    Some(body[start..end].trim().to_string())
}

/// Gradle coordinate strings from dependency-configuration lines.
fn parse_gradle(content: &str) -> Vec<DependencyRef> {
    static COORD: OnceLock<Regex> = OnceLock::new();
    let coord = COORD.get_or_init(|| {
        Regex::new(
            r#"(?m)\b(?:implementation|api|compile|compileOnly|runtimeOnly|testImplementation)\s*\(?\s*["']([^"']+)["']"#,
        )
        .expect("static pattern")
    });

    coord
        .captures_iter(content)
        .map(|caps| {
            let coordinate = &caps[1];
            // group:artifact:version keeps version out of the identifier.
            let mut parts = coordinate.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(group), Some(artifact), Some(version)) => DependencyRef::versioned(
                    Ecosystem::Gradle,
                    format!("{group}:{artifact}"),
                    version,
                ),
                _ => DependencyRef::new(Ecosystem::Gradle, coordinate),
            }
        })
        .collect()
}

/// Keys of the named top-level maps in a JSON manifest
/// (`package.json`, `composer.json`).
fn parse_json_maps(
    content: &str,
    ecosystem: Ecosystem,
    maps: &[&str],
) -> Result<Vec<DependencyRef>, ManifestParseError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let root = value
        .as_object()
        .ok_or_else(|| ManifestParseError::Malformed("top-level value is not an object".into()))?;

    let mut deps = Vec::new();
    for map in maps {
        let Some(entries) = root.get(*map).and_then(serde_json::Value::as_object) else {
            continue;
        };
        for (name, version) in entries {
            deps.push(match version.as_str() {
                Some(v) => DependencyRef::versioned(ecosystem, name.clone(), v),
                None => DependencyRef::new(ecosystem, name.clone()),
            });
        }
    }
    Ok(deps)
}

/// Non-comment, non-blank requirement lines with version specifiers,
/// extras, and environment markers stripped to the bare package name.
fn parse_requirements(content: &str) -> Vec<DependencyRef> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
                return None;
            }
            let name_end = line
                .find(|c: char| "=<>!~[;( ".contains(c))
                .unwrap_or(line.len());
            let name = line[..name_end].trim();
            if name.is_empty() {
                return None;
            }
            let version = line[name_end..]
                .trim_start_matches(['=', '<', '>', '!', '~'])
                .split(';')
                .next()
                .map(str::trim)
                .filter(|v| !v.is_empty() && line[name_end..].starts_with("=="));
            Some(match version {
                Some(v) => DependencyRef::versioned(Ecosystem::Python, name, v),
                None => DependencyRef::new(Ecosystem::Python, name),
            })
        })
        .collect()
}

/// Module paths from single-line and block `require` directives.
fn parse_go_mod(content: &str) -> Vec<DependencyRef> {
    let mut deps = Vec::new();
    let mut in_block = false;
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("require (") {
            in_block = true;
            continue;
        }
        if in_block {
            if line == ")" {
                in_block = false;
                continue;
            }
            push_go_requirement(&mut deps, line);
        } else if let Some(rest) = line.strip_prefix("require ") {
            push_go_requirement(&mut deps, rest);
        }
    }
    deps
}

fn push_go_requirement(deps: &mut Vec<DependencyRef>, line: &str) {
    let line = line.split("//").next().unwrap_or("").trim();
    let mut parts = line.split_whitespace();
    let (Some(module), version) = (parts.next(), parts.next()) else {
        return;
    };
    deps.push(match version {
        Some(v) => DependencyRef::versioned(Ecosystem::Go, module, v),
        None => DependencyRef::new(Ecosystem::Go, module),
    });
}
