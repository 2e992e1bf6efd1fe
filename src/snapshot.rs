//! Snapshot model: one time-series record per selected commit.
//!
//! The three extracted sets use `BTreeSet` so deduplication and the
//! deterministic lexicographic ordering required for serialization come
//! from the same structure. Identity for each ref type is its uniqueness
//! key only; provenance fields (declaring file, version) are carried but
//! excluded from comparison.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::{Ecosystem, Protocol};

/// A declared dependency. Identity is `(ecosystem, name)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyRef {
    /// Ecosystem the dependency was declared under.
    pub ecosystem: Ecosystem,
    /// Bare package identifier, version specifiers stripped.
    pub name: String,
    /// Declared version when the manifest states one. Not part of identity.
    pub version: Option<String>,
}

impl DependencyRef {
    /// Creates a dependency ref without a version.
    #[must_use]
    pub fn new(ecosystem: Ecosystem, name: impl Into<String>) -> Self {
        Self { ecosystem, name: name.into(), version: None }
    }

    /// Creates a dependency ref with a declared version.
    #[must_use]
    pub fn versioned(
        ecosystem: Ecosystem,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self { ecosystem, name: name.into(), version: Some(version.into()) }
    }
}

impl PartialEq for DependencyRef {
    fn eq(&self, other: &Self) -> bool {
        self.ecosystem == other.ecosystem && self.name == other.name
    }
}

impl Eq for DependencyRef {}

impl PartialOrd for DependencyRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DependencyRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ecosystem.cmp(&other.ecosystem).then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ecosystem, self.name)
    }
}

/// A statically declared API endpoint. Identity is `(method, path)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointRef {
    /// HTTP verb, `GET` when the declaration does not state one.
    pub method: String,
    /// Path template, taken literally from source.
    pub path: String,
    /// File the declaration was found in. Not part of identity.
    pub file: String,
}

impl PartialEq for EndpointRef {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.path == other.path
    }
}

impl Eq for EndpointRef {}

impl PartialOrd for EndpointRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EndpointRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.method
            .cmp(&other.method)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A detected outbound call. Identity is `(protocol, target)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRef {
    /// Protocol family of the call site.
    pub protocol: Protocol,
    /// Literal target, or `unresolved` when dynamically constructed.
    pub target: String,
    /// File the call site was found in. Not part of identity.
    pub file: String,
}

impl CallRef {
    /// Target string recorded when the destination cannot be determined
    /// statically.
    pub const UNRESOLVED: &'static str = "unresolved";
}

impl PartialEq for CallRef {
    fn eq(&self, other: &Self) -> bool {
        self.protocol == other.protocol && self.target == other.target
    }
}

impl Eq for CallRef {}

impl PartialOrd for CallRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CallRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.protocol
            .cmp(&other.protocol)
            .then_with(|| self.target.cmp(&other.target))
    }
}

impl fmt::Display for CallRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.protocol, self.target)
    }
}

/// One snapshot: a commit's extracted dependencies, endpoints, and calls.
///
/// Immutable once aggregated; counts are always the set cardinalities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Commit the tree was materialized from.
    pub commit_hash: String,
    /// Committer date of that commit, UTC.
    pub commit_date: DateTime<Utc>,
    /// Declared dependencies across all detected ecosystems.
    pub dependencies: BTreeSet<DependencyRef>,
    /// Exposed API endpoints.
    pub endpoints: BTreeSet<EndpointRef>,
    /// Outbound cross-service calls.
    pub calls: BTreeSet<CallRef>,
}

impl Snapshot {
    /// Sorted, deduplicated dependency items as `ecosystem:identifier`.
    #[must_use]
    pub fn dependency_items(&self) -> Vec<String> {
        sorted_items(self.dependencies.iter())
    }

    /// Sorted, deduplicated endpoint items as `METHOD path`.
    #[must_use]
    pub fn endpoint_items(&self) -> Vec<String> {
        sorted_items(self.endpoints.iter())
    }

    /// Sorted, deduplicated call items as `protocol:target`.
    #[must_use]
    pub fn call_items(&self) -> Vec<String> {
        sorted_items(self.calls.iter())
    }
}

/// Serialization order is lexicographic on the emitted item strings, not
/// on the set's structural key order.
fn sorted_items<T: ToString>(items: impl Iterator<Item = T>) -> Vec<String> {
    let mut out: Vec<String> = items.map(|i| i.to_string()).collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_identity_ignores_version() {
        let mut set = BTreeSet::new();
        set.insert(DependencyRef::versioned(Ecosystem::Node, "express", "4.18.0"));
        set.insert(DependencyRef::versioned(Ecosystem::Node, "express", "5.0.0"));
        set.insert(DependencyRef::new(Ecosystem::Python, "express"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn endpoint_identity_ignores_declaring_file() {
        let a = EndpointRef {
            method: "GET".into(),
            path: "/users".into(),
            file: "a.js".into(),
        };
        let b = EndpointRef {
            method: "GET".into(),
            path: "/users".into(),
            file: "b.js".into(),
        };
        let mut set = BTreeSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn call_items_are_protocol_qualified_and_sorted() {
        let mut calls = BTreeSet::new();
        calls.insert(CallRef {
            protocol: Protocol::Fetch,
            target: "/api/users".into(),
            file: "x.js".into(),
        });
        calls.insert(CallRef {
            protocol: Protocol::Http,
            target: "http://payment-service/charge".into(),
            file: "x.js".into(),
        });
        let snapshot = Snapshot {
            commit_hash: "abc".into(),
            commit_date: Utc::now(),
            dependencies: BTreeSet::new(),
            endpoints: BTreeSet::new(),
            calls,
        };
        assert_eq!(
            snapshot.call_items(),
            vec!["fetch:/api/users", "http:http://payment-service/charge"]
        );
    }
}
