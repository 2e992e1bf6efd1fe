//! CSV emission for the ordered snapshot sequence.
//!
//! Runs only after every snapshot has been aggregated: fatal errors
//! earlier in the run abort before this module touches the output path,
//! so a failed run never leaves a partial file.

use std::io::Write;
use std::path::Path;

use crate::error::AnalyzeError;
use crate::snapshot::Snapshot;

/// Delimiter between items inside a list column.
const LIST_SEPARATOR: &str = ";";

/// Column headers, in emission order.
const HEADERS: [&str; 8] = [
    "commit_hash",
    "commit_date",
    "num_dependencies",
    "dependencies_list",
    "num_endpoints",
    "endpoints_list",
    "num_cross_service_calls",
    "cross_service_calls_list",
];

/// Writes the snapshot sequence to `path` as CSV, oldest first.
///
/// # Errors
///
/// Returns [`AnalyzeError::Io`] or [`AnalyzeError::Csv`] if the file
/// cannot be created or a row cannot be serialized.
pub fn write_csv(path: &Path, snapshots: &[Snapshot]) -> Result<(), AnalyzeError> {
    let file = std::fs::File::create(path)?;
    write_records(file, snapshots)
}

/// Writes the snapshot sequence to any writer. Split out so tests can
/// emit into a buffer.
///
/// # Errors
///
/// Returns [`AnalyzeError::Csv`] if a row cannot be serialized.
pub fn write_records<W: Write>(writer: W, snapshots: &[Snapshot]) -> Result<(), AnalyzeError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADERS)?;

    for snapshot in snapshots {
        let dependencies = snapshot.dependency_items();
        let endpoints = snapshot.endpoint_items();
        let calls = snapshot.call_items();
        let record = [
            snapshot.commit_hash.clone(),
            snapshot.commit_date.to_rfc3339(),
            dependencies.len().to_string(),
            dependencies.join(LIST_SEPARATOR),
            endpoints.len().to_string(),
            endpoints.join(LIST_SEPARATOR),
            calls.len().to_string(),
            calls.join(LIST_SEPARATOR),
        ];
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::registry::{Ecosystem, Protocol};
    use crate::snapshot::{CallRef, DependencyRef, EndpointRef};

    fn sample_snapshot() -> Snapshot {
        let mut dependencies = BTreeSet::new();
        dependencies.insert(DependencyRef::new(Ecosystem::Node, "express"));
        dependencies.insert(DependencyRef::new(Ecosystem::Node, "axios"));
        let mut endpoints = BTreeSet::new();
        endpoints.insert(EndpointRef {
            method: "GET".into(),
            path: "/health".into(),
            file: "server.js".into(),
        });
        let mut calls = BTreeSet::new();
        calls.insert(CallRef {
            protocol: Protocol::Http,
            target: "http://payment-service/charge".into(),
            file: "server.js".into(),
        });
        Snapshot {
            commit_hash: "abc123".into(),
            commit_date: DateTime::parse_from_rfc3339("2026-03-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            dependencies,
            endpoints,
            calls,
        }
    }

    #[test]
    fn counts_match_list_item_counts() {
        let mut out = Vec::new();
        write_records(&mut out, &[sample_snapshot()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();

        assert!(row.contains("2,node:axios;node:express"));
        assert!(row.contains("1,GET /health"));
        assert!(row.contains("1,http:http://payment-service/charge"));
    }

    #[test]
    fn header_row_matches_schema() {
        let mut out = Vec::new();
        write_records(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.trim_end(),
            "commit_hash,commit_date,num_dependencies,dependencies_list,num_endpoints,endpoints_list,num_cross_service_calls,cross_service_calls_list"
        );
    }

    #[test]
    fn emission_is_deterministic() {
        let snapshot = sample_snapshot();
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_records(&mut first, std::slice::from_ref(&snapshot)).unwrap();
        write_records(&mut second, std::slice::from_ref(&snapshot)).unwrap();
        assert_eq!(first, second);
    }
}
