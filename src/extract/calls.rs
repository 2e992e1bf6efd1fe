//! Call scanning: source text to [`CallRef`]s.
//!
//! Applies an ecosystem's registered call patterns plus the common set to
//! one file's content. A literal first-argument string becomes the
//! recorded target; anything dynamic records `unresolved` with the
//! protocol tag kept, preserving the call-count signal without a
//! destination.

use crate::registry::CompiledCall;
use crate::snapshot::CallRef;

/// Extracts outbound call sites from one file's content using the given
/// pattern set.
#[must_use]
pub fn calls_in_content(content: &str, patterns: &[CompiledCall], file: &str) -> Vec<CallRef> {
    let mut calls = Vec::new();
    for pattern in patterns {
        for caps in pattern.regex.captures_iter(content) {
            let target = caps
                .get(1)
                .map_or(CallRef::UNRESOLVED, |m| m.as_str())
                .to_string();
            calls.push(CallRef {
                protocol: pattern.protocol,
                target,
                file: file.to_string(),
            });
        }
    }
    calls
}
