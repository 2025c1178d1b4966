//! Validation and normalization of affected-dataset lists.

use crate::errors::IssueError;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

const LOG_TARGET: &str = "       drs";

/// Matches the trailing version marker of a dataset identifier:
/// `.v` followed by digits, or `#` followed by digits.
static VERSION_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\.v|#)(\d+)$").expect("invalid regex"));

/// A dataset identifier split into its canonical id and bare version token.
///
/// Created during normalization from one raw identifier line and immutable
/// thereafter. The derived ordering makes deduplicated sets deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionedDataset {
    /// The identifier with its version marker stripped.
    pub id: String,

    /// The numeric version token, without the `.v` or `#` marker syntax.
    pub version: String,
}

/// Validate a raw dataset identifier list and normalize it into a
/// deduplicated, zero-indexed list of [`VersionedDataset`] pairs.
///
/// Validation is all-or-nothing: a single bad entry fails the whole list,
/// and nothing is persisted before the failure.
///
/// # Errors
///
/// - [`IssueError::EmptyDatasetList`] if `raw_ids` is empty.
/// - [`IssueError::MalformedDatasetId`] if any identifier lacks a trailing
///   version marker.
pub fn normalize_datasets(raw_ids: &[String]) -> Result<Vec<VersionedDataset>, IssueError> {
    log::info!(target: LOG_TARGET, "pre-validating dataset list ({} entries)", raw_ids.len());
    if raw_ids.is_empty() {
        return Err(IssueError::EmptyDatasetList);
    }

    let mut unique = BTreeSet::new();
    for raw in raw_ids {
        let Some(caps) = VERSION_MARKER_REGEX.captures(raw) else {
            return Err(IssueError::MalformedDatasetId { id: raw.clone() });
        };
        let marker = caps.get(0).expect("match always has a full capture");
        let version = caps.get(1).expect("marker always captures digits");
        let _ = unique.insert(VersionedDataset {
            id: raw[..marker.start()].to_string(),
            version: version.as_str().to_string(),
        });
    }

    log::info!(target: LOG_TARGET, "pre-validated dataset list: {} unique datasets", unique.len());
    Ok(unique.into_iter().collect())
}

/// Render a normalized dataset list as uniform `id#version` lines, ready to
/// be written back to the flat dataset file.
#[must_use]
pub fn dataset_lines(datasets: &[VersionedDataset]) -> Vec<String> {
    datasets.iter().map(|d| format!("{}#{}", d.id, d.version)).collect()
}
