//! Facet extraction from dataset identifiers.

use crate::errors::IssueError;
use crate::projects::ProjectPattern;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

const LOG_TARGET: &str = "       drs";

/// Cache of compiled matching expressions, keyed by project name.
///
/// Compilation happens at most once per project: the map is locked around
/// the lookup-or-insert, so concurrent callers asking for the same project
/// share a single compiled expression.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: Mutex<HashMap<String, Arc<Regex>>>,
}

impl PatternCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled matching expression for a project, translating
    /// and compiling its pattern on first use.
    ///
    /// The translated pattern is anchored at the start of the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::InvalidProjectPattern`] if the project's
    /// translated pattern is not a valid regular expression.
    pub fn pattern_for(&self, project: &str, pattern: &ProjectPattern) -> Result<Arc<Regex>, IssueError> {
        let mut compiled = self.compiled.lock().expect("pattern cache lock poisoned");
        if let Some(regex) = compiled.get(project) {
            return Ok(Arc::clone(regex));
        }

        let translated = format!("^{}", pattern.translate());
        log::debug!(target: LOG_TARGET, "compiling dataset id pattern for project '{project}': {translated}");
        let regex = Regex::new(&translated).map_err(|e| IssueError::InvalidProjectPattern {
            project: project.to_string(),
            reason: e.to_string(),
        })?;

        let regex = Arc::new(regex);
        let _ = compiled.insert(project.to_string(), Arc::clone(&regex));
        Ok(regex)
    }
}

/// Extract named facets from a dataset identifier.
///
/// The identifier is lower-cased before matching; captured values are
/// therefore already lower case. The `version` facet is normalized by
/// stripping its leading `v` when the remainder is numeric, so `v20200101`
/// yields `20200101` while `latest` is kept as-is.
///
/// # Errors
///
/// Returns [`IssueError::DatasetIncoherent`] when the identifier does not
/// match the project's DRS structure. This is fatal for the enclosing
/// operation; callers halt rather than skip the dataset.
pub fn extract_facets(
    dataset_id: &str,
    project: &str,
    pattern: &Regex,
) -> Result<BTreeMap<String, String>, IssueError> {
    let lowered = dataset_id.to_lowercase();
    let Some(caps) = pattern.captures(&lowered) else {
        return Err(IssueError::DatasetIncoherent {
            id: dataset_id.to_string(),
            project: project.to_string(),
        });
    };

    let mut facets = BTreeMap::new();
    for name in pattern.capture_names().flatten() {
        if let Some(value) = caps.name(name) {
            let mut value = value.as_str().to_string();
            if name == "version" {
                value = normalize_version_facet(&value);
            }
            let _ = facets.insert(name.to_string(), value);
        }
    }
    Ok(facets)
}

/// Strip the `v` marker from a captured version facet, keeping symbolic
/// versions such as `latest` untouched.
fn normalize_version_facet(value: &str) -> String {
    match value.strip_prefix('v') {
        Some(rest) if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) => rest.to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::ProjectPattern;
    use std::collections::BTreeMap;

    fn cmip6_pattern() -> ProjectPattern {
        ProjectPattern::new(
            "%(mip_era)s.%(source_id)s.%(version)s".to_string(),
            BTreeMap::new(),
        )
    }

    #[test]
    fn extracts_lowercased_facets() {
        let cache = PatternCache::new();
        let regex = cache.pattern_for("cmip6", &cmip6_pattern()).unwrap();
        let facets = extract_facets("CMIP6.MYMODEL.v20200101", "cmip6", &regex).unwrap();

        assert_eq!(facets.get("mip_era").unwrap(), "cmip6");
        assert_eq!(facets.get("source_id").unwrap(), "mymodel");
        assert_eq!(facets.get("version").unwrap(), "20200101");
    }

    #[test]
    fn symbolic_version_is_kept() {
        let cache = PatternCache::new();
        let regex = cache.pattern_for("cmip6", &cmip6_pattern()).unwrap();
        let facets = extract_facets("cmip6.model-x.latest", "cmip6", &regex).unwrap();
        assert_eq!(facets.get("version").unwrap(), "latest");
    }

    #[test]
    fn incoherent_dataset_is_fatal() {
        let cache = PatternCache::new();
        let regex = cache.pattern_for("cmip6", &cmip6_pattern()).unwrap();
        let err = extract_facets("not-a-drs-id", "cmip6", &regex).unwrap_err();
        match err {
            IssueError::DatasetIncoherent { id, project } => {
                assert_eq!(id, "not-a-drs-id");
                assert_eq!(project, "cmip6");
            }
            other => panic!("expected DatasetIncoherent, got {other:?}"),
        }
    }

    #[test]
    fn cache_returns_the_same_compiled_pattern() {
        let cache = PatternCache::new();
        let first = cache.pattern_for("cmip6", &cmip6_pattern()).unwrap();
        let second = cache.pattern_for("cmip6", &cmip6_pattern()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let cache = PatternCache::new();
        let mut overrides = BTreeMap::new();
        let _ = overrides.insert("x_pattern".to_string(), "(unclosed".to_string());
        let pattern = ProjectPattern::new("%(x)s".to_string(), overrides);
        let err = cache.pattern_for("broken", &pattern).unwrap_err();
        assert!(matches!(err, IssueError::InvalidProjectPattern { .. }));
    }

    #[test]
    fn version_facet_normalization() {
        assert_eq!(normalize_version_facet("v20200101"), "20200101");
        assert_eq!(normalize_version_facet("latest"), "latest");
        assert_eq!(normalize_version_facet("v"), "v");
    }
}
