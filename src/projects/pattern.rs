//! The per-project identifier template and its override rules.

use crate::drs::translate_template;
use crate::errors::IssueError;
use ini::{Ini, ParseOption};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix that marks a configuration option as a placeholder override rule.
const PATTERN_SUFFIX: &str = "_pattern";

/// Configuration option holding the identifier template.
const DATASET_ID_OPTION: &str = "dataset_id";

/// A project's declarative dataset id template plus its placeholder
/// override rules, as read from the project's configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPattern {
    template: String,
    overrides: BTreeMap<String, String>,
}

impl ProjectPattern {
    /// Build a pattern directly from a template and override mapping.
    #[must_use]
    pub fn new(template: String, overrides: BTreeMap<String, String>) -> Self {
        Self { template, overrides }
    }

    /// Parse a project's pattern out of its `esg.<project>.ini` document.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::ProjectNotSupported`] when the document cannot
    /// be parsed, has no `[project:<name>]` section, or the section lacks a
    /// `dataset_id` option.
    pub fn from_ini(text: &str, project: &str) -> Result<Self, IssueError> {
        let not_supported = || IssueError::ProjectNotSupported {
            project: project.to_string(),
        };

        // Escape processing is off: option values are regex fragments where
        // backslashes must survive verbatim.
        let parse_option = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, parse_option).map_err(|_| not_supported())?;
        let section = ini
            .section(Some(format!("project:{project}")))
            .ok_or_else(not_supported)?;
        let template = section.get(DATASET_ID_OPTION).ok_or_else(not_supported)?;

        let overrides = section
            .iter()
            .filter(|(key, _)| key.ends_with(PATTERN_SUFFIX))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Ok(Self {
            template: template.to_string(),
            overrides,
        })
    }

    /// The raw identifier template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Translate the template into a matching expression string.
    #[must_use]
    pub fn translate(&self) -> String {
        translate_template(&self.template, &self.overrides)
    }
}
