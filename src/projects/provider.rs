//! Remote configuration fetch with TTL-aware local caching.

use super::ProjectPattern;
use crate::errors::IssueError;
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "  projects";

/// Default contents-API URL template for project configuration files.
/// `{project}` is replaced with the lower-cased project name.
pub const DEFAULT_CONFIG_API: &str =
    "https://api.github.com/repos/ESGF/config/contents/publisher-configs/ini/esg.{project}.ini";

/// How long a locally cached project configuration stays fresh.
pub const DEFAULT_CONFIG_TTL: Duration = Duration::from_secs(60 * 60);

/// On-disk representation of a cached project pattern.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct Envelope {
    timestamp: DateTime<Utc>,
    pattern: ProjectPattern,
}

/// Response shape of the repository contents API; only the raw download
/// location is of interest.
#[derive(Debug, Deserialize)]
struct ContentsEntry {
    download_url: String,
}

/// A TTL-aware, directory-backed cache of project patterns.
#[derive(Debug, Clone)]
pub struct ConfigCache {
    dir: PathBuf,
    ttl: Duration,
    now: DateTime<Utc>,
}

impl ConfigCache {
    /// Create a new cache rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self { dir: dir.into(), ttl, now }
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a fresh cached pattern for `project`, if one exists.
    #[must_use]
    pub fn load(&self, project: &str) -> Option<ProjectPattern> {
        let path = self.entry_path(project);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "config cache miss for '{project}': {e}");
                return None;
            }
        };

        let reader = BufReader::new(file);
        let envelope: Envelope = match serde_json::from_reader(reader) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "config cache miss for '{project}': {e}");
                return None;
            }
        };

        let age = self.now.signed_duration_since(envelope.timestamp);
        if age.num_seconds() >= 0 {
            let age = age.to_std().unwrap_or(Duration::MAX);
            if age >= self.ttl {
                log::info!(
                    target: LOG_TARGET,
                    "local configuration for '{project}' expired ({:.0} min old), refetching",
                    age.as_secs_f64() / 60.0
                );
                return None;
            }
        }

        log::info!(target: LOG_TARGET, "recent project configuration found locally for '{project}'");
        Some(envelope.pattern)
    }

    /// Persist a freshly fetched pattern for `project`.
    pub fn save(&self, project: &str, pattern: &ProjectPattern) -> crate::Result<()> {
        let path = self.entry_path(project);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{}'", parent.display()))?;
        }

        let envelope = Envelope {
            timestamp: self.now,
            pattern: pattern.clone(),
        };
        let file = File::create(&path).into_app_err_with(|| format!("creating cache file '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &envelope)
            .into_app_err_with(|| format!("writing cache file '{}'", path.display()))?;
        writer
            .flush()
            .into_app_err_with(|| format!("flushing cache file '{}'", path.display()))?;
        Ok(())
    }

    fn entry_path(&self, project: &str) -> PathBuf {
        self.dir.join(format!("esg.{project}.json"))
    }
}

/// Supplies per-project patterns, fetching and caching their configuration
/// files on demand.
#[derive(Debug)]
pub struct ConfigProvider {
    client: reqwest::Client,
    api_url_template: String,
    cache: ConfigCache,
}

impl ConfigProvider {
    /// Create a provider backed by the given cache and contents-API URL
    /// template (`{project}` placeholder).
    pub fn new(api_url_template: impl Into<String>, cache: ConfigCache) -> crate::Result<Self> {
        let client = reqwest::Client::builder().user_agent("esgissue").build()?;
        Ok(Self {
            client,
            api_url_template: api_url_template.into(),
            cache,
        })
    }

    /// Return the pattern for `project`, from the local cache when fresh,
    /// otherwise fetched from the remote repository and persisted locally.
    ///
    /// # Errors
    ///
    /// - [`IssueError::ConfigUnavailable`] when the remote file cannot be
    ///   fetched.
    /// - [`IssueError::ProjectNotSupported`] when the fetched file carries
    ///   no usable pattern for the project.
    pub async fn get_pattern(&self, project: &str) -> Result<ProjectPattern, IssueError> {
        let project = project.to_lowercase();
        if let Some(pattern) = self.cache.load(&project) {
            return Ok(pattern);
        }

        log::info!(target: LOG_TARGET, "no usable local configuration for '{project}', retrieving from repository");
        let text = self.fetch_remote(&project).await?;
        let pattern = ProjectPattern::from_ini(&text, &project)?;
        self.cache.save(&project, &pattern)?;
        log::info!(target: LOG_TARGET, "project configuration for '{project}' persisted locally");
        Ok(pattern)
    }

    async fn fetch_remote(&self, project: &str) -> Result<String, IssueError> {
        let unavailable = |detail: String| IssueError::ConfigUnavailable {
            project: project.to_string(),
            detail,
        };

        let url = self.api_url_template.replace("{project}", project);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status().as_u16())));
        }
        let entry: ContentsEntry = response
            .json()
            .await
            .map_err(|e| unavailable(format!("unexpected contents API response: {e}")))?;

        let raw = self
            .client
            .get(&entry.download_url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        if !raw.status().is_success() {
            return Err(unavailable(format!("HTTP {} fetching raw file", raw.status().as_u16())));
        }
        raw.text().await.map_err(|e| unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_pattern() -> ProjectPattern {
        ProjectPattern::new("%(mip_era)s.%(version)s".to_string(), BTreeMap::new())
    }

    #[test]
    fn save_then_load_hits_the_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ConfigCache::new(tmp.path(), DEFAULT_CONFIG_TTL, Utc::now());

        cache.save("cmip6", &sample_pattern()).unwrap();
        assert_eq!(cache.load("cmip6"), Some(sample_pattern()));
    }

    #[test]
    fn missing_entry_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ConfigCache::new(tmp.path(), DEFAULT_CONFIG_TTL, Utc::now());
        assert_eq!(cache.load("cordex"), None);
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let write_time = Utc::now() - chrono::Duration::hours(2);
        ConfigCache::new(tmp.path(), DEFAULT_CONFIG_TTL, write_time)
            .save("cmip6", &sample_pattern())
            .unwrap();

        let cache = ConfigCache::new(tmp.path(), DEFAULT_CONFIG_TTL, Utc::now());
        assert_eq!(cache.load("cmip6"), None);
    }

    #[test]
    fn corrupt_entry_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("esg.cmip6.json"), "not json").unwrap();
        let cache = ConfigCache::new(tmp.path(), DEFAULT_CONFIG_TTL, Utc::now());
        assert_eq!(cache.load("cmip6"), None);
    }

    #[test]
    fn future_timestamp_is_treated_as_fresh() {
        let tmp = tempfile::tempdir().unwrap();
        let future = Utc::now() + chrono::Duration::hours(1);
        ConfigCache::new(tmp.path(), DEFAULT_CONFIG_TTL, future)
            .save("cmip6", &sample_pattern())
            .unwrap();

        let cache = ConfigCache::new(tmp.path(), DEFAULT_CONFIG_TTL, Utc::now());
        assert_eq!(cache.load("cmip6"), Some(sample_pattern()));
    }
}
