//! Shared state, arguments, and workflow steps used by every command.

use super::Host;
use crate::drs::{PatternCache, dataset_lines, extract_facets, normalize_datasets};
use crate::errors::IssueError;
use crate::issue::{IssuePayload, read_dataset_lines, read_issue, write_dataset_file};
use crate::Result;
use crate::credentials::CredentialStore;
use crate::projects::{ConfigCache, ConfigProvider, DEFAULT_CONFIG_API, DEFAULT_CONFIG_TTL};
use crate::transport::{DEFAULT_SERVICE_URL, WsClient};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::Args;
use clap::ValueEnum;
use directories::BaseDirs;
use ohno::IntoAppError;
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by every command
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Base URL of the errata web service
    #[arg(long, value_name = "URL", default_value = DEFAULT_SERVICE_URL)]
    pub errata_url: String,

    /// URL template of the project configuration repository ({project} placeholder)
    #[arg(long, value_name = "URL", default_value = DEFAULT_CONFIG_API)]
    pub config_api: String,

    /// Directory where credentials and cached configuration are kept
    #[arg(long, value_name = "PATH")]
    pub state_dir: Option<Utf8PathBuf>,

    /// Passphrase protecting the stored credentials
    #[arg(long, value_name = "PASSPHRASE", env = "ERRATA_CLIENT_PASSPHRASE")]
    pub passphrase: Option<String>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

/// Resolve the client state directory: the explicit override first, then
/// `$ESDOC_HOME/.esdoc/errata`, then the platform cache directory.
pub fn state_dir(args: &CommonArgs) -> Result<PathBuf> {
    if let Some(dir) = &args.state_dir {
        return Ok(dir.as_std_path().to_path_buf());
    }

    if let Ok(home) = std::env::var("ESDOC_HOME")
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home).join(".esdoc").join("errata"));
    }

    Ok(BaseDirs::new()
        .into_app_err("could not determine state directory")?
        .cache_dir()
        .join("esgissue"))
}

/// Collaborators every command needs: the web-service client, the project
/// configuration provider, the compiled-pattern cache, and the credential
/// store.
#[derive(Debug)]
pub struct Common {
    pub ws: WsClient,
    pub provider: ConfigProvider,
    pub patterns: PatternCache,
    pub store: CredentialStore,
}

impl Common {
    /// Initialize logging and construct the collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be determined or the
    /// HTTP clients cannot be built.
    pub fn new(args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let state_dir = state_dir(args)?;
        let ws = WsClient::new(&args.errata_url)?;
        let cache = ConfigCache::new(state_dir.join("config"), DEFAULT_CONFIG_TTL, Utc::now());
        let provider = ConfigProvider::new(&args.config_api, cache)?;
        let store = CredentialStore::new(&state_dir);

        Ok(Self {
            ws,
            provider,
            patterns: PatternCache::new(),
            store,
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        let level = match log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .init();
    }

    /// Run the local half of a create/update: read and validate the issue
    /// document and its dataset list, extract facets from every dataset
    /// against the project pattern, merge them into the document, rewrite
    /// the dataset file in uniform form, and compact the document.
    ///
    /// Nothing is written before every dataset has validated and matched;
    /// the first failure aborts the whole preparation.
    ///
    /// # Errors
    ///
    /// Surfaces the typed validation, configuration, and extraction errors
    /// of the underlying steps.
    pub async fn prepare_submission(
        &self,
        issue_path: &Utf8Path,
        dsets_path: &Utf8Path,
    ) -> Result<IssuePayload, IssueError> {
        let mut payload = read_issue(issue_path)?;
        let project = payload.project()?.to_lowercase();

        let raw = read_dataset_lines(dsets_path)?;
        let datasets = normalize_datasets(&raw)?;

        let pattern = self.provider.get_pattern(&project).await?;
        let regex = self.patterns.pattern_for(&project, &pattern)?;
        for dataset in &datasets {
            let full_id = format!("{}.v{}", dataset.id, dataset.version);
            let facets = extract_facets(&full_id, &project, &regex)?;
            payload.merge_facets(&facets);
        }

        let lines = dataset_lines(&datasets);
        write_dataset_file(dsets_path, &lines)?;
        payload.set(
            "datasets",
            Value::Array(lines.into_iter().map(Value::String).collect()),
        );
        payload.compact();
        Ok(payload)
    }
}

/// Report a workflow failure on the error stream and map it to the process
/// exit status. Only this boundary terminates; the components below it
/// return typed errors.
pub fn report_failure<H: Host>(host: &mut H, err: &IssueError) -> Result<()> {
    let _ = writeln!(host.error(), "{err}");
    host.exit(err.exit_code());
    Ok(())
}
