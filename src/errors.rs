//! Typed failure taxonomy for the errata client.
//!
//! Validation and extraction failures are detected before any network call
//! and abort the whole operation; there is no partial-success mode. Every
//! variant carries enough context (offending identifier, project name, HTTP
//! status) for the user to correct their input and retry. Components never
//! terminate the process themselves; the command boundary maps
//! [`IssueError::exit_code`] to the process exit status.

use thiserror::Error;

/// Errors surfaced to the user by any of the client workflows.
#[derive(Error, Debug)]
pub enum IssueError {
    /// The affected-dataset list was empty or absent where one is required.
    #[error("the dataset list is empty; at least one affected dataset id is required")]
    EmptyDatasetList,

    /// A dataset identifier has no recognizable trailing version marker.
    #[error("dataset id '{id}' has no version suffix (expected '.vNNN' or '#NNN')")]
    MalformedDatasetId {
        /// The offending identifier, exactly as supplied.
        id: String,
    },

    /// A dataset identifier does not match the project's DRS pattern.
    #[error("dataset id '{id}' is incoherent with the {project} DRS structure")]
    DatasetIncoherent { id: String, project: String },

    /// The project's configuration carries no dataset id pattern.
    #[error("project '{project}' is not supported: no dataset id pattern in its configuration")]
    ProjectNotSupported { project: String },

    /// The project's configured pattern does not compile to a usable expression.
    #[error("project '{project}' has an invalid dataset id pattern: {reason}")]
    InvalidProjectPattern { project: String, reason: String },

    /// The project configuration could not be read locally or fetched remotely.
    #[error("no configuration available for project '{project}': {detail}")]
    ConfigUnavailable { project: String, detail: String },

    /// The issue JSON document could not be read or is not a JSON object.
    #[error("issue document '{path}' is malformed: {reason}")]
    MalformedIssueDocument { path: String, reason: String },

    /// A recognized payload field holds a value of the wrong type.
    #[error("field '{field}' in the issue document must be {expected}")]
    FieldTypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// A required payload field is absent.
    #[error("field '{field}' is missing from the issue document")]
    FieldMissing { field: &'static str },

    /// A file required by the workflow could not be read or written.
    #[error("cannot access '{path}': {reason}")]
    FileAccess { path: String, reason: String },

    /// The user-supplied close status is not one of the accepted forms.
    #[error("invalid status '{status}': expected r/resolved or w/wontfix")]
    InvalidStatus { status: String },

    /// The web service rejected the supplied credentials (HTTP 401).
    #[error("authentication failed, HTTP {status}: check your token")]
    Authentication { status: u16 },

    /// The web service refused the action for this user (HTTP 403).
    #[error("authorization failed, HTTP {status}: you are not allowed to perform this action")]
    Authorization { status: u16 },

    /// The errata service heartbeat failed; the server appears to be down.
    #[error("the errata service is unreachable: {detail}")]
    ServerDown { detail: String },

    /// Any other web-service request failure.
    #[error("errata service request failed, HTTP {status}")]
    WsRequestFailed { status: u16 },

    /// An internal failure from a collaborator (I/O, encryption, HTTP plumbing).
    #[error("{0}")]
    Internal(ohno::AppError),
}

impl IssueError {
    /// Stable process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyDatasetList => 10,
            Self::MalformedDatasetId { .. } => 11,
            Self::DatasetIncoherent { .. } => 12,
            Self::ProjectNotSupported { .. } | Self::InvalidProjectPattern { .. } => 13,
            Self::ConfigUnavailable { .. } => 14,
            Self::MalformedIssueDocument { .. }
            | Self::FieldTypeMismatch { .. }
            | Self::FieldMissing { .. } => 15,
            Self::FileAccess { .. } => 16,
            Self::InvalidStatus { .. } => 17,
            Self::Authentication { .. } => 20,
            Self::Authorization { .. } => 21,
            Self::ServerDown { .. } => 22,
            Self::WsRequestFailed { .. } => 23,
            Self::Internal(_) => 1,
        }
    }
}

impl From<ohno::AppError> for IssueError {
    fn from(err: ohno::AppError) -> Self {
        Self::Internal(err)
    }
}
