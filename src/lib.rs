//! Core library for esgissue
//!
//! This library implements the ESGF errata issue client: creating, updating,
//! closing, and retrieving issue records against the errata web service,
//! validating and normalizing affected-dataset lists, and extracting DRS
//! facets from dataset identifiers using per-project configuration patterns.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`drs`]: Dataset identifier parsing and facet extraction
//! - [`issue`]: Issue payload document handling (ordering, compaction, merge)
//! - [`projects`]: Per-project configuration fetch and caching
//! - [`transport`]: Errata web-service client
//! - [`credentials`]: Token storage and encryption
//! - [`errors`]: Typed failure taxonomy with stable exit codes

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[doc(hidden)]
pub mod commands;

#[doc(hidden)]
pub mod credentials;

#[doc(hidden)]
pub mod drs;

#[doc(hidden)]
pub mod errors;

#[doc(hidden)]
pub mod issue;

#[doc(hidden)]
pub mod projects;

#[doc(hidden)]
pub mod transport;

pub use crate::commands::{Host, run};
