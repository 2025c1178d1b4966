//! Command-line interface and orchestration for esgissue
//!
//! This module implements the CLI commands and coordinates the other modules
//! to perform the end-to-end errata workflows. It handles argument parsing,
//! credential resolution, and the high-level command flows.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **create**: Validate the local issue document and dataset list, extract
//!   DRS facets, and submit the new issue to the errata service
//! - **update**: Same local preparation as create, then submit a revision of
//!   an existing issue
//! - **close**: Close an issue with a resolution status
//! - **retrieve**: Fetch issues by identifier and write them out as ordered,
//!   compacted JSON documents plus flat dataset files
//! - **credset / credremove / credreset / changepass**: Manage the locally
//!   stored access token
//! - **credtest**: Check the credentials against the service for a team
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to
//! the appropriate command handler. Local validation always runs to
//! completion before the first network call, so a bad dataset list or a
//! malformed issue document never reaches the service. Remote failures are
//! classified by the transport layer; this module only maps them to exit
//! codes at the boundary, via the `Host` abstraction so commands stay
//! testable in-memory.

mod close;
mod common;
mod create;
mod creds;
mod host;
mod retrieve;
mod run;
mod update;

pub use close::{CloseArgs, process_close};
pub use common::{Common, CommonArgs, LogLevel};
pub use create::{CreateArgs, process_create};
pub use creds::{
    ChangepassArgs, CredremoveArgs, CredsetArgs, CredtestArgs, process_changepass, process_credremove,
    process_credreset, process_credset, process_credtest, resolve_credentials,
};
pub use host::Host;
pub use retrieve::{RetrieveArgs, process_retrieve};
pub use run::run;
pub use update::{UpdateArgs, process_update};
