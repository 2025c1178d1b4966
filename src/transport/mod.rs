//! Errata web-service client
//!
//! [`WsClient`] performs the remote actions the CLI exposes: `create`,
//! `update`, `close`, `retrieve`, and the credential check. Before any
//! action the service heartbeat is verified; failures are classified into
//! the typed taxonomy (`Authentication`, `Authorization`, `ServerDown`,
//! `WsRequestFailed`) carrying the originating HTTP status, and are never
//! retried automatically.

mod client;

pub use client::{Credentials, DEFAULT_SERVICE_URL, WsClient};
