//! Token storage and encryption
//!
//! The errata service authenticates users with a personal access token. The
//! token is resolved from the environment, or from a local credential file
//! that may hold it either in the clear or encrypted at rest under a
//! user-chosen passphrase combined with a machine-derived salt.

mod cipher;
mod store;

pub use cipher::{decrypt_token, encrypt_token};
pub use store::{CredentialStore, DEFAULT_USERNAME, StoredCredential, TOKEN_ENV_VAR};
