//! The on-disk credential file.

use super::{decrypt_token, encrypt_token};
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "     creds";

/// Environment variable that overrides the stored token.
pub const TOKEN_ENV_VAR: &str = "ERRATA_CLIENT_TOKEN";

/// Fixed username the errata service expects alongside the token.
pub const DEFAULT_USERNAME: &str = "errata-client-user";

const CREDENTIAL_FILE: &str = "cred.json";

/// Content of the credential file: the token, either in the clear or as a
/// base64 cipher envelope, and a flag telling which.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub token: String,
    pub encrypted: bool,
}

impl StoredCredential {
    /// Recover the plaintext token, decrypting with `passphrase` when the
    /// stored form is encrypted.
    pub fn reveal(&self, passphrase: Option<&str>) -> crate::Result<String> {
        if self.encrypted {
            decrypt_token(&self.token, passphrase.unwrap_or(""))
        } else {
            Ok(self.token.clone())
        }
    }
}

/// Credential file living in the client state directory.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store rooted at the client state directory.
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(CREDENTIAL_FILE),
        }
    }

    /// Path of the credential file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a credential file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Token supplied through the environment, if any.
    #[must_use]
    pub fn token_from_env() -> Option<String> {
        std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty())
    }

    /// Load the stored credential, if a file exists.
    pub fn load(&self) -> crate::Result<Option<StoredCredential>> {
        if !self.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .into_app_err_with(|| format!("reading credential file '{}'", self.path.display()))?;
        let stored = serde_json::from_str(&text)
            .into_app_err_with(|| format!("parsing credential file '{}'", self.path.display()))?;
        Ok(Some(stored))
    }

    /// Persist a token. A non-empty passphrase encrypts it at rest; an
    /// empty one stores it in the clear, as the flag records.
    pub fn save(&self, token: &str, passphrase: &str) -> crate::Result<()> {
        let stored = if passphrase.is_empty() {
            StoredCredential {
                token: token.to_string(),
                encrypted: false,
            }
        } else {
            StoredCredential {
                token: encrypt_token(token, passphrase)?,
                encrypted: true,
            }
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{}'", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(&stored).into_app_err("serializing credential file")?;
        fs::write(&self.path, text)
            .into_app_err_with(|| format!("writing credential file '{}'", self.path.display()))?;
        log::info!(target: LOG_TARGET, "credentials saved to {}", self.path.display());
        Ok(())
    }

    /// Delete the credential file. Returns whether one existed.
    pub fn remove(&self) -> crate::Result<bool> {
        if !self.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .into_app_err_with(|| format!("removing credential file '{}'", self.path.display()))?;
        log::info!(target: LOG_TARGET, "credentials removed");
        Ok(true)
    }

    /// Re-encrypt the stored token under a new passphrase (or store it in
    /// the clear when the new passphrase is empty).
    pub fn change_passphrase(&self, old_pass: Option<&str>, new_pass: &str) -> crate::Result<bool> {
        let Some(stored) = self.load()? else {
            return Ok(false);
        };
        let token = stored.reveal(old_pass)?;
        self.save(&token, new_pass)?;
        log::info!(target: LOG_TARGET, "passphrase updated");
        Ok(true)
    }
}
