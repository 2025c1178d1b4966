//! Credential management commands and token resolution.

use super::Host;
use super::common::{Common, CommonArgs, report_failure};
use crate::Result;
use crate::credentials::{CredentialStore, DEFAULT_USERNAME};
use crate::errors::IssueError;
use crate::transport::Credentials;
use clap::Parser;
use std::io::Write;

/// Resolve the token to use for an authenticated action: the environment
/// variable first, then the credential file (prompting for the passphrase
/// when the stored token is encrypted and none was supplied), finally an
/// interactive prompt. The username is fixed by the service.
pub fn resolve_credentials<H: Host>(
    host: &mut H,
    store: &CredentialStore,
    passphrase: Option<&str>,
) -> Result<Credentials, IssueError> {
    if let Some(token) = CredentialStore::token_from_env() {
        return Ok(Credentials {
            username: DEFAULT_USERNAME.to_string(),
            token,
        });
    }

    if let Some(stored) = store.load()? {
        let token = if stored.encrypted && passphrase.is_none() {
            let entered = host.prompt_secret("Passphrase: ")?;
            stored.reveal(Some(&entered))?
        } else {
            stored.reveal(passphrase)?
        };
        return Ok(Credentials {
            username: DEFAULT_USERNAME.to_string(),
            token,
        });
    }

    let token = host.prompt_secret("Access token: ")?;
    Ok(Credentials {
        username: DEFAULT_USERNAME.to_string(),
        token,
    })
}

#[derive(Parser, Debug)]
pub struct CredsetArgs {
    /// Access token to store (prompted if omitted)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn process_credset<H: Host>(host: &mut H, args: &CredsetArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    match store_token(host, &common.store, args) {
        Ok(()) => {
            let _ = writeln!(host.output(), "credentials stored in {}", common.store.path().display());
            Ok(())
        }
        Err(e) => report_failure(host, &e),
    }
}

fn store_token<H: Host>(host: &mut H, store: &CredentialStore, args: &CredsetArgs) -> Result<(), IssueError> {
    let token = match &args.token {
        Some(token) => token.clone(),
        None => host.prompt_secret("Access token: ")?,
    };
    let passphrase = match &args.common.passphrase {
        Some(passphrase) => passphrase.clone(),
        None => host.prompt_secret("Passphrase (leave empty to store unencrypted): ")?,
    };
    store.save(&token, &passphrase)?;
    Ok(())
}

#[derive(Parser, Debug)]
pub struct CredremoveArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn process_credremove<H: Host>(host: &mut H, args: &CredremoveArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    match common.store.remove() {
        Ok(true) => {
            let _ = writeln!(host.output(), "credentials removed");
            Ok(())
        }
        Ok(false) => {
            let _ = writeln!(host.output(), "no credentials were stored");
            Ok(())
        }
        Err(e) => report_failure(host, &IssueError::Internal(e)),
    }
}

/// Replace the stored credentials: remove the old file, then run the same
/// flow as `credset`.
pub fn process_credreset<H: Host>(host: &mut H, args: &CredsetArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    match reset_token(host, &common.store, args) {
        Ok(()) => {
            let _ = writeln!(host.output(), "credentials replaced in {}", common.store.path().display());
            Ok(())
        }
        Err(e) => report_failure(host, &e),
    }
}

fn reset_token<H: Host>(host: &mut H, store: &CredentialStore, args: &CredsetArgs) -> Result<(), IssueError> {
    let _ = store.remove()?;
    store_token(host, store, args)
}

#[derive(Parser, Debug)]
pub struct ChangepassArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn process_changepass<H: Host>(host: &mut H, args: &ChangepassArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    match change_passphrase(host, &common.store, args) {
        Ok(true) => {
            let _ = writeln!(host.output(), "passphrase changed");
            Ok(())
        }
        Ok(false) => {
            let _ = writeln!(host.output(), "no credentials were stored");
            Ok(())
        }
        Err(e) => report_failure(host, &e),
    }
}

fn change_passphrase<H: Host>(host: &mut H, store: &CredentialStore, args: &ChangepassArgs) -> Result<bool, IssueError> {
    if !store.exists() {
        return Ok(false);
    }
    let old_pass = match &args.common.passphrase {
        Some(passphrase) => passphrase.clone(),
        None => host.prompt_secret("Current passphrase (empty if unencrypted): ")?,
    };
    let new_pass = host.prompt_secret("New passphrase (leave empty to store unencrypted): ")?;
    Ok(store.change_passphrase(Some(&old_pass), &new_pass)?)
}

#[derive(Parser, Debug)]
pub struct CredtestArgs {
    /// Team whose posting rights are being checked
    #[arg(long, value_name = "TEAM", default_value = "errata")]
    pub team: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_credtest<H: Host>(host: &mut H, args: &CredtestArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    match test_credentials(host, &common, args).await {
        Ok(true) => {
            let _ = writeln!(host.output(), "credentials accepted for team {}", args.team);
            Ok(())
        }
        Ok(false) => {
            let _ = writeln!(host.output(), "credentials refused for team {}", args.team);
            Ok(())
        }
        Err(e) => report_failure(host, &e),
    }
}

async fn test_credentials<H: Host>(host: &mut H, common: &Common, args: &CredtestArgs) -> Result<bool, IssueError> {
    common.ws.heartbeat().await?;
    let creds = resolve_credentials(host, &common.store, args.common.passphrase.as_deref())?;
    common.ws.credtest(&creds, &args.team).await
}
