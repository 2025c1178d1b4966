use super::Host;
use super::common::{Common, CommonArgs, report_failure};
use super::creds::resolve_credentials;
use crate::Result;
use crate::errors::IssueError;
use crate::issue::{read_issue, write_issue};
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct CloseArgs {
    /// Identifier of the issue to close
    #[arg(long, value_name = "UID")]
    pub uid: String,

    /// Closing status: r/resolved or w/wontfix (prompted if omitted)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Local issue JSON document to update with the closing status
    #[arg(long, short = 'i', value_name = "PATH")]
    pub issue: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_close<H: Host>(host: &mut H, args: &CloseArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    match close_issue(host, &common, args).await {
        Ok(status) => {
            let _ = writeln!(host.output(), "issue {} closed as {status}", args.uid);
            Ok(())
        }
        Err(e) => report_failure(host, &e),
    }
}

async fn close_issue<H: Host>(host: &mut H, common: &Common, args: &CloseArgs) -> Result<String, IssueError> {
    let input = match &args.status {
        Some(status) => status.clone(),
        None => host.prompt("Closing status? [r]esolved / [w]ontfix: ")?,
    };
    let status = resolve_status(input.trim())?;

    common.ws.heartbeat().await?;
    let creds = resolve_credentials(host, &common.store, args.common.passphrase.as_deref())?;
    common.ws.close(&args.uid, status, &creds).await?;

    if let Some(path) = &args.issue {
        let mut payload = read_issue(path)?;
        payload.set_str("status", status);
        write_issue(path, &payload)?;
    }
    Ok(status.to_string())
}

/// Map the user's shorthand to the two statuses the service accepts.
fn resolve_status(input: &str) -> Result<&'static str, IssueError> {
    match input {
        "r" | "R" | "resolved" => Ok("resolved"),
        "w" | "W" | "wontfix" => Ok("wontfix"),
        _ => Err(IssueError::InvalidStatus {
            status: input.to_string(),
        }),
    }
}
