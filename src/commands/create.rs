use super::Host;
use super::common::{Common, CommonArgs, report_failure};
use super::creds::resolve_credentials;
use crate::Result;
use crate::errors::IssueError;
use crate::issue::write_issue;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Path to the issue JSON document
    #[arg(long, short = 'i', value_name = "PATH", default_value = "issue.json")]
    pub issue: Utf8PathBuf,

    /// Path to the affected dataset list (one id per line)
    #[arg(long, short = 'd', value_name = "PATH", default_value = "dsets.txt")]
    pub dsets: Utf8PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_create<H: Host>(host: &mut H, args: &CreateArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    match create_issue(host, &common, args).await {
        Ok(uid) => {
            let _ = writeln!(host.output(), "issue {uid} created on the errata service");
            Ok(())
        }
        Err(e) => report_failure(host, &e),
    }
}

/// Validate locally, then submit the new issue and record the identifier
/// the service assigned to it.
async fn create_issue<H: Host>(host: &mut H, common: &Common, args: &CreateArgs) -> Result<String, IssueError> {
    let mut payload = common.prepare_submission(&args.issue, &args.dsets).await?;

    common.ws.heartbeat().await?;
    let creds = resolve_credentials(host, &common.store, args.common.passphrase.as_deref())?;
    let response = common.ws.create(&payload.ordered(), &creds).await?;

    if let Some(uid) = response.get("uid").and_then(|v| v.as_str()) {
        payload.set_str("uid", uid);
    }
    write_issue(&args.issue, &payload)?;
    payload.uid().map(str::to_string)
}
