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
pub struct UpdateArgs {
    /// Path to the issue JSON document
    #[arg(long, short = 'i', value_name = "PATH", default_value = "issue.json")]
    pub issue: Utf8PathBuf,

    /// Path to the affected dataset list (one id per line)
    #[arg(long, short = 'd', value_name = "PATH", default_value = "dsets.txt")]
    pub dsets: Utf8PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_update<H: Host>(host: &mut H, args: &UpdateArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    match update_issue(host, &common, args).await {
        Ok(uid) => {
            let _ = writeln!(host.output(), "issue {uid} updated on the errata service");
            Ok(())
        }
        Err(e) => report_failure(host, &e),
    }
}

/// Validate locally, then submit the revised issue. Unlike creation, the
/// document must already carry the identifier the service assigned.
async fn update_issue<H: Host>(host: &mut H, common: &Common, args: &UpdateArgs) -> Result<String, IssueError> {
    let payload = common.prepare_submission(&args.issue, &args.dsets).await?;
    let uid = payload.uid()?.to_string();

    common.ws.heartbeat().await?;
    let creds = resolve_credentials(host, &common.store, args.common.passphrase.as_deref())?;
    let _ = common.ws.update(&payload.ordered(), &creds).await?;

    write_issue(&args.issue, &payload)?;
    Ok(uid)
}
