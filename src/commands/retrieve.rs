use super::Host;
use super::common::{Common, CommonArgs, report_failure};
use crate::Result;
use crate::errors::IssueError;
use crate::issue::{IssuePayload, write_dataset_file, write_issue};
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct RetrieveArgs {
    /// Identifiers of the issues to retrieve
    #[arg(value_name = "UID", required = true)]
    pub uids: Vec<String>,

    /// Directory where retrieved issue and dataset files are written
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub dir: Utf8PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_retrieve<H: Host>(host: &mut H, args: &RetrieveArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    match retrieve_issues(host, &common, args).await {
        Ok(()) => Ok(()),
        Err(e) => report_failure(host, &e),
    }
}

/// Fetch each requested issue and write it out as a compacted, canonically
/// ordered JSON document plus a flat dataset file.
async fn retrieve_issues<H: Host>(host: &mut H, common: &Common, args: &RetrieveArgs) -> Result<(), IssueError> {
    common.ws.heartbeat().await?;

    for uid in &args.uids {
        let value = common.ws.retrieve(uid).await?;
        let mut payload = IssuePayload::from_value(value, "errata service")?;
        payload.compact();

        let issue_path = args.dir.join(format!("issue_{uid}.json"));
        write_issue(&issue_path, &payload)?;

        let datasets = payload.datasets()?;
        if !datasets.is_empty() {
            let dsets_path = args.dir.join(format!("dset_{uid}.txt"));
            write_dataset_file(&dsets_path, &datasets)?;
        }
        let _ = writeln!(host.output(), "issue {uid} written to {issue_path}");
    }
    Ok(())
}
