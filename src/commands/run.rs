//! Command dispatch logic for esgissue

use super::{
    ChangepassArgs, CloseArgs, CreateArgs, CredremoveArgs, CredsetArgs, CredtestArgs, RetrieveArgs, UpdateArgs,
    process_changepass, process_close, process_create, process_credremove, process_credreset, process_credset,
    process_credtest, process_retrieve, process_update,
};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "esgissue", version, author)]
#[command(about = "Manage ESGF errata issues against the errata web service")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: EsgissueSubcommand,
}

#[derive(Subcommand, Debug)]
enum EsgissueSubcommand {
    /// Create a new issue on the errata service
    Create(Box<CreateArgs>),
    /// Update an existing issue on the errata service
    Update(Box<UpdateArgs>),
    /// Close an issue with a resolution status
    Close(Box<CloseArgs>),
    /// Retrieve issues by identifier into local files
    Retrieve(Box<RetrieveArgs>),
    /// Store an access token locally
    Credset(Box<CredsetArgs>),
    /// Remove the stored credentials
    Credremove(Box<CredremoveArgs>),
    /// Replace the stored credentials
    Credreset(Box<CredsetArgs>),
    /// Change the passphrase protecting the stored credentials
    Changepass(Box<ChangepassArgs>),
    /// Check the stored credentials against the service
    Credtest(Box<CredtestArgs>),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        EsgissueSubcommand::Create(create_args) => process_create(host, create_args).await,
        EsgissueSubcommand::Update(update_args) => process_update(host, update_args).await,
        EsgissueSubcommand::Close(close_args) => process_close(host, close_args).await,
        EsgissueSubcommand::Retrieve(retrieve_args) => process_retrieve(host, retrieve_args).await,
        EsgissueSubcommand::Credset(credset_args) => process_credset(host, credset_args),
        EsgissueSubcommand::Credremove(credremove_args) => process_credremove(host, credremove_args),
        EsgissueSubcommand::Credreset(credset_args) => process_credreset(host, credset_args),
        EsgissueSubcommand::Changepass(changepass_args) => process_changepass(host, changepass_args),
        EsgissueSubcommand::Credtest(credtest_args) => process_credtest(host, credtest_args).await,
    }
}
