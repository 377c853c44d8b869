//! Root command for the CLI.
//!
//! The commands themselves are defined in the [`AtlasArgs`](super::AtlasArgs) enum.
use clap::{Args, Parser};

use crate::formatting::Format;

use super::AtlasArgs;

/// Command-line client for MongoDB Atlas.
#[derive(Parser)]
#[command(name = "atlas", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global_args: GlobalArgs,

    #[command(subcommand)]
    pub command: AtlasArgs,
}

#[derive(Args)]
#[command(rename_all = "camelCase")]
pub struct GlobalArgs {
    /// Enable debug logging.
    ///
    /// The log level can also be set with the `ATLAS_CLI_LOG` environment variable.
    /// When `ATLAS_CLI_LOG_ALL` is set, logs from all crates are shown.
    #[arg(global = true, hide = true, long, short = 'D', default_value = "false")]
    pub debug: bool,

    /// Output format. Defaults to the output of the profile, or text.
    #[arg(global = true, long = "output", short = 'o')]
    pub format: Option<Format>,

    /// Name of the profile to use from your configuration file.
    #[arg(global = true, long, short = 'P')]
    pub profile: Option<String>,
}
