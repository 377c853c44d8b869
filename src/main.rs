use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::{
    args::Cli, commands::command_from_args, formatting::Format, logging::setup_logging,
};

mod args;
mod commands;
mod config;
mod dependencies;
mod formatting;
mod interaction;
mod logging;
mod models;
mod table;
mod watcher;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.global_args.debug);

    let profile =
        config::load_profile(cli.global_args.profile.as_deref()).context("loading profile")?;
    let format = Format::resolve(cli.global_args.format, profile.output);
    debug!(profile = %profile.name, ?format, "resolved configuration");

    let mut command = command_from_args(cli.command, &profile, format)?;
    command.execute().await
}
