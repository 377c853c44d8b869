//! CLI argument parsing layer.
//!
//! This module provides the CLI interface using clap derive macros.
//! The business logic layer is [`crate::commands`], which receives these parsed arguments.

use std::time::Duration;

use clap::{Args, Subcommand};

use crate::commands::validators::parse_object_id;

mod backups;
mod cli;
mod clusters;

pub use backups::*;
pub use cli::Cli;
pub use clusters::*;

/// Root command enum.
#[derive(Subcommand)]
pub enum AtlasArgs {
    /// Manage clusters for your project.
    #[command(subcommand)]
    Clusters(Clusters),
    /// Manage cloud backups for your project.
    #[command(subcommand)]
    Backups(Backups),
}

/// Project selection shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Hexadecimal string that identifies the project to use.
    /// Defaults to the project of the profile, you are prompted when neither is set.
    #[arg(long = "projectId", value_parser = parse_object_id)]
    pub project_id: Option<String>,
}

/// Flags shared by all watch commands.
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Maximum time to watch before giving up, e.g. 30s, 10m or 1h.
    /// Watches until the resource reaches a final state when not set.
    #[arg(long = "watchTimeout", value_parser = parse_duration)]
    pub watch_timeout: Option<Duration>,
}

fn parse_duration(input: &str) -> Result<Duration, String> {
    duration_str::parse(input).map_err(|e| e.to_string())
}
