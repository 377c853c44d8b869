//! This module contains business logic for the commands for the application.
//!
//! The main entry point is the [`command_from_args`] function which converts CLI arguments into a command.
use anyhow::Result;

use crate::{
    args::{AtlasArgs, Backups, Clusters, CompliancePolicy, Nodes, Restores, Search, Snapshots},
    commands::with_atlas::WithAtlasClient,
    config::Profile,
    formatting::Format,
};
pub use core::{Command, CommandWithOutput, CommandWithOutputExt};

pub mod backups;
pub mod clusters;
mod core;
pub mod validators;
mod watch;
mod with_atlas;

/// Convert CLI arguments into a command.
///
/// Commands talk to Atlas using the connection settings of `profile`.
/// The output of the command will be formatted using the provided format and printed to stdout.
pub fn command_from_args(
    args: AtlasArgs,
    profile: &Profile,
    format: Format,
) -> Result<Box<dyn Command>> {
    match args {
        AtlasArgs::Clusters(clusters_args) => match clusters_args {
            Clusters::Watch(watch_args) => {
                clusters::watch::Watch::with_atlas_client(watch_args, profile)?
                    .with_print_to_stdout(format)
            }
            Clusters::Search(Search::Nodes(Nodes::Watch(watch_args))) => {
                clusters::search_nodes::Watch::with_atlas_client(watch_args, profile)?
                    .with_print_to_stdout(format)
            }
        },
        AtlasArgs::Backups(backups_args) => backups_command_from_args(backups_args, profile, format),
    }
}

fn backups_command_from_args(
    args: Backups,
    profile: &Profile,
    format: Format,
) -> Result<Box<dyn Command>> {
    match args {
        Backups::Snapshots(Snapshots::Watch(watch_args)) => {
            backups::snapshots::Watch::with_atlas_client(watch_args, profile)?
                .with_print_to_stdout(format)
        }
        Backups::Restores(Restores::Watch(watch_args)) => {
            backups::restores::Watch::with_atlas_client(watch_args, profile)?
                .with_print_to_stdout(format)
        }
        Backups::CompliancePolicy(CompliancePolicy::Watch(watch_args)) => {
            backups::compliance_policy::Watch::with_atlas_client(watch_args, profile)?
                .with_print_to_stdout(format)
        }
    }
}
