use clap::{Args, Subcommand};

use super::{ProjectArgs, WatchArgs};

#[derive(Subcommand)]
pub enum Backups {
    /// Manage cloud backup snapshots for your project.
    #[command(subcommand)]
    Snapshots(Snapshots),
    /// Manage cloud backup restore jobs for your project.
    #[command(subcommand)]
    Restores(Restores),
    /// Manage the backup compliance policy for your project.
    #[command(subcommand, name = "compliancepolicy")]
    CompliancePolicy(CompliancePolicy),
}

#[derive(Subcommand)]
pub enum Snapshots {
    /// Watch the specified snapshot in your project until it completes or fails.
    Watch(SnapshotWatch),
}

#[derive(Args)]
pub struct SnapshotWatch {
    /// Unique identifier of the snapshot you want to watch.
    #[arg(index = 1)]
    pub snapshot_id: String,

    /// Name of the Atlas cluster that contains the snapshot.
    #[arg(long = "clusterName")]
    pub cluster_name: String,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub watch: WatchArgs,
}

#[derive(Subcommand)]
pub enum Restores {
    /// Watch the specified restore job until it finishes, fails, expires or is cancelled.
    Watch(RestoreWatch),
}

#[derive(Args)]
pub struct RestoreWatch {
    /// Unique identifier of the restore job.
    #[arg(index = 1)]
    pub restore_job_id: String,

    /// Name of the Atlas cluster that the restore job belongs to.
    #[arg(long = "clusterName")]
    pub cluster_name: String,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub watch: WatchArgs,
}

#[derive(Subcommand)]
pub enum CompliancePolicy {
    /// Watch the backup compliance policy of your project until it is ACTIVE.
    Watch(CompliancePolicyWatch),
}

#[derive(Args)]
pub struct CompliancePolicyWatch {
    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub watch: WatchArgs,
}
