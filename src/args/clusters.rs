use clap::{Args, Subcommand};

use super::{ProjectArgs, WatchArgs};

#[derive(Subcommand)]
pub enum Clusters {
    /// Watch the specified cluster in your project until it becomes available.
    ///
    /// This command checks the cluster's status periodically until it reaches an IDLE state.
    /// Once the cluster reaches the expected state, the command prints "Cluster available."
    Watch(ClusterWatch),
    /// Manage Atlas Search for your cluster.
    #[command(subcommand)]
    Search(Search),
}

#[derive(Args)]
pub struct ClusterWatch {
    /// Name of the cluster to watch.
    #[arg(index = 1)]
    pub cluster_name: String,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub watch: WatchArgs,
}

#[derive(Subcommand)]
pub enum Search {
    /// Manage Atlas Search nodes for your cluster.
    #[command(subcommand)]
    Nodes(Nodes),
}

#[derive(Subcommand)]
pub enum Nodes {
    /// Watch the search nodes of a cluster until they are IDLE.
    Watch(SearchNodesWatch),
}

#[derive(Args)]
pub struct SearchNodesWatch {
    /// Name of the cluster that runs the search nodes.
    #[arg(long = "clusterName")]
    pub cluster_name: String,

    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub watch: WatchArgs,
}
