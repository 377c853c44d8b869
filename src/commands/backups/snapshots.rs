use std::fmt::Display;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    args,
    commands::{CommandWithOutput, watch::WatchContext, with_atlas::TryFromWithAtlasClient},
    config::Profile,
    dependencies::{AtlasClient, SnapshotDescriber},
    models::Snapshot,
    watcher::WatchStatus,
};

pub struct Watch {
    cluster_name: String,
    snapshot_id: String,

    context: WatchContext,
    snapshot_describer: Box<dyn SnapshotDescriber + Send + Sync>,
}

impl TryFromWithAtlasClient<args::SnapshotWatch> for Watch {
    fn try_from_with_atlas_client(
        args: args::SnapshotWatch,
        profile: &Profile,
        client: AtlasClient,
    ) -> Result<Self> {
        Ok(Self {
            cluster_name: args.cluster_name,
            snapshot_id: args.snapshot_id,
            context: WatchContext::new(args.project, args.watch, profile),
            snapshot_describer: Box::new(client),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WatchResult {
    Completed { snapshot: Snapshot },
    Failed { snapshot: Snapshot },
}

impl Display for WatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchResult::Completed { .. } => write!(f, "Snapshot changes completed."),
            WatchResult::Failed { snapshot } => write!(f, "Snapshot '{}' failed.", snapshot.id),
        }
    }
}

#[async_trait]
impl CommandWithOutput for Watch {
    type Output = WatchResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        let project_id = self.context.project_id()?;
        debug!(
            project_id = %project_id,
            cluster_name = %self.cluster_name,
            snapshot_id = %self.snapshot_id,
            "watching snapshot"
        );

        let describer = &self.snapshot_describer;
        let project_id = project_id.as_str();
        let cluster_name = self.cluster_name.as_str();
        let snapshot_id = self.snapshot_id.as_str();

        let snapshot = self
            .context
            .watch("Waiting for snapshot to complete...", || async move {
                let snapshot = describer
                    .describe_snapshot(project_id, cluster_name, snapshot_id)
                    .await?;
                trace!(status = %snapshot.status, "snapshot status");

                let done = snapshot.is_terminal();
                Ok(WatchStatus::from_done(snapshot, done))
            })
            .await?;

        if snapshot.is_failed() {
            return Ok(WatchResult::Failed { snapshot });
        }

        Ok(WatchResult::Completed { snapshot })
    }
}
