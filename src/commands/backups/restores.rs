use std::fmt::Display;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    args,
    commands::{CommandWithOutput, watch::WatchContext, with_atlas::TryFromWithAtlasClient},
    config::Profile,
    dependencies::{AtlasClient, RestoreJobDescriber},
    models::RestoreJob,
    watcher::WatchStatus,
};

pub struct Watch {
    cluster_name: String,
    restore_job_id: String,

    context: WatchContext,
    restore_job_describer: Box<dyn RestoreJobDescriber + Send + Sync>,
}

impl TryFromWithAtlasClient<args::RestoreWatch> for Watch {
    fn try_from_with_atlas_client(
        args: args::RestoreWatch,
        profile: &Profile,
        client: AtlasClient,
    ) -> Result<Self> {
        Ok(Self {
            cluster_name: args.cluster_name,
            restore_job_id: args.restore_job_id,
            context: WatchContext::new(args.project, args.watch, profile),
            restore_job_describer: Box::new(client),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "outcome",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum WatchResult {
    Finished {
        restore_job: RestoreJob,
    },
    /// The restore job was cancelled, expired or failed.
    Failed {
        restore_job: RestoreJob,
        reason: String,
    },
}

impl Display for WatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchResult::Finished { .. } => write!(f, "Restore completed."),
            WatchResult::Failed {
                restore_job,
                reason,
            } => write!(f, "Restore job '{}' {reason}.", restore_job.id),
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
            restore_job_id = %self.restore_job_id,
            "watching restore job"
        );

        let describer = &self.restore_job_describer;
        let project_id = project_id.as_str();
        let cluster_name = self.cluster_name.as_str();
        let restore_job_id = self.restore_job_id.as_str();

        let restore_job = self
            .context
            .watch("Waiting for restore to complete...", || async move {
                let restore_job = describer
                    .describe_restore_job(project_id, cluster_name, restore_job_id)
                    .await?;
                trace!(?restore_job, "restore job");

                let done = restore_job.is_terminal();
                Ok(WatchStatus::from_done(restore_job, done))
            })
            .await?;

        match restore_job.failure_reason() {
            Some(reason) => Ok(WatchResult::Failed {
                reason: reason.to_string(),
                restore_job,
            }),
            None => Ok(WatchResult::Finished { restore_job }),
        }
    }
}
