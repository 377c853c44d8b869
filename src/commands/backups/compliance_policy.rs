use std::fmt::Display;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    args,
    commands::{CommandWithOutput, watch::WatchContext, with_atlas::TryFromWithAtlasClient},
    config::Profile,
    dependencies::{AtlasClient, CompliancePolicyDescriber},
    models::CompliancePolicy,
    watcher::WatchStatus,
};

pub struct Watch {
    context: WatchContext,
    policy_describer: Box<dyn CompliancePolicyDescriber + Send + Sync>,
}

impl TryFromWithAtlasClient<args::CompliancePolicyWatch> for Watch {
    fn try_from_with_atlas_client(
        args: args::CompliancePolicyWatch,
        profile: &Profile,
        client: AtlasClient,
    ) -> Result<Self> {
        Ok(Self {
            context: WatchContext::new(args.project, args.watch, profile),
            policy_describer: Box::new(client),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WatchResult {
    Active { policy: CompliancePolicy },
}

impl Display for WatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchResult::Active { .. } => {
                write!(f, "Backup compliance policy changes completed.")
            }
        }
    }
}

#[async_trait]
impl CommandWithOutput for Watch {
    type Output = WatchResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        let project_id = self.context.project_id()?;
        debug!(project_id = %project_id, "watching backup compliance policy");

        let describer = &self.policy_describer;
        let project_id = project_id.as_str();

        let policy = self
            .context
            .watch(
                "Waiting for the backup compliance policy to be active...",
                || async move {
                    let policy = describer.describe_compliance_policy(project_id).await?;
                    trace!(state = %policy.state, "compliance policy state");

                    let done = policy.is_active();
                    Ok(WatchStatus::from_done(policy, done))
                },
            )
            .await?;

        Ok(WatchResult::Active { policy })
    }
}
