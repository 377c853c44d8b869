use std::fmt::Display;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    args,
    commands::{CommandWithOutput, watch::WatchContext, with_atlas::TryFromWithAtlasClient},
    config::Profile,
    dependencies::{AtlasClient, SearchNodesDescriber},
    models::{SearchDeployment, SearchNodeSpec},
    table::{Table, TableColumn},
    watcher::WatchStatus,
};

pub struct Watch {
    cluster_name: String,

    context: WatchContext,
    search_nodes_describer: Box<dyn SearchNodesDescriber + Send + Sync>,
}

impl TryFromWithAtlasClient<args::SearchNodesWatch> for Watch {
    fn try_from_with_atlas_client(
        args: args::SearchNodesWatch,
        profile: &Profile,
        client: AtlasClient,
    ) -> Result<Self> {
        Ok(Self {
            cluster_name: args.cluster_name,
            context: WatchContext::new(args.project, args.watch, profile),
            search_nodes_describer: Box::new(client),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WatchResult {
    Ready { deployment: SearchDeployment },
}

const SPEC_COLUMNS: &[TableColumn<&str, SearchNodeSpec>] = &[
    ("INSTANCE SIZE", |spec| spec.instance_size.clone()),
    ("NODE COUNT", |spec| spec.node_count.to_string()),
];

impl Display for WatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchResult::Ready { deployment } => {
                writeln!(f, "Search nodes are ready.")?;
                write!(f, "{}", Table::from_iter(&deployment.specs, SPEC_COLUMNS))
            }
        }
    }
}

#[async_trait]
impl CommandWithOutput for Watch {
    type Output = WatchResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        let project_id = self.context.project_id()?;
        debug!(project_id = %project_id, cluster_name = %self.cluster_name, "watching search nodes");

        let describer = &self.search_nodes_describer;
        let project_id = project_id.as_str();
        let cluster_name = self.cluster_name.as_str();

        let deployment = self
            .context
            .watch("Waiting for search nodes to be ready...", || async move {
                let deployment = describer
                    .describe_search_nodes(project_id, cluster_name)
                    .await?;
                trace!(state = %deployment.state_name, "search deployment state");

                let done = deployment.is_idle();
                Ok(WatchStatus::from_done(deployment, done))
            })
            .await?;

        Ok(WatchResult::Ready { deployment })
    }
}
