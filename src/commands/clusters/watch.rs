use std::fmt::Display;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    args,
    commands::{CommandWithOutput, watch::WatchContext, with_atlas::TryFromWithAtlasClient},
    config::Profile,
    dependencies::{AtlasClient, ClusterDescriber},
    models::Cluster,
    watcher::WatchStatus,
};

pub struct Watch {
    cluster_name: String,

    context: WatchContext,
    cluster_describer: Box<dyn ClusterDescriber + Send + Sync>,
}

impl TryFromWithAtlasClient<args::ClusterWatch> for Watch {
    fn try_from_with_atlas_client(
        args: args::ClusterWatch,
        profile: &Profile,
        client: AtlasClient,
    ) -> Result<Self> {
        Ok(Self {
            cluster_name: args.cluster_name,
            context: WatchContext::new(args.project, args.watch, profile),
            cluster_describer: Box::new(client),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WatchResult {
    Available { cluster: Cluster },
}

impl Display for WatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchResult::Available { .. } => write!(f, "Cluster available."),
        }
    }
}

#[async_trait]
impl CommandWithOutput for Watch {
    type Output = WatchResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        let project_id = self.context.project_id()?;
        debug!(project_id = %project_id, cluster_name = %self.cluster_name, "watching cluster");

        let describer = &self.cluster_describer;
        let project_id = project_id.as_str();
        let cluster_name = self.cluster_name.as_str();

        let cluster = self
            .context
            .watch("Waiting for cluster to be available...", || async move {
                let cluster = describer.describe_cluster(project_id, cluster_name).await?;
                trace!(state = %cluster.state_name, "cluster state");

                let done = cluster.is_idle();
                Ok(WatchStatus::from_done(cluster, done))
            })
            .await?;

        Ok(WatchResult::Available { cluster })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        commands::watch::test_helpers::spinner_interaction,
        dependencies::mocks::MockAtlas,
        formatting::{Format, Formattable},
        interaction::{InputPromptResult, mocks::MockInteraction},
        watcher::{WatchError, WatchOptions},
    };
    use anyhow::anyhow;
    use mockall::Sequence;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    const PROJECT_ID: &str = "5e2211c17a3e5a48f5497de3";
    const SPINNER: &str = "Waiting for cluster to be available...";

    fn cluster(state: &str) -> Cluster {
        Cluster {
            name: "Cluster0".to_string(),
            state_name: state.to_string(),
            mongo_db_version: Some("8.0.4".to_string()),
        }
    }

    fn create_command(context: WatchContext, describer: MockAtlas) -> Watch {
        Watch {
            cluster_name: "Cluster0".to_string(),
            context,
            cluster_describer: Box::new(describer),
        }
    }

    fn describer_with_states(states: &[&'static str]) -> MockAtlas {
        let mut describer = MockAtlas::new();
        let mut seq = Sequence::new();
        for &state in states {
            describer
                .expect_describe_cluster()
                .withf(|project_id, cluster_name| {
                    project_id == PROJECT_ID && cluster_name == "Cluster0"
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _| Ok(cluster(state)));
        }
        describer
    }

    #[tokio::test]
    async fn test_watch_until_idle() {
        let describer = describer_with_states(&["CREATING", "UPDATING", "IDLE"]);
        let context = WatchContext::for_test(Some(PROJECT_ID), spinner_interaction(SPINNER));
        let mut command = create_command(context, describer);

        let result = command.execute().await.unwrap();

        assert_eq!(
            result,
            WatchResult::Available {
                cluster: cluster("IDLE")
            }
        );
        assert_eq!(result.to_string(), "Cluster available.");
    }

    #[tokio::test]
    async fn test_already_idle_probes_once() {
        let describer = describer_with_states(&["IDLE"]);
        let context = WatchContext::for_test(Some(PROJECT_ID), spinner_interaction(SPINNER));
        let mut command = create_command(context, describer);

        let result = command.execute().await.unwrap();

        assert!(matches!(result, WatchResult::Available { .. }));
    }

    #[tokio::test]
    async fn test_describe_error_after_pending_stops_the_watch() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();
        let mut describer = MockAtlas::new();
        describer.expect_describe_cluster().returning(move |_, _| {
            if calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(cluster("UPDATING"))
            } else {
                Err(anyhow!("HTTP 404 (Error code: \"CLUSTER_NOT_FOUND\")"))
            }
        });
        let context = WatchContext::for_test(Some(PROJECT_ID), spinner_interaction(SPINNER));
        let mut command = create_command(context, describer);

        let err = command.execute().await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "HTTP 404 (Error code: \"CLUSTER_NOT_FOUND\")"
        );
        // The error is not retried.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_max_attempts() {
        let mut describer = MockAtlas::new();
        describer
            .expect_describe_cluster()
            .times(2)
            .returning(|_, _| Ok(cluster("REPAIRING")));
        let context = WatchContext::for_test(Some(PROJECT_ID), spinner_interaction(SPINNER))
            .with_options(
                WatchOptions::builder()
                    .interval(std::time::Duration::from_millis(10))
                    .max_attempts(2)
                    .build(),
            );
        let mut command = create_command(context, describer);

        let err = command.execute().await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<WatchError>(),
            Some(WatchError::AttemptsExhausted { attempts: 2 })
        ));
    }

    #[tokio::test]
    async fn test_prompts_for_project_id() {
        let mut interaction: MockInteraction = spinner_interaction(SPINNER);
        interaction
            .expect_input()
            .return_once(|_| Ok(InputPromptResult::Input(PROJECT_ID.to_string())));
        let describer = describer_with_states(&["IDLE"]);
        let context = WatchContext::for_test(None, interaction);
        let mut command = create_command(context, describer);

        assert!(command.execute().await.is_ok());
    }

    #[test]
    fn test_json_output() {
        let result = WatchResult::Available {
            cluster: cluster("IDLE"),
        };

        assert_eq!(
            result.format(Format::Json).unwrap(),
            r#"{
  "outcome": "available",
  "cluster": {
    "name": "Cluster0",
    "stateName": "IDLE",
    "mongoDBVersion": "8.0.4"
  }
}"#
        );
    }
}
