//! Atlas Admin API resources read by the watch commands.
//!
//! Only the fields the commands need are modeled, unknown fields are ignored.
//! Each resource knows which of its states are terminal, the watcher itself does not.
use serde::{Deserialize, Serialize};

/// Snapshot status once the snapshot was taken successfully.
pub const SNAPSHOT_STATUS_COMPLETED: &str = "completed";
/// Snapshot status once taking the snapshot failed.
pub const SNAPSHOT_STATUS_FAILED: &str = "failed";
/// Compliance policy state once the policy is enforced.
pub const COMPLIANCE_POLICY_STATE_ACTIVE: &str = "ACTIVE";
/// Cluster and search deployment state once no changes are in progress.
pub const STATE_IDLE: &str = "IDLE";

/// Cloud backup snapshot of a replica set or sharded cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    /// One of `queued`, `inProgress`, `completed` or `failed`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Snapshot {
    pub fn is_terminal(&self) -> bool {
        self.status == SNAPSHOT_STATUS_COMPLETED || self.status == SNAPSHOT_STATUS_FAILED
    }

    pub fn is_failed(&self) -> bool {
        self.status == SNAPSHOT_STATUS_FAILED
    }
}

/// Cloud backup restore job.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreJob {
    pub id: String,
    /// One of `automated`, `download` or `pointInTime`.
    pub delivery_type: String,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

impl RestoreJob {
    /// A restore job is done once it finished, or once it can no longer finish.
    pub fn is_terminal(&self) -> bool {
        self.cancelled || self.expired || self.failed || self.finished_at.is_some()
    }

    /// Reason the restore job did not succeed, if it did not.
    pub fn failure_reason(&self) -> Option<&'static str> {
        if self.failed {
            Some("failed")
        } else if self.cancelled {
            Some("cancelled")
        } else if self.expired {
            Some("expired")
        } else {
            None
        }
    }
}

/// Backup compliance policy of a project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompliancePolicy {
    pub project_id: String,
    /// One of `ACTIVE`, `ENABLING`, `UPDATING` or `DISABLING`.
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_email: Option<String>,
}

impl CompliancePolicy {
    pub fn is_active(&self) -> bool {
        self.state == COMPLIANCE_POLICY_STATE_ACTIVE
    }
}

/// Atlas cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub name: String,
    /// One of `IDLE`, `CREATING`, `UPDATING`, `DELETING` or `REPAIRING`.
    pub state_name: String,
    #[serde(
        default,
        rename = "mongoDBVersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub mongo_db_version: Option<String>,
}

impl Cluster {
    pub fn is_idle(&self) -> bool {
        self.state_name == STATE_IDLE
    }
}

/// Search nodes deployment of a cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDeployment {
    pub id: String,
    /// One of `IDLE`, `UPDATING` or `PAUSED`.
    pub state_name: String,
    #[serde(default)]
    pub specs: Vec<SearchNodeSpec>,
}

impl SearchDeployment {
    pub fn is_idle(&self) -> bool {
        self.state_name == STATE_IDLE
    }
}

/// Hardware specification of one group of search nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNodeSpec {
    pub instance_size: String,
    pub node_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot_ignores_unknown_fields() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{
                "id": "6548b2f4b9e1e73b3d1b2e11",
                "status": "inProgress",
                "snapshotType": "onDemand",
                "createdAt": "2024-11-06T09:30:12Z",
                "storageSizeBytes": 1024,
                "links": []
            }"#,
        )
        .unwrap();

        assert_eq!(
            snapshot,
            Snapshot {
                id: "6548b2f4b9e1e73b3d1b2e11".to_string(),
                status: "inProgress".to_string(),
                snapshot_type: Some("onDemand".to_string()),
                created_at: Some("2024-11-06T09:30:12Z".to_string()),
                description: None,
            }
        );
        assert!(!snapshot.is_terminal());
    }

    #[test]
    fn test_snapshot_terminal_statuses() {
        let snapshot = |status: &str| Snapshot {
            status: status.to_string(),
            ..Default::default()
        };

        assert!(snapshot("completed").is_terminal());
        assert!(snapshot("failed").is_terminal());
        assert!(snapshot("failed").is_failed());
        assert!(!snapshot("queued").is_terminal());
        assert!(!snapshot("inProgress").is_terminal());
    }

    #[test]
    fn test_restore_job_terminal() {
        let running = RestoreJob {
            id: "job".to_string(),
            delivery_type: "automated".to_string(),
            ..Default::default()
        };
        assert!(!running.is_terminal());
        assert_eq!(running.failure_reason(), None);

        let finished = RestoreJob {
            finished_at: Some("2024-11-06T09:30:12Z".to_string()),
            ..running.clone()
        };
        assert!(finished.is_terminal());
        assert_eq!(finished.failure_reason(), None);

        let expired = RestoreJob {
            expired: true,
            ..running.clone()
        };
        assert!(expired.is_terminal());
        assert_eq!(expired.failure_reason(), Some("expired"));

        let cancelled = RestoreJob {
            cancelled: true,
            ..running
        };
        assert!(cancelled.is_terminal());
        assert_eq!(cancelled.failure_reason(), Some("cancelled"));
    }

    #[test]
    fn test_deserialize_search_deployment() {
        let deployment: SearchDeployment = serde_json::from_str(
            r#"{
                "id": "65a1f0e4c8b2d13b7a9e4f21",
                "stateName": "UPDATING",
                "specs": [{ "instanceSize": "S20_HIGHCPU_NVME", "nodeCount": 2 }]
            }"#,
        )
        .unwrap();

        assert!(!deployment.is_idle());
        assert_eq!(
            deployment.specs,
            vec![SearchNodeSpec {
                instance_size: "S20_HIGHCPU_NVME".to_string(),
                node_count: 2,
            }]
        );
    }

    #[test]
    fn test_serialize_cluster_uses_camel_case() {
        let cluster = Cluster {
            name: "Cluster0".to_string(),
            state_name: "IDLE".to_string(),
            mongo_db_version: Some("8.0.3".to_string()),
        };

        assert_eq!(
            serde_json::to_string(&cluster).unwrap(),
            r#"{"name":"Cluster0","stateName":"IDLE","mongoDBVersion":"8.0.3"}"#
        );
        assert!(cluster.is_idle());
    }
}
