//! Read-only access to the Atlas Admin API.
//!
//! Every remote call the commands make goes through one of the small traits below, so that commands can be
//! tested against mocks. [`AtlasClient`] implements all of them on top of `reqwest`.
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

use crate::{
    config::Profile,
    models::{Cluster, CompliancePolicy, RestoreJob, SearchDeployment, Snapshot},
};

const API_PATH: &[&str] = &["api", "atlas", "v2"];
const USER_AGENT: &str = concat!("atlas-cli/", env!("CARGO_PKG_VERSION"));

// Versions of the versioned Admin API, sent in the Accept header.
const API_VERSION: &str = "2023-01-01";
const COMPLIANCE_POLICY_API_VERSION: &str = "2023-10-01";
const SEARCH_DEPLOYMENT_API_VERSION: &str = "2024-05-30";

#[async_trait]
pub trait SnapshotDescriber {
    async fn describe_snapshot(
        &self,
        project_id: &str,
        cluster_name: &str,
        snapshot_id: &str,
    ) -> Result<Snapshot>;
}

#[async_trait]
pub trait RestoreJobDescriber {
    async fn describe_restore_job(
        &self,
        project_id: &str,
        cluster_name: &str,
        restore_job_id: &str,
    ) -> Result<RestoreJob>;
}

#[async_trait]
pub trait CompliancePolicyDescriber {
    async fn describe_compliance_policy(&self, project_id: &str) -> Result<CompliancePolicy>;
}

#[async_trait]
pub trait ClusterDescriber {
    async fn describe_cluster(&self, project_id: &str, cluster_name: &str) -> Result<Cluster>;
}

#[async_trait]
pub trait SearchNodesDescriber {
    async fn describe_search_nodes(
        &self,
        project_id: &str,
        cluster_name: &str,
    ) -> Result<SearchDeployment>;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("HTTP {status}{}", api_error_details(.error_code, .detail))]
    Api {
        status: u16,
        error_code: Option<String>,
        detail: Option<String>,
    },
    #[error("base URL '{0}' cannot have a path")]
    InvalidBaseUrl(String),
}

fn api_error_details(error_code: &Option<String>, detail: &Option<String>) -> String {
    let mut details = String::new();
    if let Some(error_code) = error_code {
        details.push_str(&format!(" (Error code: \"{error_code}\")"));
    }
    if let Some(detail) = detail {
        details.push_str(&format!(" Detail: {detail}"));
    }
    details
}

/// Error document returned by the Admin API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_code: Option<String>,
    detail: Option<String>,
}

/// Atlas Admin API client.
#[derive(Debug, Clone)]
pub struct AtlasClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl AtlasClient {
    pub fn new(base_url: Url, access_token: Option<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            base_url,
            access_token,
        })
    }

    pub fn from_profile(profile: &Profile) -> Result<Self, ApiError> {
        Self::new(profile.base_url.clone(), profile.access_token.clone())
    }

    /// Build `<base url>/api/atlas/v2/<segments>`, percent-encoding every segment.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(API_PATH.iter().chain(segments));

        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], version: &str) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        debug!(%url, version, "GET");

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, format!("application/vnd.atlas.{version}+json"));
        if let Some(access_token) = &self.access_token {
            request = request.bearer_auth(access_token);
        }

        let response = request.send().await?;
        let status = response.status();
        trace!(%status, "response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|error| {
                debug!(%error, "failed to read error response body");
                String::new()
            });
            let ErrorBody { error_code, detail } = serde_json::from_str(&body).unwrap_or_default();

            return Err(ApiError::Api {
                status: status.as_u16(),
                error_code,
                detail,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SnapshotDescriber for AtlasClient {
    async fn describe_snapshot(
        &self,
        project_id: &str,
        cluster_name: &str,
        snapshot_id: &str,
    ) -> Result<Snapshot> {
        self.get(
            &[
                "groups",
                project_id,
                "clusters",
                cluster_name,
                "backup",
                "snapshots",
                snapshot_id,
            ],
            API_VERSION,
        )
        .await
        .with_context(|| format!("describing snapshot '{snapshot_id}'"))
    }
}

#[async_trait]
impl RestoreJobDescriber for AtlasClient {
    async fn describe_restore_job(
        &self,
        project_id: &str,
        cluster_name: &str,
        restore_job_id: &str,
    ) -> Result<RestoreJob> {
        self.get(
            &[
                "groups",
                project_id,
                "clusters",
                cluster_name,
                "backup",
                "restoreJobs",
                restore_job_id,
            ],
            API_VERSION,
        )
        .await
        .with_context(|| format!("describing restore job '{restore_job_id}'"))
    }
}

#[async_trait]
impl CompliancePolicyDescriber for AtlasClient {
    async fn describe_compliance_policy(&self, project_id: &str) -> Result<CompliancePolicy> {
        self.get(
            &["groups", project_id, "backupCompliancePolicy"],
            COMPLIANCE_POLICY_API_VERSION,
        )
        .await
        .context("describing backup compliance policy")
    }
}

#[async_trait]
impl ClusterDescriber for AtlasClient {
    async fn describe_cluster(&self, project_id: &str, cluster_name: &str) -> Result<Cluster> {
        self.get(
            &["groups", project_id, "clusters", cluster_name],
            API_VERSION,
        )
        .await
        .with_context(|| format!("describing cluster '{cluster_name}'"))
    }
}

#[async_trait]
impl SearchNodesDescriber for AtlasClient {
    async fn describe_search_nodes(
        &self,
        project_id: &str,
        cluster_name: &str,
    ) -> Result<SearchDeployment> {
        self.get(
            &[
                "groups",
                project_id,
                "clusters",
                cluster_name,
                "search",
                "deployment",
            ],
            SEARCH_DEPLOYMENT_API_VERSION,
        )
        .await
        .with_context(|| format!("describing search nodes of cluster '{cluster_name}'"))
    }
}
