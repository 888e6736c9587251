use crate::config::Endpoints;
use crate::domain::{ApiResponse, FamilyTreeData, MemberDetail};
use crate::error::FetchError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Source of extended member records. The seam the detail panel is driven through.
pub trait DetailFetcher: Send + Sync + 'static {
    fn fetch_detail(
        &self,
        member_id: &str,
    ) -> impl Future<Output = Result<MemberDetail, FetchError>> + Send;
}

/// Source of the flat member list for a tree.
pub trait TreeFetcher: Send + Sync + 'static {
    fn fetch_tree(
        &self,
        tree_id: &str,
    ) -> impl Future<Output = Result<FamilyTreeData, FetchError>> + Send;
}

/// HTTP client for the family backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }

    /// `GET /v1/family/tree/{treeId}`. A null `data` envelope is `EmptyData`.
    pub async fn get_tree(&self, tree_id: &str) -> Result<FamilyTreeData, FetchError> {
        let url = self.endpoints.family_tree(tree_id);
        let envelope: ApiResponse<FamilyTreeData> = self.get_json(&url).await?;
        envelope.data.ok_or(FetchError::EmptyData)
    }

    /// `GET /v1/family/member/{memberId}`. A 404 is `NotFound`.
    pub async fn get_member(&self, member_id: &str) -> Result<MemberDetail, FetchError> {
        let url = self.endpoints.family_member(member_id);
        match self.get_json::<MemberDetail>(&url).await {
            Err(FetchError::Status { status: 404, .. }) => Err(FetchError::NotFound {
                id: member_id.to_string(),
            }),
            Ok(envelope) => envelope.data.ok_or_else(|| FetchError::NotFound {
                id: member_id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<ApiResponse<T>, FetchError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "request rejected");
            return Err(status_error(status, &body));
        }

        Ok(decode_envelope(&body)?)
    }
}

impl DetailFetcher for ApiClient {
    fn fetch_detail(
        &self,
        member_id: &str,
    ) -> impl Future<Output = Result<MemberDetail, FetchError>> + Send {
        let client = self.clone();
        let member_id = member_id.to_string();
        async move { client.get_member(&member_id).await }
    }
}

impl TreeFetcher for ApiClient {
    fn fetch_tree(
        &self,
        tree_id: &str,
    ) -> impl Future<Output = Result<FamilyTreeData, FetchError>> + Send {
        let client = self.clone();
        let tree_id = tree_id.to_string();
        async move { client.get_tree(&tree_id).await }
    }
}

pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<ApiResponse<T>, serde_json::Error> {
    serde_json::from_str(body)
}

/// Non-2xx response, preferring the envelope message over the canonical reason.
fn status_error(status: StatusCode, body: &str) -> FetchError {
    let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .ok()
        .map(|envelope| envelope.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}
