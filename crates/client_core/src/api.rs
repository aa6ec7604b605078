//! HTTP contract with the remote patent backend.
//!
//! Two endpoint families exist: the staged workflow under `/api/v1/...` and
//! the one-shot dashboard under `/api/...`. They may live on different
//! origins, so [`HttpBackend`] keeps a base url for each.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{IdeaId, SummaryId},
    error::ApiException,
    protocol::{
        BlockchainRegistrationRequest, BlockchainRegistrationResponse, Certificate,
        GenerateSummaryResponse, PatentRecord, PatentSubmissionRequest, PatentSubmissionResponse,
        RegisterRequest, RegisterResponse, SubmitIdeaRequest, SubmitIdeaResponse, SummaryDetails,
    },
};
use tracing::debug;
use url::Url;

use crate::{
    config::{validate_base_url, Settings},
    error::{ClientError, Result},
};

const WORKFLOW_PREFIX: [&str; 2] = ["api", "v1"];
const DASHBOARD_PREFIX: [&str; 1] = ["api"];

#[async_trait]
pub trait PatentBackend: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse>;
    async fn submit_idea(&self, request: &SubmitIdeaRequest) -> Result<SubmitIdeaResponse>;
    async fn generate_summary(&self, idea_id: &IdeaId) -> Result<GenerateSummaryResponse>;
    async fn fetch_summary(&self, summary_id: &SummaryId) -> Result<SummaryDetails>;
    async fn register_proof(&self, summary_id: &SummaryId) -> Result<()>;
    async fn fetch_certificate(&self, summary_id: &SummaryId) -> Result<Certificate>;
    async fn idea_status(&self, idea_id: &IdeaId) -> Result<()>;
    async fn health(&self) -> Result<()>;
}

#[async_trait]
pub trait DashboardBackend: Send + Sync {
    async fn submit_patent(
        &self,
        request: &PatentSubmissionRequest,
    ) -> Result<PatentSubmissionResponse>;
    async fn register_blockchain(
        &self,
        request: &BlockchainRegistrationRequest,
    ) -> Result<BlockchainRegistrationResponse>;
    async fn list_patents(&self) -> Result<Vec<PatentRecord>>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    api_base: Url,
    dashboard_base: Url,
}

impl HttpBackend {
    pub fn new(api_base_url: &str, dashboard_base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            api_base: parse_base("api_base_url", api_base_url)?,
            dashboard_base: parse_base("dashboard_base_url", dashboard_base_url)?,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.api_base_url, &settings.dashboard_base_url)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base.as_str()
    }

    pub fn dashboard_base_url(&self) -> &str {
        self.dashboard_base.as_str()
    }

    fn workflow_url(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.api_base, &WORKFLOW_PREFIX, segments)
    }

    fn dashboard_url(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.dashboard_base, &DASHBOARD_PREFIX, segments)
    }
}

fn parse_base(key: &'static str, raw: &str) -> Result<Url> {
    validate_base_url(key, raw).map_err(|err| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}

/// Appends path segments to `base`, percent-encoding each one so opaque ids
/// can never escape their slot.
fn endpoint(base: &Url, prefix: &[&str], segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidBaseUrl {
            url: base.to_string(),
            reason: "url cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .extend(prefix)
        .extend(segments);
    Ok(url)
}

async fn send_raw(request: RequestBuilder) -> Result<String> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        debug!(status = status.as_u16(), "backend rejected request");
        return Err(ApiException::from_body(status.as_u16(), &body).into());
    }
    Ok(body)
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let body = send_raw(request).await?;
    Ok(serde_json::from_str(&body)?)
}

/// For calls whose body is only an acknowledgement.
async fn send_ack(request: RequestBuilder) -> Result<()> {
    send_raw(request).await.map(|_| ())
}

#[async_trait]
impl PatentBackend for HttpBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        let url = self.workflow_url(&["register"])?;
        send_json(self.http.post(url).json(request)).await
    }

    async fn submit_idea(&self, request: &SubmitIdeaRequest) -> Result<SubmitIdeaResponse> {
        let url = self.workflow_url(&["submit-idea"])?;
        send_json(self.http.post(url).json(request)).await
    }

    async fn generate_summary(&self, idea_id: &IdeaId) -> Result<GenerateSummaryResponse> {
        let url = self.workflow_url(&["generate-summary", idea_id.as_str()])?;
        send_json(self.http.post(url)).await
    }

    async fn fetch_summary(&self, summary_id: &SummaryId) -> Result<SummaryDetails> {
        let url = self.workflow_url(&["summary", summary_id.as_str()])?;
        send_json(self.http.get(url)).await
    }

    async fn register_proof(&self, summary_id: &SummaryId) -> Result<()> {
        let url = self.workflow_url(&["register-proof", summary_id.as_str()])?;
        send_ack(self.http.post(url)).await
    }

    async fn fetch_certificate(&self, summary_id: &SummaryId) -> Result<Certificate> {
        let url = self.workflow_url(&["certificate", summary_id.as_str()])?;
        send_json(self.http.get(url)).await
    }

    async fn idea_status(&self, idea_id: &IdeaId) -> Result<()> {
        let url = self.workflow_url(&["status", idea_id.as_str()])?;
        send_ack(self.http.get(url)).await
    }

    async fn health(&self) -> Result<()> {
        let url = self.workflow_url(&["health"])?;
        send_ack(self.http.get(url)).await
    }
}

#[async_trait]
impl DashboardBackend for HttpBackend {
    async fn submit_patent(
        &self,
        request: &PatentSubmissionRequest,
    ) -> Result<PatentSubmissionResponse> {
        let url = self.dashboard_url(&["submit"])?;
        send_json(self.http.post(url).json(request)).await
    }

    async fn register_blockchain(
        &self,
        request: &BlockchainRegistrationRequest,
    ) -> Result<BlockchainRegistrationResponse> {
        let url = self.dashboard_url(&["register-blockchain"])?;
        send_json(self.http.post(url).json(request)).await
    }

    async fn list_patents(&self) -> Result<Vec<PatentRecord>> {
        let url = self.dashboard_url(&["patents"])?;
        send_json(self.http.get(url)).await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
