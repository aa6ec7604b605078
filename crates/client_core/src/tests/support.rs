//! Test doubles shared by the controller and HTTP contract tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{IdeaId, PatentId, SummaryId, UserId},
    error::ApiException,
    protocol::{
        BlockchainRegistrationRequest, BlockchainRegistrationResponse, Certificate,
        GenerateSummaryResponse, PatentRecord, PatentSubmissionRequest, PatentSubmissionResponse,
        RegisterRequest, RegisterResponse, SubmitIdeaRequest, SubmitIdeaResponse, SummaryDetails,
    },
};
use tokio::net::TcpListener;

use crate::{
    api::{DashboardBackend, PatentBackend},
    error::{ClientError, Result},
};

pub fn sample_summary() -> SummaryDetails {
    SummaryDetails {
        title: "Self-cleaning solar hinge".to_string(),
        problem: "Dust lowers panel output".to_string(),
        solution: "A vibrating hinge sheds dust".to_string(),
        claim: "A hinge comprising a piezo actuator".to_string(),
        cpc_code: "H02S40/10".to_string(),
    }
}

pub fn sample_certificate() -> Certificate {
    Certificate {
        hash: "9f86d081884c7d65".to_string(),
        timestamp: "2024-05-01T10:00:00Z".to_string(),
        explorer_url: "https://hashscan.io/testnet/transaction/0.0.1-1".to_string(),
    }
}

/// In-memory backend: records every call, answers from fixed fixtures and
/// fails the calls named in `failures` with the scripted error.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, VecDeque<(u16, Option<String>)>>>,
    pub patents: Mutex<Vec<PatentRecord>>,
    pub last_register: Mutex<Option<RegisterRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes the next call to `operation` fail once with `status`.
    pub fn fail_next(&self, operation: &'static str, status: u16, message: Option<&str>) {
        self.failures
            .lock()
            .expect("failures lock")
            .entry(operation)
            .or_default()
            .push_back((status, message.map(str::to_string)));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(operation.to_string());
        let scripted = self
            .failures
            .lock()
            .expect("failures lock")
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some((status, message)) => Err(ClientError::Api(ApiException::new(status, message))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PatentBackend for ScriptedBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        self.record("register")?;
        *self.last_register.lock().expect("register lock") = Some(request.clone());
        Ok(RegisterResponse {
            user_id: UserId::new("user-1"),
        })
    }

    async fn submit_idea(&self, _request: &SubmitIdeaRequest) -> Result<SubmitIdeaResponse> {
        self.record("submit_idea")?;
        Ok(SubmitIdeaResponse {
            idea_id: IdeaId::new("idea-1"),
        })
    }

    async fn generate_summary(&self, _idea_id: &IdeaId) -> Result<GenerateSummaryResponse> {
        self.record("generate_summary")?;
        Ok(GenerateSummaryResponse {
            summary_id: SummaryId::new("summary-1"),
        })
    }

    async fn fetch_summary(&self, _summary_id: &SummaryId) -> Result<SummaryDetails> {
        self.record("fetch_summary")?;
        Ok(sample_summary())
    }

    async fn register_proof(&self, _summary_id: &SummaryId) -> Result<()> {
        self.record("register_proof")
    }

    async fn fetch_certificate(&self, _summary_id: &SummaryId) -> Result<Certificate> {
        self.record("fetch_certificate")?;
        Ok(sample_certificate())
    }

    async fn idea_status(&self, _idea_id: &IdeaId) -> Result<()> {
        self.record("idea_status")
    }

    async fn health(&self) -> Result<()> {
        self.record("health")
    }
}

#[async_trait]
impl DashboardBackend for ScriptedBackend {
    async fn submit_patent(
        &self,
        _request: &PatentSubmissionRequest,
    ) -> Result<PatentSubmissionResponse> {
        self.record("submit_patent")?;
        Ok(PatentSubmissionResponse {
            patent_id: PatentId::new("patent-1"),
            message: None,
            structured_patent: None,
        })
    }

    async fn register_blockchain(
        &self,
        _request: &BlockchainRegistrationRequest,
    ) -> Result<BlockchainRegistrationResponse> {
        self.record("register_blockchain")?;
        Ok(BlockchainRegistrationResponse {
            transaction_hash: "0.0.1234@1714557600.000".to_string(),
        })
    }

    async fn list_patents(&self) -> Result<Vec<PatentRecord>> {
        self.record("list_patents")?;
        Ok(self.patents.lock().expect("patents lock").clone())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<HashMap<(Method, String), (StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Loopback HTTP backend answering canned bodies per method and path.
pub struct MockServer {
    pub url: String,
    state: MockState,
}

impl MockServer {
    pub async fn spawn() -> Self {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let state = MockState::default();
        let app = Router::new()
            .fallback(handle_any)
            .with_state(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.respond_raw(method, path, status, body.to_string());
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: StatusCode, body: String) {
        self.state
            .responses
            .lock()
            .expect("responses lock")
            .insert((method, path.to_string()), (status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }
}

async fn handle_any(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    let parsed = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            body: parsed,
        });

    state
        .responses
        .lock()
        .expect("responses lock")
        .get(&(method, path))
        .cloned()
        .unwrap_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                json!({ "message": "Not found" }).to_string(),
            )
        })
}
