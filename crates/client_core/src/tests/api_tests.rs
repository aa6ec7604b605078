use super::*;
use crate::test_support::MockServer;
use axum::http::{Method, StatusCode};
use serde_json::json;
use shared::domain::{PatentId, PatentStatus, UserId};
use shared::protocol::{PatentInput, SubmitterInfo};

fn registration() -> RegisterRequest {
    RegisterRequest {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: None,
        country: Some("FR".to_string()),
        wallet_address: "0x00000000000000000000000000000000000000aa".to_string(),
    }
}

#[tokio::test]
async fn register_posts_fields_verbatim_with_null_optionals() {
    let server = MockServer::spawn().await;
    server.respond(
        Method::POST,
        "/api/v1/register",
        StatusCode::CREATED,
        json!({ "user_id": "u-42" }),
    );
    let backend = HttpBackend::new(&server.url, &server.url).expect("backend");

    let response = backend.register(&registration()).await.expect("register");
    assert_eq!(response.user_id, UserId::new("u-42"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(
        requests[0].body,
        json!({
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": null,
            "country": "FR",
            "wallet_address": "0x00000000000000000000000000000000000000aa",
        })
    );
}

#[tokio::test]
async fn non_success_status_carries_server_message() {
    let server = MockServer::spawn().await;
    server.respond(
        Method::POST,
        "/api/v1/register",
        StatusCode::CONFLICT,
        json!({ "message": "Email already registered" }),
    );
    let backend = HttpBackend::new(&server.url, &server.url).expect("backend");

    let err = backend
        .register(&registration())
        .await
        .expect_err("must fail");
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.user_message(), "Email already registered");
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_message() {
    let server = MockServer::spawn().await;
    server.respond_raw(
        Method::GET,
        "/api/v1/status/idea-1",
        StatusCode::INTERNAL_SERVER_ERROR,
        "upstream exploded".to_string(),
    );
    let backend = HttpBackend::new(&server.url, &server.url).expect("backend");

    let err = backend
        .idea_status(&IdeaId::new("idea-1"))
        .await
        .expect_err("must fail");
    assert_eq!(err.user_message(), crate::GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn staged_endpoints_embed_identifiers_in_path() {
    let server = MockServer::spawn().await;
    let idea_id = IdeaId::new(uuid::Uuid::new_v4().to_string());
    let summary_id = SummaryId::new("s-7");
    server.respond(
        Method::POST,
        &format!("/api/v1/generate-summary/{idea_id}"),
        StatusCode::OK,
        json!({ "summary_id": "s-7" }),
    );
    server.respond(
        Method::GET,
        "/api/v1/summary/s-7",
        StatusCode::OK,
        json!({
            "title": "Hinge",
            "problem": "Dust",
            "solution": "Vibration",
            "claim": "A hinge",
            "cpc_code": "H02S40/10",
        }),
    );
    server.respond(
        Method::POST,
        "/api/v1/register-proof/s-7",
        StatusCode::OK,
        json!({ "message": "ok" }),
    );
    server.respond(
        Method::GET,
        "/api/v1/certificate/s-7",
        StatusCode::OK,
        json!({
            "hash": "abc",
            "timestamp": "2024-05-01T10:00:00Z",
            "explorer_url": "https://hashscan.io/testnet/transaction/1",
        }),
    );
    let backend = HttpBackend::new(&server.url, &server.url).expect("backend");

    let generated = backend.generate_summary(&idea_id).await.expect("generate");
    assert_eq!(generated.summary_id, summary_id);
    let summary = backend.fetch_summary(&summary_id).await.expect("summary");
    assert_eq!(summary.cpc_code, "H02S40/10");
    backend.register_proof(&summary_id).await.expect("proof");
    let certificate = backend
        .fetch_certificate(&summary_id)
        .await
        .expect("certificate");
    assert_eq!(certificate.hash, "abc");

    let methods: Vec<_> = server
        .requests()
        .into_iter()
        .map(|request| (request.method, request.path))
        .collect();
    assert_eq!(
        methods,
        vec![
            (Method::POST, format!("/api/v1/generate-summary/{idea_id}")),
            (Method::GET, "/api/v1/summary/s-7".to_string()),
            (Method::POST, "/api/v1/register-proof/s-7".to_string()),
            (Method::GET, "/api/v1/certificate/s-7".to_string()),
        ]
    );
}

#[tokio::test]
async fn identifiers_are_percent_encoded() {
    let server = MockServer::spawn().await;
    server.respond(
        Method::GET,
        "/api/v1/status/a%2Fb",
        StatusCode::OK,
        json!({ "status": "submitted" }),
    );
    let backend = HttpBackend::new(&server.url, &server.url).expect("backend");

    backend
        .idea_status(&IdeaId::new("a/b"))
        .await
        .expect("status");
    assert_eq!(server.requests()[0].path, "/api/v1/status/a%2Fb");
}

#[tokio::test]
async fn ack_endpoints_ignore_empty_bodies() {
    let server = MockServer::spawn().await;
    server.respond_raw(
        Method::GET,
        "/api/v1/health",
        StatusCode::OK,
        String::new(),
    );
    let backend = HttpBackend::new(&server.url, &server.url).expect("backend");
    backend.health().await.expect("health");
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::spawn().await;
    server.respond(
        Method::POST,
        "/api/v1/submit-idea",
        StatusCode::OK,
        json!({ "unexpected": true }),
    );
    let backend = HttpBackend::new(&server.url, &server.url).expect("backend");

    let err = backend
        .submit_idea(&SubmitIdeaRequest {
            user_id: UserId::new("u-1"),
            raw_idea: "idea".to_string(),
        })
        .await
        .expect_err("must fail");
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn dashboard_calls_use_dashboard_origin() {
    let workflow = MockServer::spawn().await;
    let dashboard = MockServer::spawn().await;
    dashboard.respond(
        Method::POST,
        "/api/submit",
        StatusCode::OK,
        json!({
            "patent_id": "p-1",
            "message": "Idea saved",
            "structured_patent": {
                "title": "Hinge",
                "claims": ["A hinge", "A hinge with a piezo actuator"],
                "summary": "Vibrating hinge",
            },
        }),
    );
    dashboard.respond(
        Method::POST,
        "/api/register-blockchain",
        StatusCode::OK,
        json!({ "transaction_hash": "0xfeed" }),
    );
    dashboard.respond(
        Method::GET,
        "/api/patents",
        StatusCode::OK,
        json!([
            {
                "id": "p-1",
                "title": "Hinge",
                "summary": "Vibrating hinge",
                "status": "on_blockchain",
                "created_at": "2024-05-01T10:00:00Z",
                "transaction_hash": "0xfeed",
            }
        ]),
    );
    let backend = HttpBackend::new(&workflow.url, &dashboard.url).expect("backend");

    let submitted = backend
        .submit_patent(&PatentSubmissionRequest {
            user: SubmitterInfo {
                full_name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                wallet_address: "0xaa".to_string(),
            },
            patent: PatentInput {
                raw_idea: "A hinge that shakes off dust".to_string(),
            },
        })
        .await
        .expect("submit");
    assert_eq!(submitted.patent_id, PatentId::new("p-1"));
    assert_eq!(
        submitted.structured_patent.expect("structured").claims.len(),
        2
    );

    let registered = backend
        .register_blockchain(&BlockchainRegistrationRequest {
            patent_id: PatentId::new("p-1"),
        })
        .await
        .expect("register");
    assert_eq!(registered.transaction_hash, "0xfeed");

    let patents = backend.list_patents().await.expect("list");
    assert_eq!(patents[0].status, PatentStatus::OnBlockchain);

    assert!(workflow.requests().is_empty());
    let bodies: Vec<_> = dashboard.requests().into_iter().map(|r| r.body).collect();
    assert_eq!(
        bodies[0],
        json!({
            "user": { "full_name": "Ada", "email": "ada@example.com", "wallet_address": "0xaa" },
            "patent": { "raw_idea": "A hinge that shakes off dust" },
        })
    );
    assert_eq!(bodies[1], json!({ "patent_id": "p-1" }));
}

#[test]
fn rejects_unusable_base_urls() {
    assert!(matches!(
        HttpBackend::new("localhost:8080", "http://localhost:8080"),
        Err(ClientError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        HttpBackend::new("http://localhost:8080", "mailto:ops@example.com"),
        Err(ClientError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn base_url_path_prefix_is_preserved() {
    let backend =
        HttpBackend::new("http://gateway.example/patents/", "http://gateway.example").expect("backend");
    let url = backend.workflow_url(&["register"]).expect("url");
    assert_eq!(url.as_str(), "http://gateway.example/patents/api/v1/register");
    let url = backend.dashboard_url(&["patents"]).expect("url");
    assert_eq!(url.as_str(), "http://gateway.example/api/patents");
}
