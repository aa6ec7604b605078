use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{IdeaId, PatentId, PatentStatus, SummaryId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub wallet_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitIdeaRequest {
    pub user_id: UserId,
    pub raw_idea: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitIdeaResponse {
    pub idea_id: IdeaId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSummaryResponse {
    pub summary_id: SummaryId,
}

/// AI-structured summary of a submitted idea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDetails {
    pub title: String,
    pub problem: String,
    pub solution: String,
    pub claim: String,
    /// Patent classification code, displayed as-is.
    pub cpc_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub hash: String,
    pub timestamp: String,
    pub explorer_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterInfo {
    pub full_name: String,
    pub email: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentInput {
    pub raw_idea: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentSubmissionRequest {
    pub user: SubmitterInfo,
    pub patent: PatentInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredPatent {
    pub title: String,
    #[serde(default)]
    pub claims: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub novelty_score: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatentSubmissionResponse {
    pub patent_id: PatentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub structured_patent: Option<StructuredPatent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainRegistrationRequest {
    pub patent_id: PatentId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockchainRegistrationResponse {
    pub transaction_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentRecord {
    pub id: PatentId,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub status: PatentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}
