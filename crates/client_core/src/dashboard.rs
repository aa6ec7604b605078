//! Dashboard flow: one-call submission with an AI-structured result, ledger
//! registration on demand, and the list of submitted patents.

use std::sync::Arc;

use shared::{
    domain::{PatentId, PatentStatus},
    protocol::{
        BlockchainRegistrationRequest, PatentInput, PatentRecord, PatentSubmissionRequest,
        StructuredPatent, SubmitterInfo,
    },
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    api::DashboardBackend,
    error::{ClientError, Result},
    view::{Notice, NoticeIds, NoticeSeverity},
};

pub const EMPTY_LIST_MESSAGE: &str = "No patents submitted yet.";
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardTab {
    #[default]
    Submit,
    Patents,
}

impl DashboardTab {
    pub fn label(self) -> &'static str {
        match self {
            DashboardTab::Submit => "New patent",
            DashboardTab::Patents => "My patents",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatentSubmissionForm {
    pub full_name: String,
    pub email: String,
    pub wallet_address: String,
    pub raw_idea: String,
}

impl PatentSubmissionForm {
    pub fn to_request(&self) -> Result<PatentSubmissionRequest> {
        if self.raw_idea.trim().is_empty() {
            return Err(ClientError::validation(
                crate::workflow::EMPTY_IDEA_MESSAGE,
            ));
        }
        Ok(PatentSubmissionRequest {
            user: SubmitterInfo {
                full_name: self.full_name.clone(),
                email: self.email.clone(),
                wallet_address: self.wallet_address.clone(),
            },
            patent: PatentInput {
                raw_idea: self.raw_idea.clone(),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub patent_id: PatentId,
    pub structured: Option<StructuredPatent>,
    pub transaction_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatentListEntry {
    pub id: PatentId,
    pub title: String,
    pub summary: String,
    pub status: PatentStatus,
    pub status_label: &'static str,
    pub created_at: String,
    pub transaction_hash: Option<String>,
}

impl From<&PatentRecord> for PatentListEntry {
    fn from(record: &PatentRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            summary: record.summary.clone(),
            status: record.status,
            status_label: record.status.label(),
            created_at: record.created_at.format(CREATED_AT_FORMAT).to_string(),
            transaction_hash: record.transaction_hash.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatentListView {
    Empty { message: &'static str },
    Entries(Vec<PatentListEntry>),
}

pub fn render_patent_list(records: &[PatentRecord]) -> PatentListView {
    if records.is_empty() {
        return PatentListView::Empty {
            message: EMPTY_LIST_MESSAGE,
        };
    }
    PatentListView::Entries(records.iter().map(PatentListEntry::from).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardView {
    pub tab: DashboardTab,
    pub last_submission: Option<SubmissionResult>,
    pub patents: Vec<PatentRecord>,
    pub loaded: bool,
    pub busy: bool,
    pub notice: Option<Notice>,
}

impl DashboardView {
    pub fn patent_list(&self) -> PatentListView {
        render_patent_list(&self.patents)
    }

    pub fn can_register_on_chain(&self) -> bool {
        !self.busy
            && self
                .last_submission
                .as_ref()
                .is_some_and(|submission| submission.transaction_hash.is_none())
    }
}

pub struct DashboardController {
    backend: Arc<dyn DashboardBackend>,
    view: DashboardView,
    updates: watch::Sender<DashboardView>,
    notices: NoticeIds,
}

impl DashboardController {
    pub fn new(backend: Arc<dyn DashboardBackend>) -> Self {
        let view = DashboardView::default();
        let (updates, _) = watch::channel(view.clone());
        Self {
            backend,
            view,
            updates,
            notices: NoticeIds::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.updates.subscribe()
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    fn update(&mut self, apply: impl FnOnce(&mut DashboardView)) {
        apply(&mut self.view);
        self.updates.send_replace(self.view.clone());
    }

    fn notify(&mut self, message: impl Into<String>, severity: NoticeSeverity) {
        let notice = self.notices.notice(message, severity);
        self.update(|view| view.notice = Some(notice));
    }

    fn fail<T>(&mut self, err: ClientError) -> Result<T> {
        warn!(status = ?err.status(), "dashboard request failed: {err}");
        let message = if err.is_local() {
            err.user_message()
        } else {
            format!("Error: {}", err.user_message())
        };
        self.update(|view| view.busy = false);
        self.notify(message, NoticeSeverity::Error);
        Err(err)
    }

    pub fn select_tab(&mut self, tab: DashboardTab) {
        self.update(|view| view.tab = tab);
    }

    pub async fn submit(&mut self, form: &PatentSubmissionForm) -> Result<SubmissionResult> {
        let request = match form.to_request() {
            Ok(request) => request,
            Err(err) => return self.fail(err),
        };

        self.update(|view| view.busy = true);
        let response = match self.backend.submit_patent(&request).await {
            Ok(response) => response,
            Err(err) => return self.fail(err),
        };

        info!(patent_id = %response.patent_id, "patent submitted");
        let result = SubmissionResult {
            patent_id: response.patent_id,
            structured: response.structured_patent,
            transaction_hash: None,
        };
        let shown = result.clone();
        self.update(|view| {
            view.last_submission = Some(shown);
            view.busy = false;
        });
        self.notify(
            response
                .message
                .unwrap_or_else(|| "Patent submitted".to_string()),
            NoticeSeverity::Success,
        );
        Ok(result)
    }

    /// Registers the last submitted patent on the ledger and reloads the list.
    pub async fn register_on_chain(&mut self) -> Result<String> {
        let patent_id = match self.view.last_submission.as_ref() {
            Some(submission) => submission.patent_id.clone(),
            None => return self.fail(ClientError::MissingContext("patent id")),
        };

        self.update(|view| view.busy = true);
        let request = BlockchainRegistrationRequest {
            patent_id: patent_id.clone(),
        };
        let response = match self.backend.register_blockchain(&request).await {
            Ok(response) => response,
            Err(err) => return self.fail(err),
        };

        let transaction_hash = response.transaction_hash;
        info!(patent_id = %patent_id, tx = %transaction_hash, "patent registered on ledger");
        let hash = transaction_hash.clone();
        self.update(|view| {
            if let Some(submission) = view.last_submission.as_mut() {
                submission.transaction_hash = Some(hash);
            }
            view.busy = false;
        });
        self.notify("Registered on the blockchain", NoticeSeverity::Success);

        // The registration already succeeded; a failed refresh only shows its notice.
        let _ = self.reload().await;
        Ok(transaction_hash)
    }

    pub async fn reload(&mut self) -> Result<usize> {
        self.update(|view| view.busy = true);
        let patents = match self.backend.list_patents().await {
            Ok(patents) => patents,
            Err(err) => return self.fail(err),
        };

        let count = patents.len();
        info!(count, "patent list loaded");
        self.update(|view| {
            view.patents = patents;
            view.loaded = true;
            view.busy = false;
        });
        Ok(count)
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
