use shared::protocol::{Certificate, SummaryDetails};

use crate::session::WorkflowSession;

/// One user-facing section of the staged workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Register,
    SubmitIdea,
    AiSummary,
    Certificate,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Register,
        Section::SubmitIdea,
        Section::AiSummary,
        Section::Certificate,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Register => "Create your account",
            Section::SubmitIdea => "Describe your idea",
            Section::AiSummary => "AI summary",
            Section::Certificate => "Proof certificate",
        }
    }
}

/// Timer-driven step that runs after a section has been hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStep {
    GenerateSummary,
    FetchCertificate,
}

impl PendingStep {
    pub fn describe(self) -> &'static str {
        match self {
            PendingStep::GenerateSummary => "Generating AI summary",
            PendingStep::FetchCertificate => "Fetching proof certificate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Success,
    Error,
}

/// Transient inline message. `id` grows with every notice so a renderer can
/// tell a repeated message from the one it is already showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub severity: NoticeSeverity,
}

#[derive(Debug, Default)]
pub(crate) struct NoticeIds(u64);

impl NoticeIds {
    pub(crate) fn notice(&mut self, message: impl Into<String>, severity: NoticeSeverity) -> Notice {
        self.0 += 1;
        Notice {
            id: self.0,
            message: message.into(),
            severity,
        }
    }
}

/// Everything a renderer needs to draw the staged workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowView {
    /// `None` while a transition or a timed step is in flight.
    pub active: Option<Section>,
    pub session: WorkflowSession,
    pub summary: Option<SummaryDetails>,
    pub certificate: Option<Certificate>,
    pub pending: Option<PendingStep>,
    pub busy: bool,
    pub notice: Option<Notice>,
    /// Blocking message the user has to acknowledge.
    pub alert: Option<String>,
}

impl WorkflowView {
    pub fn is_active(&self, section: Section) -> bool {
        self.active == Some(section)
    }

    /// A timed step that failed and can be re-run by hand.
    pub fn retryable_step(&self) -> Option<PendingStep> {
        if self.busy {
            None
        } else {
            self.pending
        }
    }
}
