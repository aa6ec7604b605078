//! Backend commands queued from UI to backend worker.

use client_core::{DashboardTab, PatentSubmissionForm, RegistrationForm};

pub enum BackendCommand {
    Start,
    Register(RegistrationForm),
    SubmitIdea { raw_idea: String },
    RegisterProof,
    CheckStatus,
    RetryPending,
    DismissAlert,
    CheckHealth,
    SelectDashboardTab(DashboardTab),
    SubmitPatent(PatentSubmissionForm),
    RegisterOnChain,
    ReloadPatents,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Start => "start",
            BackendCommand::Register(_) => "register",
            BackendCommand::SubmitIdea { .. } => "submit_idea",
            BackendCommand::RegisterProof => "register_proof",
            BackendCommand::CheckStatus => "check_status",
            BackendCommand::RetryPending => "retry_pending",
            BackendCommand::DismissAlert => "dismiss_alert",
            BackendCommand::CheckHealth => "check_health",
            BackendCommand::SelectDashboardTab(_) => "select_dashboard_tab",
            BackendCommand::SubmitPatent(_) => "submit_patent",
            BackendCommand::RegisterOnChain => "register_on_chain",
            BackendCommand::ReloadPatents => "reload_patents",
        }
    }
}
