//! Client side of the patent proof service: the HTTP contract with the
//! backend, the staged workflow and dashboard controllers, and the typed view
//! state they publish for a renderer.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod session;
pub mod view;
pub mod workflow;

pub use api::{DashboardBackend, HttpBackend, PatentBackend};
pub use config::{load_settings, Settings};
pub use dashboard::{
    render_patent_list, DashboardController, DashboardTab, DashboardView, PatentListEntry,
    PatentListView, PatentSubmissionForm, SubmissionResult,
};
pub use error::{ClientError, GENERIC_ERROR_MESSAGE};
pub use session::WorkflowSession;
pub use view::{Notice, NoticeSeverity, PendingStep, Section, WorkflowView};
pub use workflow::{Pacing, RegistrationForm, WorkflowController};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
