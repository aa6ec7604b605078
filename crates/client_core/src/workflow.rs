//! Staged submission workflow: register, submit an idea, review the AI
//! summary, register the proof and read back the certificate.
//!
//! Each stage is one backend call followed by one section transition. Every
//! change to [`WorkflowView`] is published on a watch channel, so a renderer
//! only has to reflect the latest snapshot.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{IdeaId, UserId},
    protocol::{Certificate, RegisterRequest, SubmitIdeaRequest, SummaryDetails},
};
use tokio::{sync::watch, time::sleep};
use tracing::{debug, info, warn};

use crate::{
    api::PatentBackend,
    config::Settings,
    error::{ClientError, Result},
    view::{NoticeIds, NoticeSeverity, PendingStep, Section, WorkflowView},
};

pub const EMPTY_IDEA_MESSAGE: &str = "Please describe your idea.";

const REGISTER_ALERT_PREFIX: &str = "Error";
const SUBMIT_ALERT_PREFIX: &str = "Error";
const SUMMARY_ALERT_PREFIX: &str = "AI error";
const PROOF_ALERT_PREFIX: &str = "Ledger error";
const CERTIFICATE_ALERT_PREFIX: &str = "Certificate error";
const STATUS_ALERT_PREFIX: &str = "Status error";

/// Cosmetic delays between stages. They do not wait on anything real.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub transition: Duration,
    pub summary_delay: Duration,
    pub certificate_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(500),
            summary_delay: Duration::from_secs(2),
            certificate_delay: Duration::from_secs(3),
        }
    }
}

impl Pacing {
    pub fn immediate() -> Self {
        Self {
            transition: Duration::ZERO,
            summary_delay: Duration::ZERO,
            certificate_delay: Duration::ZERO,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            transition: settings.transition_delay(),
            summary_delay: settings.summary_delay(),
            certificate_delay: settings.certificate_delay(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub wallet_address: String,
}

impl RegistrationForm {
    /// Maps the form verbatim; blank optional fields become `None`.
    pub fn to_request(&self) -> Result<RegisterRequest> {
        for (value, label) in [
            (&self.full_name, "Full name"),
            (&self.email, "Email"),
            (&self.wallet_address, "Wallet address"),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::validation(format!("{label} is required.")));
            }
        }

        Ok(RegisterRequest {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: non_blank(&self.phone),
            country: non_blank(&self.country),
            wallet_address: self.wallet_address.clone(),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub struct WorkflowController {
    backend: Arc<dyn PatentBackend>,
    pacing: Pacing,
    view: WorkflowView,
    updates: watch::Sender<WorkflowView>,
    notices: NoticeIds,
}

impl WorkflowController {
    pub fn new(backend: Arc<dyn PatentBackend>, pacing: Pacing) -> Self {
        let view = WorkflowView::default();
        let (updates, _) = watch::channel(view.clone());
        Self {
            backend,
            pacing,
            view,
            updates,
            notices: NoticeIds::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowView> {
        self.updates.subscribe()
    }

    pub fn view(&self) -> &WorkflowView {
        &self.view
    }

    fn update(&mut self, apply: impl FnOnce(&mut WorkflowView)) {
        apply(&mut self.view);
        self.updates.send_replace(self.view.clone());
    }

    fn toast(&mut self, message: &str) {
        let notice = self.notices.notice(message, NoticeSeverity::Success);
        self.update(|view| view.notice = Some(notice));
    }

    /// Surfaces `err` as the blocking alert and leaves the sections as they
    /// are. Local validation messages are shown without a prefix.
    fn fail<T>(&mut self, prefix: &str, err: ClientError) -> Result<T> {
        let alert = if err.is_local() {
            err.user_message()
        } else {
            format!("{prefix}: {}", err.user_message())
        };
        warn!(status = ?err.status(), "{prefix}: {err}");
        self.update(|view| {
            view.busy = false;
            view.alert = Some(alert);
        });
        Err(err)
    }

    /// Rejects a request that does not belong to the current stage. Nothing
    /// is sent and the view is left untouched.
    fn out_of_stage<T>(&self, operation: &'static str) -> Result<T> {
        debug!(
            operation,
            active = ?self.view.active,
            pending = ?self.view.pending,
            "ignoring request outside its stage"
        );
        Err(ClientError::OutOfStage(operation))
    }

    async fn hide_then_reveal(&mut self, next: Section) {
        self.update(|view| view.active = None);
        sleep(self.pacing.transition).await;
        self.update(|view| view.active = Some(next));
    }

    /// Reveals the registration section. Only a fresh workflow can start.
    pub async fn start(&mut self) {
        let view = &self.view;
        if view.active.is_some()
            || view.busy
            || view.pending.is_some()
            || view.session.user_id.is_some()
        {
            return;
        }
        sleep(self.pacing.transition).await;
        self.update(|view| view.active = Some(Section::Register));
    }

    pub fn dismiss_alert(&mut self) {
        self.update(|view| view.alert = None);
    }

    pub async fn register(&mut self, form: &RegistrationForm) -> Result<UserId> {
        if !self.view.is_active(Section::Register) {
            return self.out_of_stage("registration");
        }
        let request = match form.to_request() {
            Ok(request) => request,
            Err(err) => return self.fail(REGISTER_ALERT_PREFIX, err),
        };

        self.update(|view| view.busy = true);
        let response = match self.backend.register(&request).await {
            Ok(response) => response,
            Err(err) => return self.fail(REGISTER_ALERT_PREFIX, err),
        };

        let user_id = response.user_id;
        info!(user_id = %user_id, "account registered");
        self.update(|view| {
            view.session.user_id = Some(user_id.clone());
            view.busy = false;
        });
        self.toast("Account created");
        self.hide_then_reveal(Section::SubmitIdea).await;
        Ok(user_id)
    }

    /// Submits the idea, then after the summary delay generates and loads
    /// the AI summary.
    pub async fn submit_idea(&mut self, raw_idea: &str) -> Result<SummaryDetails> {
        if !self.view.is_active(Section::SubmitIdea) {
            return self.out_of_stage("idea submission");
        }
        if raw_idea.trim().is_empty() {
            return self.fail(
                SUBMIT_ALERT_PREFIX,
                ClientError::validation(EMPTY_IDEA_MESSAGE),
            );
        }
        let user_id = match self.view.session.require_user() {
            Ok(user_id) => user_id.clone(),
            Err(err) => return self.fail(SUBMIT_ALERT_PREFIX, err),
        };

        self.update(|view| view.busy = true);
        let request = SubmitIdeaRequest {
            user_id,
            raw_idea: raw_idea.to_string(),
        };
        let response = match self.backend.submit_idea(&request).await {
            Ok(response) => response,
            Err(err) => return self.fail(SUBMIT_ALERT_PREFIX, err),
        };

        let idea_id: IdeaId = response.idea_id;
        info!(idea_id = %idea_id, "idea submitted");
        self.update(|view| {
            view.session.idea_id = Some(idea_id);
            view.session.summary_id = None;
            view.active = None;
            view.pending = Some(PendingStep::GenerateSummary);
        });
        self.toast("Idea saved. Generating the AI summary...");

        sleep(self.pacing.summary_delay).await;
        self.generate_summary().await
    }

    /// Generates the summary for the submitted idea and loads it. A summary
    /// that was already generated is only fetched again.
    pub async fn generate_summary(&mut self) -> Result<SummaryDetails> {
        if self.view.pending != Some(PendingStep::GenerateSummary) {
            return self.out_of_stage("summary generation");
        }
        let idea_id = match self.view.session.require_idea() {
            Ok(idea_id) => idea_id.clone(),
            Err(err) => return self.fail(SUMMARY_ALERT_PREFIX, err),
        };

        self.update(|view| view.busy = true);
        let summary_id = match self.view.session.summary_id.clone() {
            Some(summary_id) => summary_id,
            None => {
                let generated = match self.backend.generate_summary(&idea_id).await {
                    Ok(generated) => generated,
                    Err(err) => return self.fail(SUMMARY_ALERT_PREFIX, err),
                };
                let summary_id = generated.summary_id;
                self.update(|view| view.session.summary_id = Some(summary_id.clone()));
                summary_id
            }
        };

        let summary = match self.backend.fetch_summary(&summary_id).await {
            Ok(summary) => summary,
            Err(err) => return self.fail(SUMMARY_ALERT_PREFIX, err),
        };

        info!(summary_id = %summary_id, cpc_code = %summary.cpc_code, "summary loaded");
        let shown = summary.clone();
        self.update(|view| {
            view.summary = Some(shown);
            view.pending = None;
            view.busy = false;
            view.active = Some(Section::AiSummary);
        });
        Ok(summary)
    }

    /// Registers the proof, then after the certificate delay loads the
    /// certificate.
    pub async fn register_proof(&mut self) -> Result<Certificate> {
        if !self.view.is_active(Section::AiSummary) {
            return self.out_of_stage("proof registration");
        }
        let summary_id = match self.view.session.require_summary() {
            Ok(summary_id) => summary_id.clone(),
            Err(err) => return self.fail(PROOF_ALERT_PREFIX, err),
        };

        self.update(|view| view.busy = true);
        if let Err(err) = self.backend.register_proof(&summary_id).await {
            return self.fail(PROOF_ALERT_PREFIX, err);
        }

        info!(summary_id = %summary_id, "proof registered");
        self.update(|view| {
            view.active = None;
            view.pending = Some(PendingStep::FetchCertificate);
        });
        self.toast("Proof registered on the ledger");

        sleep(self.pacing.certificate_delay).await;
        self.fetch_certificate().await
    }

    pub async fn fetch_certificate(&mut self) -> Result<Certificate> {
        if self.view.pending != Some(PendingStep::FetchCertificate) {
            return self.out_of_stage("certificate retrieval");
        }
        let summary_id = match self.view.session.require_summary() {
            Ok(summary_id) => summary_id.clone(),
            Err(err) => return self.fail(CERTIFICATE_ALERT_PREFIX, err),
        };

        self.update(|view| view.busy = true);
        let certificate = match self.backend.fetch_certificate(&summary_id).await {
            Ok(certificate) => certificate,
            Err(err) => return self.fail(CERTIFICATE_ALERT_PREFIX, err),
        };

        info!(hash = %certificate.hash, "certificate loaded");
        let shown = certificate.clone();
        self.update(|view| {
            view.certificate = Some(shown);
            view.pending = None;
            view.busy = false;
            view.active = Some(Section::Certificate);
        });
        Ok(certificate)
    }

    /// Re-fetches the idea status. The payload is not shown anywhere.
    pub async fn check_status(&mut self) -> Result<()> {
        let idea_id = match self.view.session.require_idea() {
            Ok(idea_id) => idea_id.clone(),
            Err(err) => return self.fail(STATUS_ALERT_PREFIX, err),
        };

        self.update(|view| view.busy = true);
        if let Err(err) = self.backend.idea_status(&idea_id).await {
            return self.fail(STATUS_ALERT_PREFIX, err);
        }
        self.update(|view| view.busy = false);
        self.toast("Status refreshed");
        Ok(())
    }

    /// Re-runs a timed step that previously failed.
    pub async fn retry_pending(&mut self) -> Result<()> {
        match self.view.pending {
            Some(PendingStep::GenerateSummary) => self.generate_summary().await.map(|_| ()),
            Some(PendingStep::FetchCertificate) => self.fetch_certificate().await.map(|_| ()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
