//! Reducer-style helpers folding backend events into GUI state.

use std::time::{Duration, Instant};

use client_core::{DashboardView, Notice, NoticeSeverity, WorkflowView};

use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};

pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);
pub const TOAST_FADE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSource {
    Workflow,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub source: NoticeSource,
    pub notice_id: u64,
    pub message: String,
    pub severity: NoticeSeverity,
    pub shown_at: Instant,
}

impl Toast {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + TOAST_LIFETIME
    }

    /// 1.0 while fully shown, ramping to 0.0 over the last fade window.
    pub fn opacity(&self, now: Instant) -> f32 {
        let remaining = self.expires_at().saturating_duration_since(now);
        if remaining >= TOAST_FADE {
            1.0
        } else {
            remaining.as_secs_f32() / TOAST_FADE.as_secs_f32()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HealthState {
    Unknown,
    Healthy,
    Unreachable(String),
}

pub struct GuiState {
    pub workflow: WorkflowView,
    pub dashboard: DashboardView,
    pub toasts: Vec<Toast>,
    pub status: String,
    pub status_is_error: bool,
    pub health: HealthState,
    pub last_error: Option<UiError>,
    workflow_notice_seen: u64,
    dashboard_notice_seen: u64,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            workflow: WorkflowView::default(),
            dashboard: DashboardView::default(),
            toasts: Vec::new(),
            status: "Ready".to_string(),
            status_is_error: false,
            health: HealthState::Unknown,
            last_error: None,
            workflow_notice_seen: 0,
            dashboard_notice_seen: 0,
        }
    }
}

impl GuiState {
    pub fn apply(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                self.status_is_error = false;
            }
            UiEvent::Workflow(view) => {
                self.push_notice(NoticeSource::Workflow, view.notice.as_ref(), now);
                if let Some(step) = view.pending.filter(|_| view.busy) {
                    self.status = format!("{}...", step.describe());
                    self.status_is_error = false;
                } else if self.workflow.busy && !view.busy {
                    self.status = "Ready".to_string();
                    self.status_is_error = false;
                }
                self.workflow = view;
            }
            UiEvent::Dashboard(view) => {
                self.push_notice(NoticeSource::Dashboard, view.notice.as_ref(), now);
                self.dashboard = view;
            }
            UiEvent::Health { healthy, detail } => {
                self.health = if healthy {
                    HealthState::Healthy
                } else {
                    HealthState::Unreachable(detail.clone())
                };
                self.status = detail;
                self.status_is_error = !healthy;
            }
            UiEvent::Error(err) => {
                self.status = format!("{}: {}", err_label(err.category()), err.message());
                self.status_is_error = true;
                if err.context() == UiErrorContext::BackendStartup {
                    self.health = HealthState::Unreachable(err.message().to_string());
                }
                self.last_error = Some(err);
            }
        }
    }

    /// Adds a toast for `notice` unless it was already shown.
    fn push_notice(&mut self, source: NoticeSource, notice: Option<&Notice>, now: Instant) {
        let Some(notice) = notice else {
            return;
        };
        if self.last_notice_id(source) >= notice.id {
            return;
        }
        self.toasts.push(Toast {
            source,
            notice_id: notice.id,
            message: notice.message.clone(),
            severity: notice.severity,
            shown_at: now,
        });
        match source {
            NoticeSource::Workflow => self.workflow_notice_seen = notice.id,
            NoticeSource::Dashboard => self.dashboard_notice_seen = notice.id,
        }
    }

    fn last_notice_id(&self, source: NoticeSource) -> u64 {
        match source {
            NoticeSource::Workflow => self.workflow_notice_seen,
            NoticeSource::Dashboard => self.dashboard_notice_seen,
        }
    }

    pub fn prune_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at() > now);
    }

    pub fn next_toast_expiry(&self) -> Option<Instant> {
        self.toasts.iter().map(Toast::expires_at).min()
    }
}
