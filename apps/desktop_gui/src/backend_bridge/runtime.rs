//! Runtime bridge between UI command queue and backend event intake.
//!
//! The worker thread owns a tokio runtime, one [`WorkflowController`] and one
//! [`DashboardController`]. Each controller runs in its own task so a paced
//! workflow step never stalls the dashboard. View snapshots reach the UI via
//! forwarder tasks watching the controllers' channels.

use std::{sync::Arc, thread, time::Duration};

use client_core::{
    config::Settings, DashboardController, DashboardTab, HttpBackend, Pacing, PatentBackend,
    PatentSubmissionForm, RegistrationForm, WorkflowController,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::{
    sync::{mpsc, watch},
    time::sleep,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

const QUEUE_RETRY_INTERVAL: Duration = Duration::from_millis(16);

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(run_worker(settings, cmd_rx, ui_tx));
    });
}

enum WorkflowCommand {
    Start,
    Register(RegistrationForm),
    SubmitIdea(String),
    RegisterProof,
    CheckStatus,
    RetryPending,
    DismissAlert,
}

enum DashboardCommand {
    SelectTab(DashboardTab),
    Submit(PatentSubmissionForm),
    RegisterOnChain,
    Reload,
}

async fn run_worker(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let backend = match HttpBackend::from_settings(&settings) {
        Ok(backend) => Arc::new(backend),
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: {err}"),
            )));
            tracing::error!("failed to build http backend: {err}");
            return;
        }
    };
    tracing::info!(
        api = backend.api_base_url(),
        dashboard = backend.dashboard_base_url(),
        "backend worker ready"
    );

    let workflow = WorkflowController::new(backend.clone(), Pacing::from_settings(&settings));
    let dashboard = DashboardController::new(backend.clone());
    tokio::spawn(forward_views(workflow.subscribe(), ui_tx.clone(), UiEvent::Workflow));
    tokio::spawn(forward_views(dashboard.subscribe(), ui_tx.clone(), UiEvent::Dashboard));

    let (workflow_tx, workflow_rx) = mpsc::unbounded_channel();
    let (dashboard_tx, dashboard_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_workflow(workflow, workflow_rx));
    tokio::spawn(run_dashboard(dashboard, dashboard_rx));

    let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

    // Blocking receive: this future is the runtime's `block_on` root, the
    // controller tasks run on the worker threads.
    while let Ok(cmd) = cmd_rx.recv() {
        tracing::debug!(command = cmd.name(), "backend: command");
        let routed = match cmd {
            BackendCommand::Start => workflow_tx.send(WorkflowCommand::Start).is_ok(),
            BackendCommand::Register(form) => {
                workflow_tx.send(WorkflowCommand::Register(form)).is_ok()
            }
            BackendCommand::SubmitIdea { raw_idea } => workflow_tx
                .send(WorkflowCommand::SubmitIdea(raw_idea))
                .is_ok(),
            BackendCommand::RegisterProof => {
                workflow_tx.send(WorkflowCommand::RegisterProof).is_ok()
            }
            BackendCommand::CheckStatus => workflow_tx.send(WorkflowCommand::CheckStatus).is_ok(),
            BackendCommand::RetryPending => {
                workflow_tx.send(WorkflowCommand::RetryPending).is_ok()
            }
            BackendCommand::DismissAlert => {
                workflow_tx.send(WorkflowCommand::DismissAlert).is_ok()
            }
            BackendCommand::CheckHealth => {
                tokio::spawn(check_health(backend.clone(), ui_tx.clone()));
                true
            }
            BackendCommand::SelectDashboardTab(tab) => {
                dashboard_tx.send(DashboardCommand::SelectTab(tab)).is_ok()
            }
            BackendCommand::SubmitPatent(form) => {
                dashboard_tx.send(DashboardCommand::Submit(form)).is_ok()
            }
            BackendCommand::RegisterOnChain => {
                dashboard_tx.send(DashboardCommand::RegisterOnChain).is_ok()
            }
            BackendCommand::ReloadPatents => dashboard_tx.send(DashboardCommand::Reload).is_ok(),
        };
        if !routed {
            tracing::error!("controller task stopped; dropping command");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::General,
                "Backend controller disconnected; restart the app",
            )));
        }
    }
    tracing::info!("ui command queue closed; backend worker exiting");
}

/// Failures are already folded into the published view as alerts or notices,
/// so the task only logs them.
async fn run_workflow(
    mut controller: WorkflowController,
    mut commands: mpsc::UnboundedReceiver<WorkflowCommand>,
) {
    while let Some(cmd) = commands.recv().await {
        let result = match cmd {
            WorkflowCommand::Start => {
                controller.start().await;
                Ok(())
            }
            WorkflowCommand::Register(form) => controller.register(&form).await.map(|_| ()),
            WorkflowCommand::SubmitIdea(raw_idea) => {
                controller.submit_idea(&raw_idea).await.map(|_| ())
            }
            WorkflowCommand::RegisterProof => controller.register_proof().await.map(|_| ()),
            WorkflowCommand::CheckStatus => controller.check_status().await,
            WorkflowCommand::RetryPending => controller.retry_pending().await,
            WorkflowCommand::DismissAlert => {
                controller.dismiss_alert();
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::debug!("workflow command ended with error: {err}");
        }
    }
}

async fn run_dashboard(
    mut controller: DashboardController,
    mut commands: mpsc::UnboundedReceiver<DashboardCommand>,
) {
    while let Some(cmd) = commands.recv().await {
        let result = match cmd {
            DashboardCommand::SelectTab(tab) => {
                controller.select_tab(tab);
                if tab == DashboardTab::Patents {
                    controller.reload().await.map(|_| ())
                } else {
                    Ok(())
                }
            }
            DashboardCommand::Submit(form) => controller.submit(&form).await.map(|_| ()),
            DashboardCommand::RegisterOnChain => controller.register_on_chain().await.map(|_| ()),
            DashboardCommand::Reload => controller.reload().await.map(|_| ()),
        };
        if let Err(err) = result {
            tracing::debug!("dashboard command ended with error: {err}");
        }
    }
}

/// Pushes every view snapshot into the UI queue. While the queue is full the
/// snapshot is retried until it lands or a newer one replaces it, so the last
/// state always reaches the UI.
async fn forward_views<V, F>(mut views: watch::Receiver<V>, ui_tx: Sender<UiEvent>, wrap: F)
where
    V: Clone,
    F: Fn(V) -> UiEvent,
{
    while views.changed().await.is_ok() {
        let mut event = wrap(views.borrow_and_update().clone());
        loop {
            match ui_tx.try_send(event) {
                Ok(()) => break,
                Err(TrySendError::Disconnected(_)) => {
                    tracing::info!("ui event queue closed; view forwarder exiting");
                    return;
                }
                Err(TrySendError::Full(rejected)) => {
                    if views.has_changed().unwrap_or(false) {
                        tracing::debug!("ui event queue full; superseding stale view");
                        break;
                    }
                    event = rejected;
                    sleep(QUEUE_RETRY_INTERVAL).await;
                }
            }
        }
    }
}

async fn check_health(backend: Arc<HttpBackend>, ui_tx: Sender<UiEvent>) {
    let event = match backend.health().await {
        Ok(()) => UiEvent::Health {
            healthy: true,
            detail: "Backend reachable".to_string(),
        },
        Err(err) => {
            tracing::warn!("health check failed: {err}");
            UiEvent::Health {
                healthy: false,
                detail: format!("Backend unreachable: {}", err.user_message()),
            }
        }
    };
    let _ = ui_tx.try_send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn info_text(event: UiEvent) -> Option<String> {
        match event {
            UiEvent::Info(text) => Some(text),
            _ => None,
        }
    }

    #[tokio::test]
    async fn full_queue_still_delivers_the_latest_view() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        ui_tx
            .try_send(UiEvent::Info("backlog".to_string()))
            .expect("prefill queue");
        let (views_tx, views_rx) = watch::channel(0u32);
        let forwarder = tokio::spawn(forward_views(views_rx, ui_tx, |view: u32| {
            UiEvent::Info(format!("view {view}"))
        }));

        views_tx.send_replace(1);
        sleep(Duration::from_millis(50)).await;
        views_tx.send_replace(2);
        sleep(Duration::from_millis(50)).await;

        let backlog = ui_rx.try_recv().ok().and_then(info_text);
        assert_eq!(backlog.as_deref(), Some("backlog"));
        let latest = tokio::task::spawn_blocking(move || {
            ui_rx.recv_timeout(Duration::from_secs(2)).ok().and_then(info_text)
        })
        .await
        .expect("join");
        assert_eq!(latest.as_deref(), Some("view 2"));

        drop(views_tx);
        forwarder.await.expect("forwarder exits");
    }

    #[tokio::test]
    async fn closed_queue_stops_the_forwarder() {
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        drop(ui_rx);
        let (views_tx, views_rx) = watch::channel(0u32);
        let forwarder = tokio::spawn(forward_views(views_rx, ui_tx, |view: u32| {
            UiEvent::Info(format!("view {view}"))
        }));

        views_tx.send_replace(1);
        tokio::time::timeout(Duration::from_secs(2), forwarder)
            .await
            .expect("forwarder returns")
            .expect("join");
    }
}
