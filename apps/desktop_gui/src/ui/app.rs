use std::time::{Duration, Instant};

use client_core::{
    DashboardTab, DashboardView, NoticeSeverity, PatentListView, PatentSubmissionForm,
    RegistrationForm, Section, WorkflowView,
};
use constellation::ConstellationConfig;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::PatentStatus;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{GuiState, HealthState};
use crate::ui::background::ConstellationBackground;

const LOADER_HOLD: Duration = Duration::from_secs(2);
const LOADER_FADE: Duration = Duration::from_millis(500);
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const CARD_WIDTH: f32 = 560.0;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 170, 255);
const CARD_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(12, 20, 40, 225);
const SUCCESS_FILL: egui::Color32 = egui::Color32::from_rgb(28, 92, 64);
const ERROR_FILL: egui::Color32 = egui::Color32::from_rgb(111, 53, 53);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Workflow,
    Dashboard,
}

/// Loader opacity: fully opaque for the hold period, then a linear fade.
pub fn loader_opacity(since_launch: Duration) -> f32 {
    if since_launch <= LOADER_HOLD {
        return 1.0;
    }
    let fading = since_launch - LOADER_HOLD;
    (1.0 - fading.as_secs_f32() / LOADER_FADE.as_secs_f32()).max(0.0)
}

pub fn status_color(status: PatentStatus) -> egui::Color32 {
    match status {
        PatentStatus::Draft => egui::Color32::from_rgb(150, 150, 160),
        PatentStatus::Submitted => egui::Color32::from_rgb(230, 180, 60),
        PatentStatus::OnBlockchain => egui::Color32::from_rgb(70, 200, 120),
        PatentStatus::Rejected => egui::Color32::from_rgb(220, 90, 90),
        PatentStatus::Unknown => egui::Color32::from_rgb(150, 130, 200),
    }
}

pub struct PatentDesktopApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: GuiState,
    background: ConstellationBackground,
    launched_at: Instant,
    screen: Screen,
    started: bool,
    registration: RegistrationForm,
    idea_draft: String,
    patent_form: PatentSubmissionForm,
    outbox: Vec<BackendCommand>,
}

impl PatentDesktopApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        constellation: ConstellationConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: GuiState::default(),
            background: ConstellationBackground::new(constellation),
            launched_at: Instant::now(),
            screen: Screen::Workflow,
            started: false,
            registration: RegistrationForm::default(),
            idea_draft: String::new(),
            patent_form: PatentSubmissionForm::default(),
            outbox: vec![BackendCommand::CheckHealth],
        }
    }

    fn process_ui_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.ui_rx.try_recv() {
            self.state.apply(event, now);
        }
        self.state.prune_toasts(now);
    }

    fn flush_outbox(&mut self) {
        for cmd in self.outbox.drain(..) {
            if let Some(status) = dispatch_backend_command(&self.cmd_tx, cmd) {
                tracing::warn!("{status}");
                self.state.status = status;
                self.state.status_is_error = true;
            }
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::NONE
                    .fill(CARD_FILL)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Patent Proof")
                            .strong()
                            .size(18.0)
                            .color(ACCENT),
                    );
                    ui.add_space(16.0);
                    for (screen, label) in [
                        (Screen::Workflow, "Guided submission"),
                        (Screen::Dashboard, "Dashboard"),
                    ] {
                        if ui.selectable_label(self.screen == screen, label).clicked()
                            && self.screen != screen
                        {
                            self.screen = screen;
                            if screen == Screen::Dashboard
                                && self.state.dashboard.tab == DashboardTab::Patents
                            {
                                self.outbox.push(BackendCommand::ReloadPatents);
                            }
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Check backend").clicked() {
                            self.outbox.push(BackendCommand::CheckHealth);
                        }
                        let (dot, hover) = match &self.state.health {
                            HealthState::Unknown => (egui::Color32::GRAY, "Backend not checked yet".to_string()),
                            HealthState::Healthy => (SUCCESS_FILL, "Backend reachable".to_string()),
                            HealthState::Unreachable(detail) => (ERROR_FILL, detail.clone()),
                        };
                        let (rect, response) =
                            ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                        ui.painter().circle_filled(rect.center(), 5.0, dot);
                        let _ = response.on_hover_text(hover);
                    });
                });
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::NONE
                    .fill(CARD_FILL)
                    .inner_margin(egui::Margin::symmetric(12, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let color = if self.state.status_is_error {
                        egui::Color32::from_rgb(230, 140, 140)
                    } else {
                        ui.visuals().weak_text_color()
                    };
                    let response = ui.small(egui::RichText::new(&self.state.status).color(color));
                    if let Some(err) = self.state.last_error.as_ref().filter(|_| self.state.status_is_error) {
                        let _ = response.on_hover_text(err.message());
                    }
                });
            });
    }

    fn show_workflow(&mut self, ui: &mut egui::Ui) {
        let view = self.state.workflow.clone();
        let blocked = view.alert.is_some();

        ui.add_enabled_ui(!blocked, |ui| match view.active {
            None if !self.started && view.session.user_id.is_none() => self.show_hero(ui),
            None => self.show_in_flight(ui, &view),
            Some(Section::Register) => self.show_register(ui, &view),
            Some(Section::SubmitIdea) => self.show_submit_idea(ui, &view),
            Some(Section::AiSummary) => self.show_summary(ui, &view),
            Some(Section::Certificate) => self.show_certificate(ui, &view),
        });
    }

    fn show_hero(&mut self, ui: &mut egui::Ui) {
        card(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("Protect your invention")
                        .strong()
                        .size(26.0),
                );
                ui.add_space(6.0);
                ui.label("Describe your idea, get an AI-written summary and anchor a proof of it on a public ledger.");
                ui.add_space(14.0);
                let start = egui::Button::new(egui::RichText::new("Get started").strong().size(16.0))
                    .fill(ACCENT)
                    .min_size(egui::vec2(180.0, 38.0));
                if ui.add(start).clicked() {
                    self.started = true;
                    self.outbox.push(BackendCommand::Start);
                }
            });
        });
    }

    fn show_in_flight(&mut self, ui: &mut egui::Ui, view: &WorkflowView) {
        card(ui, |ui| {
            if let Some(step) = view.retryable_step() {
                ui.label(egui::RichText::new(format!("{} failed.", step.describe())).strong());
                ui.add_space(8.0);
                if ui.button("Retry").clicked() {
                    self.outbox.push(BackendCommand::RetryPending);
                }
                return;
            }
            ui.horizontal(|ui| {
                ui.spinner();
                let label = view
                    .pending
                    .map(|step| format!("{}...", step.describe()))
                    .unwrap_or_else(|| "Loading...".to_string());
                ui.label(label);
            });
        });
    }

    fn show_register(&mut self, ui: &mut egui::Ui, view: &WorkflowView) {
        card(ui, |ui| {
            section_title(ui, Section::Register);
            let form = &mut self.registration;
            text_field(ui, "reg_name", "Full name", "Ada Lovelace", &mut form.full_name);
            text_field(ui, "reg_email", "Email", "ada@example.com", &mut form.email);
            text_field(ui, "reg_phone", "Phone (optional)", "+33 1 23 45 67 89", &mut form.phone);
            text_field(ui, "reg_country", "Country (optional)", "France", &mut form.country);
            text_field(ui, "reg_wallet", "Wallet address", "0x...", &mut form.wallet_address);
            ui.add_space(10.0);
            if primary_button(ui, "Create account", !view.busy).clicked() {
                self.outbox
                    .push(BackendCommand::Register(self.registration.clone()));
            }
        });
    }

    fn show_submit_idea(&mut self, ui: &mut egui::Ui, view: &WorkflowView) {
        card(ui, |ui| {
            section_title(ui, Section::SubmitIdea);
            ui.add(
                egui::TextEdit::multiline(&mut self.idea_draft)
                    .id_salt("idea_draft")
                    .hint_text("What problem does it solve, and how?")
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(10.0);
            if primary_button(ui, "Submit idea", !view.busy).clicked() {
                self.outbox.push(BackendCommand::SubmitIdea {
                    raw_idea: self.idea_draft.clone(),
                });
            }
        });
    }

    fn show_summary(&mut self, ui: &mut egui::Ui, view: &WorkflowView) {
        card(ui, |ui| {
            section_title(ui, Section::AiSummary);
            if let Some(summary) = &view.summary {
                egui::Grid::new("summary_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        for (label, value) in [
                            ("Title", &summary.title),
                            ("Problem", &summary.problem),
                            ("Solution", &summary.solution),
                            ("Claim", &summary.claim),
                            ("CPC code", &summary.cpc_code),
                        ] {
                            ui.label(egui::RichText::new(label).strong());
                            ui.label(value);
                            ui.end_row();
                        }
                    });
            }
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if primary_button(ui, "Register proof", !view.busy).clicked() {
                    self.outbox.push(BackendCommand::RegisterProof);
                }
                if ui.add_enabled(!view.busy, egui::Button::new("Check status")).clicked() {
                    self.outbox.push(BackendCommand::CheckStatus);
                }
            });
        });
    }

    fn show_certificate(&mut self, ui: &mut egui::Ui, view: &WorkflowView) {
        card(ui, |ui| {
            section_title(ui, Section::Certificate);
            if let Some(certificate) = &view.certificate {
                egui::Grid::new("certificate_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("Hash").strong());
                        ui.label(egui::RichText::new(&certificate.hash).monospace());
                        ui.end_row();
                        ui.label(egui::RichText::new("Timestamp").strong());
                        ui.label(&certificate.timestamp);
                        ui.end_row();
                    });
                ui.add_space(8.0);
                ui.hyperlink_to("View on ledger explorer", &certificate.explorer_url);
            }
            ui.add_space(10.0);
            if ui.add_enabled(!view.busy, egui::Button::new("Check status")).clicked() {
                self.outbox.push(BackendCommand::CheckStatus);
            }
        });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.workflow.alert.clone() else {
            return;
        };
        egui::Window::new("alert_window")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(
                egui::Frame::NONE
                    .fill(ERROR_FILL)
                    .corner_radius(10.0)
                    .inner_margin(egui::Margin::symmetric(18, 14)),
            )
            .show(ctx, |ui| {
                ui.set_max_width(380.0);
                ui.label(egui::RichText::new(&message).color(egui::Color32::WHITE));
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.state.workflow.alert = None;
                        self.outbox.push(BackendCommand::DismissAlert);
                    }
                });
            });
    }

    fn show_dashboard(&mut self, ui: &mut egui::Ui) {
        let view = self.state.dashboard.clone();
        card(ui, |ui| {
            ui.horizontal(|ui| {
                for tab in [DashboardTab::Submit, DashboardTab::Patents] {
                    if ui.selectable_label(view.tab == tab, tab.label()).clicked() && view.tab != tab {
                        self.state.dashboard.tab = tab;
                        self.outbox.push(BackendCommand::SelectDashboardTab(tab));
                    }
                }
            });
            ui.separator();
            match self.state.dashboard.tab {
                DashboardTab::Submit => self.show_dashboard_submit(ui, &view),
                DashboardTab::Patents => self.show_patent_list(ui, &view),
            }
        });
    }

    fn show_dashboard_submit(&mut self, ui: &mut egui::Ui, view: &DashboardView) {
        let form = &mut self.patent_form;
        text_field(ui, "dash_name", "Full name", "Ada Lovelace", &mut form.full_name);
        text_field(ui, "dash_email", "Email", "ada@example.com", &mut form.email);
        text_field(ui, "dash_wallet", "Wallet address", "0x...", &mut form.wallet_address);
        ui.label(egui::RichText::new("Idea").strong());
        ui.add(
            egui::TextEdit::multiline(&mut form.raw_idea)
                .id_salt("dash_idea")
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(10.0);
        if primary_button(ui, "Submit patent", !view.busy).clicked() {
            self.outbox
                .push(BackendCommand::SubmitPatent(self.patent_form.clone()));
        }

        let Some(submission) = &view.last_submission else {
            return;
        };
        ui.add_space(14.0);
        ui.separator();
        ui.label(egui::RichText::new(format!("Patent {}", submission.patent_id)).strong());
        if let Some(structured) = &submission.structured {
            ui.label(egui::RichText::new(&structured.title).size(16.0));
            if !structured.summary.is_empty() {
                ui.label(&structured.summary);
            }
            if let Some(score) = structured.novelty_score {
                ui.label(format!("Novelty score: {score}/100"));
            }
            if !structured.claims.is_empty() {
                ui.label(egui::RichText::new("Claims").strong());
                for (index, claim) in structured.claims.iter().enumerate() {
                    ui.label(format!("{}. {claim}", index + 1));
                }
            }
        }
        ui.add_space(8.0);
        match &submission.transaction_hash {
            Some(hash) => {
                ui.label(egui::RichText::new(format!("Transaction: {hash}")).monospace());
            }
            None => {
                if primary_button(ui, "Register on blockchain", view.can_register_on_chain())
                    .clicked()
                {
                    self.outbox.push(BackendCommand::RegisterOnChain);
                }
            }
        }
    }

    fn show_patent_list(&mut self, ui: &mut egui::Ui, view: &DashboardView) {
        ui.horizontal(|ui| {
            if ui.add_enabled(!view.busy, egui::Button::new("Reload")).clicked() {
                self.outbox.push(BackendCommand::ReloadPatents);
            }
            if view.busy {
                ui.spinner();
            }
        });
        ui.add_space(6.0);
        if !view.loaded && view.busy {
            return;
        }
        match view.patent_list() {
            PatentListView::Empty { message } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    ui.label(egui::RichText::new(message).weak());
                });
            }
            PatentListView::Entries(entries) => {
                egui::ScrollArea::vertical()
                    .max_height(420.0)
                    .show(ui, |ui| {
                        for entry in entries {
                            egui::Frame::NONE
                                .fill(ui.visuals().faint_bg_color)
                                .corner_radius(8.0)
                                .inner_margin(egui::Margin::symmetric(12, 8))
                                .show(ui, |ui| {
                                    ui.set_width(ui.available_width());
                                    ui.horizontal(|ui| {
                                        ui.label(egui::RichText::new(&entry.title).strong());
                                        ui.with_layout(
                                            egui::Layout::right_to_left(egui::Align::Center),
                                            |ui| {
                                                ui.label(
                                                    egui::RichText::new(entry.status_label)
                                                        .color(status_color(entry.status)),
                                                );
                                            },
                                        );
                                    });
                                    if !entry.summary.is_empty() {
                                        ui.label(&entry.summary);
                                    }
                                    ui.small(egui::RichText::new(&entry.created_at).weak());
                                    if let Some(hash) = &entry.transaction_hash {
                                        ui.small(egui::RichText::new(hash).monospace());
                                    }
                                });
                            ui.add_space(6.0);
                        }
                    });
            }
        }
    }

    fn show_toasts(&self, ctx: &egui::Context) {
        if self.state.toasts.is_empty() {
            return;
        }
        let now = Instant::now();
        egui::Area::new(egui::Id::new("toasts"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 56.0])
            .interactable(false)
            .show(ctx, |ui| {
                for toast in &self.state.toasts {
                    let opacity = toast.opacity(now);
                    let fill = match toast.severity {
                        NoticeSeverity::Success => SUCCESS_FILL,
                        NoticeSeverity::Error => ERROR_FILL,
                    };
                    egui::Frame::NONE
                        .fill(fill.gamma_multiply(opacity))
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(12, 8))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&toast.message)
                                    .color(egui::Color32::WHITE.gamma_multiply(opacity)),
                            );
                        });
                    ui.add_space(6.0);
                }
            });
    }

    fn show_loader(&self, ctx: &egui::Context) {
        let opacity = loader_opacity(self.launched_at.elapsed());
        if opacity <= 0.0 {
            return;
        }
        let rect = ctx.screen_rect();
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("loader"),
        ));
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(6, 10, 24).gamma_multiply(opacity));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Patent Proof",
            egui::FontId::proportional(32.0),
            ACCENT.gamma_multiply(opacity),
        );
        painter.text(
            rect.center() + egui::vec2(0.0, 36.0),
            egui::Align2::CENTER_CENTER,
            "Loading...",
            egui::FontId::proportional(14.0),
            egui::Color32::LIGHT_GRAY.gamma_multiply(opacity),
        );
    }
}

fn card(ui: &mut egui::Ui, add: impl FnOnce(&mut egui::Ui)) {
    ui.vertical_centered(|ui| {
        ui.set_max_width(CARD_WIDTH);
        egui::Frame::NONE
            .fill(CARD_FILL)
            .stroke(egui::Stroke::new(1.0, ACCENT.gamma_multiply(0.35)))
            .corner_radius(14.0)
            .inner_margin(egui::Margin::symmetric(20, 18))
            .show(ui, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::Min), add);
            });
    });
}

fn section_title(ui: &mut egui::Ui, section: Section) {
    ui.label(egui::RichText::new(section.title()).strong().size(20.0));
    ui.add_space(10.0);
}

fn text_field(ui: &mut egui::Ui, id: &'static str, label: &str, hint: &str, value: &mut String) {
    ui.label(egui::RichText::new(label).strong());
    let edit = egui::TextEdit::singleline(value)
        .id_salt(id)
        .hint_text(hint)
        .desired_width(f32::INFINITY);
    ui.add_sized([ui.available_width(), 30.0], edit);
    ui.add_space(4.0);
}

fn primary_button(ui: &mut egui::Ui, label: &str, enabled: bool) -> egui::Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(egui::RichText::new(label).strong())
            .fill(ACCENT.gamma_multiply(0.8))
            .min_size(egui::vec2(160.0, 34.0)),
    )
}

impl eframe::App for PatentDesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let until_background_event = self.background.paint(ctx);

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.inner_margin(egui::Margin::symmetric(16, 24)))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| match self.screen {
                    Screen::Workflow => self.show_workflow(ui),
                    Screen::Dashboard => self.show_dashboard(ui),
                });
            });
        self.show_alert(ctx);
        self.show_toasts(ctx);
        self.show_loader(ctx);

        self.flush_outbox();
        ctx.request_repaint_after(until_background_event.min(FRAME_INTERVAL));
    }
}
