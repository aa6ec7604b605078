mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{config::load_settings_from, load_settings, Settings};
use constellation::ConstellationConfig;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::PatentDesktopApp;

#[derive(Parser, Debug)]
#[command(about = "Desktop front end for registering patent ideas and their ledger proofs")]
struct Cli {
    /// Settings file; defaults to `patent_client.toml` in the working directory.
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    dashboard_url: Option<String>,
    /// Skip the cosmetic pauses between stages.
    #[arg(long)]
    no_delay: bool,
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(url) = &cli.dashboard_url {
        settings.dashboard_base_url = url.clone();
    }
    if cli.no_delay {
        settings.transition_delay_ms = 0;
        settings.summary_delay_ms = 0;
        settings.certificate_delay_ms = 0;
    }
    settings.validate().context("invalid client settings")?;
    Ok(settings)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    let constellation = ConstellationConfig {
        particle_count: settings.particle_count,
        connection_threshold_px: settings.connection_threshold_px,
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Patent Proof")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Patent Proof",
        options,
        Box::new(move |_cc| Ok(Box::new(PatentDesktopApp::new(cmd_tx, ui_rx, constellation)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop gui exited with error: {err}"))
}
