use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::{load_settings_from, SETTINGS_FILE},
    render_patent_list, DashboardController, HttpBackend, Pacing, PatentBackend, PatentListView,
    PatentSubmissionForm, RegistrationForm, Settings, WorkflowController,
};
use shared::domain::IdeaId;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Register patent ideas and their ledger proofs from the terminal")]
struct Cli {
    /// Settings file layered under environment overrides.
    #[arg(long, default_value = SETTINGS_FILE)]
    settings: PathBuf,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    dashboard_url: Option<String>,
    /// Skip the cosmetic pauses between stages.
    #[arg(long)]
    no_delay: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full staged flow: register, submit, summarize, prove.
    Workflow(WorkflowArgs),
    /// Re-check the status of a submitted idea.
    Status {
        #[arg(long)]
        idea_id: String,
    },
    /// Ping the workflow backend.
    Health,
    #[command(subcommand)]
    Dashboard(DashboardCommand),
}

#[derive(Args, Debug)]
struct Identity {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    wallet: String,
}

#[derive(Args, Debug)]
struct WorkflowArgs {
    #[command(flatten)]
    identity: Identity,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long)]
    idea: String,
    /// Stop after the AI summary instead of registering the proof.
    #[arg(long)]
    skip_proof: bool,
}

#[derive(Subcommand, Debug)]
enum DashboardCommand {
    /// Submit a patent in one call and optionally register it on the ledger.
    Submit {
        #[command(flatten)]
        identity: Identity,
        #[arg(long)]
        idea: String,
        #[arg(long)]
        register: bool,
    },
    /// List submitted patents.
    List,
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = load_settings_from(&cli.settings);
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(url) = &cli.dashboard_url {
        settings.dashboard_base_url = url.clone();
    }
    settings.validate().context("invalid client settings")?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    let pacing = if cli.no_delay {
        Pacing::immediate()
    } else {
        Pacing::from_settings(&settings)
    };
    let backend = Arc::new(HttpBackend::from_settings(&settings)?);
    info!(api = backend.api_base_url(), dashboard = backend.dashboard_base_url(), "backend configured");

    match cli.command {
        Command::Workflow(args) => run_workflow(backend, pacing, args).await,
        Command::Status { idea_id } => {
            backend
                .idea_status(&IdeaId::new(idea_id))
                .await
                .map_err(|err| anyhow::anyhow!("Status error: {}", err.user_message()))?;
            println!("Status refreshed");
            Ok(())
        }
        Command::Health => {
            backend.health().await.context("backend health check failed")?;
            println!("Backend is healthy");
            Ok(())
        }
        Command::Dashboard(command) => run_dashboard(backend, command).await,
    }
}

async fn run_workflow(backend: Arc<HttpBackend>, pacing: Pacing, args: WorkflowArgs) -> Result<()> {
    let mut controller = WorkflowController::new(backend, pacing);
    let form = RegistrationForm {
        full_name: args.identity.name,
        email: args.identity.email,
        phone: args.phone,
        country: args.country,
        wallet_address: args.identity.wallet,
    };

    controller.start().await;
    let user_id = controller.register(&form).await.map_err(|_| alert(&controller))?;
    println!("Account created: {user_id}");

    let summary = controller
        .submit_idea(&args.idea)
        .await
        .map_err(|_| alert(&controller))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    if args.skip_proof {
        return Ok(());
    }

    let certificate = controller
        .register_proof()
        .await
        .map_err(|_| alert(&controller))?;
    println!("{}", serde_json::to_string_pretty(&certificate)?);
    Ok(())
}

fn alert(controller: &WorkflowController) -> anyhow::Error {
    anyhow::anyhow!(controller
        .view()
        .alert
        .clone()
        .unwrap_or_else(|| client_core::GENERIC_ERROR_MESSAGE.to_string()))
}

async fn run_dashboard(backend: Arc<HttpBackend>, command: DashboardCommand) -> Result<()> {
    let mut controller = DashboardController::new(backend);
    match command {
        DashboardCommand::Submit {
            identity,
            idea,
            register,
        } => {
            let form = PatentSubmissionForm {
                full_name: identity.name,
                email: identity.email,
                wallet_address: identity.wallet,
                raw_idea: idea,
            };
            let result = controller
                .submit(&form)
                .await
                .map_err(|err| anyhow::anyhow!("Error: {}", err.user_message()))?;
            println!("Patent id: {}", result.patent_id);
            if let Some(structured) = &result.structured {
                println!("{}", serde_json::to_string_pretty(structured)?);
            }
            if register {
                let hash = controller
                    .register_on_chain()
                    .await
                    .map_err(|err| anyhow::anyhow!("Error: {}", err.user_message()))?;
                println!("Transaction hash: {hash}");
            }
            Ok(())
        }
        DashboardCommand::List => {
            controller
                .reload()
                .await
                .map_err(|err| anyhow::anyhow!("Error: {}", err.user_message()))?;
            match render_patent_list(&controller.view().patents) {
                PatentListView::Empty { message } => println!("{message}"),
                PatentListView::Entries(entries) => {
                    for entry in entries {
                        println!(
                            "{}  [{}]  {}  {}",
                            entry.created_at, entry.status_label, entry.id, entry.title
                        );
                        if let Some(hash) = entry.transaction_hash {
                            println!("    tx {hash}");
                        }
                    }
                }
            }
            Ok(())
        }
    }
}
