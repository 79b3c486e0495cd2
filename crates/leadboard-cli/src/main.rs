mod display;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use leadboard_core::config::DEFAULT_API_URL;
use leadboard_core::{
    AssignmentConfig, DetailConfig, ImageSelection, SourceConfig, ViewState, WorkloadConfig,
};
use leadboard_sync::{AirtableClient, MemorySource, RecordSource};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::display::{DetailView, assignment_card, detail_card, render_state, workload_card};

#[derive(Parser)]
#[command(
    name = "leadboard",
    version,
    about = "Team lead workload, lead assignment, and product detail reports from an Airtable base"
)]
struct Cli {
    /// Personal access token sent as a bearer credential.
    #[arg(long, env = "AIRTABLE_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[arg(long, env = "AIRTABLE_BASE_ID", global = true)]
    base_id: Option<String>,

    #[arg(long, env = "AIRTABLE_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// HTTP request timeout. Unset leaves the transport default.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Records per listing page.
    #[arg(long, global = true)]
    page_size: Option<u32>,

    /// Serve tables from a JSON fixture (`{"<table>": [records]}`) instead of the API.
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Print the view state as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Per-employee lead workload for one department.
    Workload {
        /// JSON file overriding table names, field labels, and categories.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Department to report on.
        #[arg(long)]
        department: Option<String>,
    },
    /// Show one product record.
    Detail {
        #[arg(long)]
        record_id: String,
        #[arg(long, env = "AIRTABLE_TABLE_NAME", default_value = "Products")]
        table: String,
        /// Index of the image to mark as shown.
        #[arg(long, default_value_t = 0)]
        image: usize,
    },
    /// Count assigned and unassigned leads.
    Assignment {
        #[arg(long, env = "AIRTABLE_TABLE", default_value = "Leads")]
        table: String,
        #[arg(long, env = "AIRTABLE_FIELD", default_value = "Assigned To")]
        field: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("leadboard v{}", env!("CARGO_PKG_VERSION"));
    let source = open_source(&cli)?;

    let ok = match &cli.command {
        Command::Workload { config, department } => {
            let mut config = match config {
                Some(path) => load_workload_config(path)?,
                None => WorkloadConfig::default(),
            };
            if let Some(dept) = department {
                config.target_department = dept.clone();
            }
            let state = match &source {
                Ok(src) => {
                    loading(&cli, "Loading team data...");
                    ViewState::from_result(
                        leadboard_metrics::run_workload(src.as_ref(), &config, cli.page_size).await,
                    )
                }
                Err(msg) => ViewState::Error(msg.clone()),
            };
            emit(&cli, &state, |report| workload_card(report, &config.categories))?
        }
        Command::Detail {
            record_id,
            table,
            image,
        } => {
            let config = DetailConfig::new(table.clone());
            let state = match &source {
                Ok(src) => {
                    loading(&cli, "Loading product data...");
                    ViewState::from_result(
                        leadboard_metrics::fetch_detail(src.as_ref(), &config, record_id).await,
                    )
                }
                Err(msg) => ViewState::Error(msg.clone()),
            };
            let mut selection = ImageSelection::default();
            if let ViewState::Ready(detail) = &state
                && *image > 0
                && !selection.select(detail, *image)
            {
                tracing::warn!(image, available = detail.images.len(), "image index out of range");
            }
            if cli.json {
                let view = match &state {
                    ViewState::Loading => ViewState::Loading,
                    ViewState::Error(msg) => ViewState::Error(msg.clone()),
                    ViewState::Ready(detail) => ViewState::Ready(DetailView::new(detail, selection)),
                };
                print_json(&view)?;
                state.is_ready()
            } else {
                emit(&cli, &state, |detail| detail_card(detail, selection))?
            }
        }
        Command::Assignment { table, field } => {
            let config = AssignmentConfig {
                table: table.clone(),
                assigned_field: field.clone(),
            };
            let state = match &source {
                Ok(src) => {
                    loading(&cli, "Loading lead assignments...");
                    ViewState::from_result(
                        leadboard_metrics::fetch_assignment_counts(
                            src.as_ref(),
                            &config,
                            cli.page_size,
                        )
                        .await,
                    )
                }
                Err(msg) => ViewState::Error(msg.clone()),
            };
            emit(&cli, &state, assignment_card)?
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// The record source for this run.
///
/// File problems with `--fixture` are reported through `anyhow`; an
/// incomplete source configuration becomes the run's error state so it is
/// rendered like any other failure, before any request is made.
fn open_source(cli: &Cli) -> anyhow::Result<Result<Box<dyn RecordSource>, String>> {
    if let Some(path) = &cli.fixture {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let source = MemorySource::from_json(&json)
            .with_context(|| format!("loading fixture {}", path.display()))?;
        tracing::info!(fixture = %path.display(), "serving tables from fixture");
        return Ok(Ok(Box::new(source)));
    }

    let config = SourceConfig {
        api_url: cli.api_url.clone(),
        base_id: cli.base_id.clone().unwrap_or_default(),
        api_key: cli.api_key.clone().unwrap_or_default(),
        timeout_secs: cli.timeout_secs,
    };
    Ok(AirtableClient::new(&config)
        .map(|c| Box::new(c) as Box<dyn RecordSource>)
        .map_err(|e| e.to_string()))
}

fn load_workload_config(path: &Path) -> anyhow::Result<WorkloadConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading workload config {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("parsing workload config {}", path.display()))
}

fn loading(cli: &Cli, message: &str) {
    if !cli.json {
        eprint!("{}", render_state::<()>(&ViewState::Loading, message, |_| String::new()));
    }
}

/// Print `state` as text or JSON. Returns whether the run succeeded.
fn emit<T: Serialize>(
    cli: &Cli,
    state: &ViewState<T>,
    ready: impl Fn(&T) -> String,
) -> anyhow::Result<bool> {
    if cli.json {
        print_json(state)?;
    } else {
        let text = render_state(state, "", ready);
        match state {
            ViewState::Error(_) => eprint!("{text}"),
            _ => print!("{text}"),
        }
    }
    Ok(state.is_ready())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serialising output")?
    );
    Ok(())
}
