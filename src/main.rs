//! Turkpost - Main Entry Point
//!
//! Dispatches the work items named in an items file to the marketplace and
//! polls each one to completion on its own task. The feed that discovers
//! items and the action that consumes answers live outside this binary; here
//! answers are handed to the downstream consumer as structured log events.

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use turkpost::config::AppConfig;
use turkpost::dispatch::TaskDispatcher;
use turkpost::marketplace::{MarketplaceClient, QuestionForm};
use turkpost::observability::init_default_logging;
use turkpost::poller::{CompletionPoller, PollOutcome};
use turkpost::task::WorkItem;

/// Human-task dispatch and completion polling
#[derive(Parser)]
#[command(name = "turkpost")]
#[command(about = "Dispatches human work tasks to a marketplace and polls them to completion")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", default_value = "turkpost.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch the work items in FILE and poll each to completion
    Run {
        /// TOML file listing the work items to dispatch
        #[arg(value_name = "FILE")]
        items: PathBuf,
    },
    /// Validate configuration
    Config {
        /// Show the resolved configuration
        #[arg(long)]
        show: bool,
    },
}

/// One entry of the items file
#[derive(Debug, Deserialize)]
struct ItemSpec {
    external_id: String,
    title: String,
    description: String,
    /// Question text shown to the worker
    question: String,
}

#[derive(Debug, Deserialize)]
struct ItemsFile {
    #[serde(default)]
    items: Vec<ItemSpec>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("Starting turkpost v{}", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::load_from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run { items } => run(config, &items).await,
        Commands::Config { show } => handle_config_command(&config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Shutdown complete");
}

async fn run(config: AppConfig, items_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Missing credentials are a startup error, never a runtime one.
    let credentials = config.credentials()?;
    let client = Arc::new(MarketplaceClient::new(&config.marketplace, credentials)?);

    let content = std::fs::read_to_string(items_path)?;
    let items_file: ItemsFile = toml::from_str(&content)?;
    if items_file.items.is_empty() {
        warn!(file = %items_path.display(), "items file contains no work items");
        return Ok(());
    }

    info!(count = items_file.items.len(), "dispatching work items");

    // One independent task per work item; they share nothing mutable.
    let mut workers = JoinSet::new();
    for spec in items_file.items {
        let client = client.clone();
        let defaults = config.task.clone();
        let tick = config.poll.tick();

        workers.spawn(async move {
            let form = QuestionForm::free_text(
                spec.external_id.as_str(),
                spec.title.as_str(),
                spec.question.as_str(),
            );
            let body = match form.to_xml() {
                Ok(body) => body,
                Err(e) => {
                    error!(external_id = %spec.external_id, error = %e, "failed to render question");
                    return;
                }
            };
            let item = WorkItem::from_defaults(
                spec.external_id,
                spec.title,
                spec.description,
                body,
                &defaults,
            );

            let dispatcher = TaskDispatcher::new(client.clone());
            let handle = match dispatcher.dispatch(&item).await {
                Ok(handle) => handle,
                // A failed dispatch aborts this item; no task record is kept.
                Err(_) => return,
            };

            let poller = CompletionPoller::new(client, tick);
            match poller.run(&handle, defaults.lifetime()).await {
                PollOutcome::Answered(answer) => {
                    // Downstream consumer hook: the answer leaves the core here.
                    info!(
                        external_id = %item.external_id,
                        task_id = %handle.task_id,
                        answer = %answer,
                        "work item answered"
                    );
                }
                PollOutcome::TimedOut => {
                    warn!(
                        external_id = %item.external_id,
                        task_id = %handle.task_id,
                        "work item timed out without an answer"
                    );
                }
            }
        });
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            error!("worker task panicked: {}", e);
        }
    }

    Ok(())
}

fn handle_config_command(config: &AppConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    info!("Configuration is valid");
    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}
