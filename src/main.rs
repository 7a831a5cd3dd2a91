use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use draftr::chat::ChatSession;
use draftr::cli::Cli;
use draftr::cli::commands::Commands;
use draftr::config::Config;
use draftr::domain::RunOutcome;
use draftr::llm::{AnthropicClient, AnthropicConfig};
use draftr::prompt::PromptStore;
use draftr::refine::{CancelToken, RefineRunner, WorkflowEvent, create_event_channel};
use draftr::storage::{DraftArchive, DraftRecord};
use draftr::tui;

fn setup_logging(config: &Config) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("draftr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("draftr.log");

    // Setup env_logger with file output; RUST_LOG overrides the config level
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_deref().unwrap_or("info")),
    )
    .target(env_logger::Target::Pipe(target))
    .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Build the workflow engine shared by all front-ends
fn build_runner(config: &Config) -> Result<Arc<RefineRunner<AnthropicClient>>> {
    let client = AnthropicClient::new(AnthropicConfig::from(&config.llm))
        .context("Failed to create LLM client")?;
    let prompts = PromptStore::from_config_dir();
    Ok(Arc::new(RefineRunner::new(Arc::new(client), Arc::new(prompts))))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting draftr");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => {
            // Default: launch the dashboard
            run_dashboard(config).await
        }
        Some(Commands::Run {
            topic,
            save,
            max_messages,
        }) => run_once(topic, *save, *max_messages, config).await,
        Some(Commands::Chat) => run_chat(config).await,
    }
}

/// One-shot generation: print each round, the final post, and usage
async fn run_once(topic: &str, save: bool, max_messages: Option<usize>, config: &Config) -> Result<()> {
    let runner = build_runner(config)?;
    let max_messages = max_messages.unwrap_or(config.refine.max_messages);

    let (tx, mut rx) = create_event_channel(32);
    let cancel = CancelToken::new();

    let task_runner = Arc::clone(&runner);
    let task_topic = topic.to_string();
    let task_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        task_runner
            .run_with(&task_topic, max_messages, Some(tx), &task_cancel)
            .await
    });

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => print_event(&event),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                println!("\n{}", "Cancelling after the current step...".yellow());
            }
        }
    }

    let outcome = handle
        .await
        .map_err(|e| eyre::eyre!("Workflow task failed: {}", e))??;

    match outcome {
        RunOutcome::Complete(report) => {
            println!();
            println!("{}", "FINAL LINKEDIN POST".bright_cyan().bold());
            println!("{}", report.draft);
            println!(
                "{}",
                format!(
                    "{} rounds, {} tokens, ${:.4}",
                    report.rounds,
                    report.usage.total(),
                    report.usage.cost_usd(&config.llm.model)
                )
                .dimmed()
            );

            if save {
                let archive = DraftArchive::new(&config.storage.archive_dir)?;
                let record = DraftRecord::from_report(&report);
                archive.append(&record)?;
                println!(
                    "{} {} -> {}",
                    "Archived".green(),
                    record.id,
                    archive.path().display()
                );
            }
        }
        RunOutcome::Cancelled { rounds } => {
            println!("{}", format!("Run cancelled after {} rounds.", rounds).yellow());
        }
    }

    Ok(())
}

fn print_event(event: &WorkflowEvent) {
    match event {
        WorkflowEvent::RoundStarted { round } => {
            println!("{}", format!("--- round {} ---", round).dimmed());
        }
        WorkflowEvent::DraftReady { text, .. } => {
            println!("{} {}", "Agent >>".bright_blue(), text);
        }
        WorkflowEvent::CritiqueReady { text, .. } => {
            println!("{} {}", "Critic >>".yellow(), text);
        }
        WorkflowEvent::Finished { .. } => {}
    }
}

async fn run_chat(config: &Config) -> Result<()> {
    let runner = build_runner(config)?;
    let archive = DraftArchive::new(&config.storage.archive_dir)?;

    let mut session = ChatSession::new(runner, archive, config.refine.max_messages);
    session.run().await
}

async fn run_dashboard(config: &Config) -> Result<()> {
    let runner = build_runner(config)?;
    let archive = DraftArchive::new(&config.storage.archive_dir)?;

    info!("Launching dashboard");
    let terminal = tui::init_terminal()?;
    let mut dashboard = tui::TuiRunner::new(
        terminal,
        runner,
        archive,
        config.refine.max_messages,
        config.tui.tick_rate_ms,
    );
    let result = dashboard.run().await;
    tui::restore_terminal()?;
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging
    setup_logging(&config).context("Failed to setup logging")?;

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
