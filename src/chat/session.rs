//! Interactive chat session
//!
//! A rustyline REPL: type a topic to run the draft-refine workflow, then
//! approve, regenerate, or discard the pending result. Each run is an
//! independent workflow invocation with fresh history.

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::domain::{RunOutcome, RunReport, Speaker};
use crate::llm::LlmClient;
use crate::refine::{CancelToken, RefineRunner, WorkflowEvent, create_event_channel};
use crate::storage::{DraftArchive, DraftRecord};

/// Slash commands recognized by the chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Approve,
    Regen,
    Cancel,
    History,
    Help,
    Quit,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        let cmd = input.split_whitespace().next().unwrap_or("");
        match cmd {
            "/approve" | "/a" => Some(Self::Approve),
            "/regen" | "/r" => Some(Self::Regen),
            "/cancel" => Some(Self::Cancel),
            "/history" => Some(Self::History),
            "/help" | "/h" => Some(Self::Help),
            "/quit" | "/q" | "/exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Interactive chat front-end over the draft-refine workflow
pub struct ChatSession<L>
where
    L: LlmClient + 'static,
{
    runner: Arc<RefineRunner<L>>,
    archive: DraftArchive,
    max_messages: usize,
    /// Draft awaiting approval from the most recent run
    pending: Option<RunReport>,
    /// Topic of the most recent run, for /regen
    last_topic: Option<String>,
}

impl<L> ChatSession<L>
where
    L: LlmClient + 'static,
{
    /// Create a new chat session
    pub fn new(runner: Arc<RefineRunner<L>>, archive: DraftArchive, max_messages: usize) -> Self {
        Self {
            runner,
            archive,
            max_messages,
            pending: None,
            last_topic: None,
        }
    }

    /// Run the chat main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl =
            DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match Command::parse(input) {
                            Some(Command::Approve) => self.approve()?,
                            Some(Command::Regen) => self.regenerate().await?,
                            Some(Command::Cancel) => self.discard(),
                            Some(Command::History) => self.print_history(),
                            Some(Command::Help) => self.print_help(),
                            Some(Command::Quit) => break,
                            None => {
                                println!("{} Unknown command: {}", "?".yellow(), input);
                                println!("Type {} for available commands", "/help".yellow());
                            }
                        }
                    } else {
                        self.run_topic(input).await?;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C at the prompt - just show a new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Run the workflow for a topic, printing rounds as they stream in
    async fn run_topic(&mut self, topic: &str) -> Result<()> {
        self.last_topic = Some(topic.to_string());

        let (tx, mut rx) = create_event_channel(32);
        let cancel = CancelToken::new();

        let runner = Arc::clone(&self.runner);
        let task_topic = topic.to_string();
        let task_cancel = cancel.clone();
        let max_messages = self.max_messages;
        let handle = tokio::spawn(async move {
            runner
                .run_with(&task_topic, max_messages, Some(tx), &task_cancel)
                .await
        });

        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => Self::print_event(&event),
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
                    format!("{} rounds, {} tokens", report.rounds, report.usage.total()).dimmed()
                );
                println!(
                    "{} to archive, {} to retry, {} to discard",
                    "/approve".yellow(),
                    "/regen".yellow(),
                    "/cancel".yellow()
                );
                self.pending = Some(report);
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

    /// Archive the pending draft
    fn approve(&mut self) -> Result<()> {
        match self.pending.take() {
            Some(report) => {
                let record = DraftRecord::from_report(&report);
                self.archive.append(&record)?;
                println!(
                    "{} {} -> {}",
                    "Archived".green(),
                    record.id,
                    self.archive.path().display()
                );
            }
            None => println!("{}", "No pending draft to approve.".dimmed()),
        }
        Ok(())
    }

    /// Re-run the workflow for the last topic, discarding the pending draft
    async fn regenerate(&mut self) -> Result<()> {
        match self.last_topic.clone() {
            Some(topic) => {
                self.pending = None;
                self.run_topic(&topic).await
            }
            None => {
                println!("{}", "No topic yet. Type one to get started.".dimmed());
                Ok(())
            }
        }
    }

    /// Discard the pending draft
    fn discard(&mut self) {
        if self.pending.take().is_some() {
            println!("{}", "Draft discarded.".dimmed());
        } else {
            println!("{}", "No pending draft.".dimmed());
        }
    }

    /// Print the transcript of the pending run
    fn print_history(&self) {
        match &self.pending {
            Some(report) => {
                println!();
                for message in report.history.messages() {
                    let label = match message.speaker {
                        Speaker::Human => "Human".bright_green(),
                        Speaker::Agent => "Agent".bright_blue(),
                        Speaker::Critic => "Critic".yellow(),
                    };
                    println!("{}: {}", label, message.text);
                }
                println!();
            }
            None => println!("{}", "No pending draft.".dimmed()),
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Draftr Chat".bright_cyan().bold());
        println!("Type a topic to draft a LinkedIn post about it.");
        println!(
            "Type {} for help, {} to quit",
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:12} Archive the pending draft", "/approve".yellow());
        println!("  {:12} Re-run the workflow for the last topic", "/regen".yellow());
        println!("  {:12} Discard the pending draft", "/cancel".yellow());
        println!("  {:12} Show the transcript of the pending run", "/history".yellow());
        println!("  {:12} Show this help", "/help".yellow());
        println!("  {:12} Exit the chat", "/quit".yellow());
        println!();
        println!("Anything else is treated as a topic and starts a run.");
        println!("Ctrl+C during a run cancels it after the current step.");
        println!();
    }
}
