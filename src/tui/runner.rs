//! Dashboard runner - main event loop.
//!
//! The `TuiRunner` owns the terminal, app, and event handler. It runs the
//! main loop: render, handle events, process pending actions, repeat.
//! Workflow runs execute on a spawned task; their events are drained into
//! the transcript on each tick so the UI stays responsive.

use std::sync::Arc;

use eyre::Result;
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views::render;
use crate::domain::RunOutcome;
use crate::llm::LlmClient;
use crate::refine::{CancelToken, RefineRunner, WorkflowEvent, create_event_channel};
use crate::storage::{DraftArchive, DraftRecord};

/// A workflow run in flight.
struct ActiveRun {
    handle: JoinHandle<crate::error::Result<RunOutcome>>,
    events: mpsc::Receiver<WorkflowEvent>,
    cancel: CancelToken,
}

/// Main dashboard runner that owns the event loop.
pub struct TuiRunner<L>
where
    L: LlmClient + 'static,
{
    /// The terminal instance
    terminal: Tui,
    /// Application state and input handling
    app: App,
    /// Event handler for keyboard and tick events
    event_handler: EventHandler,
    /// Workflow engine
    runner: Arc<RefineRunner<L>>,
    /// Archive for approved drafts
    archive: DraftArchive,
    /// The run currently in flight, if any
    active_run: Option<ActiveRun>,
}

impl<L> TuiRunner<L>
where
    L: LlmClient + 'static,
{
    /// Create a new dashboard runner.
    pub fn new(
        terminal: Tui,
        runner: Arc<RefineRunner<L>>,
        archive: DraftArchive,
        max_messages: usize,
        tick_rate_ms: u64,
    ) -> Self {
        Self {
            terminal,
            app: App::new(max_messages),
            event_handler: EventHandler::new(tick_rate_ms),
            runner,
            archive,
            active_run: None,
        }
    }

    /// Get a reference to the app.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the app.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Run the main dashboard loop.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting dashboard main loop");

        loop {
            // 1. Render current state
            self.terminal.draw(|f| render(self.app.state(), f))?;

            // 2. Handle events (keyboard, tick)
            let event = self.event_handler.next().await?;
            match event {
                Event::Key(key) => self.app.handle_key(key),
                Event::Tick => self.poll_run().await?,
                Event::Resize(_, _) => {
                    // Terminal will handle resize on next draw
                }
            }

            // 3. Process pending actions
            self.process_pending()?;

            // 4. Check for quit
            if self.app.state().should_quit {
                if let Some(run) = &self.active_run {
                    run.cancel.cancel();
                }
                break;
            }
        }

        info!("Dashboard main loop ended");
        Ok(())
    }

    /// Drain workflow events and fold a finished run into the state.
    async fn poll_run(&mut self) -> Result<()> {
        let Some(run) = self.active_run.as_mut() else {
            return Ok(());
        };

        while let Ok(event) = run.events.try_recv() {
            self.app.state_mut().apply_event(&event);
        }

        if !run.handle.is_finished() {
            return Ok(());
        }

        let Some(run) = self.active_run.take() else {
            return Ok(());
        };
        let mut events = run.events;
        let joined = run.handle.await;

        // The sender is gone, so everything buffered is drained here
        while let Ok(event) = events.try_recv() {
            self.app.state_mut().apply_event(&event);
        }

        match joined {
            Ok(Ok(RunOutcome::Complete(report))) => {
                info!("Run complete after {} rounds", report.rounds);
                self.app.state_mut().complete_run(report);
            }
            Ok(Ok(RunOutcome::Cancelled { rounds })) => {
                info!("Run cancelled after {} rounds", rounds);
                self.app.state_mut().cancel_run(rounds);
            }
            Ok(Err(e)) => self.app.state_mut().fail_run(&e.to_string()),
            Err(e) => self.app.state_mut().fail_run(&format!("workflow task failed: {}", e)),
        }

        Ok(())
    }

    /// Process pending actions from user input.
    fn process_pending(&mut self) -> Result<()> {
        if std::mem::take(&mut self.app.state_mut().cancel_requested)
            && let Some(run) = &self.active_run
        {
            run.cancel.cancel();
            self.app.state_mut().set_status("Cancelling after the current step");
        }

        if std::mem::take(&mut self.app.state_mut().approve_requested) {
            self.approve()?;
        }

        if std::mem::take(&mut self.app.state_mut().regen_requested) && self.active_run.is_none() {
            match self.app.state().last_topic.clone() {
                Some(topic) => self.start_run(topic),
                None => self.app.state_mut().set_status("No topic to regenerate"),
            }
        }

        if self.active_run.is_none()
            && let Some(topic) = self.app.state_mut().pending_topic.take()
        {
            self.start_run(topic);
        }

        Ok(())
    }

    /// Archive the pending draft.
    fn approve(&mut self) -> Result<()> {
        let Some(report) = self.app.state_mut().pending.take() else {
            self.app.state_mut().set_status("No pending draft to approve");
            return Ok(());
        };

        let record = DraftRecord::from_report(&report);
        self.archive.append(&record)?;
        info!("Archived draft {}", record.id);
        self.app
            .state_mut()
            .set_status(format!("Archived {} -> {}", record.id, self.archive.path().display()));
        Ok(())
    }

    /// Spawn a workflow run for the given topic.
    fn start_run(&mut self, topic: String) {
        let (tx, rx) = create_event_channel(32);
        let cancel = CancelToken::new();
        let max_messages = self.app.state().max_messages;

        self.app.state_mut().begin_run(&topic);
        info!("Starting run for topic: {}", topic);

        let runner = Arc::clone(&self.runner);
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            runner.run_with(&topic, max_messages, Some(tx), &task_cancel).await
        });

        self.active_run = Some(ActiveRun {
            handle,
            events: rx,
            cancel,
        });
    }
}
