//! Dashboard state.
//!
//! This module defines the state that drives the dashboard:
//! - `DashboardState`: All mutable application state
//! - `InteractionMode`: Current input mode (normal or typing a topic)
//! - `TranscriptEntry`: One line of the streaming transcript

use crate::domain::{RunReport, Speaker};
use crate::llm::Usage;
use crate::refine::WorkflowEvent;

/// Lowest selectable round limit.
pub const MIN_ROUND_LIMIT: usize = 2;
/// Highest selectable round limit.
pub const MAX_ROUND_LIMIT: usize = 10;

/// Current interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Normal navigation and actions
    #[default]
    Normal,
    /// Typing in the topic input
    TopicInput,
}

/// One entry in the streaming transcript pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// A round separator
    Round(u32),
    /// A message from one of the workflow personas
    Message { speaker: Speaker, text: String },
}

/// The primary dashboard state.
///
/// Owned by `App` and updated in response to keyboard events and
/// workflow events drained by the runner on each tick.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Current interaction mode
    pub mode: InteractionMode,
    /// Topic input buffer
    pub topic_input: String,
    /// Message budget for the next run, clamped to 2..=10
    pub max_messages: usize,

    /// Streaming transcript of the current or most recent run
    pub transcript: Vec<TranscriptEntry>,
    /// Final post from the most recent completed run
    pub final_draft: Option<String>,
    /// Completed run awaiting approval
    pub pending: Option<RunReport>,
    /// Topic of the most recent run, for regeneration
    pub last_topic: Option<String>,
    /// Whether a workflow run is in flight
    pub run_active: bool,
    /// Status line message
    pub status_message: Option<String>,

    /// Token usage accumulated across completed runs this session
    pub session_usage: Usage,
    /// Number of completed runs this session
    pub session_runs: u32,

    // Pending actions (processed by the runner)
    /// Topic submitted from the input, waiting for a free run slot
    pub pending_topic: Option<String>,
    /// Approve the pending draft
    pub approve_requested: bool,
    /// Re-run the last topic
    pub regen_requested: bool,
    /// Cancel the in-flight run
    pub cancel_requested: bool,

    /// Whether the application should quit
    pub should_quit: bool,
}

impl DashboardState {
    /// Create a new state with the given default round limit.
    pub fn new(max_messages: usize) -> Self {
        Self {
            max_messages: max_messages.clamp(MIN_ROUND_LIMIT, MAX_ROUND_LIMIT),
            ..Self::default()
        }
    }

    /// Raise the round limit, capped at the maximum.
    pub fn increase_limit(&mut self) {
        if self.max_messages < MAX_ROUND_LIMIT {
            self.max_messages += 1;
        }
    }

    /// Lower the round limit, floored at the minimum.
    pub fn decrease_limit(&mut self) {
        if self.max_messages > MIN_ROUND_LIMIT {
            self.max_messages -= 1;
        }
    }

    /// Reset per-run state at the start of a new run.
    pub fn begin_run(&mut self, topic: &str) {
        self.transcript.clear();
        self.final_draft = None;
        self.pending = None;
        self.last_topic = Some(topic.to_string());
        self.run_active = true;
        self.status_message = Some(format!("Drafting \"{}\"", topic));
    }

    /// Fold a streamed workflow event into the transcript.
    pub fn apply_event(&mut self, event: &WorkflowEvent) {
        match event {
            WorkflowEvent::RoundStarted { round } => {
                self.transcript.push(TranscriptEntry::Round(*round));
            }
            WorkflowEvent::DraftReady { text, .. } => {
                self.transcript.push(TranscriptEntry::Message {
                    speaker: Speaker::Agent,
                    text: text.clone(),
                });
            }
            WorkflowEvent::CritiqueReady { text, .. } => {
                self.transcript.push(TranscriptEntry::Message {
                    speaker: Speaker::Critic,
                    text: text.clone(),
                });
            }
            WorkflowEvent::Finished { draft } => {
                self.final_draft = Some(draft.clone());
            }
        }
    }

    /// Record a completed run and surface the draft for approval.
    pub fn complete_run(&mut self, report: RunReport) {
        self.run_active = false;
        self.session_usage.add(&report.usage);
        self.session_runs += 1;
        self.final_draft = Some(report.draft.clone());
        self.status_message = Some(format!(
            "Draft ready after {} rounds. Press a to approve, r to regenerate",
            report.rounds
        ));
        self.pending = Some(report);
    }

    /// Record a cancelled run.
    pub fn cancel_run(&mut self, rounds: u32) {
        self.run_active = false;
        self.status_message = Some(format!("Run cancelled after {} rounds", rounds));
    }

    /// Record a failed run.
    pub fn fail_run(&mut self, message: &str) {
        self.run_active = false;
        self.status_message = Some(format!("Run failed: {}", message));
    }

    /// Set the status line.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Get the status indicator character for display.
    pub fn status_indicator(&self) -> char {
        if self.run_active {
            '●' // Running
        } else {
            '○' // Idle
        }
    }

    /// Format the header metrics string.
    pub fn metrics_string(&self) -> String {
        format!(
            "↑{} ↓{} │ {} runs",
            format_tokens(self.session_usage.input_tokens),
            format_tokens(self.session_usage.output_tokens),
            self.session_runs
        )
    }
}

/// Format token count with K suffix for large numbers.
fn format_tokens(count: u64) -> String {
    if count >= 1000 {
        format!("{:.1}K", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}
