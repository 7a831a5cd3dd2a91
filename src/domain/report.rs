//! Run result types.

use serde::{Deserialize, Serialize};

use crate::domain::History;
use crate::llm::Usage;

/// What a completed run reports back to its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// The final draft: the text of the last generate step
    pub draft: String,
    /// The full conversation accumulated over the run
    pub history: History,
    /// Number of completed generate steps
    pub rounds: u32,
    /// Token usage accumulated across all steps
    pub usage: Usage,
}

/// Outcome of a cancellation-aware run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The loop ran to its message budget
    Complete(RunReport),
    /// The caller cancelled between steps; no draft is reported
    Cancelled {
        /// Generate steps completed before cancellation
        rounds: u32,
    },
}

impl RunOutcome {
    /// The report, if the run completed
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            RunOutcome::Complete(report) => Some(report),
            RunOutcome::Cancelled { .. } => None,
        }
    }

    /// Returns true if the run was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled { .. })
    }
}
