//! Progress events emitted by the draft-refine workflow
//!
//! Front-ends subscribe to these over an mpsc channel to render rounds as
//! they happen. A dropped receiver never fails the run.

use tokio::sync::mpsc;

/// Progress notification emitted after each workflow step
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    /// A new round is starting with a generate step
    RoundStarted { round: u32 },
    /// The generate step produced a draft
    DraftReady { round: u32, text: String },
    /// The reflect step produced a critique
    CritiqueReady { round: u32, text: String },
    /// The workflow terminated with a final draft
    Finished { draft: String },
}

impl WorkflowEvent {
    /// Round number the event belongs to, if any
    pub fn round(&self) -> Option<u32> {
        match self {
            WorkflowEvent::RoundStarted { round }
            | WorkflowEvent::DraftReady { round, .. }
            | WorkflowEvent::CritiqueReady { round, .. } => Some(*round),
            WorkflowEvent::Finished { .. } => None,
        }
    }
}

/// Create an event channel pair for workflow progress
pub fn create_event_channel(
    buffer_size: usize,
) -> (mpsc::Sender<WorkflowEvent>, mpsc::Receiver<WorkflowEvent>) {
    mpsc::channel(buffer_size)
}
