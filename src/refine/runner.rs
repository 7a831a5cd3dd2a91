//! Draft-refine loop runner
//!
//! The RefineRunner alternates a generate step and a reflect step over a
//! shared conversation history until the message budget is reached. The
//! final draft is always the text of the last generate step.

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::mpsc;

use crate::domain::{History, RunOutcome, RunReport};
use crate::error::{DraftrError, Result};
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, Usage};
use crate::prompt::PromptStore;
use crate::refine::cancel::CancelToken;
use crate::refine::events::WorkflowEvent;

/// Workflow phase between steps
///
/// `Generating` is the initial and only pre-terminal state. A run either
/// terminates out of `Generating` or moves to `Reflecting` and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Generating,
    Reflecting,
}

/// Executes the draft-refine workflow against an LLM client.
///
/// Each run:
/// 1. Seeds a fresh History with the topic as a Human message
/// 2. Generate step: full history under the drafting instruction, result
///    appended as an Agent message
/// 3. Stops once the history has reached the message budget
/// 4. Reflect step: full history under the critique instruction, result
///    appended as a Critic message, then back to (2)
pub struct RefineRunner<L>
where
    L: LlmClient,
{
    /// LLM client for completions
    llm: Arc<L>,
    /// Resolves the drafting and critique instructions
    prompts: Arc<PromptStore>,
}

impl<L> RefineRunner<L>
where
    L: LlmClient,
{
    /// Create a new runner with the given dependencies
    pub fn new(llm: Arc<L>, prompts: Arc<PromptStore>) -> Self {
        Self { llm, prompts }
    }

    /// Run the workflow to completion and return the final report.
    ///
    /// `max_messages` bounds the total history length, counting the topic,
    /// drafts and critiques. At least one generate step always runs.
    pub async fn run(&self, topic: &str, max_messages: usize) -> Result<RunReport> {
        let cancel = CancelToken::new();
        match self.run_with(topic, max_messages, None, &cancel).await? {
            RunOutcome::Complete(report) => Ok(report),
            // a private token that nothing cancels cannot produce this
            RunOutcome::Cancelled { rounds } => Err(DraftrError::Generation(format!(
                "run cancelled after {} rounds",
                rounds
            ))),
        }
    }

    /// Run the workflow with progress events and cooperative cancellation.
    ///
    /// The cancel token is checked between steps only; a step already in
    /// flight always completes. Event send failures never fail the run.
    pub async fn run_with(
        &self,
        topic: &str,
        max_messages: usize,
        events: Option<mpsc::Sender<WorkflowEvent>>,
        cancel: &CancelToken,
    ) -> Result<RunOutcome> {
        if topic.trim().is_empty() {
            return Err(DraftrError::EmptyTopic);
        }

        info!(
            "Starting refine run: topic={:?} max_messages={}",
            topic, max_messages
        );

        let mut history = History::new(topic);
        let mut usage = Usage::default();
        let mut rounds: u32 = 0;
        let mut phase = Phase::Generating;

        loop {
            if cancel.is_cancelled() {
                info!("Run cancelled after {} rounds", rounds);
                return Ok(RunOutcome::Cancelled { rounds });
            }

            match phase {
                Phase::Generating => {
                    rounds += 1;
                    Self::emit(&events, WorkflowEvent::RoundStarted { round: rounds }).await;

                    let response = self.generate_step(&history).await?;
                    usage.add(&response.usage);
                    history.push_agent(response.content.clone());
                    debug!(
                        "Round {}: draft of {} chars, history length {}",
                        rounds,
                        response.content.len(),
                        history.len()
                    );
                    Self::emit(
                        &events,
                        WorkflowEvent::DraftReady {
                            round: rounds,
                            text: response.content,
                        },
                    )
                    .await;

                    if history.len() >= max_messages {
                        break;
                    }
                    phase = Phase::Reflecting;
                }
                Phase::Reflecting => {
                    let response = self.reflect_step(&history).await?;
                    usage.add(&response.usage);
                    history.push_critic(response.content.clone());
                    debug!(
                        "Round {}: critique of {} chars, history length {}",
                        rounds,
                        response.content.len(),
                        history.len()
                    );
                    Self::emit(
                        &events,
                        WorkflowEvent::CritiqueReady {
                            round: rounds,
                            text: response.content,
                        },
                    )
                    .await;

                    phase = Phase::Generating;
                }
            }
        }

        // The loop only breaks after a generate step, so a draft exists
        let draft = history
            .last_draft()
            .map(str::to_string)
            .ok_or_else(|| DraftrError::Generation("no draft produced".to_string()))?;

        info!(
            "Run complete: {} rounds, {} messages, {} tokens",
            rounds,
            history.len(),
            usage.total()
        );
        Self::emit(
            &events,
            WorkflowEvent::Finished {
                draft: draft.clone(),
            },
        )
        .await;

        Ok(RunOutcome::Complete(RunReport {
            draft,
            history,
            rounds,
            usage,
        }))
    }

    /// Generate step: draft or revise the post from the full history
    async fn generate_step(&self, history: &History) -> Result<CompletionResponse> {
        let system = self.prompts.generate()?;
        let request = CompletionRequest::new(system).with_messages(history.to_wire_messages());

        let response = self
            .llm
            .complete(request)
            .await
            .map_err(|e| DraftrError::Generation(e.to_string()))?;

        if response.content.trim().is_empty() {
            return Err(DraftrError::Generation(
                "model returned empty content".to_string(),
            ));
        }
        Ok(response)
    }

    /// Reflect step: critique the latest draft from the full history
    async fn reflect_step(&self, history: &History) -> Result<CompletionResponse> {
        let system = self.prompts.reflect()?;
        let request = CompletionRequest::new(system).with_messages(history.to_wire_messages());

        let response = self
            .llm
            .complete(request)
            .await
            .map_err(|e| DraftrError::Reflection(e.to_string()))?;

        if response.content.trim().is_empty() {
            return Err(DraftrError::Reflection(
                "model returned empty content".to_string(),
            ));
        }
        Ok(response)
    }

    async fn emit(events: &Option<mpsc::Sender<WorkflowEvent>>, event: WorkflowEvent) {
        if let Some(tx) = events {
            let _ = tx.send(event).await;
        }
    }
}
