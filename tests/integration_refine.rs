//! Draft-refine workflow integration tests
//!
//! Tests the core workflow flow with a mock LLM client, plus archive
//! persistence of approved drafts.

use std::sync::Arc;

use draftr::domain::{RunOutcome, Speaker};
use draftr::error::DraftrError;
use draftr::id::generate_draft_id;
use draftr::llm::{LlmClient, MockLlmClient, Usage};
use draftr::prompt::PromptStore;
use draftr::refine::{CancelToken, RefineRunner, WorkflowEvent, create_event_channel};
use draftr::storage::{DraftArchive, DraftRecord};
use tempfile::TempDir;

fn runner_with(mock: MockLlmClient) -> RefineRunner<MockLlmClient> {
    RefineRunner::new(Arc::new(mock), Arc::new(PromptStore::embedded_only()))
}

/// Integration test: verify mock LLM client works
#[test]
fn test_mock_llm_client_creation() {
    let mock = MockLlmClient::new();
    assert!(mock.is_ready());
    assert_eq!(mock.model(), "mock-model");
}

/// Integration test: full run with the default budget of six messages
#[tokio::test]
async fn test_full_run_default_budget() {
    let mock = MockLlmClient::new()
        .with_text("draft 1")
        .with_text("critique 1")
        .with_text("draft 2")
        .with_text("critique 2")
        .with_text("draft 3");
    let runner = runner_with(mock);

    let report = runner.run("rust jobs", 6).await.unwrap();

    // Topic, then alternating agent/critic, ending on an agent draft
    let speakers: Vec<Speaker> = report.history.messages().iter().map(|m| m.speaker).collect();
    assert_eq!(
        speakers,
        vec![
            Speaker::Human,
            Speaker::Agent,
            Speaker::Critic,
            Speaker::Agent,
            Speaker::Critic,
            Speaker::Agent,
        ]
    );

    assert_eq!(report.draft, "draft 3");
    assert_eq!(report.rounds, 3);
    assert_eq!(report.history.topic(), "rust jobs");
}

/// Integration test: a budget of one yields a single draft and no critique
#[tokio::test]
async fn test_minimal_budget_skips_critique() {
    let mock = MockLlmClient::new().with_text("only draft");
    let runner = runner_with(mock);

    let report = runner.run("rust jobs", 1).await.unwrap();

    assert_eq!(report.draft, "only draft");
    assert_eq!(report.rounds, 1);
    assert_eq!(report.history.len(), 2);
}

/// Integration test: identical scripts produce identical reports
#[tokio::test]
async fn test_runs_are_deterministic_given_responses() {
    let script = ["draft 1", "critique 1", "draft 2"];

    let mut drafts = Vec::new();
    for _ in 0..2 {
        let mut mock = MockLlmClient::new();
        for text in script {
            mock = mock.with_text(text);
        }
        let report = runner_with(mock).run("rust jobs", 4).await.unwrap();
        drafts.push((report.draft, report.rounds, report.history.len()));
    }

    assert_eq!(drafts[0], drafts[1]);
}

/// Integration test: usage accumulates across every model call
#[tokio::test]
async fn test_usage_accumulates_across_steps() {
    let mock = MockLlmClient::new()
        .with_text("draft 1")
        .with_text("critique 1")
        .with_text("draft 2");
    let runner = runner_with(mock);

    let report = runner.run("rust jobs", 4).await.unwrap();

    // Each scripted reply reports 10 in / 20 out
    assert_eq!(report.usage.input_tokens, 30);
    assert_eq!(report.usage.output_tokens, 60);
    assert_eq!(report.usage.total(), 90);
}

/// Integration test: a generation failure is fatal with no retry
#[tokio::test]
async fn test_generation_failure_is_fatal() {
    let mock = MockLlmClient::new().with_failure("model unavailable");
    let runner = runner_with(mock);

    let err = runner.run("rust jobs", 6).await.unwrap_err();
    match err {
        DraftrError::Generation(message) => assert!(message.contains("model unavailable")),
        other => panic!("unexpected error: {:?}", other),
    }
}

/// Integration test: a reflection failure is fatal with no retry
#[tokio::test]
async fn test_reflection_failure_is_fatal() {
    let mock = MockLlmClient::new().with_text("draft 1").with_failure("model unavailable");
    let runner = runner_with(mock);

    let err = runner.run("rust jobs", 6).await.unwrap_err();
    assert!(matches!(err, DraftrError::Reflection(_)));
}

/// Integration test: an empty topic is rejected before any model call
#[tokio::test]
async fn test_empty_topic_rejected() {
    let mock = MockLlmClient::new();
    let runner = RefineRunner::new(Arc::new(mock), Arc::new(PromptStore::embedded_only()));

    let err = runner.run("   ", 6).await.unwrap_err();
    assert!(matches!(err, DraftrError::EmptyTopic));
}

/// Integration test: cancellation between steps yields a Cancelled outcome
#[tokio::test]
async fn test_cancellation_between_steps() {
    let mock = MockLlmClient::new().with_text("draft 1");
    let runner = runner_with(mock);

    let cancel = CancelToken::new();
    cancel.cancel();

    let outcome = runner.run_with("rust jobs", 6, None, &cancel).await.unwrap();
    match outcome {
        RunOutcome::Cancelled { rounds } => assert_eq!(rounds, 0),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

/// Integration test: workflow events stream in round order
#[tokio::test]
async fn test_events_stream_in_order() {
    let mock = MockLlmClient::new()
        .with_text("draft 1")
        .with_text("critique 1")
        .with_text("draft 2");
    let runner = runner_with(mock);

    let (tx, mut rx) = create_event_channel(32);
    let cancel = CancelToken::new();
    let outcome = runner.run_with("rust jobs", 4, Some(tx), &cancel).await.unwrap();
    assert!(!outcome.is_cancelled());

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(
        events,
        vec![
            WorkflowEvent::RoundStarted { round: 1 },
            WorkflowEvent::DraftReady {
                round: 1,
                text: "draft 1".to_string(),
            },
            WorkflowEvent::CritiqueReady {
                round: 1,
                text: "critique 1".to_string(),
            },
            WorkflowEvent::RoundStarted { round: 2 },
            WorkflowEvent::DraftReady {
                round: 2,
                text: "draft 2".to_string(),
            },
            WorkflowEvent::Finished {
                draft: "draft 2".to_string(),
            },
        ]
    );
}

/// Integration test: a completed run can be approved into the archive
#[tokio::test]
async fn test_run_report_archives() {
    let temp_dir = TempDir::new().unwrap();

    let mock = MockLlmClient::new().with_text("the post");
    let runner = runner_with(mock);
    let report = runner.run("rust jobs", 1).await.unwrap();

    let archive = DraftArchive::new(temp_dir.path()).unwrap();
    let record = DraftRecord::from_report(&report);
    archive.append(&record).unwrap();

    let records = archive.list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].topic, "rust jobs");
    assert_eq!(records[0].draft, "the post");
    assert_eq!(records[0].rounds, 1);
}

/// Integration test: archive records survive reopening the archive
#[test]
fn test_archive_persistence_across_instances() {
    let temp_dir = TempDir::new().unwrap();

    let record = DraftRecord {
        id: generate_draft_id(),
        topic: "durable".to_string(),
        draft: "a post".to_string(),
        rounds: 3,
        input_tokens: 30,
        output_tokens: 60,
        created_at: "2025-01-15T10:00:00+00:00".to_string(),
    };

    {
        let archive = DraftArchive::new(temp_dir.path()).unwrap();
        archive.append(&record).unwrap();
    }

    {
        let archive = DraftArchive::new(temp_dir.path()).unwrap();
        let latest = archive.latest().unwrap().unwrap();
        assert_eq!(latest, record);
    }
}

/// Integration test: verify ID generation uniqueness
#[test]
fn test_id_generation_uniqueness() {
    let mut ids = std::collections::HashSet::new();

    // Generate 100 IDs and verify uniqueness
    for _ in 0..100 {
        let id = generate_draft_id();
        assert!(ids.insert(id), "Generated duplicate ID");
    }
}

/// Integration test: usage arithmetic used by session metrics
#[test]
fn test_usage_addition() {
    let mut total = Usage::default();
    total.add(&Usage::new(10, 20));
    total.add(&Usage::new(5, 5));

    assert_eq!(total.input_tokens, 15);
    assert_eq!(total.output_tokens, 25);
    assert_eq!(total.total(), 40);
}
