//! Conversation history types
//!
//! A run accumulates a `History`: one human topic message followed by
//! alternating agent drafts and critic critiques. Messages are immutable
//! once appended and the history is append-only.

use serde::{Deserialize, Serialize};

use crate::llm::{Message as WireMessage, Role};

/// Who authored a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The person supplying the topic
    Human,
    /// The drafting persona
    Agent,
    /// The critiquing persona
    Critic,
}

impl Speaker {
    /// Map a speaker to the role the hosted API understands.
    ///
    /// Critiques are replayed to the drafting persona as user turns, so
    /// both Human and Critic map to `user`.
    pub fn wire_role(&self) -> Role {
        match self {
            Speaker::Human | Speaker::Critic => Role::User,
            Speaker::Agent => Role::Assistant,
        }
    }
}

/// One unit of conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
}

impl Message {
    /// Create a human message
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Human,
            text: text.into(),
        }
    }

    /// Create an agent message
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Agent,
            text: text.into(),
        }
    }

    /// Create a critic message
    pub fn critic(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Critic,
            text: text.into(),
        }
    }
}

/// Append-only conversation accumulated over one run.
///
/// Always starts with exactly one human message carrying the topic;
/// agent and critic messages alternate after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    messages: Vec<Message>,
}

impl History {
    /// Start a new history from a topic
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::human(topic)],
        }
    }

    /// Append an agent draft
    pub fn push_agent(&mut self, text: impl Into<String>) {
        self.messages.push(Message::agent(text));
    }

    /// Append a critic critique
    pub fn push_critic(&mut self, text: impl Into<String>) {
        self.messages.push(Message::critic(text));
    }

    /// Total number of messages, topic included
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// A history is never empty; it always carries at least the topic
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The topic text the history was started with
    pub fn topic(&self) -> &str {
        &self.messages[0].text
    }

    /// The most recent agent draft, if any generate step has run
    pub fn last_draft(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.speaker == Speaker::Agent)
            .map(|m| m.text.as_str())
    }

    /// Convert to the wire message sequence the hosted API expects.
    ///
    /// This is the single point where speakers collapse to user/assistant
    /// roles.
    pub fn to_wire_messages(&self) -> Vec<WireMessage> {
        self.messages
            .iter()
            .map(|m| WireMessage {
                role: m.speaker.wire_role(),
                content: m.text.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_serialization() {
        assert_eq!(serde_json::to_string(&Speaker::Human).unwrap(), "\"human\"");
        assert_eq!(serde_json::to_string(&Speaker::Agent).unwrap(), "\"agent\"");
        assert_eq!(serde_json::to_string(&Speaker::Critic).unwrap(), "\"critic\"");
    }

    #[test]
    fn test_speaker_wire_role() {
        assert_eq!(Speaker::Human.wire_role(), Role::User);
        assert_eq!(Speaker::Agent.wire_role(), Role::Assistant);
        assert_eq!(Speaker::Critic.wire_role(), Role::User);
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::human("topic").speaker, Speaker::Human);
        assert_eq!(Message::agent("draft").speaker, Speaker::Agent);
        assert_eq!(Message::critic("critique").speaker, Speaker::Critic);
    }

    #[test]
    fn test_history_starts_with_topic() {
        let history = History::new("Rust in production");
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].speaker, Speaker::Human);
        assert_eq!(history.topic(), "Rust in production");
    }

    #[test]
    fn test_history_alternation() {
        let mut history = History::new("topic");
        history.push_agent("draft 1");
        history.push_critic("critique 1");
        history.push_agent("draft 2");

        let speakers: Vec<Speaker> = history.messages().iter().map(|m| m.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::Human, Speaker::Agent, Speaker::Critic, Speaker::Agent]
        );
    }

    #[test]
    fn test_last_draft_none_before_first_generate() {
        let history = History::new("topic");
        assert!(history.last_draft().is_none());
    }

    #[test]
    fn test_last_draft_tracks_latest_agent_message() {
        let mut history = History::new("topic");
        history.push_agent("draft 1");
        assert_eq!(history.last_draft(), Some("draft 1"));

        history.push_critic("critique 1");
        assert_eq!(history.last_draft(), Some("draft 1"));

        history.push_agent("draft 2");
        assert_eq!(history.last_draft(), Some("draft 2"));
    }

    #[test]
    fn test_to_wire_messages_roles() {
        let mut history = History::new("topic");
        history.push_agent("draft");
        history.push_critic("critique");

        let wire = history.to_wire_messages();
        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0].role, Role::User);
        assert_eq!(wire[1].role, Role::Assistant);
        assert_eq!(wire[2].role, Role::User);
        assert_eq!(wire[2].content, "critique");
    }

    #[test]
    fn test_history_serialization_roundtrip() {
        let mut history = History::new("topic");
        history.push_agent("draft");

        let json = serde_json::to_string(&history).unwrap();
        let restored: History = serde_json::from_str(&json).unwrap();
        assert_eq!(history, restored);
    }
}
