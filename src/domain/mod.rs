//! Domain types for Draftr
//!
//! This module contains the core domain types:
//! - Speaker: who authored a conversation message (human, agent, critic)
//! - Message: one immutable unit of conversation
//! - History: the append-only conversation a run accumulates
//! - RunReport / RunOutcome: what a finished run reports back
//!
//! The conversation model is richer than the wire model: the hosted API only
//! understands user/assistant roles, so `History` owns the single conversion
//! point from speakers to wire roles.

pub mod history;
pub mod report;

pub use history::{History, Message, Speaker};
pub use report::{RunOutcome, RunReport};
