//! Draftr - a draft-refine content assistant
//!
//! Draftr alternates a drafting persona and a critic persona over a shared
//! conversation history until a message budget is reached, then reports the
//! last draft. Front-ends (CLI, chat REPL, dashboard) are thin layers over
//! the same run contract.

pub mod chat;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod id;
pub mod llm;
pub mod prompt;
pub mod refine;
pub mod storage;
pub mod tui;

pub use error::{DraftrError, Result};
