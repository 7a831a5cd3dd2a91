//! CLI module for draftr - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for one-shot runs,
//! the chat session, and dashboard launch.

pub mod commands;

pub use commands::Cli;
