//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: one-shot draft generation for a topic
//! - chat: interactive REPL session
//! - no subcommand: launch the dashboard

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Draftr - a draft-and-critique assistant for LinkedIn posts
#[derive(Parser, Debug)]
#[command(name = "draftr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draft a post for a topic, printing each round and the final post
    Run {
        /// Topic to draft a post about
        topic: String,

        /// Archive the final post
        #[arg(short, long)]
        save: bool,

        /// Message budget for this run, overriding config
        #[arg(short, long)]
        max_messages: Option<usize>,
    },

    /// Start an interactive chat session
    Chat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args should result in None command (dashboard mode)
        let cli = Cli::try_parse_from(["draftr"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["draftr", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["draftr", "-c", "/path/to/draftr.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/draftr.yml")));
    }

    #[test]
    fn test_run_command() {
        let cli = Cli::try_parse_from(["draftr", "run", "rust jobs"]).unwrap();
        match cli.command {
            Some(Commands::Run {
                topic,
                save,
                max_messages,
            }) => {
                assert_eq!(topic, "rust jobs");
                assert!(!save);
                assert!(max_messages.is_none());
            }
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_run_with_save() {
        let cli = Cli::try_parse_from(["draftr", "run", "rust jobs", "--save"]).unwrap();
        match cli.command {
            Some(Commands::Run { save, .. }) => assert!(save),
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_run_with_max_messages() {
        let cli = Cli::try_parse_from(["draftr", "run", "rust jobs", "-m", "4"]).unwrap();
        match cli.command {
            Some(Commands::Run { max_messages, .. }) => {
                assert_eq!(max_messages, Some(4));
            }
            _ => panic!("Expected run command"),
        }
    }

    #[test]
    fn test_run_requires_topic() {
        let result = Cli::try_parse_from(["draftr", "run"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_command() {
        let cli = Cli::try_parse_from(["draftr", "chat"]).unwrap();
        match cli.command {
            Some(Commands::Chat) => {}
            _ => panic!("Expected chat command"),
        }
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["draftr", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
