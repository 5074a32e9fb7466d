//! CLI argument definitions using clap
//!
//! Commands:
//! - syncguard check --config <path>
//! - syncguard lint --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// syncguard - document write validation and access control
#[derive(Parser, Debug)]
#[command(name = "syncguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decide one write read from stdin
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./syncguard.json")]
        config: PathBuf,
    },

    /// Load the schema and list its document types
    Lint {
        /// Path to configuration file
        #[arg(long, default_value = "./syncguard.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_with_config() {
        let cli = Cli::try_parse_from(["syncguard", "check", "--config", "/etc/sg.json"]).unwrap();
        match cli.command {
            Command::Check { config } => assert_eq!(config, PathBuf::from("/etc/sg.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_lint_default_config() {
        let cli = Cli::try_parse_from(["syncguard", "lint"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Lint { config } if config == PathBuf::from("./syncguard.json")
        ));
    }
}
