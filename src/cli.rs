//! Command-line interface for hostiface
//!
//! Uses clap with derive for type-safe CLI parsing

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// hostiface - local dummy network interface provisioner
#[derive(Parser)]
#[command(name = "hostiface")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path (repeat to merge several files)
    #[arg(short, long, default_value = "hostiface.toml")]
    pub config: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create a single interface without touching the ledger
    Create {
        /// Interface name
        name: String,

        /// Address to assign, bare or in CIDR notation (e.g., 192.168.1.100/24)
        #[arg(short, long)]
        address: Option<String>,

        /// Print the resulting state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a single interface by id (best effort)
    Delete {
        /// Interface id (its name)
        id: String,
    },

    /// Create every configured interface not yet recorded
    Up,

    /// Delete every recorded interface
    Down,

    /// Show configured and recorded interfaces
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration
    Check,

    /// Print the bare address and netmask for an address
    Netmask {
        /// Address, optionally with a /prefix
        address: String,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Generate shell completion scripts
    pub fn generate_completion(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "hostiface", &mut std::io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from(["hostiface", "create", "test0", "-a", "10.0.0.1/24"]).unwrap();
        match cli.command {
            Commands::Create { name, address, json } => {
                assert_eq!(name, "test0");
                assert_eq!(address.as_deref(), Some("10.0.0.1/24"));
                assert!(!json);
            }
            _ => panic!("expected create"),
        }
        assert_eq!(cli.config, vec![PathBuf::from("hostiface.toml")]);
    }

    #[test]
    fn test_parse_multiple_configs() {
        let cli = Cli::try_parse_from(["hostiface", "-c", "a.toml", "-c", "b.toml", "up"]).unwrap();
        assert_eq!(cli.config.len(), 2);
        assert!(matches!(cli.command, Commands::Up));
    }
}
