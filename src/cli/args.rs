//! CLI argument definitions using clap
//!
//! Commands:
//! - herokusql start --config <path>
//! - herokusql check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HerokuSQL - Heroku add-on provider for Google Cloud SQL
#[derive(Parser, Debug)]
#[command(name = "herokusql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the provisioning server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./herokusql.json")]
        config: PathBuf,
    },

    /// Validate a configuration file and print the resolved settings
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./herokusql.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
