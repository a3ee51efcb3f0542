//! CLI module for deepr
//!
//! Command-line parsing for the deepr-server binary. Uses clap for argument
//! parsing and owo-colors for colored terminal output.

pub mod export;
pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// deepr - four-phase deep research server
///
/// Plans a research question, gathers web results in parallel, synthesizes a
/// report and verifies it.
#[derive(Parser, Debug)]
#[command(
    name = "deepr-server",
    version,
    about = "deepr - four-phase deep research server",
    long_about = "Plans a research question, gathers web results in parallel, synthesizes\n\
                  a report and verifies it. Progress can be streamed as server-sent events.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a config.",
    after_help = "EXAMPLES:\n    \
                  deepr-server init                       # Write deepr.toml and .env.example\n    \
                  deepr-server                            # Start the server (reads deepr.toml)\n    \
                  deepr-server research \"What is RISC-V?\" # One-shot research run\n    \
                  deepr-server config --validate          # Check deepr.toml\n    \
                  deepr-server openapi > openapi.json     # Export the OpenAPI document"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "deepr.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Override the configured host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one research query and print the result
    Research {
        /// The research question
        query: String,

        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Also save the result JSON and a Markdown report into this directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Write a starter deepr.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// LLM provider to configure (ollama or openai)
        #[arg(long, default_value = "ollama")]
        provider: String,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Print the OpenAPI document as JSON
    Openapi,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve_with_deepr_toml() {
        let cli = Cli::try_parse_from(["deepr-server"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("deepr.toml"));
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_research_subcommand() {
        let cli =
            Cli::try_parse_from(["deepr-server", "--no-color", "research", "What is Rust?", "--json"])
                .unwrap();
        assert!(cli.no_color);
        assert_eq!(
            cli.command,
            Some(Commands::Research {
                query: "What is Rust?".to_string(),
                json: true,
                output: None,
            })
        );
    }

    #[test]
    fn test_research_output_directory() {
        let cli = Cli::try_parse_from(["deepr-server", "research", "q", "-o", "outputs"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Research {
                query: "q".to_string(),
                json: false,
                output: Some(PathBuf::from("outputs")),
            })
        );
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli =
            Cli::try_parse_from(["deepr-server", "config", "--validate", "-c", "other.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                full: false,
                validate: true,
            })
        );
    }

    #[test]
    fn test_research_requires_query() {
        assert!(Cli::try_parse_from(["deepr-server", "research"]).is_err());
    }
}
