//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Launcher for the docker compose AI stack: local or external LLM, optional services
#[derive(Parser, Debug)]
#[command(name = "launchpad")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the stack with a local LLM (backend from llm.env as profile)
    RunLocal {
        /// Arguments forwarded to `docker compose up`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Start the stack against an external LLM provider (needs .env)
    RunExternal {
        /// Arguments forwarded to `docker compose up`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Build images for local mode
    BuildLocal {
        /// Arguments forwarded to `docker compose build`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Build images for external mode
    BuildExternal {
        /// Arguments forwarded to `docker compose build`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Stop the running stack
    Stop,

    /// Restart the running stack
    Restart,

    /// Show running containers
    Status,

    /// Follow logs of the running stack
    Logs {
        /// Only this service
        service: Option<String>,
    },

    /// Remove containers and volumes of this project (asks first)
    Remove,

    /// Show commands and current configuration
    Help,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
