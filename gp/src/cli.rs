//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

/// GradPlan - graduate plan generation
#[derive(Parser)]
#[command(
    name = "gp",
    about = "Generate multi-semester graduate plans with a local chat model",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a plan from a request file (YAML or JSON)
    Plan {
        /// Request file with Department, Program of Study, Masters Completed, Completed Courses
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: PlanFormat,

        /// Echo the model's answer to stderr as it streams
        #[arg(short, long)]
        stream: bool,
    },

    /// Print the transcript a plan request would send, without sending it
    Prompt {
        #[arg(value_name = "REQUEST")]
        request: PathBuf,
    },

    /// List catalog departments
    Departments,

    /// List the courses a department offers
    Courses {
        /// Department name, e.g. "Electrical Engineering"
        department: String,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },
}

/// Output format for generated plans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Where `gp` writes its log file
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gradplan")
        .join("logs")
        .join("gradplan.log")
}
