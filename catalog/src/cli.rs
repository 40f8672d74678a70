//! CLI argument parsing for catalog

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(author, version, about = "Course catalog listings", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: Format,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List departments and their subject prefixes
    Departments,

    /// List the courses offered by a department
    Courses {
        /// Department name, e.g. "Electrical Engineering"
        #[arg(required = true)]
        department: String,
    },
}
