use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use catalog::cli::{Cli, Command, Format};
use catalog::{CatalogClient, CatalogConfig};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = CatalogConfig::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("catalog starting");
    let client = CatalogClient::new(config)?;

    match cli.command {
        Command::Departments => {
            let departments = client.departments().await?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&departments)?),
                Format::Text => {
                    for d in departments {
                        println!("{} {}", format!("{:<8}", d.prefix).yellow(), d.name);
                    }
                }
            }
        }
        Command::Courses { department } => {
            let courses = client.courses_by_department(&department).await?;
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&courses)?),
                Format::Text => {
                    if courses.is_empty() {
                        println!("No courses found for {}", department.cyan());
                    }
                    for c in courses {
                        println!(
                            "{} {:>4}  {} {}",
                            format!("{:<10}", c.code).yellow(),
                            c.credits,
                            c.name,
                            format!("({})", c.semester).dimmed()
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
