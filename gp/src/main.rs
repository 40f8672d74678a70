//! GradPlan - graduate plan generation
//!
//! CLI entry point.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use gradplan::cli::{Cli, Command, PlanFormat, get_log_path};
use gradplan::config::Config;
use gradplan::llm::StreamChunk;
use gradplan::output::{format_plan_text, write_plan_csv};
use gradplan::planning::{PlanRequest, Planner, PlanningSession, PromptAssembler, prepare_turn};
use gradplan::prompts::PromptLoader;
use gradplan::server::{self, AppState};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        None => tracing::Level::INFO,
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;
    info!(model = %config.llm.model, base_url = %config.llm.base_url, "gp loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan {
            request,
            format,
            stream,
        } => cmd_plan(&config, &request, format, stream).await,
        Command::Prompt { request } => cmd_prompt(&config, &request),
        Command::Departments => cmd_departments(&config).await,
        Command::Courses { department } => cmd_courses(&config, &department).await,
        Command::Serve { bind } => cmd_serve(&config, bind).await,
    }
}

/// Read a request file; `.json` is parsed as JSON, anything else as YAML
fn load_request(path: &Path) -> Result<PlanRequest> {
    debug!(?path, "load_request: called");
    let content = fs::read_to_string(path).context(format!("Failed to read request {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let request = if is_json {
        serde_json::from_str(&content).context("Failed to parse request JSON")?
    } else {
        serde_yaml::from_str(&content).context("Failed to parse request YAML")?
    };
    Ok(request)
}

async fn cmd_plan(config: &Config, request_path: &PathBuf, format: PlanFormat, stream: bool) -> Result<()> {
    debug!(?request_path, ?format, %stream, "cmd_plan: called");
    let request = load_request(request_path)?;
    let planner = Planner::from_config(config)?;
    let mut session = PlanningSession::new();

    let outcome = if stream {
        let (chunk_tx, mut chunk_rx) = mpsc::channel(64);
        let echo = tokio::spawn(async move {
            let mut stderr = std::io::stderr();
            while let Some(chunk) = chunk_rx.recv().await {
                if let StreamChunk::TextDelta(text) = chunk {
                    let _ = write!(stderr, "{}", text.dimmed());
                    let _ = stderr.flush();
                }
            }
            let _ = writeln!(stderr);
        });
        let result = planner.generate_streaming(&mut session, &request, chunk_tx).await;
        let _ = echo.await;
        result?
    } else {
        eprintln!("{} {}", "Generating plan with".dimmed(), planner.model().dimmed());
        planner.generate(&mut session, &request).await?
    };

    info!(
        prompt_tokens = outcome.usage.prompt_tokens,
        completion_tokens = outcome.usage.completion_tokens,
        "cmd_plan: token usage"
    );

    match format {
        PlanFormat::Text => print!("{}", format_plan_text(&outcome.plan, &outcome.eligibility)),
        PlanFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.plan)?),
        PlanFormat::Csv => write_plan_csv(&outcome.plan, std::io::stdout().lock())?,
    }
    Ok(())
}

fn cmd_prompt(config: &Config, request_path: &PathBuf) -> Result<()> {
    debug!(?request_path, "cmd_prompt: called");
    let request = load_request(request_path)?;
    let loader = PromptLoader::from_dir(config.planning.prompts_dir.as_deref());
    let assembler = PromptAssembler::new(&loader)?;
    let mut session = PlanningSession::new();

    let turn = prepare_turn(&assembler, &mut session, &request, config.planning.target_credits)?;
    let e = &turn.eligibility;
    println!(
        "{} completed={} masters-completed={} masters-needed={} ms-remaining={} target={}",
        "eligibility:".bold(),
        e.completed_credits,
        e.masters_completed,
        e.masters_needed,
        e.masters_credits_remaining,
        turn.target_credits
    );
    for message in &turn.request.messages {
        println!("\n{}", format!("[{}]", message.role).cyan().bold());
        println!("{}", message.content);
    }
    Ok(())
}

async fn cmd_departments(config: &Config) -> Result<()> {
    debug!("cmd_departments: called");
    let client = catalog::CatalogClient::new(config.catalog.clone())?;
    for dept in client.departments().await? {
        let prefix = format!("{:<8}", dept.prefix);
        println!("{} {}", prefix.yellow(), dept.name);
    }
    Ok(())
}

async fn cmd_courses(config: &Config, department: &str) -> Result<()> {
    debug!(%department, "cmd_courses: called");
    let client = catalog::CatalogClient::new(config.catalog.clone())?;
    for course in client.courses_by_department(department).await? {
        let code = format!("{:<10}", course.code);
        println!("{} {:>4}  {}  ({})", code.yellow(), course.credits, course.name, course.semester);
    }
    Ok(())
}

async fn cmd_serve(config: &Config, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    debug!(%bind, "cmd_serve: called");
    let state = AppState::from_config(config)?;
    println!("{} {}", "Listening on".green(), bind);
    server::serve(state, &bind).await
}
