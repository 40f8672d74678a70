//! GradPlan - graduate plan generation against a local chat model
//!
//! A student's department, program and completed courses go in; a
//! semester-keyed course plan comes out. The plan is written by a chat model
//! that is given a fixed rule corpus plus the student's progress, and its
//! free-text answer is parsed strictly.
//!
//! # Modules
//!
//! - [`planning`] - Eligibility, prompt assembly, sessions, extraction, the pipeline
//! - [`llm`] - Chat client seam and the streaming Ollama implementation
//! - [`prompts`] - Embedded prompt templates and override loading
//! - [`server`] - HTTP routes for the presentation layer
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod llm;
pub mod output;
pub mod planning;
pub mod prompts;
pub mod server;

pub use config::{Config, LlmConfig, PlanningConfig, ServerConfig};
pub use llm::{LlmClient, LlmError, OllamaClient, create_client};
pub use planning::{
    AcademicPlan, EligibilitySnapshot, ExtractionMode, PlanError, PlanOutcome, PlanRequest, Planner, PlanningSession,
    PromptAssembler,
};
