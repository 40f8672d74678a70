//! Plan generation
//!
//! Turns a student's completed-course state into a semester-keyed plan by
//! way of the chat model: eligibility arithmetic, prompt assembly into a
//! session transcript, one streamed completion, and strict extraction of the
//! answer.

mod conversation;
mod eligibility;
mod error;
mod extract;
mod plan;
mod planner;
mod prompt;
mod request;

pub use conversation::{Conversation, PlanningSession, SYSTEM_PROMPT};
pub use eligibility::{EligibilitySnapshot, MASTERS_CREDITS};
pub use error::{MalformedPlanError, PlanError, ValidationError};
pub use extract::{ExtractionMode, extract_plan};
pub use plan::{AcademicPlan, PlanEntry, SemesterPlan};
pub use planner::{PlanOutcome, PreparedTurn, Planner, prepare_turn};
pub use prompt::PromptAssembler;
pub use request::{CompletedCourse, CourseInput, PlanRequest, ValidatedRequest, parse_credits};

/// Program credit total when a request does not name one
pub const DEFAULT_TARGET_CREDITS: u32 = 72;
