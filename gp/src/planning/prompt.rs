//! Prompt assembly: rule corpus, student context, plan instruction

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::{EligibilitySnapshot, PlanError, ValidatedRequest};
use crate::llm::Message;
use crate::prompts::{PromptLoader, TEMPLATE_NAMES};

/// Values every template may reference
#[derive(Debug, Serialize)]
struct PromptContext<'a> {
    program_of_study: &'a str,
    department: &'a str,
    completed_credits: u32,
    masters_completed: &'static str,
    masters_credits_remaining: u32,
    /// Pretty-printed JSON list of completed courses
    completed_courses: String,
    target_credits: u32,
}

/// Builds the three messages of one plan turn
///
/// Templates are compiled once here; rendering a compiled embedded template
/// cannot fail.
pub struct PromptAssembler {
    hbs: Handlebars<'static>,
}

impl std::fmt::Debug for PromptAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptAssembler").finish_non_exhaustive()
    }
}

impl PromptAssembler {
    /// Load and compile the rules, context and request templates
    pub fn new(loader: &PromptLoader) -> Result<Self> {
        debug!(?loader, "PromptAssembler::new: called");
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);

        for name in TEMPLATE_NAMES {
            let source = loader.load_template(name)?;
            hbs.register_template_string(name, source)
                .map_err(|e| eyre!("Failed to compile prompt template '{}': {}", name, e))?;
        }
        Ok(Self { hbs })
    }

    /// Assembler over the built-in templates only
    pub fn embedded() -> Result<Self> {
        Self::new(&PromptLoader::embedded_only())
    }

    /// Render `[rules, context, request]` for one request
    ///
    /// The rule corpus goes out as an assistant message, the other two as
    /// user messages. Nothing is returned unless all three rendered.
    pub fn assemble(
        &self,
        request: &ValidatedRequest,
        eligibility: &EligibilitySnapshot,
        target_credits: u32,
    ) -> Result<[Message; 3], PlanError> {
        debug!(%target_credits, course_count = request.completed_courses.len(), "PromptAssembler::assemble: called");
        let completed_courses = serde_json::to_string_pretty(&request.completed_courses)
            .map_err(|e| PlanError::Prompt(format!("completed courses: {}", e)))?;

        let context = PromptContext {
            program_of_study: &request.program_of_study,
            department: &request.department,
            completed_credits: eligibility.completed_credits,
            masters_completed: eligibility.masters_completed_label(),
            masters_credits_remaining: eligibility.masters_credits_remaining,
            completed_courses,
            target_credits,
        };

        let rules = self.render("rules", &context)?;
        let student = self.render("context", &context)?;
        let instruction = self.render("request", &context)?;

        Ok([
            Message::assistant(rules),
            Message::user(student),
            Message::user(instruction),
        ])
    }

    fn render(&self, name: &str, context: &PromptContext<'_>) -> Result<String, PlanError> {
        self.hbs
            .render(name, context)
            .map_err(|e| PlanError::Prompt(format!("{}: {}", name, e)))
    }
}
