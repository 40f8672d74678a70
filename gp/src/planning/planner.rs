//! The plan-generation pipeline
//!
//! validate → eligibility → assemble → append → stream → extract

use std::sync::Arc;

use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{
    AcademicPlan, EligibilitySnapshot, ExtractionMode, PlanError, PlanRequest, PlanningSession, PromptAssembler,
    extract_plan,
};
use crate::config::Config;
use crate::llm::{self, ChatRequest, ChatResponse, LlmClient, StreamChunk, TokenUsage};
use crate::prompts::PromptLoader;

/// A turn that has been appended to a session and is ready to send
#[derive(Debug, Clone)]
pub struct PreparedTurn {
    pub eligibility: EligibilitySnapshot,
    pub target_credits: u32,
    /// Full transcript, including the three new messages
    pub request: ChatRequest,
}

/// Validate, assemble and append one turn
///
/// The session is only touched once all three messages have rendered, so a
/// validation or template failure leaves the transcript as it was.
pub fn prepare_turn(
    assembler: &PromptAssembler,
    session: &mut PlanningSession,
    request: &PlanRequest,
    default_target: u32,
) -> Result<PreparedTurn, PlanError> {
    debug!(session = %session.id, "prepare_turn: called");
    let validated = request.validate()?;
    let eligibility = EligibilitySnapshot::compute(&validated.completed_courses, validated.masters_completed)?;
    let target_credits = validated.total_credits.unwrap_or(default_target);
    let messages = assembler.assemble(&validated, &eligibility, target_credits)?;

    session.append_turn(messages);
    Ok(PreparedTurn {
        eligibility,
        target_credits,
        request: session.conversation().to_request(),
    })
}

/// Result of one successful plan request
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub plan: AcademicPlan,
    pub eligibility: EligibilitySnapshot,
    pub target_credits: u32,
    pub usage: TokenUsage,
}

/// Runs plan requests against a chat client
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    assembler: PromptAssembler,
    extraction: ExtractionMode,
    default_target: u32,
}

impl Planner {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        assembler: PromptAssembler,
        extraction: ExtractionMode,
        default_target: u32,
    ) -> Self {
        debug!(model = llm.model(), %extraction, %default_target, "Planner::new: called");
        Self {
            llm,
            assembler,
            extraction,
            default_target,
        }
    }

    /// Build the Ollama-backed planner described by config
    pub fn from_config(config: &Config) -> Result<Self> {
        debug!("Planner::from_config: called");
        let llm = llm::create_client(&config.llm)?;
        let loader = PromptLoader::from_dir(config.planning.prompts_dir.as_deref());
        let assembler = PromptAssembler::new(&loader)?;
        Ok(Self::new(
            llm,
            assembler,
            config.planning.extraction,
            config.planning.target_credits,
        ))
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Generate a plan, waiting for the whole answer
    pub async fn generate(
        &self,
        session: &mut PlanningSession,
        request: &PlanRequest,
    ) -> Result<PlanOutcome, PlanError> {
        debug!(session = %session.id, "Planner::generate: called");
        let turn = prepare_turn(&self.assembler, session, request, self.default_target)?;
        let response = self.llm.complete(turn.request).await?;
        self.finish(response, turn.eligibility, turn.target_credits)
    }

    /// Generate a plan, forwarding stream chunks as they arrive
    pub async fn generate_streaming(
        &self,
        session: &mut PlanningSession,
        request: &PlanRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<PlanOutcome, PlanError> {
        debug!(session = %session.id, "Planner::generate_streaming: called");
        let turn = prepare_turn(&self.assembler, session, request, self.default_target)?;
        let response = self.llm.stream(turn.request, chunk_tx).await?;
        self.finish(response, turn.eligibility, turn.target_credits)
    }

    fn finish(
        &self,
        response: ChatResponse,
        eligibility: EligibilitySnapshot,
        target_credits: u32,
    ) -> Result<PlanOutcome, PlanError> {
        if !response.done_seen {
            warn!(chunks = response.chunk_count, "Planner: stream ended without a done marker");
        }
        let plan = extract_plan(&response.content, self.extraction)?;
        check_totals(&plan, &eligibility, target_credits);
        info!(
            semesters = plan.len(),
            planned_credits = plan.planned_credits(),
            "Planner: plan extracted"
        );

        Ok(PlanOutcome {
            plan,
            eligibility,
            target_credits,
            usage: response.usage,
        })
    }
}

/// Log inconsistencies in the model's arithmetic; the plan is returned as-is
fn check_totals(plan: &AcademicPlan, eligibility: &EligibilitySnapshot, target_credits: u32) {
    for (label, semester) in plan.semesters() {
        let sum = semester.course_credit_sum();
        if sum != u64::from(semester.total_credits) {
            warn!(semester = label, declared = semester.total_credits, sum, "Planner: semester total mismatch");
        }
    }

    let planned = plan.planned_credits();
    let target = u64::from(target_credits);
    let with_completed = planned + u64::from(eligibility.completed_credits);
    if planned != target && with_completed != target {
        warn!(planned, completed = eligibility.completed_credits, target_credits, "Planner: plan misses credit target");
    }
}
