//! Completed-credit totals and master's-requirement status

use tracing::debug;

use super::{CompletedCourse, ValidationError};

/// Credits the master's portion of the program requires
pub const MASTERS_CREDITS: u32 = 30;

/// Derived per request, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilitySnapshot {
    pub completed_credits: u32,
    pub masters_completed: bool,
    /// Not completed and fewer than 30 credits done
    pub masters_needed: bool,
    /// `30 - completed_credits` while needed, else 0
    pub masters_credits_remaining: u32,
}

impl EligibilitySnapshot {
    /// Compute the snapshot for a course list
    pub fn compute(courses: &[CompletedCourse], masters_completed: bool) -> Result<Self, ValidationError> {
        debug!(course_count = courses.len(), %masters_completed, "EligibilitySnapshot::compute: called");
        let completed_credits = courses
            .iter()
            .try_fold(0u32, |sum, c| sum.checked_add(c.credits))
            .ok_or(ValidationError::CreditOverflow)?;

        Ok(Self::from_credits(completed_credits, masters_completed))
    }

    /// Snapshot for an already-summed credit total
    pub fn from_credits(completed_credits: u32, masters_completed: bool) -> Self {
        let masters_needed = !masters_completed && completed_credits < MASTERS_CREDITS;
        let masters_credits_remaining = if masters_needed {
            MASTERS_CREDITS - completed_credits
        } else {
            0
        };
        Self {
            completed_credits,
            masters_completed,
            masters_needed,
            masters_credits_remaining,
        }
    }

    /// "Yes"/"No" as the prompt states it
    pub fn masters_completed_label(&self) -> &'static str {
        if self.masters_completed { "Yes" } else { "No" }
    }
}
