//! Planning request as submitted by the presentation layer

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::ValidationError;

/// One completed-course row as entered by the student
///
/// Credits arrive as text from the form, or as a number from other callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseInput {
    #[serde(rename = "Course Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Course Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Credits", default)]
    pub credits: Value,
    #[serde(rename = "Semester", default)]
    pub semester: Option<String>,
}

impl From<catalog::CourseRecord> for CourseInput {
    fn from(record: catalog::CourseRecord) -> Self {
        Self {
            name: Some(record.name),
            code: Some(record.code),
            credits: Value::String(record.credits),
            semester: Some(record.semester),
        }
    }
}

/// A validated completed course
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedCourse {
    #[serde(rename = "Course Name")]
    pub name: String,
    #[serde(rename = "Course Code")]
    pub code: String,
    #[serde(rename = "Credits")]
    pub credits: u32,
    #[serde(rename = "Semester")]
    pub semester: String,
}

/// Everything one planning request carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(rename = "Department", default)]
    pub department: Option<String>,
    #[serde(rename = "Program of Study", default)]
    pub program_of_study: Option<String>,
    #[serde(rename = "Masters Completed", default)]
    pub masters_completed: bool,
    #[serde(rename = "Completed Courses", default)]
    pub completed_courses: Vec<CourseInput>,
    /// Program credit total; the configured default applies when absent
    #[serde(rename = "Total Credits", default, skip_serializing_if = "Option::is_none")]
    pub total_credits: Option<u32>,
}

/// A request whose fields have all been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub department: String,
    pub program_of_study: String,
    pub masters_completed: bool,
    pub completed_courses: Vec<CompletedCourse>,
    pub total_credits: Option<u32>,
}

impl PlanRequest {
    /// Check required fields and parse every credits value
    pub fn validate(&self) -> Result<ValidatedRequest, ValidationError> {
        debug!(course_count = self.completed_courses.len(), "PlanRequest::validate: called");
        let department = required_text(self.department.as_deref(), "Department")?;
        let program_of_study = required_text(self.program_of_study.as_deref(), "Program of Study")?;

        let completed_courses = self
            .completed_courses
            .iter()
            .enumerate()
            .map(|(i, course)| validate_course(i, course))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedRequest {
            department,
            program_of_study,
            masters_completed: self.masters_completed,
            completed_courses,
            total_credits: self.total_credits,
        })
    }
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::MissingField(field.to_string())),
    }
}

fn validate_course(index: usize, course: &CourseInput) -> Result<CompletedCourse, ValidationError> {
    let field = |name: &str| format!("Completed Courses[{}].{}", index, name);
    Ok(CompletedCourse {
        name: required_text(course.name.as_deref(), &field("Course Name"))?,
        code: required_text(course.code.as_deref(), &field("Course Code"))?,
        credits: parse_credits(&course.credits, &field("Credits"))?,
        semester: course.semester.as_deref().map(str::trim).unwrap_or_default().to_string(),
    })
}

/// Parse a credits value: a JSON integer or all-digit text, never negative
pub fn parse_credits(value: &Value, field: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidCredits {
        field: field.to_string(),
        value: match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    };

    match value {
        Value::Null => Err(ValidationError::MissingField(field.to_string())),
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()).ok_or_else(invalid),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(ValidationError::MissingField(field.to_string()));
            }
            if !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            s.parse::<u32>().map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}
