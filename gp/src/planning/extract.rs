//! Plan extraction from free-text model answers
//!
//! The model is asked for one JSON object but usually wraps it in prose.
//! Extraction locates the object, parses it, and reads it strictly as a
//! semester-keyed plan. It never guesses: a missing or ill-typed field fails
//! the whole extraction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::{AcademicPlan, MalformedPlanError, PlanEntry, SemesterPlan};

/// How the JSON-shaped substring is located in the answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// First `{` through last `}`
    #[default]
    BraceIndex,
    /// First complete top-level object, string-literal aware
    Balanced,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMode::BraceIndex => write!(f, "brace-index"),
            ExtractionMode::Balanced => write!(f, "balanced"),
        }
    }
}

/// Extract and validate a plan from the accumulated answer text
pub fn extract_plan(raw: &str, mode: ExtractionMode) -> Result<AcademicPlan, MalformedPlanError> {
    debug!(%mode, len = raw.len(), "extract_plan: called");
    let candidate = match mode {
        ExtractionMode::BraceIndex => locate_brace_index(raw),
        ExtractionMode::Balanced => locate_balanced(raw),
    }
    .map_err(|reason| MalformedPlanError::new(reason, raw))?;

    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| MalformedPlanError::new(format!("embedded object does not parse: {}", e), raw))?;

    interpret(&value).map_err(|reason| MalformedPlanError::new(reason, raw))
}

fn locate_brace_index(raw: &str) -> Result<&str, String> {
    let start = raw.find('{').ok_or_else(|| "no '{' in answer".to_string())?;
    let end = raw.rfind('}').ok_or_else(|| "no '}' in answer".to_string())?;
    if end < start {
        return Err("last '}' precedes first '{'".to_string());
    }
    Ok(&raw[start..=end])
}

fn locate_balanced(raw: &str) -> Result<&str, String> {
    let start = raw.find('{').ok_or_else(|| "no '{' in answer".to_string())?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    Err("embedded object is never closed".to_string())
}

fn interpret(value: &Value) -> Result<AcademicPlan, String> {
    let semesters = value
        .as_object()
        .ok_or_else(|| "plan is not an object".to_string())?;
    if semesters.is_empty() {
        return Err("plan has no semesters".to_string());
    }

    let mut plan = Vec::with_capacity(semesters.len());
    for (label, semester) in semesters {
        let fields = semester
            .as_object()
            .ok_or_else(|| format!("{}: not an object", label))?;
        let total_credits = integer_field(fields, "Total Credits", label)?;
        let courses = fields
            .get("Courses")
            .ok_or_else(|| format!("{}: missing 'Courses'", label))?
            .as_array()
            .ok_or_else(|| format!("{}: 'Courses' is not a list", label))?
            .iter()
            .enumerate()
            .map(|(i, course)| interpret_course(course, &format!("{}.Courses[{}]", label, i)))
            .collect::<Result<Vec<_>, _>>()?;

        plan.push((
            label.clone(),
            SemesterPlan {
                total_credits,
                courses,
            },
        ));
    }
    Ok(AcademicPlan::from_semesters(plan))
}

fn interpret_course(value: &Value, path: &str) -> Result<PlanEntry, String> {
    let fields = value
        .as_object()
        .ok_or_else(|| format!("{}: not an object", path))?;
    Ok(PlanEntry {
        course_name: text_field(fields, "Course Name", path)?,
        course_code: text_field(fields, "Course Code", path)?,
        credits: integer_field(fields, "Credits", path)?,
    })
}

fn text_field(fields: &Map<String, Value>, key: &str, path: &str) -> Result<String, String> {
    match fields.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!("{}: '{}' is not text", path, key)),
        None => Err(format!("{}: missing '{}'", path, key)),
    }
}

/// Non-negative integer, from a JSON number or an all-digit string
fn integer_field(fields: &Map<String, Value>, key: &str, path: &str) -> Result<u32, String> {
    let value = fields
        .get(key)
        .ok_or_else(|| format!("{}: missing '{}'", path, key))?;
    let parsed = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse::<u64>().ok()
            } else {
                None
            }
        }
        _ => None,
    };
    parsed
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| format!("{}: '{}' is not a non-negative integer: {}", path, key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = r#"Sure! {"Semester 1": {"Total Credits": 9, "Courses": [{"Course Name":"X","Course Code":"ELE501","Credits":3}]}} Hope this helps!"#;

    fn both_modes() -> [ExtractionMode; 2] {
        [ExtractionMode::BraceIndex, ExtractionMode::Balanced]
    }

    #[test]
    fn test_extracts_object_wrapped_in_prose() {
        for mode in both_modes() {
            let plan = extract_plan(WRAPPED, mode).unwrap();
            assert_eq!(plan.len(), 1);
            let semester = plan.get("Semester 1").unwrap();
            assert_eq!(semester.total_credits, 9);
            assert_eq!(semester.courses.len(), 1);
            assert_eq!(semester.courses[0].course_code, "ELE501");
            assert_eq!(semester.courses[0].credits, 3);
        }
    }

    #[test]
    fn test_no_brace_fails() {
        for mode in both_modes() {
            let err = extract_plan("I cannot build a plan for you today.", mode).unwrap_err();
            assert!(err.reason.contains("no '{'"));
            assert_eq!(err.raw, "I cannot build a plan for you today.");
        }
    }

    #[test]
    fn test_unbalanced_object_fails() {
        let raw = r#"Here: {"Semester 1": {"Total Credits": 3, "Courses": [{"Course Name":"X","Course Code":"A1","Credits":3}]}"#;
        for mode in both_modes() {
            assert!(extract_plan(raw, mode).is_err());
        }
    }

    #[test]
    fn test_reversed_braces_fail() {
        assert!(extract_plan("} then {", ExtractionMode::BraceIndex).is_err());
    }

    #[test]
    fn test_empty_object_fails() {
        let err = extract_plan("{}", ExtractionMode::BraceIndex).unwrap_err();
        assert!(err.reason.contains("no semesters"));
    }

    #[test]
    fn test_semester_order_preserved() {
        let raw = r#"{"Semester 2": {"Total Credits": 0, "Courses": []}, "Semester 1": {"Total Credits": 0, "Courses": []}}"#;
        let plan = extract_plan(raw, ExtractionMode::BraceIndex).unwrap();
        let labels: Vec<_> = plan.semesters().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Semester 2", "Semester 1"]);
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let raw = r#"{"Semester 1": {"Total Credits": "3", "Courses": [{"Course Name":"X","Course Code":"A1","Credits":"3"}]}}"#;
        let plan = extract_plan(raw, ExtractionMode::BraceIndex).unwrap();
        assert_eq!(plan.get("Semester 1").unwrap().courses[0].credits, 3);
    }

    #[test]
    fn test_integral_float_accepted() {
        let raw = r#"{"Semester 1": {"Total Credits": 3.0, "Courses": []}}"#;
        let plan = extract_plan(raw, ExtractionMode::BraceIndex).unwrap();
        assert_eq!(plan.get("Semester 1").unwrap().total_credits, 3);
    }

    #[test]
    fn test_missing_credits_fails_rather_than_guessing() {
        let raw = r#"{"Semester 1": {"Total Credits": 3, "Courses": [{"Course Name":"X","Course Code":"A1"}]}}"#;
        let err = extract_plan(raw, ExtractionMode::BraceIndex).unwrap_err();
        assert!(err.reason.contains("Semester 1.Courses[0]"));
        assert!(err.reason.contains("Credits"));
    }

    #[test]
    fn test_bad_numbers_fail() {
        for credits in [r#""three""#, "-3", "2.5", "null", r#""""#] {
            let raw = format!(
                r#"{{"Semester 1": {{"Total Credits": 3, "Courses": [{{"Course Name":"X","Course Code":"A1","Credits":{}}}]}}}}"#,
                credits
            );
            assert!(extract_plan(&raw, ExtractionMode::BraceIndex).is_err(), "accepted {}", credits);
        }
    }

    #[test]
    fn test_wrong_shape_fails() {
        for raw in [
            r#"{"Semester 1": []}"#,
            r#"{"Semester 1": {"Total Credits": 3}}"#,
            r#"{"Semester 1": {"Total Credits": 3, "Courses": {}}}"#,
            r#"{"Semester 1": {"Total Credits": 3, "Courses": [{"Course Name":7,"Course Code":"A1","Credits":3}]}}"#,
        ] {
            assert!(extract_plan(raw, ExtractionMode::BraceIndex).is_err(), "accepted {}", raw);
        }
    }

    #[test]
    fn test_trailing_prose_brace_breaks_brace_index_only() {
        let raw = r#"{"Semester 1": {"Total Credits": 3, "Courses": [{"Course Name":"X","Course Code":"A1","Credits":3}]}} (note: {optional} electives omitted)"#;
        assert!(extract_plan(raw, ExtractionMode::BraceIndex).is_err());
        let plan = extract_plan(raw, ExtractionMode::Balanced).unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_balanced_ignores_braces_in_strings() {
        let raw = r#"Plan: {"Semester 1": {"Total Credits": 3, "Courses": [{"Course Name":"Sets {and} \"maps}\"","Course Code":"A1","Credits":3}]}} ok"#;
        let plan = extract_plan(raw, ExtractionMode::Balanced).unwrap();
        assert_eq!(plan.get("Semester 1").unwrap().courses[0].course_name, r#"Sets {and} "maps}""#);
    }

    #[test]
    fn test_mode_serde_names() {
        let mode: ExtractionMode = serde_yaml::from_str("balanced").unwrap();
        assert_eq!(mode, ExtractionMode::Balanced);
        assert_eq!(serde_yaml::to_string(&ExtractionMode::BraceIndex).unwrap().trim(), "brace-index");
        assert_eq!(ExtractionMode::default(), ExtractionMode::BraceIndex);
    }
}
