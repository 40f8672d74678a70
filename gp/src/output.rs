//! Plan rendering for the terminal and for export

use std::io::Write;

use colored::Colorize;
use eyre::{Context, Result};

use crate::planning::{AcademicPlan, EligibilitySnapshot};

/// CSV export columns
pub const CSV_HEADER: [&str; 5] = ["S.No.", "Course Name", "Course Code", "Credits", "Semester"];

/// Write one row per planned course, numbered from 1
pub fn write_plan_csv<W: Write>(plan: &AcademicPlan, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER).context("Failed to write CSV header")?;
    for (i, (semester, course)) in plan.rows().enumerate() {
        csv.write_record([
            (i + 1).to_string(),
            course.course_name.clone(),
            course.course_code.clone(),
            course.credits.to_string(),
            semester.to_string(),
        ])
        .context("Failed to write CSV row")?;
    }
    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Human-readable plan, one block per semester
pub fn format_plan_text(plan: &AcademicPlan, eligibility: &EligibilitySnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} completed, master's {}",
        "Credits:".bold(),
        eligibility.completed_credits,
        eligibility.masters_completed_label().to_lowercase()
    ));
    if eligibility.masters_needed {
        out.push_str(&format!(" ({} MS credits remaining)", eligibility.masters_credits_remaining));
    }
    out.push('\n');

    for (label, semester) in plan.semesters() {
        out.push_str(&format!(
            "\n{} ({} credits)\n",
            label.cyan().bold(),
            semester.total_credits
        ));
        for course in &semester.courses {
            let code = format!("{:<10}", course.course_code);
            out.push_str(&format!("  {} {:>2}  {}\n", code.yellow(), course.credits, course.course_name));
        }
    }
    out.push_str(&format!("\n{} {}\n", "Planned credits:".bold(), plan.planned_credits()));
    out
}
