//! Semester-keyed academic plan

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One course in a semester
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PlanEntry {
    #[serde(rename = "Course Name")]
    pub course_name: String,
    #[serde(rename = "Course Code")]
    pub course_code: String,
    #[serde(rename = "Credits")]
    pub credits: u32,
}

/// One semester as the model declared it
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SemesterPlan {
    /// Declared total, not recomputed
    #[serde(rename = "Total Credits")]
    pub total_credits: u32,
    #[serde(rename = "Courses")]
    pub courses: Vec<PlanEntry>,
}

impl SemesterPlan {
    /// Sum of the listed course credits
    pub fn course_credit_sum(&self) -> u64 {
        self.courses.iter().map(|c| u64::from(c.credits)).sum()
    }
}

/// Semester label → semester plan, in presentation order
///
/// Serializes as a JSON object whose key order is the semester order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcademicPlan {
    semesters: Vec<(String, SemesterPlan)>,
}

impl AcademicPlan {
    pub(crate) fn from_semesters(semesters: Vec<(String, SemesterPlan)>) -> Self {
        Self { semesters }
    }

    pub fn semesters(&self) -> impl Iterator<Item = (&str, &SemesterPlan)> {
        self.semesters.iter().map(|(label, plan)| (label.as_str(), plan))
    }

    pub fn get(&self, label: &str) -> Option<&SemesterPlan> {
        self.semesters.iter().find(|(l, _)| l == label).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.semesters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    /// Sum of every course's credits across all semesters
    pub fn planned_credits(&self) -> u64 {
        self.semesters.iter().map(|(_, p)| p.course_credit_sum()).sum()
    }

    /// Flattened `(semester, course)` rows, in order
    pub fn rows(&self) -> impl Iterator<Item = (&str, &PlanEntry)> {
        self.semesters
            .iter()
            .flat_map(|(label, plan)| plan.courses.iter().map(move |c| (label.as_str(), c)))
    }
}

impl Serialize for AcademicPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.semesters.len()))?;
        for (label, plan) in &self.semesters {
            map.serialize_entry(label, plan)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, credits: u32) -> PlanEntry {
        PlanEntry {
            course_name: format!("Course {}", code),
            course_code: code.to_string(),
            credits,
        }
    }

    fn plan() -> AcademicPlan {
        AcademicPlan::from_semesters(vec![
            (
                "Semester 2".to_string(),
                SemesterPlan {
                    total_credits: 9,
                    courses: vec![entry("ELE699", 8), entry("ELE601", 1)],
                },
            ),
            (
                "Semester 1".to_string(),
                SemesterPlan {
                    total_credits: 3,
                    courses: vec![entry("ELE501", 3)],
                },
            ),
        ])
    }

    #[test]
    fn test_serialize_keeps_semester_order() {
        let json = serde_json::to_string(&plan()).unwrap();
        let second = json.find("Semester 2").unwrap();
        let first = json.find("Semester 1").unwrap();
        assert!(second < first);
        assert!(json.contains("\"Total Credits\":9"));
        assert!(json.contains("\"Course Code\":\"ELE699\""));
    }

    #[test]
    fn test_totals_do_not_overflow() {
        let plan = AcademicPlan::from_semesters(vec![(
            "Semester 1".to_string(),
            SemesterPlan {
                total_credits: u32::MAX,
                courses: vec![entry("ELE501", u32::MAX), entry("ELE502", 1)],
            },
        )]);
        assert_eq!(plan.get("Semester 1").unwrap().course_credit_sum(), u64::from(u32::MAX) + 1);
        assert_eq!(plan.planned_credits(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_rows_and_totals() {
        let plan = plan();
        let rows: Vec<_> = plan.rows().map(|(s, c)| (s, c.course_code.as_str())).collect();
        assert_eq!(
            rows,
            vec![("Semester 2", "ELE699"), ("Semester 2", "ELE601"), ("Semester 1", "ELE501")]
        );
        assert_eq!(plan.planned_credits(), 12);
        assert_eq!(plan.get("Semester 1").unwrap().course_credit_sum(), 3);
        assert!(plan.get("Semester 3").is_none());
    }
}
