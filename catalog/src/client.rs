//! HTTP client for the course catalog API

use eyre::{Context, Result};
use log::{debug, info, warn};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN, REFERER};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::CatalogConfig;

/// A department and its subject-code prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(rename = "Department")]
    pub name: String,
    #[serde(rename = "Prefix")]
    pub prefix: String,
}

/// A course as offered to the planner: every field is display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(rename = "Course Name")]
    pub name: String,
    #[serde(rename = "Course Code")]
    pub code: String,
    #[serde(rename = "Credits")]
    pub credits: String,
    #[serde(rename = "Semester")]
    pub semester: String,
}

/// Summary entry from the catalog listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogCourse {
    #[serde(default)]
    pub pid: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "__catalogCourseId", default)]
    pub catalog_course_id: Option<String>,
    #[serde(rename = "subjectCode", default)]
    pub subject_code: Option<SubjectCode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectCode {
    /// Prefix, e.g. "ELE"
    #[serde(default)]
    pub name: Option<String>,
    /// Department name, e.g. "Electrical Engineering"
    #[serde(default)]
    pub description: Option<String>,
}

impl CatalogCourse {
    fn department(&self) -> Option<&str> {
        self.subject_code.as_ref().and_then(|s| s.description.as_deref())
    }
}

/// Detail record for one course; the API varies the credit shape per course
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseDetails {
    #[serde(default)]
    pub credits: Value,
    #[serde(default)]
    pub semester: Option<String>,
}

/// Client for the catalog REST API
pub struct CatalogClient {
    config: CatalogConfig,
    http: Client,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(ORIGIN, HeaderValue::from_str(&config.origin).context("Invalid origin header")?);
        headers.insert(REFERER, HeaderValue::from_str(&config.referer).context("Invalid referer header")?);

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { config, http })
    }

    /// Fetch the full catalog listing
    pub async fn fetch_all_courses(&self) -> Result<Vec<CatalogCourse>> {
        let url = self.config.courses_url();
        debug!("fetch_all_courses: GET {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach catalog at {}", url))?
            .error_for_status()
            .context("Catalog listing request failed")?;

        let courses: Vec<CatalogCourse> = response.json().await.context("Failed to decode catalog listing")?;
        info!("Fetched {} catalog courses", courses.len());
        Ok(courses)
    }

    /// Fetch the detail record for one course
    pub async fn fetch_course_details(&self, pid: &str) -> Result<CourseDetails> {
        let url = self.config.course_url(pid);
        debug!("fetch_course_details: GET {}", url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach catalog at {}", url))?
            .error_for_status()
            .with_context(|| format!("Course detail request failed for {}", pid))?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to decode course details for {}", pid))
    }

    /// All departments with their subject prefixes
    pub async fn departments(&self) -> Result<Vec<Department>> {
        let courses = self.fetch_all_courses().await?;
        Ok(collect_departments(&courses))
    }

    /// Courses whose subject description equals `department`, with detail fields filled in
    ///
    /// Issues one detail request per matching course. Courses without a pid are skipped.
    pub async fn courses_by_department(&self, department: &str) -> Result<Vec<CourseRecord>> {
        let all = self.fetch_all_courses().await?;
        let matching: Vec<&CatalogCourse> = all.iter().filter(|c| c.department() == Some(department)).collect();
        info!("{} courses listed under '{}'", matching.len(), department);

        let mut records = Vec::with_capacity(matching.len());
        for course in matching {
            let Some(pid) = course.pid.as_deref() else {
                warn!("Skipping course without pid: {:?}", course.title);
                continue;
            };
            let details = self.fetch_course_details(pid).await?;
            records.push(course_record(course, &details));
        }
        Ok(records)
    }
}

/// Unique departments in first-seen order; a later prefix for the same name wins
pub fn collect_departments(courses: &[CatalogCourse]) -> Vec<Department> {
    let mut departments: Vec<Department> = Vec::new();
    for subject in courses.iter().filter_map(|c| c.subject_code.as_ref()) {
        let (Some(name), Some(prefix)) = (subject.description.as_deref(), subject.name.as_deref()) else {
            continue;
        };
        if name.is_empty() || prefix.is_empty() {
            continue;
        }
        match departments.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.prefix = prefix.to_string(),
            None => departments.push(Department {
                name: name.to_string(),
                prefix: prefix.to_string(),
            }),
        }
    }
    departments
}

/// Combine a listing entry with its detail record
pub fn course_record(course: &CatalogCourse, details: &CourseDetails) -> CourseRecord {
    CourseRecord {
        name: course.title.clone().unwrap_or_default(),
        code: course.catalog_course_id.clone().unwrap_or_default(),
        credits: credits_text(&details.credits),
        semester: details.semester.clone().unwrap_or_else(|| "Unknown".to_string()),
    }
}

/// Render the credits field as text
///
/// Seen shapes: `3`, `"3"`, `{"value": 3}`, `{"credits": {"min": 1, "max": 3}}`.
fn credits_text(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => {
            if let Some(v) = map.get("value") {
                return credits_text(v);
            }
            if let Some(v) = map.get("credits") {
                return credits_text(v);
            }
            match (map.get("min").map(credits_text), map.get("max").map(credits_text)) {
                (Some(min), Some(max)) if min == max => min,
                (Some(min), Some(max)) => format!("{}-{}", min, max),
                (Some(one), None) | (None, Some(one)) => one,
                (None, None) => String::new(),
            }
        }
        _ => String::new(),
    }
}
