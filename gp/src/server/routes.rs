//! Route handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::AppState;
use super::error::{ApiError, ApiResult};
use crate::planning::{AcademicPlan, PlanRequest, PlanningSession};

#[derive(Debug, Deserialize)]
pub struct CoursesQuery {
    #[serde(rename = "Department", default)]
    pub department: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// GET /get_departments
pub async fn get_departments(State(state): State<AppState>) -> ApiResult<Json<Vec<catalog::Department>>> {
    debug!("get_departments: called");
    let departments = state
        .catalog
        .departments()
        .await
        .map_err(|e| ApiError::Catalog(format!("{:#}", e)))?;
    Ok(Json(departments))
}

/// POST /get_courses
pub async fn get_courses(
    State(state): State<AppState>,
    payload: Result<Json<CoursesQuery>, JsonRejection>,
) -> ApiResult<Json<Vec<catalog::CourseRecord>>> {
    debug!("get_courses: called");
    let department = body(payload)?
        .department
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Department is required".to_string()))?;

    let courses = state
        .catalog
        .courses_by_department(department.trim())
        .await
        .map_err(|e| ApiError::Catalog(format!("{:#}", e)))?;
    Ok(Json(courses))
}

/// POST /generate_subjects
///
/// Holds the session lock from assembly through extraction.
pub async fn generate_subjects(
    State(state): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> ApiResult<Json<AcademicPlan>> {
    debug!("generate_subjects: called");
    let request = body(payload)?;
    let mut session = state.session.lock().await;
    let outcome = state.planner.generate(&mut session, &request).await?;
    info!(session = %session.id, semesters = outcome.plan.len(), "generate_subjects: plan ready");
    Ok(Json(outcome.plan))
}

/// POST /session/reset
pub async fn reset_session(State(state): State<AppState>) -> Json<SessionResponse> {
    debug!("reset_session: called");
    let mut session = state.session.lock().await;
    *session = PlanningSession::new();
    info!(session = %session.id, "reset_session: new session");
    Json(SessionResponse {
        session_id: session.id,
        created_at: session.created_at,
    })
}
