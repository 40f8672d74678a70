//! HTTP error mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::planning::PlanError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("catalog request failed: {0}")]
    Catalog(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Plan(PlanError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Plan(PlanError::UpstreamUnavailable { .. }) => StatusCode::BAD_GATEWAY,
            ApiError::Plan(PlanError::MalformedPlan(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Plan(PlanError::Prompt(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Plan(PlanError::MalformedPlan(e)) => json!({
                "error": self.to_string(),
                "raw": e.raw,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
