//! HTTP boundary
//!
//! Serves catalog listings and plan generation to the presentation layer.
//! One planning session is shared by all callers and guarded by a lock, so
//! plan requests run one at a time.

mod error;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use eyre::{Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub use error::{ApiError, ApiResult};

use crate::config::Config;
use crate::planning::{Planner, PlanningSession};
use catalog::CatalogClient;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<PlanningSession>>,
    pub planner: Arc<Planner>,
    pub catalog: Arc<CatalogClient>,
}

impl AppState {
    pub fn new(planner: Planner, catalog: CatalogClient) -> Self {
        Self {
            session: Arc::new(Mutex::new(PlanningSession::new())),
            planner: Arc::new(planner),
            catalog: Arc::new(catalog),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        debug!("AppState::from_config: called");
        let planner = Planner::from_config(config)?;
        let catalog = CatalogClient::new(config.catalog.clone())?;
        Ok(Self::new(planner, catalog))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/get_departments", get(routes::get_departments))
        .route("/get_courses", post(routes::get_courses))
        .route("/generate_subjects", post(routes::generate_subjects))
        .route("/session/reset", post(routes::reset_session))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    debug!(%bind, "serve: called");
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", bind))?;
    info!(addr = %listener.local_addr()?, model = state.planner.model(), "serve: listening");
    axum::serve(listener, create_router(state))
        .await
        .wrap_err("HTTP server failed")
}
