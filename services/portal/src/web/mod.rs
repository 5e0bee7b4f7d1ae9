pub mod cases;
pub mod events;
pub mod forms;
pub mod modules;
pub mod processing_task;
pub mod protocol;
pub mod rest;
pub mod state;

use crate::config::ConfigError;
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Builds the complete API router. Swagger UI is added by the binary.
pub fn build_router(app_state: Arc<AppState>) -> Result<Router, ConfigError> {
    let origin = app_state
        .config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| ConfigError::InvalidValue("ALLOWED_ORIGIN".to_string(), e.to_string()))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .route("/progress", get(modules::get_progress))
        .route("/modules", get(modules::list_modules))
        .route("/modules/{number}", get(modules::get_module))
        .route("/modules/{number}/open", post(modules::open_module))
        .route(
            "/modules/{number}/quiz",
            get(modules::get_quiz).post(modules::submit_quiz),
        )
        .route("/lessons/{video_id}", get(modules::get_lesson))
        .route("/cases/templates", get(cases::list_case_templates))
        .route("/cases/templates/{key}", get(cases::get_case_template))
        .route("/cases/analyze", post(cases::analyze_case))
        .route("/cases", get(cases::list_cases))
        .route("/forms", get(forms::list_forms))
        .route("/forms/submissions", get(forms::list_submissions))
        .route("/forms/{id}", get(forms::get_form))
        .route("/forms/{id}/draft", put(forms::save_draft))
        .route("/forms/{id}/submit", post(forms::submit_form))
        .route("/events", get(events::events_handler))
        .layer(cors)
        .with_state(app_state))
}
