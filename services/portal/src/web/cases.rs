//! services/portal/src/web/cases.rs
//!
//! Handlers for the case analysis page: sample descriptions, analysis, history.

use crate::web::processing_task::process;
use crate::web::protocol::ServerMessage;
use crate::web::rest::{case_error, processing_error, ApiResult};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use training_portal_core::{
    analyzer::analyze,
    case_log::{validate_description, RECENT_CASES},
    catalog::CaseTemplate,
    domain::{CaseRecord, ExtractedInfo},
    forms::FormId,
};
use utoipa::ToSchema;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct CaseTemplateResponse {
    key: String,
    description: String,
}

impl From<CaseTemplate> for CaseTemplateResponse {
    fn from(template: CaseTemplate) -> Self {
        Self {
            key: template.key().to_string(),
            description: template.description().to_string(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    description: String,
}

#[derive(Serialize, ToSchema)]
pub struct ExtractedInfoResponse {
    client_name: Option<String>,
    address: Option<String>,
}

impl From<ExtractedInfo> for ExtractedInfoResponse {
    fn from(info: ExtractedInfo) -> Self {
        Self {
            client_name: info.client_name,
            address: info.address,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SuggestedForm {
    id: String,
    title: String,
}

impl From<FormId> for SuggestedForm {
    fn from(form: FormId) -> Self {
        Self {
            id: form.as_str().to_string(),
            title: form.template().title.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct AnalyzeResponse {
    case_id: String,
    extracted_info: ExtractedInfoResponse,
    suggested_forms: Vec<SuggestedForm>,
    actions: Vec<String>,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct CaseRecordResponse {
    id: String,
    description: String,
    forms: Vec<String>,
    timestamp: DateTime<Utc>,
    status: String,
}

impl From<&CaseRecord> for CaseRecordResponse {
    fn from(record: &CaseRecord) -> Self {
        Self {
            id: record.id.clone(),
            description: record.description.clone(),
            forms: record.forms.iter().map(|f| f.as_str().to_string()).collect(),
            timestamp: record.timestamp,
            status: record.status.as_str().to_string(),
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the sample case descriptions.
#[utoipa::path(
    get,
    path = "/cases/templates",
    responses((status = 200, description = "Sample case descriptions", body = [CaseTemplateResponse]))
)]
pub async fn list_case_templates() -> Json<Vec<CaseTemplateResponse>> {
    Json(CaseTemplate::ALL.into_iter().map(Into::into).collect())
}

/// Get one sample case description by key, e.g. `lead`.
#[utoipa::path(
    get,
    path = "/cases/templates/{key}",
    params(("key" = String, Path, description = "One of `lead`, `homeless`, `grievance`, `relocation`.")),
    responses(
        (status = 200, description = "Sample case description", body = CaseTemplateResponse),
        (status = 404, description = "No such sample")
    )
)]
pub async fn get_case_template(Path(key): Path<String>) -> ApiResult<Json<CaseTemplateResponse>> {
    CaseTemplate::from_key(&key)
        .map(|template| Json(template.into()))
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No sample case named '{key}'")))
}

/// Analyse a case description and record it in the case history.
///
/// The analysis runs after the configured processing delay. If the client
/// disconnects first, nothing is recorded.
#[utoipa::path(
    post,
    path = "/cases/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Suggested forms and actions", body = AnalyzeResponse),
        (status = 400, description = "Empty description"),
        (status = 503, description = "Processing was cancelled")
    )
)]
pub async fn analyze_case(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let description = validate_description(&request.description)
        .map_err(case_error)?
        .to_string();

    let state = app_state.clone();
    let work = async move {
        let analysis = analyze(&description);
        let record = state
            .case_log
            .lock()
            .await
            .record(&description, &analysis, Utc::now())
            .await;
        state.publish(ServerMessage::CaseGenerated {
            case_id: record.id.clone(),
        });
        (analysis, record)
    };
    let (analysis, record) = process(app_state.config.processing_delay, work)
        .await
        .map_err(processing_error)?;

    Ok(Json(AnalyzeResponse {
        case_id: record.id,
        extracted_info: analysis.extracted_info.into(),
        suggested_forms: analysis.suggested_forms.into_iter().map(Into::into).collect(),
        actions: analysis.actions.iter().map(|a| a.to_string()).collect(),
        timestamp: record.timestamp,
    }))
}

/// List the most recent analysed cases, newest first.
#[utoipa::path(
    get,
    path = "/cases",
    responses((status = 200, description = "Recent case history", body = [CaseRecordResponse]))
)]
pub async fn list_cases(State(app_state): State<Arc<AppState>>) -> Json<Vec<CaseRecordResponse>> {
    let case_log = app_state.case_log.lock().await;
    Json(case_log.recent(RECENT_CASES).iter().map(Into::into).collect())
}
