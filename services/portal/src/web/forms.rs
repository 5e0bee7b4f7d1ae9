//! services/portal/src/web/forms.rs
//!
//! Handlers for the form catalog, drafts and submissions.

use crate::web::processing_task::process;
use crate::web::protocol::ServerMessage;
use crate::web::rest::{filing_error, form_error, processing_error, ApiResult};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use training_portal_core::{
    domain::{FieldValue, FormData, FormDraft, SubmittedForm},
    filing::FilingError,
    forms::{search_forms, FormFilter, FormId, FormTemplate},
};
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct FormSummary {
    id: String,
    title: String,
    category: String,
}

impl From<&FormTemplate> for FormSummary {
    fn from(template: &FormTemplate) -> Self {
        Self {
            id: template.id.as_str().to_string(),
            title: template.title.to_string(),
            category: template.category.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct FieldResponse {
    name: String,
    label: String,
    /// One of `text`, `textarea`, `number`, `date`, `select`, `checkbox-group`.
    kind: String,
    required: bool,
    options: Vec<String>,
}

/// A filled-in value: a string, or a list of ticked options for checkbox groups.
#[derive(Serialize, Deserialize, ToSchema, Clone)]
#[serde(untagged)]
pub enum FieldValueBody {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize, ToSchema)]
pub struct FormValues {
    data: BTreeMap<String, FieldValueBody>,
}

impl FormValues {
    fn into_domain(self) -> FormData {
        self.data
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    FieldValueBody::Single(v) => FieldValue::Single(v),
                    FieldValueBody::Multiple(v) => FieldValue::Multiple(v),
                };
                (name, value)
            })
            .collect()
    }
}

fn data_response(data: &FormData) -> BTreeMap<String, FieldValueBody> {
    data.iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValue::Single(v) => FieldValueBody::Single(v.clone()),
                FieldValue::Multiple(v) => FieldValueBody::Multiple(v.clone()),
            };
            (name.clone(), value)
        })
        .collect()
}

#[derive(Serialize, ToSchema)]
pub struct DraftResponse {
    form_id: String,
    data: BTreeMap<String, FieldValueBody>,
    saved: DateTime<Utc>,
}

impl From<FormDraft> for DraftResponse {
    fn from(draft: FormDraft) -> Self {
        Self {
            form_id: draft.form_id.as_str().to_string(),
            data: data_response(&draft.data),
            saved: draft.saved_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct FormDetail {
    id: String,
    title: String,
    category: String,
    fields: Vec<FieldResponse>,
    /// Plain-text rendering of the blank form.
    preview: String,
    draft: Option<DraftResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct SubmissionResponse {
    form_id: String,
    confirmation_number: String,
    submitted: DateTime<Utc>,
    status: String,
}

impl From<SubmittedForm> for SubmissionResponse {
    fn from(submission: SubmittedForm) -> Self {
        Self {
            form_id: submission.form_id.as_str().to_string(),
            confirmation_number: submission.confirmation_number,
            submitted: submission.submitted_at,
            status: submission.status.as_str().to_string(),
        }
    }
}

/// Optional narrowing of the form library.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FormQuery {
    /// Case-insensitive text to look for in the title or category.
    search: Option<String>,
    /// Only forms of this category, e.g. `Homeless Services`.
    category: Option<String>,
}

impl From<FormQuery> for FormFilter {
    fn from(query: FormQuery) -> Self {
        FormFilter {
            search: query.search,
            category: query.category,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SubmittedFormResponse {
    form_id: String,
    title: String,
    confirmation_number: String,
    submitted: DateTime<Utc>,
    status: String,
    data: BTreeMap<String, FieldValueBody>,
}

impl From<SubmittedForm> for SubmittedFormResponse {
    fn from(submission: SubmittedForm) -> Self {
        Self {
            form_id: submission.form_id.as_str().to_string(),
            title: submission.form_id.template().title.to_string(),
            data: data_response(&submission.data),
            confirmation_number: submission.confirmation_number,
            submitted: submission.submitted_at,
            status: submission.status.as_str().to_string(),
        }
    }
}

fn known_form(id: &str) -> ApiResult<FormId> {
    FormId::parse(id).known().map_err(form_error)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the form templates, optionally narrowed by a search term or category.
#[utoipa::path(
    get,
    path = "/forms",
    params(FormQuery),
    responses((status = 200, description = "Matching form templates", body = [FormSummary]))
)]
pub async fn list_forms(Query(query): Query<FormQuery>) -> Json<Vec<FormSummary>> {
    let forms = search_forms(&query.into());
    Json(forms.into_iter().map(|f| f.template().into()).collect())
}

/// List every submitted form, oldest first.
#[utoipa::path(
    get,
    path = "/forms/submissions",
    responses(
        (status = 200, description = "Submitted forms", body = [SubmittedFormResponse]),
        (status = 500, description = "The submission log could not be read")
    )
)]
pub async fn list_submissions(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SubmittedFormResponse>>> {
    let submissions = app_state
        .form_desk
        .submissions()
        .await
        .map_err(filing_error)?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

/// Get a form template with its fields, a text preview, and any saved draft.
#[utoipa::path(
    get,
    path = "/forms/{id}",
    params(("id" = String, Path, description = "The form identifier, e.g. `lead-inspection`.")),
    responses(
        (status = 200, description = "Form template", body = FormDetail),
        (status = 404, description = "No such form")
    )
)]
pub async fn get_form(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FormDetail>> {
    let form_id = known_form(&id)?;
    let template = form_id.template();
    let draft = app_state
        .form_desk
        .draft(form_id)
        .await
        .map_err(filing_error)?;

    Ok(Json(FormDetail {
        id: form_id.as_str().to_string(),
        title: template.title.to_string(),
        category: template.category.to_string(),
        fields: template
            .fields
            .iter()
            .map(|f| FieldResponse {
                name: f.name.to_string(),
                label: f.label.to_string(),
                kind: f.kind.as_str().to_string(),
                required: f.required,
                options: f.options.iter().map(|o| o.to_string()).collect(),
            })
            .collect(),
        preview: template.preview(),
        draft: draft.map(Into::into),
    }))
}

/// Save the filled-in values as the form's draft, replacing any earlier draft.
#[utoipa::path(
    put,
    path = "/forms/{id}/draft",
    params(("id" = String, Path, description = "The form identifier.")),
    request_body = FormValues,
    responses(
        (status = 200, description = "Draft saved", body = DraftResponse),
        (status = 404, description = "No such form")
    )
)]
pub async fn save_draft(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(values): Json<FormValues>,
) -> ApiResult<Json<DraftResponse>> {
    let form_id = known_form(&id)?;
    let draft = app_state
        .form_desk
        .save_draft(form_id, values.into_domain(), Utc::now())
        .await
        .map_err(filing_error)?;
    Ok(Json(draft.into()))
}

/// Validate and submit a form. Runs after the configured processing delay.
#[utoipa::path(
    post,
    path = "/forms/{id}/submit",
    params(("id" = String, Path, description = "The form identifier.")),
    request_body = FormValues,
    responses(
        (status = 200, description = "Form submitted", body = SubmissionResponse),
        (status = 404, description = "No such form"),
        (status = 422, description = "One or more fields are invalid"),
        (status = 503, description = "Processing was cancelled")
    )
)]
pub async fn submit_form(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(values): Json<FormValues>,
) -> ApiResult<Json<SubmissionResponse>> {
    let form_id = known_form(&id)?;
    let data = values.into_domain();

    let state = app_state.clone();
    let work = async move {
        let submitted = state.form_desk.submit(form_id, data, Utc::now()).await?;
        state.publish(ServerMessage::FormSubmitted {
            form_id: form_id.as_str().to_string(),
            confirmation_number: submitted.confirmation_number.clone(),
        });
        Ok::<_, FilingError>(submitted)
    };
    let submitted = process(app_state.config.processing_delay, work)
        .await
        .map_err(processing_error)?
        .map_err(filing_error)?;

    Ok(Json(submitted.into()))
}
