//! services/portal/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, and the error mapping
//! shared by the REST handlers.

use crate::web::{cases, forms, modules, processing_task::ProcessingError};
use axum::http::StatusCode;
use tracing::error;
use training_portal_core::{
    case_log::CaseError,
    filing::FilingError,
    forms::FormError,
    sequencer::SequenceError,
};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        modules::get_progress,
        modules::list_modules,
        modules::get_module,
        modules::open_module,
        modules::get_quiz,
        modules::submit_quiz,
        modules::get_lesson,
        cases::list_case_templates,
        cases::get_case_template,
        cases::analyze_case,
        cases::list_cases,
        forms::list_forms,
        forms::list_submissions,
        forms::get_form,
        forms::save_draft,
        forms::submit_form,
    ),
    components(
        schemas(
            modules::ProgressResponse,
            modules::SummaryResponse,
            modules::ModuleCard,
            modules::ModuleDetail,
            modules::LessonResponse,
            modules::OpenModuleResponse,
            modules::QuizResponse,
            modules::QuizQuestion,
            modules::QuizSubmission,
            modules::QuizResult,
            cases::CaseTemplateResponse,
            cases::AnalyzeRequest,
            cases::AnalyzeResponse,
            cases::ExtractedInfoResponse,
            cases::SuggestedForm,
            cases::CaseRecordResponse,
            forms::FormSummary,
            forms::FormDetail,
            forms::FieldResponse,
            forms::FieldValueBody,
            forms::FormValues,
            forms::DraftResponse,
            forms::SubmissionResponse,
            forms::SubmittedFormResponse,
        )
    ),
    tags(
        (name = "Training Portal API", description = "Local API for the health & homeless services training portal.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Handlers report failures as a status code and a human-readable message.
pub type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn locked(number: u32) -> (StatusCode, String) {
    (StatusCode::FORBIDDEN, SequenceError::Locked(number).to_string())
}

pub fn case_error(e: CaseError) -> (StatusCode, String) {
    match e {
        CaseError::EmptyDescription => (StatusCode::BAD_REQUEST, e.to_string()),
    }
}

pub fn form_error(e: FormError) -> (StatusCode, String) {
    match e {
        FormError::UnknownForm(_) => (StatusCode::NOT_FOUND, e.to_string()),
        FormError::Invalid(ref errors) => {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("{}: {}", e, details.join("; ")),
            )
        }
    }
}

pub fn filing_error(e: FilingError) -> (StatusCode, String) {
    match e {
        FilingError::Form(e) => form_error(e),
        FilingError::Storage(e) => {
            error!("Form storage failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store the form".to_string(),
            )
        }
    }
}

pub fn processing_error(e: ProcessingError) -> (StatusCode, String) {
    match e {
        ProcessingError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        ProcessingError::Failed(_) => {
            error!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
