//! services/portal/src/web/modules.rs
//!
//! Handlers for training progress, module cards, and module quizzes.

use crate::web::rest::{locked, ApiResult};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use training_portal_core::{
    assessment::{submit_assessment, AssessmentOutcome, PASS_THRESHOLD},
    catalog::{lesson_for_video_id, ModuleOutline, ModuleRef, TrainingModule, VideoLesson},
    domain::ProgressSummary,
    sequencer::ModuleSequencer,
};
use utoipa::ToSchema;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct SummaryResponse {
    completed: usize,
    total: usize,
    remaining: usize,
    percentage: u8,
    estimated_hours: u32,
}

impl From<ProgressSummary> for SummaryResponse {
    fn from(summary: ProgressSummary) -> Self {
        Self {
            completed: summary.completed,
            total: summary.total,
            remaining: summary.remaining,
            percentage: summary.percentage,
            estimated_hours: summary.estimated_hours,
        }
    }
}

/// The learner's progress, keyed the way the browser stores it.
#[derive(Serialize, ToSchema)]
pub struct ProgressResponse {
    completed_modules: Vec<u32>,
    current_module: u32,
    /// Module number (as a string) to percentage.
    scores: BTreeMap<String, u8>,
    total_watch_time: u64,
    summary: SummaryResponse,
}

#[derive(Serialize, ToSchema)]
pub struct ModuleCard {
    number: u32,
    title: String,
    video_id: String,
    duration: String,
    format: String,
    /// One of `locked`, `unlocked`, `in_progress`, `completed`.
    state: String,
    score: Option<u8>,
}

#[derive(Serialize, ToSchema)]
pub struct LessonResponse {
    title: String,
    duration: String,
    video_url: String,
    presenter: String,
    description: String,
    objectives: Vec<String>,
}

impl From<&VideoLesson> for LessonResponse {
    fn from(lesson: &VideoLesson) -> Self {
        Self {
            title: lesson.title.to_string(),
            duration: lesson.duration.to_string(),
            video_url: lesson.video_url.to_string(),
            presenter: lesson.presenter.to_string(),
            description: lesson.description.to_string(),
            objectives: strings(lesson.objectives),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ModuleDetail {
    number: u32,
    title: String,
    video_id: String,
    video_title: String,
    video_duration: String,
    duration: String,
    format: String,
    topics: Vec<String>,
    /// Absent for module numbers outside the curriculum.
    state: Option<String>,
    score: Option<u8>,
    lesson: LessonResponse,
}

#[derive(Serialize, ToSchema)]
pub struct OpenModuleResponse {
    number: u32,
    state: String,
}

#[derive(Serialize, ToSchema)]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct QuizResponse {
    module_id: u32,
    pass_threshold: u8,
    questions: Vec<QuizQuestion>,
}

/// One answer per question, by position. `null` or a missing entry counts as wrong.
#[derive(Deserialize, ToSchema)]
pub struct QuizSubmission {
    answers: Vec<Option<usize>>,
}

#[derive(Serialize, ToSchema)]
pub struct QuizResult {
    module_id: u32,
    correct: usize,
    total: usize,
    score: u8,
    passed: bool,
    /// False when the module had already been completed before this attempt.
    newly_completed: bool,
    current_module: u32,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn known_module(number: u32) -> ApiResult<TrainingModule> {
    TrainingModule::from_number(number)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Module {} not found", number)))
}

fn ensure_unlocked(sequencer: &ModuleSequencer, module: TrainingModule) -> ApiResult<()> {
    if sequencer.is_unlocked(module) {
        Ok(())
    } else {
        Err(locked(module.number()))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn card(outline: ModuleOutline, state: &str, score: Option<u8>) -> ModuleCard {
    ModuleCard {
        number: outline.number,
        title: outline.title.into_owned(),
        video_id: outline.video_id.into_owned(),
        duration: outline.duration.to_string(),
        format: outline.format.to_string(),
        state: state.to_string(),
        score,
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Get the learner's progress and the course summary.
#[utoipa::path(
    get,
    path = "/progress",
    responses((status = 200, description = "Current progress", body = ProgressResponse))
)]
pub async fn get_progress(State(app_state): State<Arc<AppState>>) -> Json<ProgressResponse> {
    let sequencer = app_state.sequencer.lock().await;
    let progress = sequencer.progress();
    Json(ProgressResponse {
        completed_modules: progress.completed_modules.iter().map(|m| m.number()).collect(),
        current_module: progress.current_module,
        scores: progress
            .scores
            .iter()
            .map(|(module, score)| (module.number().to_string(), score.percent()))
            .collect(),
        total_watch_time: progress.total_watch_time,
        summary: sequencer.summary().into(),
    })
}

/// List every module of the curriculum with its current state.
#[utoipa::path(
    get,
    path = "/modules",
    responses((status = 200, description = "All modules in order", body = [ModuleCard]))
)]
pub async fn list_modules(State(app_state): State<Arc<AppState>>) -> Json<Vec<ModuleCard>> {
    let sequencer = app_state.sequencer.lock().await;
    let cards = sequencer
        .snapshot()
        .into_iter()
        .map(|(module, state)| {
            let score = sequencer.progress().score(module).map(|s| s.percent());
            card(module.outline(), state.as_str(), score)
        })
        .collect();
    Json(cards)
}

/// Get a module's outline and lesson. Numbers outside the curriculum get a placeholder.
#[utoipa::path(
    get,
    path = "/modules/{number}",
    params(("number" = u32, Path, description = "The module number.")),
    responses((status = 200, description = "Module outline", body = ModuleDetail))
)]
pub async fn get_module(
    State(app_state): State<Arc<AppState>>,
    Path(number): Path<u32>,
) -> Json<ModuleDetail> {
    let module = ModuleRef::from_number(number);
    let (state, score) = match module {
        ModuleRef::Known(known) => {
            let sequencer = app_state.sequencer.lock().await;
            (
                Some(sequencer.state_of(known).as_str().to_string()),
                sequencer.progress().score(known).map(|s| s.percent()),
            )
        }
        ModuleRef::Unknown(_) => (None, None),
    };

    let outline = module.outline();
    Json(ModuleDetail {
        number: outline.number,
        title: outline.title.into_owned(),
        video_id: outline.video_id.into_owned(),
        video_title: outline.video_title.into_owned(),
        video_duration: outline.video_duration.to_string(),
        duration: outline.duration.to_string(),
        format: outline.format.to_string(),
        topics: strings(outline.topics),
        state,
        score,
        lesson: module.lesson().into(),
    })
}

/// Get the recorded lesson for a video id. Unknown ids get the generic lesson.
#[utoipa::path(
    get,
    path = "/lessons/{video_id}",
    params(("video_id" = String, Path, description = "The module's video id, e.g. `lead-abatement`.")),
    responses((status = 200, description = "Video lesson", body = LessonResponse))
)]
pub async fn get_lesson(Path(video_id): Path<String>) -> Json<LessonResponse> {
    Json(lesson_for_video_id(&video_id).into())
}

/// Start studying a module.
#[utoipa::path(
    post,
    path = "/modules/{number}/open",
    params(("number" = u32, Path, description = "The module number.")),
    responses(
        (status = 200, description = "Module opened", body = OpenModuleResponse),
        (status = 403, description = "Module is locked"),
        (status = 404, description = "No such module")
    )
)]
pub async fn open_module(
    State(app_state): State<Arc<AppState>>,
    Path(number): Path<u32>,
) -> ApiResult<Json<OpenModuleResponse>> {
    let module = known_module(number)?;
    let mut sequencer = app_state.sequencer.lock().await;
    let state = sequencer
        .open_module(module)
        .map_err(|e| (StatusCode::FORBIDDEN, e.to_string()))?;
    Ok(Json(OpenModuleResponse {
        number,
        state: state.as_str().to_string(),
    }))
}

/// Get the quiz for a module, without the answers.
#[utoipa::path(
    get,
    path = "/modules/{number}/quiz",
    params(("number" = u32, Path, description = "The module number.")),
    responses(
        (status = 200, description = "Quiz questions", body = QuizResponse),
        (status = 403, description = "Module is locked"),
        (status = 404, description = "No such module")
    )
)]
pub async fn get_quiz(
    State(app_state): State<Arc<AppState>>,
    Path(number): Path<u32>,
) -> ApiResult<Json<QuizResponse>> {
    let module = known_module(number)?;
    ensure_unlocked(&*app_state.sequencer.lock().await, module)?;

    let questions = module
        .lesson()
        .quiz
        .iter()
        .map(|q| QuizQuestion {
            prompt: q.prompt.to_string(),
            options: strings(q.options),
        })
        .collect();
    Ok(Json(QuizResponse {
        module_id: number,
        pass_threshold: PASS_THRESHOLD,
        questions,
    }))
}

/// Submit answers to a module quiz. A passing score completes the module.
#[utoipa::path(
    post,
    path = "/modules/{number}/quiz",
    params(("number" = u32, Path, description = "The module number.")),
    request_body = QuizSubmission,
    responses(
        (status = 200, description = "Graded attempt", body = QuizResult),
        (status = 403, description = "Module is locked"),
        (status = 404, description = "No such module")
    )
)]
pub async fn submit_quiz(
    State(app_state): State<Arc<AppState>>,
    Path(number): Path<u32>,
    Json(submission): Json<QuizSubmission>,
) -> ApiResult<Json<QuizResult>> {
    let module = known_module(number)?;
    let mut sequencer = app_state.sequencer.lock().await;
    ensure_unlocked(&sequencer, module)?;

    let outcome = submit_assessment(&mut sequencer, module, &submission.answers).await;
    let grade = outcome.grade();
    let newly_completed = matches!(
        outcome,
        AssessmentOutcome::Passed {
            newly_completed: true,
            ..
        }
    );
    info!(
        "Quiz for module {} graded: {}/{} correct.",
        number, grade.correct, grade.total
    );

    Ok(Json(QuizResult {
        module_id: number,
        correct: grade.correct,
        total: grade.total,
        score: grade.score.percent(),
        passed: grade.passed(),
        newly_completed,
        current_module: sequencer.progress().current_module,
    }))
}
