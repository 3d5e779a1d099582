//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::auth::{AuthResponse, LoginRequest, SignupRequest};
use crate::web::state::{AppState, CurrentUser};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_notes_core::domain::{Domain, GeneratedNotes, NoteRecord};
use study_notes_core::export::{self, ExportFile};
use study_notes_core::ports::PortError;
use study_notes_core::{GenerateError, SolutionView};
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        levels_handler,
        generate_notes_handler,
        history_handler,
        get_notes_handler,
        solution_handler,
        export_text_handler,
        export_pdf_handler,
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
    ),
    components(
        schemas(
            LevelInfo,
            GenerateNotesRequest,
            GenerateNotesResponse,
            HistoryEntry,
            SolutionResponse,
            SignupRequest,
            LoginRequest,
            AuthResponse,
        )
    ),
    tags(
        (name = "Study Notes API", description = "Generate, browse and export textbook-style study notes.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// One selectable academic level with its sub-levels.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    #[schema(value_type = String, example = "Competitive Exam")]
    pub domain: Domain,
    pub sub_level_label: String,
    pub sub_levels: Vec<String>,
    pub default_sub_level: String,
}

impl From<Domain> for LevelInfo {
    fn from(domain: Domain) -> Self {
        Self {
            domain,
            sub_level_label: domain.sub_level_label().to_string(),
            sub_levels: domain.sub_levels().iter().map(|s| s.to_string()).collect(),
            default_sub_level: domain.default_sub_level().to_string(),
        }
    }
}

/// The payload for a generation request.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateNotesRequest {
    /// Comma-separated topics, e.g. `"Photosynthesis, Respiration"`.
    pub topics: String,
    #[schema(value_type = String, example = "School")]
    pub domain: Domain,
    #[serde(default)]
    pub sub_level: Option<String>,
}

/// The generated notes, plus the history id when they were saved.
#[derive(Serialize, ToSchema)]
pub struct GenerateNotesResponse {
    pub id: Option<Uuid>,
    #[schema(value_type = Object)]
    pub notes: GeneratedNotes,
}

/// A stored generation result.
#[derive(Serialize, ToSchema)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub domain: String,
    pub topics: String,
    #[schema(value_type = Object)]
    pub content: GeneratedNotes,
    pub created_at: DateTime<Utc>,
}

impl From<NoteRecord> for HistoryEntry {
    fn from(record: NoteRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            domain: record.domain,
            topics: record.topics,
            content: record.content,
            created_at: record.created_at,
        }
    }
}

/// A revealed practice-question solution.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolutionResponse {
    pub correct_option: Option<String>,
    pub solution: String,
    pub is_code: bool,
}

impl From<SolutionView> for SolutionResponse {
    fn from(view: SolutionView) -> Self {
        Self {
            correct_option: view.correct_option,
            solution: view.solution,
            is_code: view.is_code,
        }
    }
}

//=========================================================================================
// Error Mapping
//=========================================================================================

fn generation_failure(e: GenerateError) -> (StatusCode, String) {
    match e {
        GenerateError::Validation => (StatusCode::BAD_REQUEST, e.to_string()),
        GenerateError::Provider(_) | GenerateError::Parse(_) => {
            error!("Generation error: {:?}", e);
            (StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

fn lookup_failure(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        other => {
            error!("Fetch error: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch notes".to_string(),
            )
        }
    }
}

async fn load_notes(app_state: &AppState, id: Uuid) -> Result<NoteRecord, (StatusCode, String)> {
    app_state.notes.get(id).await.map_err(lookup_failure)
}

/// Header-safe `Content-Disposition` value for a download.
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            ' '..='~' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

fn attachment(file: ExportFile) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file.file_name)),
        ],
        file.body,
    )
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the academic levels and their sub-levels for building the request form.
#[utoipa::path(
    get,
    path = "/levels",
    responses((status = 200, description = "Available levels", body = [LevelInfo]))
)]
pub async fn levels_handler() -> Json<Vec<LevelInfo>> {
    Json(Domain::ALL.into_iter().map(LevelInfo::from).collect())
}

/// Generate study notes for a comma-separated list of topics.
///
/// The result is saved to history for the signed-in user, or to the anonymous
/// history. A failed save does not fail the request; `id` is then `null`.
#[utoipa::path(
    post,
    path = "/notes",
    request_body = GenerateNotesRequest,
    responses(
        (status = 201, description = "Notes generated", body = GenerateNotesResponse),
        (status = 400, description = "No topics were given"),
        (status = 502, description = "The model failed or returned unreadable content")
    )
)]
pub async fn generate_notes_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Json(req): Json<GenerateNotesRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let generation = app_state
        .notes
        .generate(&req.topics, req.domain, req.sub_level.as_deref(), owner)
        .await
        .map_err(generation_failure)?;

    info!(
        "Generated {} chapter(s) for topics '{}'",
        generation.notes.notes.len(),
        req.topics
    );
    let response = GenerateNotesResponse {
        id: generation.id,
        notes: generation.notes,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// The ten most recent entries for the signed-in user, or anonymous entries otherwise.
///
/// A storage failure yields an empty list.
#[utoipa::path(
    get,
    path = "/notes/history",
    responses((status = 200, description = "Recent history, newest first", body = [HistoryEntry]))
)]
pub async fn history_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
) -> Json<Vec<HistoryEntry>> {
    let records = app_state.notes.history(owner).await;
    Json(records.into_iter().map(HistoryEntry::from).collect())
}

/// Fetch one history entry by id.
#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(("id" = Uuid, Path, description = "History entry id")),
    responses(
        (status = 200, description = "The stored entry", body = HistoryEntry),
        (status = 404, description = "No entry with this id"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn get_notes_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryEntry>, (StatusCode, String)> {
    let record = load_notes(&app_state, id).await?;
    Ok(Json(record.into()))
}

/// Reveal the solution of one practice question.
#[utoipa::path(
    get,
    path = "/notes/{id}/chapters/{chapter}/questions/{question}/solution",
    params(
        ("id" = Uuid, Path, description = "History entry id"),
        ("chapter" = usize, Path, description = "Zero-based chapter index"),
        ("question" = usize, Path, description = "Zero-based question index")
    ),
    responses(
        (status = 200, description = "The solution", body = SolutionResponse),
        (status = 404, description = "No such entry, chapter or question")
    )
)]
pub async fn solution_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, chapter, question)): Path<(Uuid, usize, usize)>,
) -> Result<Json<SolutionResponse>, (StatusCode, String)> {
    let record = load_notes(&app_state, id).await?;
    let practice_question = record
        .content
        .notes
        .get(chapter)
        .and_then(|note| note.practice_questions.get(question))
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("No question {} in chapter {}", question, chapter),
            )
        })?;
    Ok(Json(SolutionView::for_question(practice_question).into()))
}

/// Download a history entry as plain text.
#[utoipa::path(
    get,
    path = "/notes/{id}/export/txt",
    params(("id" = Uuid, Path, description = "History entry id")),
    responses(
        (status = 200, description = "Plain-text attachment", body = String, content_type = "text/plain"),
        (status = 404, description = "No entry with this id")
    )
)]
pub async fn export_text_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = load_notes(&app_state, id).await?;
    Ok(attachment(export::to_text(&record.content)))
}

/// Download a history entry as a paginated PDF.
#[utoipa::path(
    get,
    path = "/notes/{id}/export/pdf",
    params(("id" = Uuid, Path, description = "History entry id")),
    responses(
        (status = 200, description = "PDF attachment", body = Vec<u8>, content_type = "application/pdf"),
        (status = 404, description = "No entry with this id"),
        (status = 500, description = "Rendering failed")
    )
)]
pub async fn export_pdf_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = load_notes(&app_state, id).await?;
    let file = export::to_pdf(&record.content).map_err(|e| {
        error!("PDF export failed for {}: {:?}", id, e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(attachment(file))
}
