use super::state::AppState;
use crate::error::FacilitatorError;
use crate::facilitator::{FacilitatorStats, InterviewView};
use crate::interview::{InterviewStep, InterviewTranscript};
use crate::report::AlignmentReport;
use crate::session::{AlignmentSession, SessionHandle};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    /// The session that was closed, if one was open
    pub closed: Option<AlignmentSession>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BeginInterviewRequest {
    /// Session to interview under (defaults to the active session)
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    /// Optional topic filter
    pub topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub topics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: AlignmentReport,
    pub markdown: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl FacilitatorError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NoActiveSession | Self::SessionClosed(_) | Self::AlreadyCompleted(_) => {
                StatusCode::CONFLICT
            }
            Self::UnknownSession(_)
            | Self::UnknownInterview(_)
            | Self::UnknownTranscript(_)
            | Self::NoTranscripts
            | Self::NoMatchingTranscripts { .. } => StatusCode::NOT_FOUND,
            Self::EmptyTopic | Self::EmptyAnswer => StatusCode::BAD_REQUEST,
            Self::Gateway(_) | Self::SummarizationFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FacilitatorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                kind: self.kind().to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, FacilitatorError>;

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions
/// Start a new alignment session, superseding any open one
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> ApiResult<AlignmentSession> {
    Ok(Json(state.facilitator.start_session(&req.topic).await?))
}

/// GET /sessions/active
pub async fn get_active_session(State(state): State<AppState>) -> ApiResult<AlignmentSession> {
    Ok(Json(state.facilitator.active_session().await?))
}

/// GET /sessions/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<AlignmentSession> {
    Ok(Json(
        state.facilitator.session(SessionHandle(session_id)).await?,
    ))
}

/// POST /sessions/active/close
/// Idempotent: closing with nothing open succeeds with `closed: null`
pub async fn close_session(State(state): State<AppState>) -> Json<CloseSessionResponse> {
    Json(CloseSessionResponse {
        closed: state.facilitator.close_session().await,
    })
}

/// POST /interviews
/// Begin an interview and return the opening question
pub async fn begin_interview(
    State(state): State<AppState>,
    req: Option<Json<BeginInterviewRequest>>,
) -> Result<(StatusCode, Json<InterviewView>), FacilitatorError> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let view = state
        .facilitator
        .begin_interview(req.session_id.map(SessionHandle))
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /interviews/:interview_id
pub async fn get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> ApiResult<InterviewView> {
    Ok(Json(state.facilitator.interview(&interview_id).await?))
}

/// POST /interviews/:interview_id/answer
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> ApiResult<InterviewStep> {
    Ok(Json(
        state
            .facilitator
            .submit_answer(&interview_id, &req.answer)
            .await?,
    ))
}

/// DELETE /interviews/:interview_id
pub async fn abandon_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Result<StatusCode, FacilitatorError> {
    state.facilitator.abandon_interview(&interview_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /transcripts
pub async fn list_transcripts(State(state): State<AppState>) -> ApiResult<Vec<InterviewTranscript>> {
    Ok(Json(state.facilitator.transcripts()?))
}

/// GET /transcripts/:transcript_id
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(transcript_id): Path<String>,
) -> ApiResult<InterviewTranscript> {
    Ok(Json(state.facilitator.transcript(&transcript_id)?))
}

/// DELETE /transcripts/:transcript_id
pub async fn delete_transcript(
    State(state): State<AppState>,
    Path(transcript_id): Path<String>,
) -> Result<StatusCode, FacilitatorError> {
    state.facilitator.delete_transcript(&transcript_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /reports
/// Generate an alignment report, optionally filtered by topic
pub async fn generate_report(
    State(state): State<AppState>,
    req: Option<Json<ReportRequest>>,
) -> ApiResult<ReportResponse> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let report = state
        .facilitator
        .generate_report(req.topic.as_deref())
        .await?;
    Ok(Json(ReportResponse {
        markdown: report.to_markdown(),
        report,
    }))
}

/// POST /reports/compare
pub async fn generate_comparative_report(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> ApiResult<ReportResponse> {
    let report = state
        .facilitator
        .generate_comparative_report(&req.topics)
        .await?;
    Ok(Json(ReportResponse {
        markdown: report.to_markdown(),
        report,
    }))
}

/// GET /stats
pub async fn get_statistics(State(state): State<AppState>) -> ApiResult<FacilitatorStats> {
    Ok(Json(state.facilitator.statistics().await?))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
