use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::collaborators::{CandidateNotifier, QuestionGenerator, SpeechChannel};
use super::domain::{CandidateDocument, CandidateId, DocumentSet};
use super::service::{ScreeningError, ScreeningService};

/// Router builder exposing the screening pipeline over HTTP. Extraction,
/// speech transcription, and question delivery happen upstream of these
/// endpoints; clients submit plain text.
pub fn screening_router<N, S, Q>(service: Arc<ScreeningService<N, S, Q>>) -> Router
where
    N: CandidateNotifier + 'static,
    S: SpeechChannel + 'static,
    Q: QuestionGenerator + 'static,
{
    Router::new()
        .route(
            "/api/v1/screening/documents",
            post(load_documents_handler::<N, S, Q>),
        )
        .route("/api/v1/screening/rank", post(rank_handler::<N, S, Q>))
        .route(
            "/api/v1/screening/candidates/:candidate_id",
            get(session_handler::<N, S, Q>),
        )
        .route(
            "/api/v1/screening/candidates/:candidate_id/verbal",
            post(begin_verbal_handler::<N, S, Q>),
        )
        .route(
            "/api/v1/screening/candidates/:candidate_id/verbal/answer",
            post(verbal_answer_handler::<N, S, Q>),
        )
        .route(
            "/api/v1/screening/candidates/:candidate_id/final",
            post(begin_final_handler::<N, S, Q>),
        )
        .route(
            "/api/v1/screening/candidates/:candidate_id/final/complete",
            post(complete_final_handler::<N, S, Q>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RankRequest {
    pub(crate) requirement_label: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerbalAnswerRequest {
    /// Transcript produced by the external speech-to-text collaborator;
    /// `null` means the audio could not be transcribed.
    pub(crate) transcript: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteFinalRequest {
    pub(crate) question: String,
}

pub(crate) async fn load_documents_handler<N, S, Q>(
    State(service): State<Arc<ScreeningService<N, S, Q>>>,
    axum::Json(documents): axum::Json<BTreeMap<String, String>>,
) -> Response
where
    N: CandidateNotifier + 'static,
    S: SpeechChannel + 'static,
    Q: QuestionGenerator + 'static,
{
    let documents = DocumentSet::new(
        documents
            .into_iter()
            .map(|(id, text)| CandidateDocument {
                id: CandidateId(id),
                text,
            })
            .collect(),
    );
    let loaded = service.load_documents(documents);
    (StatusCode::ACCEPTED, axum::Json(json!({ "loaded": loaded }))).into_response()
}

pub(crate) async fn rank_handler<N, S, Q>(
    State(service): State<Arc<ScreeningService<N, S, Q>>>,
    axum::Json(request): axum::Json<RankRequest>,
) -> Response
where
    N: CandidateNotifier + 'static,
    S: SpeechChannel + 'static,
    Q: QuestionGenerator + 'static,
{
    match service.rank(&request.requirement_label) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_handler<N, S, Q>(
    State(service): State<Arc<ScreeningService<N, S, Q>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    N: CandidateNotifier + 'static,
    S: SpeechChannel + 'static,
    Q: QuestionGenerator + 'static,
{
    match service.session(&candidate_id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn begin_verbal_handler<N, S, Q>(
    State(service): State<Arc<ScreeningService<N, S, Q>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    N: CandidateNotifier + 'static,
    S: SpeechChannel + 'static,
    Q: QuestionGenerator + 'static,
{
    match service.begin_verbal_check(&candidate_id) {
        Ok(question) => (StatusCode::OK, axum::Json(json!({ "question": question }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verbal_answer_handler<N, S, Q>(
    State(service): State<Arc<ScreeningService<N, S, Q>>>,
    Path(candidate_id): Path<String>,
    axum::Json(request): axum::Json<VerbalAnswerRequest>,
) -> Response
where
    N: CandidateNotifier + 'static,
    S: SpeechChannel + 'static,
    Q: QuestionGenerator + 'static,
{
    let Some(transcript) = request.transcript else {
        // Transcription failed upstream. The session stays put for retry.
        return error_response(ScreeningError::AnswerUnrecognized);
    };

    match service.submit_verbal_answer(&candidate_id, &transcript) {
        Ok(verdict) => (
            StatusCode::OK,
            axum::Json(json!({ "verdict": verdict.label() })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn begin_final_handler<N, S, Q>(
    State(service): State<Arc<ScreeningService<N, S, Q>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    N: CandidateNotifier + 'static,
    S: SpeechChannel + 'static,
    Q: QuestionGenerator + 'static,
{
    match service.begin_final_stage(&candidate_id) {
        Ok(question) => (StatusCode::OK, axum::Json(json!({ "question": question }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_final_handler<N, S, Q>(
    State(service): State<Arc<ScreeningService<N, S, Q>>>,
    Path(candidate_id): Path<String>,
    axum::Json(request): axum::Json<CompleteFinalRequest>,
) -> Response
where
    N: CandidateNotifier + 'static,
    S: SpeechChannel + 'static,
    Q: QuestionGenerator + 'static,
{
    match service.complete_final_stage(&candidate_id, &request.question) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScreeningError) -> Response {
    let status = match &error {
        ScreeningError::Input(_) => StatusCode::BAD_REQUEST,
        ScreeningError::UnknownSession(_) => StatusCode::NOT_FOUND,
        ScreeningError::Gate(_) => StatusCode::CONFLICT,
        ScreeningError::AnswerUnrecognized => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningError::Question(_) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
