use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Answer, Response as AssessmentResponse, StudentProfile};
use super::flow::FlowError;
use super::ranking::Recommendation;
use super::repository::{SessionId, SessionStore};
use super::scoring::SkippedResponse;
use super::service::{AssessmentService, BackOutcome, SessionServiceError};
use super::stream::{recommend_stream, StreamPreferences};

/// Router builder exposing the questionnaire, session, and recommendation endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/questions", get(questions_handler::<S>))
        .route("/api/v1/assessments", post(start_handler::<S>))
        .route(
            "/api/v1/assessments/:session_id",
            get(snapshot_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/answers",
            post(answer_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/back",
            post(back_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/profile",
            put(profile_handler::<S>),
        )
        .route(
            "/api/v1/assessments/:session_id/recommendations",
            get(session_recommendations_handler::<S>),
        )
        .route("/api/v1/recommendations", post(replay_handler::<S>))
        .route("/api/v1/streams/advice", post(stream_advice_handler))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LocaleQuery {
    #[serde(default)]
    pub(crate) locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StartRequest {
    #[serde(default)]
    pub(crate) profile: Option<StudentProfile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRequest {
    pub(crate) revision: u64,
    pub(crate) answer: Answer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BackRequest {
    pub(crate) revision: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileRequest {
    pub(crate) revision: u64,
    pub(crate) profile: StudentProfile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplayRequest {
    #[serde(default)]
    pub(crate) responses: Vec<AssessmentResponse>,
    #[serde(default)]
    pub(crate) profile: Option<StudentProfile>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReplayResponse {
    pub(crate) recommendations: Vec<Recommendation>,
    pub(crate) skipped: Vec<SkippedResponse>,
}

pub(crate) async fn questions_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Query(query): Query<LocaleQuery>,
) -> Response
where
    S: SessionStore + 'static,
{
    let views = service.engine().question_views(query.locale.as_deref());
    (StatusCode::OK, Json(views)).into_response()
}

pub(crate) async fn start_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    payload: Option<Json<StartRequest>>,
) -> Response
where
    S: SessionStore + 'static,
{
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    match service.start(request.profile) {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.current(&SessionId(session_id), query.locale.as_deref()) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answer_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.answer(&SessionId(session_id), request.revision, request.answer) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn back_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<BackRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.back(&SessionId(session_id), request.revision) {
        Ok(BackOutcome::Exit) => (StatusCode::OK, Json(json!({ "exit": true }))).into_response(),
        Ok(BackOutcome::Previous(snapshot)) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
    Json(request): Json<ProfileRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.attach_profile(&SessionId(session_id), request.revision, request.profile) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn session_recommendations_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    match service.recommendations(&id) {
        Ok(recommendations) => {
            let payload = json!({
                "session_id": id,
                "recommendations": recommendations,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

/// Scores a full response set without a stored session.
pub(crate) async fn replay_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Json(request): Json<ReplayRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let engine = service.engine();
    let responses = engine.resolve_labels(request.responses);
    let board = engine.score(&responses, request.profile.as_ref());
    let recommendations = super::ranking::rank(&board, engine.ranking());

    let payload = ReplayResponse {
        recommendations,
        skipped: board.skipped().to_vec(),
    };
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn stream_advice_handler(Json(preferences): Json<StreamPreferences>) -> Response {
    match recommend_stream(&preferences) {
        Ok(advice) => (StatusCode::OK, Json(advice)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

fn error_response(error: SessionServiceError) -> Response {
    let status = match &error {
        SessionServiceError::Flow(FlowError::InvalidAnswer { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SessionServiceError::Flow(FlowError::OutOfRange { .. })
        | SessionServiceError::StaleRevision { .. }
        | SessionServiceError::Incomplete(_) => StatusCode::CONFLICT,
        SessionServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
