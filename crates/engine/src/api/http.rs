//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use lastplanner_domain::{GameState, GameStatePatch, LeaderboardEntry, SessionId};
use lastplanner_shared::{routes as paths, ErrorResponse, LeaderboardSubmission, SaveGameRequest, UserProfile};

use super::caller::Caller;
use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::{GameSaveError, LeaderboardError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route(paths::HEALTH, get(health))
        .route(paths::USER, get(current_user))
        .route(paths::GAME, post(save_game))
        .route(
            paths::GAME_BY_SESSION,
            get(load_game).patch(update_game).delete(reset_game),
        )
        .route(
            paths::LEADERBOARD,
            get(list_leaderboard)
                .post(submit_leaderboard)
                .delete(clear_leaderboard),
        )
        .route(paths::LEADERBOARD_BY_CHAPTER, get(list_chapter_leaderboard))
}

/// Routes bound to application state, with request tracing.
pub fn router(app: Arc<App>) -> Router {
    routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "OK"
}

async fn current_user(caller: Caller) -> Result<Json<UserProfile>, ApiError> {
    let user_id = caller.0.ok_or(ApiError::Unauthorized)?;
    Ok(Json(UserProfile { user_id }))
}

fn parse_session(raw: String) -> Result<SessionId, ApiError> {
    SessionId::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

// =============================================================================
// Game saves
// =============================================================================

async fn load_game(
    State(app): State<Arc<App>>,
    caller: Caller,
    Path(session_id): Path<String>,
) -> Result<Json<GameState>, ApiError> {
    let session_id = parse_session(session_id)?;
    let state = app
        .use_cases
        .games
        .load
        .execute(&session_id, caller.user_id())
        .await?;
    Ok(Json(state))
}

async fn save_game(
    State(app): State<Arc<App>>,
    caller: Caller,
    payload: Result<Json<SaveGameRequest>, JsonRejection>,
) -> Result<Json<GameState>, ApiError> {
    let request = json_body(payload)?;
    let state = app
        .use_cases
        .games
        .save
        .execute(request, caller.user_id())
        .await?;
    Ok(Json(state))
}

async fn update_game(
    State(app): State<Arc<App>>,
    caller: Caller,
    Path(session_id): Path<String>,
    payload: Result<Json<GameStatePatch>, JsonRejection>,
) -> Result<Json<GameState>, ApiError> {
    let session_id = parse_session(session_id)?;
    let patch = json_body(payload)?;
    let state = app
        .use_cases
        .games
        .update
        .execute(&session_id, &patch, caller.user_id())
        .await?;
    Ok(Json(state))
}

async fn reset_game(
    State(app): State<Arc<App>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = parse_session(session_id)?;
    app.use_cases.games.reset.execute(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Leaderboard
// =============================================================================

async fn list_leaderboard(
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    Ok(Json(app.use_cases.leaderboard.top().await?))
}

async fn list_chapter_leaderboard(
    State(app): State<Arc<App>>,
    Path(chapter): Path<u32>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    Ok(Json(app.use_cases.leaderboard.for_chapter(chapter).await?))
}

async fn submit_leaderboard(
    State(app): State<Arc<App>>,
    caller: Caller,
    payload: Result<Json<LeaderboardSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<LeaderboardEntry>), ApiError> {
    let submission = json_body(payload)?;
    let entry = app
        .use_cases
        .leaderboard
        .submit(submission, caller.user_id())
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn clear_leaderboard(State(app): State<Arc<App>>) -> Result<StatusCode, ApiError> {
    app.use_cases.leaderboard.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Not authenticated".to_string()),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<GameSaveError> for ApiError {
    fn from(e: GameSaveError) -> Self {
        match e {
            GameSaveError::NotFound(session_id) => {
                ApiError::NotFound(format!("No saved game for session {session_id}"))
            }
            GameSaveError::Invalid(msg) => ApiError::BadRequest(msg),
            GameSaveError::Repo(repo) => repo.into(),
        }
    }
}

impl From<LeaderboardError> for ApiError {
    fn from(e: LeaderboardError) -> Self {
        match e {
            LeaderboardError::Invalid(msg) => ApiError::BadRequest(msg),
            LeaderboardError::Repo(repo) => repo.into(),
        }
    }
}
