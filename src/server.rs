//! HTTP surface over the registry.
//!
//! Thin routing and header extraction only: the transport layer owns auth and
//! parsing, the registry owns everything else. The embedding application
//! builds the [`AppState`], calls [`router`], and serves it with axum.

use crate::analytics::AnalyticsClient;
use crate::player::RemotePlayer;
use crate::registry::{FrameRegistry, RegistryError};
use crate::status::StatusSnapshot;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Header carrying the caller's player id.
pub const PLAYER_ID_HEADER: &str = "x-player-id";

/// Shared state behind the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    /// The frame registry.
    pub registry: Arc<FrameRegistry>,
    /// Event counters.
    pub analytics: Arc<AnalyticsClient>,
}

/// Extractor for the `x-player-id` header. Requests without it end here
/// with a 401.
#[derive(Debug, Clone)]
pub struct AuthedPlayer(pub String);

impl<S> FromRequestParts<S> for AuthedPlayer
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts
            .headers
            .get(PLAYER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            Some(id) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => {
                debug!("No player id in headers, request ends here");
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}

/// Healthcheck payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service liveness indicator.
    pub health: &'static str,
    /// Total frames.
    #[serde(rename = "nFrames")]
    pub n_frames: usize,
    /// Completed frames.
    #[serde(rename = "nCompletedFrames")]
    pub n_completed_frames: usize,
    /// Frames waiting for players.
    #[serde(rename = "nWaitingFrames")]
    pub n_waiting_frames: usize,
}

/// Response to a new-game request.
#[derive(Debug, Clone, Serialize)]
pub struct NewGameResponse {
    /// Id of the frame the caller was placed in.
    #[serde(rename = "gameId")]
    pub game_id: String,
}

/// Registry errors mapped onto transport status codes.
struct ApiError(RegistryError);

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            RegistryError::NoSuchPlayer => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(error = %self.0, "Request failed");
        (status, self.0.to_string()).into_response()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/game/new", get(new_game))
        .route("/game/{game_id}/status", get(game_status))
        .route("/game/{game_id}/move/{move_string}/{hash}", get(submit_move))
        .with_state(state)
}

#[instrument(skip_all)]
async fn healthcheck(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!("Healthcheck");
    state.analytics.event("Service", "Healthcheck");
    Json(HealthResponse {
        health: "healthy",
        n_frames: state.registry.frame_count(),
        n_completed_frames: state.registry.completed_frame_count(),
        n_waiting_frames: state.registry.waiting_frame_count(),
    })
}

#[instrument(skip_all)]
async fn new_game(
    AuthedPlayer(player_id): AuthedPlayer,
    State(state): State<AppState>,
) -> Result<Json<NewGameResponse>, ApiError> {
    info!(player_id = %player_id, "New game request");
    let player = Arc::new(RemotePlayer::new(player_id));
    let frame = if state.registry.any_waiting_frames() {
        match state.registry.join_waiting_frame(Arc::clone(&player)) {
            // Lost the pairing race; enqueue instead.
            Err(RegistryError::NoWaitingFrames) => state.registry.create_waiting_frame(player)?,
            other => other?,
        }
    } else {
        state.registry.create_waiting_frame(player)?
    };
    let game_id = frame.lock().unwrap().id().to_string();
    Ok(Json(NewGameResponse { game_id }))
}

#[instrument(skip_all)]
async fn game_status(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> Json<StatusSnapshot> {
    debug!(game_id = %game_id, "Game status request");
    let snapshot = state.registry.frame_status(&game_id);
    Json(snapshot.with_game_id(game_id))
}

#[instrument(skip_all)]
async fn submit_move(
    AuthedPlayer(player_id): AuthedPlayer,
    Path((game_id, move_string, hash)): Path<(String, String, String)>,
    State(state): State<AppState>,
) -> Result<Json<StatusSnapshot>, ApiError> {
    info!(game_id = %game_id, player_id = %player_id, move_string = %move_string, "Move request");
    let snapshot = state
        .registry
        .apply_move(&game_id, &player_id, &move_string, &hash)?;
    Ok(Json(snapshot.with_game_id(game_id)))
}
