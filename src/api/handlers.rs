//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    error::SettingsError,
    settings::{Settings, SettingsPatch},
    state::AppState,
    tasks::Input,
};
use super::responses::{ApiResponse, DurationInput, ErrorResponse, HealthResponse, StatusResponse};

async fn dispatch(
    state: &AppState,
    action: &str,
    input: Input,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.dispatch(action, input).await {
        Ok(countdown) => {
            info!("{} endpoint called - countdown {}", action, countdown.label());
            Ok(Json(ApiResponse::new(message.to_string(), countdown)))
        }
        Err(e) => {
            error!("Failed to deliver {}: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /tap - Tap on the countdown area
pub async fn tap_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    dispatch(&state, "tap", Input::Tap, "Countdown area tapped").await
}

/// Handle POST /camera - Camera button pressed
pub async fn camera_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    dispatch(&state, "camera", Input::CameraButton, "Camera button pressed").await
}

/// Handle PUT /duration - Rest length field edited
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DurationInput>,
) -> Result<Json<ApiResponse>, StatusCode> {
    dispatch(&state, "duration", Input::DurationEdited(body.text), "Rest length edited").await
}

/// Handle POST /resume - Screen in the foreground
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    dispatch(&state, "resume", Input::Resume, "Screen resumed").await
}

/// Handle POST /pause - Screen in the background
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    dispatch(&state, "pause", Input::Pause, "Screen paused").await
}

/// Handle GET /settings - Current settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<Settings>, StatusCode> {
    state.get_settings().map(Json).map_err(|e| {
        error!("Failed to read settings: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle PUT /settings - Save settings from the settings screen.
/// Keys missing from the body keep their stored value.
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Settings>, (StatusCode, Json<ErrorResponse>)> {
    match state.update_settings(patch).await {
        Ok(saved) => {
            info!("Settings updated: {:?}", saved);
            Ok(Json(saved))
        }
        Err(SettingsError::Invalid(reason)) => {
            warn!("Rejected settings: {}", reason);
            Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: reason })))
        }
        Err(e) => {
            error!("Failed to save settings: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e.to_string() }),
            ))
        }
    }
}

/// Handle GET /status - Countdown status with settings and server info
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let settings = match state.get_settings() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to read settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        countdown: state.countdown_status(),
        settings,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
