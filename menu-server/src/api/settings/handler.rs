//! Settings API Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use shared::models::{Settings, SettingsUpdate};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Serialize)]
pub struct SettingsPayload {
    pub settings: Settings,
}

/// GET /api/settings
pub async fn get(State(state): State<ServerState>) -> ApiResponse<SettingsPayload> {
    let settings = state.settings.get().await;
    ApiResponse::success(SettingsPayload { settings })
}

/// GET /api/settings/defaults
pub async fn defaults(State(state): State<ServerState>) -> ApiResponse<SettingsPayload> {
    ApiResponse::success(SettingsPayload {
        settings: state.settings.defaults(),
    })
}

/// PUT /api/settings - 只覆盖请求中出现的字段
pub async fn update(
    State(state): State<ServerState>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> AppResult<ApiResponse<SettingsPayload>> {
    let Json(update) = payload?;
    let settings = state.settings.update(update).await?;
    Ok(ApiResponse::success_with_message(
        "Settings updated",
        SettingsPayload { settings },
    ))
}
