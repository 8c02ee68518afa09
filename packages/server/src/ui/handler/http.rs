//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{MessageDto, UserDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current history snapshot, oldest first
pub async fn get_messages(State(state): State<Arc<AppState>>) -> Json<Vec<MessageDto>> {
    let messages = state.coordinator.history_snapshot().await;

    // Domain Model から DTO への変換
    Json(messages.iter().map(MessageDto::from).collect())
}

/// Joined identities in join order
pub async fn get_users(State(state): State<Arc<AppState>>) -> Json<Vec<UserDto>> {
    let identities = state.coordinator.presence_list().await;

    // Domain Model から DTO への変換
    Json(identities.iter().map(UserDto::from).collect())
}
