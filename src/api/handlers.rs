//! API request handlers

use axum::{extract::State, response::Html, Json};
use std::sync::Arc;

use super::types::{EngineInfoResponse, OpResponse, StartRequest};
use crate::manager::{ContainerManager, StatusView};
use crate::page;

pub type AppState = Arc<ContainerManager>;

/// Serve the control panel page.
pub async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

/// Start a container from the requested (or default) image.
pub async fn start(
    State(manager): State<AppState>,
    body: Option<Json<StartRequest>>,
) -> Json<OpResponse> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let (success, message) = match manager.start(request.image.as_deref()).await {
        Ok(message) => (true, message),
        Err(e) => (false, e.to_string()),
    };

    Json(OpResponse {
        success,
        message,
        status: manager.status().await,
    })
}

/// Stop and remove the tracked container.
pub async fn stop(State(manager): State<AppState>) -> Json<OpResponse> {
    let (success, message) = match manager.stop().await {
        Ok(message) => (true, message),
        Err(e) => (false, e.to_string()),
    };

    Json(OpResponse {
        success,
        message,
        status: manager.status().await,
    })
}

/// Current slot state, reconciled against the engine.
pub async fn status(State(manager): State<AppState>) -> Json<StatusView> {
    Json(manager.status().await)
}

/// Engine version and container counts for the panel header.
pub async fn engine_info(State(manager): State<AppState>) -> Json<EngineInfoResponse> {
    Json(manager.engine_info().await)
}
