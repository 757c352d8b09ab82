//! HTTP server

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};
use crate::manager::ContainerManager;

/// HTTP API server
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Create a new server around a manager.
    pub fn new(manager: Arc<ContainerManager>, addr: SocketAddr) -> Self {
        let state: AppState = manager;

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let router = Router::new()
            .route("/", get(handlers::index))
            .route("/start", post(handlers::start))
            .route("/stop", post(handlers::stop))
            .route("/status", get(handlers::status))
            .route("/engine-info", get(handlers::engine_info))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(state);

        Self { router, addr }
    }

    /// Run the server until the process exits.
    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("Starting control panel on http://{}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.router).await
    }
}
