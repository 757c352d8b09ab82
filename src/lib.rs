//! # dockpanel
//!
//! A minimal web control panel for one local container. The service talks
//! to a Docker or Podman daemon over its management API and exposes
//! start/stop/status control over a single managed container slot,
//! together with a polling status page.
//!
//! ## Architecture Overview
//!
//! - **[`engine`]**: narrow client over the daemon API (bollard) with an
//!   ordered connection-fallback strategy, expressed as the
//!   `ContainerEngine` trait so tests can substitute a scripted double
//! - **[`manager`]**: the stateful core, a single-slot lifecycle manager
//!   that enforces at-most-one-container, pulls images on miss, and
//!   reconciles cached state against the engine on every status read
//! - **[`api`]**: axum HTTP facade with `/start`, `/stop`, `/status`, and
//!   `/engine-info` routes
//! - **[`page`]**: the static HTML panel with its embedded polling script
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dockpanel::api::Server;
//! use dockpanel::engine::EngineClient;
//! use dockpanel::manager::{ContainerManager, ManagerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = EngineClient::connect().await?;
//!     let manager = Arc::new(ContainerManager::new(
//!         Arc::new(engine),
//!         ManagerConfig::default(),
//!     ));
//!     manager.adopt_existing().await;
//!
//!     Server::new(manager, "127.0.0.1:5000".parse()?).run().await?;
//!     Ok(())
//! }
//! ```

/// Container engine access layer.
///
/// Connection establishment with fallback strategies, plus the narrow
/// capability surface (ping, pull, run, stop, remove, inspect) the
/// lifecycle manager depends on.
pub mod engine;

/// Single-container lifecycle management.
///
/// The stateful core: one managed slot, idempotent stop, pull-on-miss,
/// and reconciliation-on-read against engine-observed state.
pub mod manager;

/// HTTP facade over the lifecycle manager.
pub mod api;

/// Static control panel page.
pub mod page;

// Re-export the main service types
pub use api::Server;
pub use engine::{ContainerEngine, EngineClient, EngineError};
pub use manager::{ContainerManager, ManagerConfig, ManagerError, StatusView};
