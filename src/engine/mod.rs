//! Container engine access layer.
//!
//! This module wraps the bollard Docker API behind a narrow capability
//! surface: connect (with fallback strategies), ping, image presence and
//! pull, run, stop, remove, inspect, and engine diagnostics.
//!
//! The surface is expressed as the [`ContainerEngine`] trait so the
//! lifecycle manager can be driven by a scripted double in tests; the
//! production implementation is [`EngineClient`].

mod client;

pub use client::{ConnectionStrategy, EngineClient, EngineClientConfig};

use async_trait::async_trait;

/// Engine-level errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No connection strategy produced a usable daemon connection.
    #[error("Container engine unavailable: {0}")]
    Unavailable(String),

    /// Image pull failed (network, registry, or in-stream error record).
    #[error("Pull failed: {0}")]
    PullFailed(String),

    /// Container creation or startup failed.
    #[error("Run failed: {0}")]
    RunFailed(String),

    /// Graceful stop or removal failed for a reason other than absence.
    #[error("Stop failed: {0}")]
    StopFailed(String),

    /// The engine no longer knows the container or image.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Docker/Podman API error
    #[error("Engine API error: {0}")]
    Api(#[from] bollard::errors::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// A single container-port to host-port publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    /// TCP port inside the container
    pub container_port: u16,
    /// Port published on the host
    pub host_port: u16,
}

/// Everything needed to create and start one detached container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    /// Image reference to run
    pub image: String,
    /// Unique container name
    pub name: String,
    /// Ports to publish; empty means no published ports
    pub ports: Vec<PortMapping>,
}

/// Engine version and aggregate container counts, for diagnostic display.
#[derive(Debug, Clone)]
pub struct EngineStats {
    /// Engine version string
    pub version: String,
    /// Number of currently running containers (engine-wide)
    pub containers_running: i64,
    /// Total number of containers known to the engine
    pub containers_total: i64,
}

/// A container found on the engine by name lookup.
#[derive(Debug, Clone)]
pub struct FoundContainer {
    /// Full container ID
    pub id: String,
    /// Container name (without the leading slash the API reports)
    pub name: String,
    /// Whether the engine reports it as running
    pub running: bool,
}

/// Narrow capability surface over the container engine.
///
/// Implemented by [`EngineClient`] for a real daemon and by scripted
/// doubles in tests.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Verify daemon connectivity with a no-op ping.
    async fn ping(&self) -> Result<()>;

    /// Check whether an image is present locally.
    async fn image_exists(&self, image: &str) -> Result<bool>;

    /// Pull an image, blocking until it is locally available.
    async fn pull_image(&self, image: &str) -> Result<()>;

    /// Create and start a detached container. Returns the full container ID.
    async fn run_container(&self, spec: &RunSpec) -> Result<String>;

    /// Gracefully stop a container.
    async fn stop_container(&self, id: &str) -> Result<()>;

    /// Remove a stopped container and its anonymous volumes.
    async fn remove_container(&self, id: &str) -> Result<()>;

    /// Current engine-observed status string ("running", "exited", ...).
    async fn inspect_status(&self, id: &str) -> Result<String>;

    /// Engine version and aggregate container counts.
    async fn engine_stats(&self) -> Result<EngineStats>;

    /// Look up a container whose name starts with the given prefix.
    ///
    /// Used to re-adopt a container left behind by a previous process run.
    async fn find_container(&self, name_prefix: &str) -> Result<Option<FoundContainer>>;
}
