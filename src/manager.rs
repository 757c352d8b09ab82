//! Single-container lifecycle management.
//!
//! The [`ContainerManager`] owns at most one tracked container (the slot)
//! and exposes `start`, `stop`, and `status` over it. The engine is the
//! source of truth for the underlying process; the slot is a cache of that
//! truth which self-heals on every status read: if the engine no longer
//! reports the container, the slot is cleared and a later `start` is
//! permitted again.
//!
//! All operations hold the slot mutex for their entire check-then-act
//! sequence, so two concurrent `start` calls cannot both pass the idle
//! check and race to create two containers.

use crate::engine::{ContainerEngine, EngineError, PortMapping, RunSpec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Number of ID characters surfaced to external callers.
const SHORT_ID_LEN: usize = 12;

/// Manager configuration.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Image used when a start request names none
    pub default_image: String,
    /// Prefix for generated container names
    pub name_prefix: String,
    /// Images that get the fixed web-server port mapping
    pub web_images: Vec<String>,
    /// Container port published for web-server images
    pub web_container_port: u16,
    /// Host port the web-server mapping publishes to
    pub web_host_port: u16,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            default_image: "hello-world".to_string(),
            name_prefix: "app_container".to_string(),
            web_images: vec!["nginx".to_string(), "httpd".to_string()],
            web_container_port: 80,
            web_host_port: 8080,
        }
    }
}

/// Lifecycle errors surfaced to callers as `{success: false, message}`.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// No engine connection was established at startup
    #[error("Container engine not available: {0}")]
    EngineUnavailable(String),

    /// The engine did not answer a ping for this call
    #[error("Cannot connect to container engine")]
    EngineUnreachable,

    /// The slot is already occupied
    #[error("Container already running")]
    AlreadyRunning,

    /// The slot is empty
    #[error("No container running")]
    NothingRunning,

    /// Image pull failed; the slot is unchanged
    #[error("Failed to pull {image}: {reason}")]
    PullFailed { image: String, reason: String },

    /// Container creation or startup failed; the slot is unchanged
    #[error("Start failed: {0}")]
    StartFailed(String),

    /// Stop or removal failed; the slot is unchanged
    #[error("Stop failed: {0}")]
    StopFailed(String),
}

/// The container currently occupying the slot.
#[derive(Debug, Clone)]
struct TrackedContainer {
    /// Full container ID as returned by the engine
    id: String,
    /// Generated container name
    name: String,
}

/// Snapshot of the slot as seen by external callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    /// Whether the manager tracks a container believed to be running
    pub running: bool,
    /// First 12 characters of the container ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    /// Engine-observed status string ("running", "exited", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl StatusView {
    fn idle() -> Self {
        Self {
            running: false,
            container_id: None,
            status: None,
        }
    }
}

/// Engine diagnostics for the panel header. Never a lifecycle input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineInfoView {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containers_running: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub containers_total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Stateful single-slot lifecycle manager.
pub struct ContainerManager {
    engine: Option<Arc<dyn ContainerEngine>>,
    config: ManagerConfig,
    slot: Mutex<Option<TrackedContainer>>,
    /// Why the engine is absent, for `engine_info` display
    unavailable_reason: Option<String>,
}

impl ContainerManager {
    /// Create a manager backed by a connected engine.
    pub fn new(engine: Arc<dyn ContainerEngine>, config: ManagerConfig) -> Self {
        Self {
            engine: Some(engine),
            config,
            slot: Mutex::new(None),
            unavailable_reason: None,
        }
    }

    /// Create a manager with no engine connection.
    ///
    /// Every lifecycle call fails with [`ManagerError::EngineUnavailable`];
    /// the service stays up so the panel can report the connection problem.
    pub fn disconnected(reason: impl Into<String>, config: ManagerConfig) -> Self {
        Self {
            engine: None,
            config,
            slot: Mutex::new(None),
            unavailable_reason: Some(reason.into()),
        }
    }

    fn engine(&self) -> Result<&Arc<dyn ContainerEngine>, ManagerError> {
        self.engine.as_ref().ok_or_else(|| {
            ManagerError::EngineUnavailable(
                self.unavailable_reason
                    .clone()
                    .unwrap_or_else(|| "not connected".to_string()),
            )
        })
    }

    /// Adopt a container left behind by a previous process run.
    ///
    /// Scans the engine for a running container whose name carries this
    /// manager's prefix and, if the slot is empty, tracks it. Called once
    /// at startup; an engine error here is logged and ignored so a flaky
    /// daemon cannot prevent the panel from starting.
    pub async fn adopt_existing(&self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };

        let mut slot = self.slot.lock().await;
        if slot.is_some() {
            return;
        }

        match engine.find_container(&self.config.name_prefix).await {
            Ok(Some(found)) if found.running => {
                info!(
                    "Adopted existing container {} ({})",
                    found.name,
                    short_id(&found.id)
                );
                *slot = Some(TrackedContainer {
                    id: found.id,
                    name: found.name,
                });
            }
            Ok(_) => debug!("No existing container to adopt"),
            Err(e) => warn!("Startup container scan failed: {}", e),
        }
    }

    /// Start a container from the given image, or the default image.
    ///
    /// Rejected with [`ManagerError::AlreadyRunning`] while the slot is
    /// occupied, before any engine I/O. Pulls the image on a local miss.
    /// Returns the user-facing success message.
    pub async fn start(&self, image: Option<&str>) -> Result<String, ManagerError> {
        let engine = self.engine()?;

        let image = match image {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => self.config.default_image.clone(),
        };

        let mut slot = self.slot.lock().await;
        if slot.is_some() {
            return Err(ManagerError::AlreadyRunning);
        }

        engine
            .ping()
            .await
            .map_err(|_| ManagerError::EngineUnreachable)?;

        let present = match engine.image_exists(&image).await {
            Ok(present) => present,
            Err(e) => return Err(ManagerError::StartFailed(e.to_string())),
        };
        if !present {
            engine
                .pull_image(&image)
                .await
                .map_err(|e| ManagerError::PullFailed {
                    image: image.clone(),
                    reason: e.to_string(),
                })?;
        }

        let spec = self.build_run_spec(&image);
        debug!("Run spec: {:?}", spec);

        let id = engine
            .run_container(&spec)
            .await
            .map_err(|e| ManagerError::StartFailed(e.to_string()))?;

        let message = format!("Started: {}", short_id(&id));
        info!("Container started: {} ({})", spec.name, short_id(&id));

        *slot = Some(TrackedContainer {
            id,
            name: spec.name,
        });

        Ok(message)
    }

    /// Stop and remove the tracked container.
    ///
    /// Rejected with [`ManagerError::NothingRunning`] while the slot is
    /// empty, before any engine access. `NotFound` from the engine counts
    /// as success: the container is already gone, so the slot is cleared
    /// either way (idempotent stop).
    pub async fn stop(&self) -> Result<String, ManagerError> {
        let mut slot = self.slot.lock().await;
        let Some(tracked) = slot.as_ref() else {
            return Err(ManagerError::NothingRunning);
        };
        let engine = self.engine()?;
        let id = tracked.id.clone();
        let name = tracked.name.clone();

        match engine.stop_container(&id).await {
            Ok(()) => {}
            Err(EngineError::NotFound(_)) => {
                info!("Container {} already gone", short_id(&id));
                *slot = None;
                return Ok("Container removed".to_string());
            }
            Err(e) => return Err(ManagerError::StopFailed(e.to_string())),
        }

        match engine.remove_container(&id).await {
            Ok(()) => {}
            Err(EngineError::NotFound(_)) => {
                *slot = None;
                return Ok("Container removed".to_string());
            }
            Err(e) => return Err(ManagerError::StopFailed(e.to_string())),
        }

        info!("Container stopped: {} ({})", name, short_id(&id));
        *slot = None;
        Ok("Container stopped".to_string())
    }

    /// Current slot state, reconciled against the engine.
    ///
    /// Any inspection failure, including the container vanishing out of
    /// band, clears the slot and reports not running. Any inspection
    /// success counts as running, even for an exited-but-present container.
    pub async fn status(&self) -> StatusView {
        let Some(engine) = self.engine.as_ref() else {
            return StatusView::idle();
        };

        let mut slot = self.slot.lock().await;
        let Some(tracked) = slot.as_ref() else {
            return StatusView::idle();
        };
        let id = tracked.id.clone();

        match engine.inspect_status(&id).await {
            Ok(status) => StatusView {
                running: true,
                container_id: Some(short_id(&id)),
                status: Some(status),
            },
            Err(e) => {
                warn!(
                    "Container {} no longer observable ({}), clearing slot",
                    short_id(&id),
                    e
                );
                *slot = None;
                StatusView::idle()
            }
        }
    }

    /// Engine diagnostics. Never fails; connection problems are reported
    /// inside the view.
    pub async fn engine_info(&self) -> EngineInfoView {
        let engine = match self.engine.as_ref() {
            Some(engine) => engine,
            None => {
                return EngineInfoView {
                    connected: false,
                    engine_version: None,
                    containers_running: None,
                    containers_total: None,
                    error: Some(
                        self.unavailable_reason
                            .clone()
                            .unwrap_or_else(|| "not connected".to_string()),
                    ),
                };
            }
        };

        match engine.engine_stats().await {
            Ok(stats) => EngineInfoView {
                connected: true,
                engine_version: Some(stats.version),
                containers_running: Some(stats.containers_running),
                containers_total: Some(stats.containers_total),
                error: None,
            },
            Err(e) => EngineInfoView {
                connected: false,
                engine_version: None,
                containers_running: None,
                containers_total: None,
                error: Some(e.to_string()),
            },
        }
    }

    /// Build the run spec for an image: unique name, fixed port policy.
    fn build_run_spec(&self, image: &str) -> RunSpec {
        let timestamp = chrono::Utc::now().timestamp();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let name = format!(
            "{}_{}_{}",
            self.config.name_prefix,
            timestamp,
            &suffix[..8]
        );

        let ports = if self.config.web_images.iter().any(|web| web == image) {
            vec![PortMapping {
                container_port: self.config.web_container_port,
                host_port: self.config.web_host_port,
            }]
        } else {
            Vec::new()
        };

        RunSpec {
            image: image.to_string(),
            name,
            ports,
        }
    }
}

/// Truncate a container ID to its displayed form.
fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_to_twelve_chars() {
        let id = "0123456789abcdef0123456789abcdef";
        assert_eq!(short_id(id), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn run_spec_maps_ports_for_web_images_only() {
        let manager = ContainerManager::disconnected("test", ManagerConfig::default());

        let nginx = manager.build_run_spec("nginx");
        assert_eq!(
            nginx.ports,
            vec![PortMapping {
                container_port: 80,
                host_port: 8080
            }]
        );

        let httpd = manager.build_run_spec("httpd");
        assert_eq!(httpd.ports.len(), 1);

        // Only the exact well-known names get the mapping
        assert!(manager.build_run_spec("nginx:alpine").ports.is_empty());
        assert!(manager.build_run_spec("alpine").ports.is_empty());
    }

    #[test]
    fn run_spec_names_carry_prefix_and_differ() {
        let manager = ContainerManager::disconnected("test", ManagerConfig::default());
        let a = manager.build_run_spec("alpine");
        let b = manager.build_run_spec("alpine");
        assert!(a.name.starts_with("app_container_"));
        assert_ne!(a.name, b.name);
    }

    #[tokio::test]
    async fn disconnected_manager_rejects_lifecycle_calls() {
        let manager = ContainerManager::disconnected("daemon down", ManagerConfig::default());

        let err = manager.start(None).await.unwrap_err();
        assert!(matches!(err, ManagerError::EngineUnavailable(_)));

        // An idle slot is rejected as idle regardless of engine presence
        let err = manager.stop().await.unwrap_err();
        assert!(matches!(err, ManagerError::NothingRunning));

        let status = manager.status().await;
        assert!(!status.running);

        let info = manager.engine_info().await;
        assert!(!info.connected);
        assert_eq!(info.error.as_deref(), Some("daemon down"));
    }
}
