//! Bollard-backed engine client.
//!
//! Connects to a Docker or Podman daemon by trying an ordered list of
//! connection strategies, health-checking each candidate with a ping
//! before accepting it.

use crate::engine::{
    ContainerEngine, EngineError, EngineStats, FoundContainer, Result, RunSpec,
};
use async_trait::async_trait;
use bollard::Docker;
use futures::stream::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Fixed fallback socket used when environment-derived connection fails.
const DEFAULT_SOCKET: &str = "unix:///var/run/docker.sock";

/// Engine client configuration.
#[derive(Debug, Clone)]
pub struct EngineClientConfig {
    /// Connection timeout in seconds
    pub timeout: u64,
    /// Graceful stop timeout in seconds
    pub stop_timeout: i64,
}

impl Default for EngineClientConfig {
    fn default() -> Self {
        Self {
            timeout: 120,
            stop_timeout: 10,
        }
    }
}

/// One way of reaching the daemon. Strategies are tried in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStrategy {
    /// Environment-derived configuration (DOCKER_HOST and friends)
    Environment,
    /// A fixed Unix socket path
    Socket(String),
}

impl ConnectionStrategy {
    /// Default strategy order: environment first, then the well-known socket.
    pub fn candidates() -> Vec<ConnectionStrategy> {
        vec![
            ConnectionStrategy::Environment,
            ConnectionStrategy::Socket(DEFAULT_SOCKET.to_string()),
        ]
    }

    fn establish(&self, timeout: u64) -> std::result::Result<Docker, bollard::errors::Error> {
        match self {
            ConnectionStrategy::Environment => Docker::connect_with_defaults(),
            ConnectionStrategy::Socket(path) => {
                Docker::connect_with_socket(path, timeout, bollard::API_DEFAULT_VERSION)
            }
        }
    }
}

impl std::fmt::Display for ConnectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStrategy::Environment => write!(f, "environment defaults"),
            ConnectionStrategy::Socket(path) => write!(f, "socket {}", path),
        }
    }
}

/// Docker/Podman API client wrapper.
#[derive(Clone)]
pub struct EngineClient {
    docker: Arc<Docker>,
    config: EngineClientConfig,
}

impl EngineClient {
    /// Connect using the default strategy order and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] if no strategy yields a
    /// connection that answers a ping.
    pub async fn connect() -> Result<Self> {
        Self::connect_with_config(EngineClientConfig::default()).await
    }

    /// Connect using the default strategy order and a custom configuration.
    pub async fn connect_with_config(config: EngineClientConfig) -> Result<Self> {
        Self::connect_with_strategies(ConnectionStrategy::candidates(), config).await
    }

    /// Connect by trying the given strategies in order.
    ///
    /// Each candidate is ping-checked before being accepted, so a socket
    /// that exists but has no daemon behind it falls through to the next
    /// strategy.
    pub async fn connect_with_strategies(
        strategies: Vec<ConnectionStrategy>,
        config: EngineClientConfig,
    ) -> Result<Self> {
        let mut last_error = String::from("no connection strategies configured");

        for strategy in strategies {
            debug!("Trying engine connection via {}", strategy);

            let docker = match strategy.establish(config.timeout) {
                Ok(docker) => docker,
                Err(e) => {
                    debug!("Connection via {} failed: {}", strategy, e);
                    last_error = e.to_string();
                    continue;
                }
            };

            match docker.ping().await {
                Ok(_) => {
                    info!("Connected to container engine via {}", strategy);
                    return Ok(Self {
                        docker: Arc::new(docker),
                        config,
                    });
                }
                Err(e) => {
                    debug!("Ping via {} failed: {}", strategy, e);
                    last_error = e.to_string();
                }
            }
        }

        Err(EngineError::Unavailable(last_error))
    }

    /// Get the underlying Docker client.
    pub fn docker(&self) -> &Docker {
        &self.docker
    }
}

#[async_trait]
impl ContainerEngine for EngineClient {
    async fn ping(&self) -> Result<()> {
        self.docker.ping().await?;
        debug!("Engine ping successful");
        Ok(())
    }

    async fn image_exists(&self, image: &str) -> Result<bool> {
        match self.docker.inspect_image(image).await {
            Ok(_) => Ok(true),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(false),
            Err(e) => Err(EngineError::Api(e)),
        }
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        info!("Pulling image: {}", image);

        let mut stream = self.docker.create_image(
            Some(bollard::image::CreateImageOptions {
                from_image: image,
                ..Default::default()
            }),
            None,
            None,
        );

        while let Some(result) = stream.next().await {
            match result {
                Ok(progress) => {
                    if let Some(status) = progress.status {
                        debug!("Pull: {}", status);
                    }
                    if let Some(error) = progress.error {
                        return Err(EngineError::PullFailed(error));
                    }
                }
                Err(e) => {
                    return Err(EngineError::PullFailed(e.to_string()));
                }
            }
        }

        info!("Successfully pulled image: {}", image);
        Ok(())
    }

    async fn run_container(&self, spec: &RunSpec) -> Result<String> {
        debug!("Creating container {} from image {}", spec.name, spec.image);

        let mut port_bindings = HashMap::new();
        let mut exposed_ports = HashMap::new();
        for mapping in &spec.ports {
            let key = format!("{}/tcp", mapping.container_port);
            port_bindings.insert(
                key.clone(),
                Some(vec![bollard::models::PortBinding {
                    host_ip: None,
                    host_port: Some(mapping.host_port.to_string()),
                }]),
            );
            exposed_ports.insert(key, HashMap::new());
        }

        let host_config = bollard::models::HostConfig {
            port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
            ..Default::default()
        };

        let options = bollard::container::CreateContainerOptions {
            name: spec.name.as_str(),
            ..Default::default()
        };

        let config = bollard::container::Config {
            image: Some(spec.image.clone()),
            exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
            host_config: Some(host_config),
            ..Default::default()
        };

        let response = self
            .docker
            .create_container(Some(options), config)
            .await
            .map_err(|e| EngineError::RunFailed(e.to_string()))?;

        self.docker
            .start_container(
                &response.id,
                None::<bollard::container::StartContainerOptions<String>>,
            )
            .await
            .map_err(|e| EngineError::RunFailed(e.to_string()))?;

        info!("Started container: {} ({})", spec.name, response.id);
        Ok(response.id)
    }

    async fn stop_container(&self, id: &str) -> Result<()> {
        debug!("Stopping container: {}", id);

        self.docker
            .stop_container(
                id,
                Some(bollard::container::StopContainerOptions {
                    t: self.config.stop_timeout,
                }),
            )
            .await
            .map_err(|e| match e {
                bollard::errors::Error::DockerResponseServerError {
                    status_code: 404, ..
                } => EngineError::NotFound(id.to_string()),
                e => EngineError::StopFailed(e.to_string()),
            })?;

        info!("Stopped container: {}", id);
        Ok(())
    }

    async fn remove_container(&self, id: &str) -> Result<()> {
        debug!("Removing container: {}", id);

        self.docker
            .remove_container(
                id,
                Some(bollard::container::RemoveContainerOptions {
                    v: true,
                    ..Default::default()
                }),
            )
            .await
            .map_err(|e| match e {
                bollard::errors::Error::DockerResponseServerError {
                    status_code: 404, ..
                } => EngineError::NotFound(id.to_string()),
                e => EngineError::StopFailed(e.to_string()),
            })?;

        info!("Removed container: {}", id);
        Ok(())
    }

    async fn inspect_status(&self, id: &str) -> Result<String> {
        let inspect = self
            .docker
            .inspect_container(
                id,
                None::<bollard::query_parameters::InspectContainerOptions>,
            )
            .await
            .map_err(|e| match e {
                bollard::errors::Error::DockerResponseServerError {
                    status_code: 404, ..
                } => EngineError::NotFound(id.to_string()),
                e => EngineError::Api(e),
            })?;

        let status = inspect
            .state
            .and_then(|state| state.status)
            .map(|status| status.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(status)
    }

    async fn engine_stats(&self) -> Result<EngineStats> {
        let version = self.docker.version().await?;
        let info = self.docker.info().await?;

        Ok(EngineStats {
            version: version.version.unwrap_or_else(|| "unknown".to_string()),
            containers_running: info.containers_running.unwrap_or(0),
            containers_total: info.containers.unwrap_or(0),
        })
    }

    async fn find_container(&self, name_prefix: &str) -> Result<Option<FoundContainer>> {
        let containers = self
            .docker
            .list_containers(Some(bollard::container::ListContainersOptions::<String> {
                all: true,
                ..Default::default()
            }))
            .await?;

        for container in containers {
            let Some(name) = container
                .names
                .as_ref()
                .and_then(|names| names.first())
                .map(|name| name.trim_start_matches('/').to_string())
            else {
                continue;
            };

            if !name.starts_with(name_prefix) {
                continue;
            }

            let Some(id) = container.id else { continue };
            let running = container
                .state
                .map(|state| state.to_string().eq_ignore_ascii_case("running"))
                .unwrap_or(false);

            return Ok(Some(FoundContainer { id, name, running }));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_order_is_environment_then_socket() {
        let candidates = ConnectionStrategy::candidates();
        assert_eq!(candidates[0], ConnectionStrategy::Environment);
        assert_eq!(
            candidates[1],
            ConnectionStrategy::Socket(DEFAULT_SOCKET.to_string())
        );
    }

    #[tokio::test]
    #[ignore] // Requires Docker/Podman to be running
    async fn test_client_connection() {
        let client = EngineClient::connect().await.unwrap();
        client.ping().await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_engine_stats() {
        let client = EngineClient::connect().await.unwrap();
        let stats = client.engine_stats().await.unwrap();
        println!("Engine version: {}", stats.version);
    }
}
