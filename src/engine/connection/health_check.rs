//! Health check and connect-and-verify functionality.
//!
//! The engine is healthy when `GET /_ping` answers with a success status
//! within [`HEALTH_CHECK_TIMEOUT_SECS`] seconds.

use std::time::Duration;

use http_body_util::BodyExt;
use tracing::debug;

use super::{EngineClient, EngineConnector, HEALTH_CHECK_TIMEOUT_SECS, SocketResolver};
use crate::error::{ContainerError, TaskdockError};

/// Engine API path that answers `OK` when the daemon is running.
const PING_PATH: &str = "/_ping";

impl EngineConnector {
    // =========================================================================
    // Health check - internal helpers
    // =========================================================================

    /// Send one ping and check the answer.
    async fn ping(client: &EngineClient) -> Result<(), TaskdockError> {
        let response = client.get(PING_PATH).await?;
        let status = response.status();

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ContainerError::HealthCheckFailed {
                message: format!("failed to read {PING_PATH} response: {e}"),
            })?
            .to_bytes();

        if !status.is_success() {
            return Err(ContainerError::HealthCheckFailed {
                message: format!(
                    "engine answered {PING_PATH} with status {status}: {}",
                    String::from_utf8_lossy(&body).trim()
                ),
            }
            .into());
        }

        debug!(%status, body = %String::from_utf8_lossy(&body), "engine answered ping");
        Ok(())
    }

    /// Perform a ping with timeout.
    ///
    /// This is the core async implementation reused by all health check APIs.
    pub(super) async fn ping_with_timeout(client: &EngineClient) -> Result<(), TaskdockError> {
        let timeout = Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS);

        tokio::time::timeout(timeout, Self::ping(client))
            .await
            .map_err(|_| ContainerError::HealthCheckTimeout {
                seconds: HEALTH_CHECK_TIMEOUT_SECS,
            })?
    }

    // =========================================================================
    // Health check - public APIs
    // =========================================================================

    /// Verify the container engine is responsive (async version).
    ///
    /// This confirms the engine is operational, not just that the socket
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::SocketNotFound`,
    /// `ContainerError::PermissionDenied`, or
    /// `ContainerError::ConnectionFailed` if the socket cannot be reached.
    ///
    /// Returns `ContainerError::HealthCheckFailed` if the engine does not
    /// respond correctly.
    ///
    /// Returns `ContainerError::HealthCheckTimeout` if the check times out.
    pub async fn health_check_async(client: &EngineClient) -> Result<(), TaskdockError> {
        Self::ping_with_timeout(client).await
    }

    /// Verify the container engine is responsive.
    ///
    /// This is the synchronous version that creates a dedicated tokio runtime
    /// to execute the async health check. Use [`Self::health_check_async`]
    /// when already in an async context.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::RuntimeCreationFailed` if the tokio runtime
    /// cannot be created, otherwise as [`Self::health_check_async`].
    pub fn health_check(client: &EngineClient) -> Result<(), TaskdockError> {
        let rt = Self::create_runtime()?;
        rt.block_on(Self::health_check_async(client))
    }

    /// Create a tokio runtime for synchronous operations.
    fn create_runtime() -> Result<tokio::runtime::Runtime, TaskdockError> {
        tokio::runtime::Runtime::new().map_err(|e| {
            TaskdockError::from(ContainerError::RuntimeCreationFailed {
                message: e.to_string(),
            })
        })
    }

    // =========================================================================
    // Connect and verify
    // =========================================================================

    /// Connect to the engine at `socket` and verify it responds (async
    /// version).
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::connect`] and
    /// [`Self::health_check_async`].
    pub async fn connect_and_verify_async(socket: &str) -> Result<EngineClient, TaskdockError> {
        let client = Self::connect(socket)?;
        Self::ping_with_timeout(&client).await?;
        Ok(client)
    }

    /// Connect to the engine at `socket` and verify it responds.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::RuntimeCreationFailed` if the tokio runtime
    /// cannot be created, otherwise as [`Self::connect_and_verify_async`].
    pub fn connect_and_verify(socket: &str) -> Result<EngineClient, TaskdockError> {
        let rt = Self::create_runtime()?;
        rt.block_on(Self::connect_and_verify_async(socket))
    }

    /// Connect using fallback resolution and verify the engine responds.
    ///
    /// Resolution order:
    /// 1. `config_socket` (from CLI, config file, or `TASKDOCK_ENGINE_SOCKET`)
    /// 2. `DOCKER_HOST`, `CONTAINER_HOST`, `PODMAN_HOST` (via resolver)
    /// 3. The default socket
    ///
    /// # Errors
    ///
    /// See [`Self::connect_and_verify`].
    pub fn connect_with_fallback_and_verify<E: mockable::Env>(
        config_socket: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> Result<EngineClient, TaskdockError> {
        let socket = Self::resolve_socket(config_socket, resolver);
        Self::connect_and_verify(&socket)
    }
}
