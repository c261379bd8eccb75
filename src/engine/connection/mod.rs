//! Socket resolution and container engine connection.
//!
//! This module resolves the container engine endpoint from configuration,
//! environment variables, and the platform default, and builds an
//! [`EngineClient`] that talks HTTP to the engine over its Unix socket.

mod error_classification;
mod health_check;
mod transport;

use std::path::PathBuf;

use tracing::debug;

use crate::error::{ConfigError, TaskdockError};

pub use transport::{EngineClient, UnixSocketConnector};

/// Environment variable names checked in fallback order after configuration sources.
const FALLBACK_ENV_VARS: &[&str] = &["DOCKER_HOST", "CONTAINER_HOST", "PODMAN_HOST"];

/// Timeout in seconds for health check operations.
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;

/// Default engine endpoint.
const DEFAULT_SOCKET: &str = "unix:///var/run/docker.sock";

const UNIX_SCHEME: &str = "unix://";

/// Resolves container engine socket endpoints from environment variables.
///
/// The resolver checks a prioritised list of environment variables to find
/// the socket endpoint when no explicit configuration is provided.
///
/// # Example
///
/// ```
/// use mockable::DefaultEnv;
/// use taskdock::engine::SocketResolver;
///
/// let env = DefaultEnv::new();
/// let resolver = SocketResolver::new(&env);
/// let _socket = resolver.resolve_from_env();
/// ```
pub struct SocketResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> SocketResolver<'a, E> {
    /// Creates a new socket resolver with the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Resolves the socket endpoint from fallback environment variables.
    ///
    /// Checks `DOCKER_HOST`, `CONTAINER_HOST`, then `PODMAN_HOST`, skipping
    /// empty values. Returns `None` if none is set.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<String> {
        FALLBACK_ENV_VARS
            .iter()
            .filter_map(|var_name| self.env.string(var_name))
            .find(|value| !value.is_empty())
    }

    /// Returns the default endpoint, `unix:///var/run/docker.sock`.
    #[must_use]
    pub const fn default_socket() -> &'static str {
        DEFAULT_SOCKET
    }
}

/// Connects to Docker or Podman engines listening on a Unix socket.
pub struct EngineConnector;

impl EngineConnector {
    /// Resolves the socket endpoint without establishing a connection.
    ///
    /// Resolution order:
    /// 1. `config_socket` (from CLI, config file, or `TASKDOCK_ENGINE_SOCKET`)
    /// 2. `DOCKER_HOST`, `CONTAINER_HOST`, `PODMAN_HOST` (via resolver)
    /// 3. The default socket
    #[must_use]
    pub fn resolve_socket<E: mockable::Env>(
        config_socket: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> String {
        config_socket
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| resolver.resolve_from_env())
            .unwrap_or_else(|| SocketResolver::<E>::default_socket().to_owned())
    }

    /// Extracts the filesystem path from an endpoint.
    ///
    /// Accepts `unix:///path/to/socket` and bare paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for endpoints with any other scheme
    /// (such as `tcp://`) and for empty paths.
    pub fn socket_path(socket: &str) -> Result<PathBuf, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            field: String::from("engine_socket"),
            reason,
        };

        let path = match socket.strip_prefix(UNIX_SCHEME) {
            Some(path) => path,
            None if socket.contains("://") => {
                return Err(invalid(format!(
                    "unsupported endpoint '{socket}'; only unix:// sockets and socket paths are supported"
                )));
            }
            None => socket,
        };

        if path.is_empty() {
            return Err(invalid(format!("endpoint '{socket}' names no socket path")));
        }

        Ok(PathBuf::from(path))
    }

    /// Builds a client for the engine at `socket`.
    ///
    /// No connection is made until the first request.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the endpoint is not a Unix
    /// socket, and `ContainerError::ConnectionFailed` if its path is not
    /// valid UTF-8.
    pub fn connect(socket: &str) -> Result<EngineClient, TaskdockError> {
        let path = Self::socket_path(socket)?;
        debug!(socket, path = %path.display(), "creating engine client");
        Ok(EngineClient::new(path)?)
    }

    /// Builds a client using the resolved socket from configuration and
    /// environment.
    ///
    /// # Errors
    ///
    /// See [`Self::connect`].
    pub fn connect_with_fallback<E: mockable::Env>(
        config_socket: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> Result<EngineClient, TaskdockError> {
        let socket = Self::resolve_socket(config_socket, resolver);
        Self::connect(&socket)
    }
}
