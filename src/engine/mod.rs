//! Container engine addressing and connection.
//!
//! The engine is reached over a Unix socket. The endpoint is resolved through
//! a priority-based fallback chain:
//!
//! 1. CLI argument (`--engine-socket`)
//! 2. Config file (`engine_socket` in TOML)
//! 3. `TASKDOCK_ENGINE_SOCKET` environment variable
//! 4. `DOCKER_HOST` environment variable
//! 5. `CONTAINER_HOST` environment variable
//! 6. `PODMAN_HOST` environment variable
//! 7. Default (`/var/run/docker.sock`)
//!
//! Requests are addressed to a synthetic hostname that encodes the socket
//! path (see [`encode_path`]), so an ordinary hostname-based HTTP client can
//! carry them.

mod connection;
mod unix_socket;

pub use connection::{EngineClient, EngineConnector, SocketResolver, UnixSocketConnector};
pub use unix_socket::{
    ResolvedAddress, UNIX_SOCKET_MARKER, UnixSocketDns, decode_path, encode_path, lookup,
};
