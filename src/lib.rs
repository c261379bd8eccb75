//! Connectivity and configuration resolution for container-engine task runners.
//!
//! `taskdock` prepares the inputs a container orchestration layer needs before
//! any container can be created: environment values evaluated from a
//! declarative configuration file, registry credentials gathered from
//! heterogeneous and partially-untrusted sources, and an HTTP transport that
//! reaches a daemon listening only on a Unix socket.
//!
//! # Modules
//!
//! - [`config`]: Layered configuration and the environment expression evaluator
//! - [`credentials`]: Registry credentials sources and resolution
//! - [`engine`]: Socket resolution, the Unix-socket address codec, and the
//!   engine HTTP transport
//! - [`error`]: Semantic error types for the library

pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
