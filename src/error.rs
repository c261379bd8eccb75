//! Semantic error types for the taskdock library.
//!
//! This module defines the error hierarchy for taskdock, following the principle
//! of using semantic error enums (via `thiserror`) for conditions the caller
//! might inspect or branch on, while reserving opaque errors (`eyre::Report`)
//! for the application boundary.
//!
//! Every message is user-facing, so each variant names the resource involved:
//! the variable, the registry server address, the helper executable, or the
//! socket path.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::credentials::ProcessError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    ///
    /// This wraps errors from the layered configuration system, including
    /// malformed files and values that fail to deserialise after merging.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while parsing or evaluating environment expressions.
#[derive(Debug, Error)]
pub enum ExpressionError {
    /// The source text does not match any supported expression form.
    #[error("invalid environment variable expression '{source_text}'")]
    InvalidExpression {
        /// The offending configuration text.
        source_text: String,
    },

    /// A boolean or floating-point scalar was given where text was expected.
    #[error(
        "environment variable value is not a recognised type ({kind}); try wrapping the value in double quotes"
    )]
    ConfigurationType {
        /// The scalar type that was rejected, such as `boolean`.
        kind: &'static str,
    },

    /// A referenced host variable is unset and no default was given.
    #[error(
        "the host environment variable '{name}' is not set, and no default value has been provided"
    )]
    UnresolvedVariable {
        /// The referenced host variable.
        name: String,
    },

    /// Evaluating the expression for a container variable failed.
    #[error("the value for the environment variable '{variable}' cannot be evaluated: {source}")]
    ContainerVariable {
        /// The container variable whose value failed to evaluate.
        variable: String,
        /// The underlying evaluation failure.
        source: Box<ExpressionError>,
    },
}

/// Errors raised while resolving registry credentials.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The encoded credentials string is empty.
    #[error("credentials for '{server_address}' are empty")]
    Empty {
        /// The registry server address.
        server_address: String,
    },

    /// The encoded credentials are not valid Base64 text.
    #[error("could not decode credentials for '{server_address}'")]
    Undecodable {
        /// The registry server address.
        server_address: String,
    },

    /// The decoded credentials lack a `:` separator.
    #[error("decoded credentials for '{server_address}' are not valid")]
    NotValid {
        /// The registry server address.
        server_address: String,
    },

    /// The credential helper exited with a non-zero code.
    #[error(
        "could not load credentials for '{server_address}' because the credential helper executable '{helper}' exited with code {exit_code} and output: {output}"
    )]
    HelperFailed {
        /// The helper executable name.
        helper: String,
        /// The registry server address.
        server_address: String,
        /// The helper's exit code.
        exit_code: i32,
        /// The helper's trimmed combined output.
        output: String,
    },

    /// The credential helper executable could not be found.
    #[error(
        "could not load credentials for '{server_address}' because the credential helper executable '{helper}' does not exist"
    )]
    HelperNotFound {
        /// The helper executable name.
        helper: String,
        /// The registry server address.
        server_address: String,
        /// The underlying process failure.
        #[source]
        source: ProcessError,
    },

    /// The credential helper could not be run for a reason other than absence.
    #[error(
        "could not run the credential helper executable '{helper}' for '{server_address}': {source}"
    )]
    HelperIo {
        /// The helper executable name.
        helper: String,
        /// The registry server address.
        server_address: String,
        /// The underlying process failure.
        #[source]
        source: ProcessError,
    },

    /// The credential helper printed something other than the expected JSON.
    #[error(
        "the credentials returned for '{server_address}' by the credential helper executable '{helper}' are invalid: {reason}"
    )]
    InvalidHelperOutput {
        /// The helper executable name.
        helper: String,
        /// The registry server address.
        server_address: String,
        /// What was wrong with the output.
        reason: String,
    },
}

/// Errors raised by the Unix-socket address codec.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The hostname does not carry the Unix-socket marker suffix.
    #[error("host name '{hostname}' was not encoded for use with a Unix socket")]
    InvalidArgument {
        /// The hostname that was rejected.
        hostname: String,
    },

    /// The hostname carries the marker but its payload does not decode.
    #[error("host name '{hostname}' does not contain a valid encoded socket path: {reason}")]
    InvalidEncoding {
        /// The hostname that was rejected.
        hostname: String,
        /// Why the payload could not be decoded.
        reason: String,
    },
}

/// Errors that can occur while talking to the container engine.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Failed to connect to the container engine socket.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
    },

    /// Failed to create the async runtime for a synchronous call.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the runtime failure.
        message: String,
    },

    /// Health check failed - engine did not respond correctly.
    #[error("container engine health check failed: {message}")]
    HealthCheckFailed {
        /// A description of the health check failure.
        message: String,
    },

    /// Health check timed out.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },
}

/// Top-level error type for the taskdock library.
///
/// This enum aggregates all domain-specific errors into a single type. At the
/// application boundary (main.rs) these errors are converted to
/// `eyre::Report` for human-readable error reporting.
#[derive(Debug, Error)]
pub enum TaskdockError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An environment expression could not be parsed or evaluated.
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// Registry credentials could not be resolved.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// A Unix-socket address could not be encoded or decoded.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// An error occurred while talking to the container engine.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// A specialised `Result` type for taskdock operations.
pub type Result<T> = std::result::Result<T, TaskdockError>;
