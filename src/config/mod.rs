//! Configuration system for taskdock.
//!
//! This module provides the configuration structures, CLI definitions, and the
//! environment expression evaluator. Configuration loading and precedence
//! merging is handled by the `ortho_config` crate: CLI flags override
//! environment variables, which override configuration files, which override
//! defaults.
//!
//! The configuration file is expected at `~/.config/taskdock/config.toml` by default.
//!
//! # Example Configuration
//!
//! ```toml
//! engine_socket = "unix:///run/user/1000/docker.sock"
//! docker_config_path = "/home/user/.docker/config.json"
//!
//! [environment]
//! HTTP_PROXY = "${HTTP_PROXY:-}"
//! DB_PORT = 5432
//! GREETING = "\\$5 off"
//!
//! [registry.credentials."ghcr.io"]
//! helper = "docker-credential-pass"
//!
//! [registry.credentials."registry.example.com"]
//! auth = "YWxpY2U6c2VjcmV0"
//! ```

mod cli;
mod expression;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, CredentialsArgs, EvalArgs, SocketHostArgs};
pub use expression::{EnvironmentExpression, evaluate_environment};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub(crate) use loader::read_optional_file_to_string;
pub use types::{AppConfig, RegistryConfig, RegistryCredentialsConfig};
