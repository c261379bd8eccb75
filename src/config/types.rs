//! Configuration data types for taskdock.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use super::EnvironmentExpression;

/// Credentials configured for one registry server.
///
/// In TOML this is either `{ auth = "<base64>" }` or
/// `{ helper = "<executable>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RegistryCredentialsConfig {
    /// Inline Base64-encoded `username:password` or `<token>:value`.
    Basic {
        /// The encoded credentials.
        auth: String,
    },

    /// An external credential helper executable.
    Helper {
        /// The helper executable, looked up on the search path.
        helper: String,
    },
}

/// Registry authentication configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Credentials keyed by registry server address.
    ///
    /// Entries here take precedence over the Docker client configuration file.
    pub credentials: BTreeMap<String, RegistryCredentialsConfig>,
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `TASKDOCK_CONFIG_PATH` environment variable
/// 2. `.taskdock.toml` in the current working directory
/// 3. `.taskdock.toml` in the home directory
/// 4. `~/.config/taskdock/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "TASKDOCK",
    post_merge_hook,
    discovery(
        app_name = "taskdock",
        env_var = "TASKDOCK_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".taskdock.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The container engine socket path or `unix://` URL.
    pub engine_socket: Option<String>,

    /// Path to the Docker client `config.json` used for registry credentials.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub docker_config_path: Option<Utf8PathBuf>,

    /// Container environment variables, each an environment expression.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub environment: BTreeMap<String, EnvironmentExpression>,

    /// Registry authentication configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub registry: RegistryConfig,
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Blank sockets come from empty environment variables; treat them as unset.
        if self.engine_socket.as_deref().is_some_and(str::is_empty) {
            self.engine_socket = None;
        }
        Ok(())
    }
}
