//! Configuration loading with layered precedence.
//!
//! This module provides functions to load configuration with the precedence order
//! (lowest to highest): application defaults, configuration file, environment
//! variables, command-line arguments.
//!
//! Layers are composed manually with `MergeComposer` rather than through the
//! `OrthoConfig` derive's `load()`, because the `Cli` struct owns subcommand
//! dispatch and the `--config` path.
//!
//! Only the variables listed in [`ENV_VAR_SPECS`] are read from the process
//! environment, and empty values are treated as unset.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::DefaultEnv;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::debug;

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// Maps an environment variable onto a top-level configuration field.
struct EnvVarSpec {
    /// The environment variable name (e.g., `TASKDOCK_ENGINE_SOCKET`).
    env_var: &'static str,
    /// The configuration field it overrides.
    field: &'static str,
}

/// Environment variables recognised by the loader.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "TASKDOCK_ENGINE_SOCKET",
        field: "engine_socket",
    },
    EnvVarSpec {
        env_var: "TASKDOCK_DOCKER_CONFIG_PATH",
        field: "docker_config_path",
    },
];

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to clear every `TASKDOCK_*` variable without keeping a
/// hard-coded copy of the table.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Read a TOML configuration file into a JSON value.
///
/// Uses `cap_std::fs_utf8` for capability-oriented filesystem access: the
/// parent directory is opened with ambient authority and the file is read
/// relative to it.
fn read_toml_file(path: &Utf8Path) -> Result<Value> {
    let content = read_file_to_string(path)?;

    toml::from_str::<Value>(&content).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        }
        .into()
    })
}

/// Read a UTF-8 file through its parent directory capability, returning
/// `None` when the file or its directory does not exist.
pub(crate) fn read_optional_file_to_string(path: &Utf8Path) -> Result<Option<String>> {
    let (parent, file_name) = split_path(path);

    let contents = Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.read_to_string(file_name));

    match contents {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        }
        .into()),
    }
}

/// Split a path into the directory to open and the file name within it.
fn split_path(path: &Utf8Path) -> (&Utf8Path, &str) {
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    (parent, path.file_name().unwrap_or(path.as_str()))
}

/// Read a UTF-8 file through its parent directory capability.
fn read_file_to_string(path: &Utf8Path) -> Result<String> {
    let (parent, file_name) = split_path(path);

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    dir.read_to_string(file_name).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        }
        .into()
    })
}

/// Load configuration with full layer precedence.
///
/// This function loads configuration from all available sources:
/// 1. Application defaults defined in the struct
/// 2. Configuration file (discovered via XDG paths or `TASKDOCK_CONFIG_PATH`)
/// 3. Environment variables prefixed with `TASKDOCK_`
/// 4. Command-line arguments (from the provided `Cli`)
///
/// Later sources override earlier ones.
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to:
/// - Malformed configuration files
/// - Environment expressions that fail to parse (e.g., `${FOO`)
/// - Boolean or floating-point values in the `[environment]` table
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &DefaultEnv::new())
}

/// Load configuration reading environment overrides from `env`.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env<E: mockable::Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // An explicit --config path wins over discovery when it exists.
    let config_path = cli
        .config
        .clone()
        .filter(|p| p.exists())
        .or_else(discover_config_file);

    if let Some(ref path) = config_path {
        debug!(%path, "loading configuration file");
        composer.push_file(read_toml_file(path)?, Some(path.clone()));
    }

    let env_values = collect_env_vars(env);
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

/// Find the first existing configuration file in the discovery order.
fn discover_config_file() -> Option<Utf8PathBuf> {
    ConfigDiscovery::builder("taskdock")
        .env_var("TASKDOCK_CONFIG_PATH")
        .config_file_name("config.toml")
        .dotfile_name(".taskdock.toml")
        .build()
        .candidates()
        .into_iter()
        .filter(|p| p.exists())
        .find_map(|p| Utf8PathBuf::try_from(p).ok())
}

/// Collect `TASKDOCK_*` overrides into a JSON object, or `Null` when none are set.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Value {
    let root: Map<String, Value> = ENV_VAR_SPECS
        .iter()
        .filter_map(|spec| {
            env.string(spec.env_var)
                .filter(|value| !value.is_empty())
                .map(|value| (spec.field.to_owned(), Value::String(value)))
        })
        .collect();

    if root.is_empty() {
        Value::Null
    } else {
        Value::Object(root)
    }
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref socket) = cli.engine_socket {
        overrides.insert("engine_socket".to_owned(), Value::String(socket.clone()));
    }

    if let Some(ref path) = cli.docker_config {
        overrides.insert(
            "docker_config_path".to_owned(),
            Value::String(path.to_string()),
        );
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
