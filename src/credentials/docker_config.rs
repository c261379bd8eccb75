//! The Docker client configuration file (`config.json`).
//!
//! Only the parts relevant to registry authentication are read: the `auths`
//! table of inline credentials, per-registry `credHelpers`, and the global
//! `credsStore`.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::debug;

use super::{
    BasicCredentialsSource, HelperCredentialsSource, ProcessRunner, RegistryCredentialsSource,
};
use crate::config::read_optional_file_to_string;
use crate::error::{ConfigError, Result};

/// Prefix of credential helper executables named in `config.json`.
const HELPER_PREFIX: &str = "docker-credential-";

/// Directory override honoured by the Docker client.
const DOCKER_CONFIG_ENV: &str = "DOCKER_CONFIG";

const CONFIG_FILE_NAME: &str = "config.json";

/// One entry of the `auths` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct AuthEntry {
    #[serde(default)]
    auth: Option<String>,
}

/// Registry authentication settings from a Docker client configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DockerClientConfig {
    #[serde(default)]
    auths: BTreeMap<String, AuthEntry>,

    #[serde(default, rename = "credHelpers")]
    cred_helpers: BTreeMap<String, String>,

    #[serde(default, rename = "credsStore")]
    creds_store: Option<String>,
}

impl DockerClientConfig {
    /// Parses the JSON content of a configuration file.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the content is not a valid
    /// configuration document.
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Returns where the Docker client keeps its configuration file:
    /// `$DOCKER_CONFIG/config.json`, else `$HOME/.docker/config.json`.
    #[must_use]
    pub fn default_path<E: mockable::Env>(env: &E) -> Option<Utf8PathBuf> {
        let non_empty = |name: &str| env.string(name).filter(|value| !value.is_empty());

        non_empty(DOCKER_CONFIG_ENV)
            .map(|dir| Utf8PathBuf::from(dir).join(CONFIG_FILE_NAME))
            .or_else(|| {
                non_empty("HOME")
                    .map(|home| Utf8PathBuf::from(home).join(".docker").join(CONFIG_FILE_NAME))
            })
    }

    /// Loads the configuration file from `explicit_path`, or from
    /// [`Self::default_path`] when none is given.
    ///
    /// A file that does not exist yields an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when the file cannot be read or
    /// parsed.
    pub fn load<E: mockable::Env>(explicit_path: Option<&Utf8Path>, env: &E) -> Result<Self> {
        let Some(path) = explicit_path
            .map(Utf8Path::to_path_buf)
            .or_else(|| Self::default_path(env))
        else {
            debug!("no Docker client configuration location could be determined");
            return Ok(Self::default());
        };

        let Some(content) = read_optional_file_to_string(&path)? else {
            debug!(%path, "Docker client configuration file does not exist");
            return Ok(Self::default());
        };

        let config = Self::from_json(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

        debug!(%path, "loaded Docker client configuration");
        Ok(config)
    }

    /// Selects the credentials source for `server_address`.
    ///
    /// A registry-specific `credHelpers` entry wins, then the global
    /// `credsStore`, then inline `auths` credentials.
    #[must_use]
    pub fn credentials_source_for<'a, R: ProcessRunner>(
        &self,
        server_address: &str,
        runner: &'a R,
    ) -> Option<RegistryCredentialsSource<'a, R>> {
        let helper = lookup(&self.cred_helpers, server_address).or(self.creds_store.as_ref());

        if let Some(name) = helper.filter(|name| !name.is_empty()) {
            return Some(RegistryCredentialsSource::Helper(
                HelperCredentialsSource::new(
                    format!("{HELPER_PREFIX}{name}"),
                    server_address,
                    runner,
                ),
            ));
        }

        lookup(&self.auths, server_address)
            .and_then(|entry| entry.auth.as_ref())
            .filter(|auth| !auth.is_empty())
            .map(|auth| {
                RegistryCredentialsSource::Basic(BasicCredentialsSource::new(
                    auth.as_str(),
                    server_address,
                ))
            })
    }
}

/// Finds the entry for `server_address`, falling back to entries whose key
/// names the same host with a scheme or path attached.
fn lookup<'m, V>(entries: &'m BTreeMap<String, V>, server_address: &str) -> Option<&'m V> {
    entries.get(server_address).or_else(|| {
        let wanted = hostname_of(server_address);
        entries
            .iter()
            .find(|(key, _)| hostname_of(key) == wanted)
            .map(|(_, value)| value)
    })
}

/// Strips any URL scheme and path from a registry key.
fn hostname_of(key: &str) -> &str {
    let without_scheme = key
        .strip_prefix("https://")
        .or_else(|| key.strip_prefix("http://"))
        .unwrap_or(key);
    without_scheme
        .split_once('/')
        .map_or(without_scheme, |(host, _)| host)
}
