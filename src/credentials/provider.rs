//! Chooses and loads the credentials for an image pull.

use std::collections::BTreeMap;

use tracing::debug;

use super::{
    BasicCredentialsSource, DockerClientConfig, HelperCredentialsSource, ProcessRunner,
    RegistryCredentials, RegistryCredentialsSource, registry_for_image,
    server_address_for_registry,
};
use crate::config::RegistryCredentialsConfig;
use crate::error::CredentialsError;

/// Resolves registry credentials for image references.
///
/// Entries from taskdock's `[registry.credentials]` table take precedence
/// over the Docker client configuration file. An entry may be keyed by the
/// registry domain (`docker.io`) or by its server address
/// (`https://index.docker.io/v1/`).
#[derive(Debug)]
pub struct RegistryCredentialsProvider<'a, R: ProcessRunner> {
    configured: &'a BTreeMap<String, RegistryCredentialsConfig>,
    docker_config: DockerClientConfig,
    runner: &'a R,
}

impl<'a, R: ProcessRunner> RegistryCredentialsProvider<'a, R> {
    /// Creates a provider over configured entries and a Docker client
    /// configuration, running helpers through `runner`.
    #[must_use]
    pub const fn new(
        configured: &'a BTreeMap<String, RegistryCredentialsConfig>,
        docker_config: DockerClientConfig,
        runner: &'a R,
    ) -> Self {
        Self {
            configured,
            docker_config,
            runner,
        }
    }

    /// Returns the credentials source that applies to `image`, if any.
    #[must_use]
    pub fn source_for_image(&self, image: &str) -> Option<RegistryCredentialsSource<'a, R>> {
        let registry = registry_for_image(image);
        let server_address = server_address_for_registry(registry);

        let source = self
            .configured_source(registry, server_address)
            .or_else(|| {
                self.docker_config
                    .credentials_source_for(server_address, self.runner)
            });

        debug!(
            image,
            server_address,
            found = source.is_some(),
            "selected registry credentials source"
        );
        source
    }

    /// Resolves the credentials for pulling `image`.
    ///
    /// Returns `Ok(None)` when no source applies or a helper holds nothing
    /// for the registry.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError` when the selected source fails to load.
    pub fn credentials_for_image(
        &self,
        image: &str,
    ) -> Result<Option<RegistryCredentials>, CredentialsError> {
        self.source_for_image(image)
            .map_or(Ok(None), |source| source.load())
    }

    fn configured_source(
        &self,
        registry: &str,
        server_address: &str,
    ) -> Option<RegistryCredentialsSource<'a, R>> {
        let entry = self
            .configured
            .get(server_address)
            .or_else(|| self.configured.get(registry))?;

        Some(match entry {
            RegistryCredentialsConfig::Basic { auth } => RegistryCredentialsSource::Basic(
                BasicCredentialsSource::new(auth.as_str(), server_address),
            ),
            RegistryCredentialsConfig::Helper { helper } => RegistryCredentialsSource::Helper(
                HelperCredentialsSource::new(helper.as_str(), server_address, self.runner),
            ),
        })
    }
}
