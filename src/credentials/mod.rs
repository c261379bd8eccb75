//! Registry credentials resolution.
//!
//! Credentials for pulling images come from one of two kinds of source:
//!
//! - [`BasicCredentialsSource`]: a Base64-encoded `username:password` (or
//!   `<token>:value`) string, as found in the `auths` section of a Docker
//!   client configuration file or in taskdock's own `[registry.credentials]`
//!   table.
//! - [`HelperCredentialsSource`]: an external `docker-credential-*` helper
//!   executable that speaks the credential helper protocol.
//!
//! Loading a source yields [`RegistryCredentials`], or `None` when a helper
//! reports that it holds nothing for the registry. Absence is not an error.
//!
//! [`RegistryCredentialsProvider`] picks the source for an image reference
//! from configuration and loads it.

mod basic;
mod docker_config;
mod helper;
mod process;
mod provider;
mod registry;

use std::fmt;

use bollard::auth::DockerCredentials;

use crate::error::CredentialsError;

pub use basic::BasicCredentialsSource;
pub use docker_config::DockerClientConfig;
pub use helper::HelperCredentialsSource;
pub use process::{ProcessError, ProcessOutput, ProcessRunner, SystemProcessRunner};
pub use provider::RegistryCredentialsProvider;
pub use registry::{registry_for_image, server_address_for_registry};

/// Username that marks the secret as an identity token rather than a password.
pub(crate) const TOKEN_USERNAME: &str = "<token>";

/// Resolved credentials for one registry.
#[derive(Clone, PartialEq, Eq)]
pub enum RegistryCredentials {
    /// An identity token.
    Token {
        /// The token value.
        token: String,
    },

    /// A username and password for a registry server.
    Password {
        /// The registry username.
        username: String,
        /// The registry password.
        password: String,
        /// The registry server address the credentials belong to.
        server_address: String,
    },
}

impl RegistryCredentials {
    /// Builds credentials from a username/secret pair, treating the
    /// `<token>` username as an identity token.
    pub(crate) fn from_parts(username: &str, secret: &str, server_address: &str) -> Self {
        if username == TOKEN_USERNAME {
            Self::Token {
                token: String::from(secret),
            }
        } else {
            Self::Password {
                username: String::from(username),
                password: String::from(secret),
                server_address: String::from(server_address),
            }
        }
    }

    /// Converts the credentials into the form the engine API expects for an
    /// image pull.
    #[must_use]
    pub fn to_docker_credentials(&self) -> DockerCredentials {
        match self {
            Self::Token { token } => DockerCredentials {
                identitytoken: Some(token.clone()),
                ..DockerCredentials::default()
            },
            Self::Password {
                username,
                password,
                server_address,
            } => DockerCredentials {
                username: Some(username.clone()),
                password: Some(password.clone()),
                serveraddress: Some(server_address.clone()),
                ..DockerCredentials::default()
            },
        }
    }
}

impl fmt::Debug for RegistryCredentials {
    /// Secrets are redacted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { .. } => f.debug_struct("Token").field("token", &"<redacted>").finish(),
            Self::Password {
                username,
                server_address,
                ..
            } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .field("server_address", server_address)
                .finish(),
        }
    }
}

/// A place registry credentials can be loaded from.
#[derive(Debug)]
pub enum RegistryCredentialsSource<'a, R: ProcessRunner> {
    /// Inline Base64-encoded credentials.
    Basic(BasicCredentialsSource),
    /// An external credential helper.
    Helper(HelperCredentialsSource<'a, R>),
}

impl<R: ProcessRunner> RegistryCredentialsSource<'_, R> {
    /// Loads the credentials this source describes.
    ///
    /// A basic source always yields credentials or an error. A helper source
    /// yields `None` when the helper has nothing stored for the registry.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError` when the credentials cannot be decoded, the
    /// helper cannot be run, or the helper's output is invalid.
    pub fn load(&self) -> Result<Option<RegistryCredentials>, CredentialsError> {
        match self {
            Self::Basic(source) => source.load().map(Some),
            Self::Helper(source) => source.load(),
        }
    }

    /// The registry server address the source was built for.
    #[must_use]
    pub fn server_address(&self) -> &str {
        match self {
            Self::Basic(source) => source.server_address(),
            Self::Helper(source) => source.server_address(),
        }
    }
}
