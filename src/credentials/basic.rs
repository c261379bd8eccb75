//! Inline Base64-encoded registry credentials.

use std::fmt;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use super::RegistryCredentials;
use crate::error::CredentialsError;

/// Standard alphabet; trailing `=` padding is optional.
const DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Credentials stored as Base64 of `username:password` or `<token>:value`.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentialsSource {
    encoded_credentials: String,
    server_address: String,
}

impl fmt::Debug for BasicCredentialsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentialsSource")
            .field("encoded_credentials", &"<redacted>")
            .field("server_address", &self.server_address)
            .finish()
    }
}

impl BasicCredentialsSource {
    /// Creates a source for `server_address` from its encoded credentials.
    #[must_use]
    pub fn new(encoded_credentials: impl Into<String>, server_address: impl Into<String>) -> Self {
        Self {
            encoded_credentials: encoded_credentials.into(),
            server_address: server_address.into(),
        }
    }

    /// The registry server address.
    #[must_use]
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    /// Decodes the credentials.
    ///
    /// The decoded text is split on its first `:`; everything after it,
    /// including further colons, is the secret.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError::Empty` for an empty string,
    /// `CredentialsError::Undecodable` when the text is not Base64 of UTF-8,
    /// and `CredentialsError::NotValid` when the decoded text has no `:`.
    pub fn load(&self) -> Result<RegistryCredentials, CredentialsError> {
        if self.encoded_credentials.is_empty() {
            return Err(CredentialsError::Empty {
                server_address: self.server_address.clone(),
            });
        }

        let decoded = DECODER
            .decode(&self.encoded_credentials)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| CredentialsError::Undecodable {
                server_address: self.server_address.clone(),
            })?;

        let (username, secret) =
            decoded
                .split_once(':')
                .ok_or_else(|| CredentialsError::NotValid {
                    server_address: self.server_address.clone(),
                })?;

        Ok(RegistryCredentials::from_parts(
            username,
            secret,
            &self.server_address,
        ))
    }
}
