//! Credentials held by an external credential helper executable.
//!
//! The helper is run as `<helper> get` with the server address on standard
//! input. On success it prints a JSON object with `Username`, `Secret`, and
//! `ServerURL` string fields. A helper that has nothing stored exits non-zero
//! and prints `credentials not found in native keychain`.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{ProcessError, ProcessRunner, RegistryCredentials};
use crate::error::CredentialsError;

/// The helper subcommand that retrieves credentials.
const GET_COMMAND: &str = "get";

/// Output of a helper that holds no credentials for the server.
const NOT_FOUND_OUTPUT: &str = "credentials not found in native keychain";

const USERNAME_FIELD: &str = "Username";
const SECRET_FIELD: &str = "Secret";
const SERVER_URL_FIELD: &str = "ServerURL";

/// Credentials retrieved by running a credential helper.
#[derive(Debug)]
pub struct HelperCredentialsSource<'a, R: ProcessRunner> {
    helper_name: String,
    server_address: String,
    runner: &'a R,
}

impl<'a, R: ProcessRunner> HelperCredentialsSource<'a, R> {
    /// Creates a source that asks `helper_name` for `server_address`'s
    /// credentials, running it through `runner`.
    #[must_use]
    pub fn new(
        helper_name: impl Into<String>,
        server_address: impl Into<String>,
        runner: &'a R,
    ) -> Self {
        Self {
            helper_name: helper_name.into(),
            server_address: server_address.into(),
            runner,
        }
    }

    /// The helper executable name.
    #[must_use]
    pub fn helper_name(&self) -> &str {
        &self.helper_name
    }

    /// The registry server address.
    #[must_use]
    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    /// Runs the helper once and interprets its answer.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsError::HelperNotFound` when the executable does not
    /// exist, `CredentialsError::HelperIo` when it cannot be run,
    /// `CredentialsError::HelperFailed` for a non-zero exit other than "not
    /// found", and `CredentialsError::InvalidHelperOutput` when the output is
    /// not the expected JSON object.
    pub fn load(&self) -> Result<Option<RegistryCredentials>, CredentialsError> {
        let command = [self.helper_name.clone(), String::from(GET_COMMAND)];

        let result = self
            .runner
            .run_and_capture_output(&command, &self.server_address)
            .map_err(|source| self.process_error(source))?;
        let output = result.output.trim();

        if result.exit_code != 0 {
            if output == NOT_FOUND_OUTPUT {
                debug!(
                    helper = %self.helper_name,
                    server_address = %self.server_address,
                    "credential helper holds no credentials"
                );
                return Ok(None);
            }

            warn!(
                helper = %self.helper_name,
                server_address = %self.server_address,
                exit_code = result.exit_code,
                "credential helper failed"
            );
            return Err(CredentialsError::HelperFailed {
                helper: self.helper_name.clone(),
                server_address: self.server_address.clone(),
                exit_code: result.exit_code,
                output: String::from(output),
            });
        }

        let fields = self.parse_output(output)?;
        let username = self.string_field(&fields, USERNAME_FIELD)?;
        let secret = self.string_field(&fields, SECRET_FIELD)?;
        let server_url = self.string_field(&fields, SERVER_URL_FIELD)?;

        debug!(
            helper = %self.helper_name,
            server_address = %self.server_address,
            "loaded credentials from helper"
        );

        Ok(Some(RegistryCredentials::from_parts(
            username, secret, server_url,
        )))
    }

    fn process_error(&self, source: ProcessError) -> CredentialsError {
        match source {
            ProcessError::ExecutableNotFound { .. } => CredentialsError::HelperNotFound {
                helper: self.helper_name.clone(),
                server_address: self.server_address.clone(),
                source,
            },
            ProcessError::EmptyCommand | ProcessError::Io { .. } => CredentialsError::HelperIo {
                helper: self.helper_name.clone(),
                server_address: self.server_address.clone(),
                source,
            },
        }
    }

    fn parse_output(&self, output: &str) -> Result<Map<String, Value>, CredentialsError> {
        match serde_json::from_str::<Value>(output) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(self.invalid_output(String::from("the output is not a JSON object"))),
            Err(e) => Err(self.invalid_output(e.to_string())),
        }
    }

    fn string_field<'v>(
        &self,
        fields: &'v Map<String, Value>,
        key: &str,
    ) -> Result<&'v str, CredentialsError> {
        match fields.get(key) {
            Some(Value::String(value)) => Ok(value),
            Some(_) => Err(self.invalid_output(format!("the '{key}' field is not a string"))),
            None => Err(self.invalid_output(format!("there is no '{key}' field"))),
        }
    }

    fn invalid_output(&self, reason: String) -> CredentialsError {
        CredentialsError::InvalidHelperOutput {
            helper: self.helper_name.clone(),
            server_address: self.server_address.clone(),
            reason,
        }
    }
}
