//! Then step definitions for registry credentials BDD tests.

use rstest_bdd_macros::then;
use taskdock::credentials::RegistryCredentials;

use super::state::{LoadOutcome, RegistryCredentialsState, StepResult};

fn outcome(registry_credentials_state: &RegistryCredentialsState) -> StepResult<LoadOutcome> {
    registry_credentials_state
        .outcome
        .get()
        .ok_or_else(|| String::from("outcome should be set"))
}

#[then("loading fails mentioning {text}")]
fn loading_fails_mentioning(
    registry_credentials_state: &RegistryCredentialsState,
    text: String,
) -> StepResult<()> {
    match outcome(registry_credentials_state)? {
        LoadOutcome::Failed { message } if message.contains(&text) => Ok(()),
        LoadOutcome::Failed { message } => {
            Err(format!("expected error mentioning '{text}', got: {message}"))
        }
        other => Err(format!("expected a load failure, got {other:?}")),
    }
}

#[then("token credentials {token} are returned")]
fn token_credentials_returned(
    registry_credentials_state: &RegistryCredentialsState,
    token: String,
) -> StepResult<()> {
    match outcome(registry_credentials_state)? {
        LoadOutcome::Found(RegistryCredentials::Token { token: actual }) if actual == token => {
            Ok(())
        }
        other => Err(format!("expected token credentials, got {other:?}")),
    }
}

#[then("password credentials for {username} with password {password} are returned")]
fn password_credentials_returned(
    registry_credentials_state: &RegistryCredentialsState,
    username: String,
    password: String,
) -> StepResult<()> {
    match outcome(registry_credentials_state)? {
        LoadOutcome::Found(RegistryCredentials::Password {
            username: actual_username,
            password: actual_password,
            ..
        }) if actual_username == username && actual_password == password => Ok(()),
        other => Err(format!(
            "expected password credentials for {username}, got {other:?}"
        )),
    }
}

#[then("no credentials are returned")]
fn no_credentials_returned(registry_credentials_state: &RegistryCredentialsState) -> StepResult<()> {
    match outcome(registry_credentials_state)? {
        LoadOutcome::NotFound => Ok(()),
        other => Err(format!("expected no credentials, got {other:?}")),
    }
}
