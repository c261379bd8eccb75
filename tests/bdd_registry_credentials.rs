//! Behavioural tests for registry credentials resolution.
//!
//! These tests validate how inline Base64 credentials and credential helpers
//! are turned into registry credentials, including the failure messages a
//! user sees.

mod bdd_registry_credentials_helpers;

pub use bdd_registry_credentials_helpers::{RegistryCredentialsState, registry_credentials_state};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/registry_credentials.feature",
    name = "Empty basic credentials are rejected"
)]
fn empty_basic_credentials_are_rejected(registry_credentials_state: RegistryCredentialsState) {
    let _ = registry_credentials_state;
}

#[scenario(
    path = "tests/features/registry_credentials.feature",
    name = "Basic credentials carrying a token"
)]
fn basic_credentials_carrying_a_token(registry_credentials_state: RegistryCredentialsState) {
    let _ = registry_credentials_state;
}

#[scenario(
    path = "tests/features/registry_credentials.feature",
    name = "Basic credentials carrying a password"
)]
fn basic_credentials_carrying_a_password(registry_credentials_state: RegistryCredentialsState) {
    let _ = registry_credentials_state;
}

#[scenario(
    path = "tests/features/registry_credentials.feature",
    name = "Helper without stored credentials"
)]
fn helper_without_stored_credentials(registry_credentials_state: RegistryCredentialsState) {
    let _ = registry_credentials_state;
}

#[scenario(
    path = "tests/features/registry_credentials.feature",
    name = "Helper returning a token"
)]
fn helper_returning_a_token(registry_credentials_state: RegistryCredentialsState) {
    let _ = registry_credentials_state;
}

#[scenario(
    path = "tests/features/registry_credentials.feature",
    name = "Helper returning a password"
)]
fn helper_returning_a_password(registry_credentials_state: RegistryCredentialsState) {
    let _ = registry_credentials_state;
}

#[scenario(
    path = "tests/features/registry_credentials.feature",
    name = "Helper failing with a non-zero exit code"
)]
fn helper_failing_with_a_non_zero_exit_code(registry_credentials_state: RegistryCredentialsState) {
    let _ = registry_credentials_state;
}

#[scenario(
    path = "tests/features/registry_credentials.feature",
    name = "Helper executable missing"
)]
fn helper_executable_missing(registry_credentials_state: RegistryCredentialsState) {
    let _ = registry_credentials_state;
}
