//! Behavioural step helpers for registry credentials scenarios.

mod assertions;
mod state;
mod steps;

pub use state::{RegistryCredentialsState, registry_credentials_state};
