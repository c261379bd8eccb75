//! Scenario state for registry credentials BDD tests.

use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use taskdock::credentials::RegistryCredentials;

/// Convenience alias for step outcomes.
pub type StepResult<T> = Result<T, String>;

/// Registry server used by every scenario unless a step names another.
pub const SERVER: &str = "registry.example.com";

/// Helper executable name reported by the stub runner.
pub const HELPER: &str = "docker-credential-stub";

/// How the stub credential helper answers.
#[derive(Clone, Debug)]
pub enum HelperBehaviour {
    /// Exit with `exit_code` after printing `output`.
    Exits {
        /// The process exit code.
        exit_code: i32,
        /// The combined process output.
        output: String,
    },
    /// The executable named here does not exist.
    Missing {
        /// The missing executable.
        executable: String,
    },
}

/// The credentials source configured by a scenario.
#[derive(Clone, Debug)]
pub enum SourceSpec {
    /// Inline Base64 credentials.
    Basic {
        /// The encoded credentials.
        encoded: String,
        /// The registry server address.
        server_address: String,
    },
    /// A credential helper.
    Helper(HelperBehaviour),
}

/// Outcome of a credentials load.
#[derive(Clone, Debug)]
pub enum LoadOutcome {
    /// Credentials were returned.
    Found(RegistryCredentials),
    /// The source holds no credentials.
    NotFound,
    /// Loading failed with the given error message.
    Failed {
        /// The `Display` representation of the error.
        message: String,
    },
}

/// State shared across registry credentials scenarios.
#[derive(Default, ScenarioState)]
pub struct RegistryCredentialsState {
    /// The configured credentials source.
    pub(crate) source: Slot<SourceSpec>,
    /// Outcome of the most recent load.
    pub(crate) outcome: Slot<LoadOutcome>,
}

/// Fixture providing fresh state for each registry credentials scenario.
#[rstest::fixture]
pub fn registry_credentials_state() -> RegistryCredentialsState {
    RegistryCredentialsState::default()
}
