//! Given and When step definitions for registry credentials BDD tests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rstest_bdd_macros::{given, when};
use taskdock::credentials::{
    BasicCredentialsSource, HelperCredentialsSource, ProcessError, ProcessOutput, ProcessRunner,
};

use super::state::{
    HELPER, HelperBehaviour, LoadOutcome, RegistryCredentialsState, SERVER, SourceSpec,
    StepResult,
};

/// Runner that answers every helper invocation with a fixed behaviour.
struct StubRunner {
    behaviour: HelperBehaviour,
}

impl ProcessRunner for StubRunner {
    fn run_and_capture_output(
        &self,
        command: &[String],
        stdin: &str,
    ) -> Result<ProcessOutput, ProcessError> {
        assert_eq!(command.get(1).map(String::as_str), Some("get"));
        assert_eq!(stdin, SERVER);
        match &self.behaviour {
            HelperBehaviour::Exits { exit_code, output } => Ok(ProcessOutput {
                exit_code: *exit_code,
                output: output.clone(),
            }),
            HelperBehaviour::Missing { executable } => Err(ProcessError::ExecutableNotFound {
                executable: executable.clone(),
            }),
        }
    }
}

fn set_basic(registry_credentials_state: &RegistryCredentialsState, decoded: &str) {
    registry_credentials_state.source.set(SourceSpec::Basic {
        encoded: STANDARD.encode(decoded),
        server_address: String::from(SERVER),
    });
}

fn set_helper_output(
    registry_credentials_state: &RegistryCredentialsState,
    exit_code: i32,
    output: String,
) {
    registry_credentials_state
        .source
        .set(SourceSpec::Helper(HelperBehaviour::Exits { exit_code, output }));
}

fn helper_json(username: &str, secret: &str) -> String {
    format!(r#"{{"ServerURL":"{SERVER}","Username":"{username}","Secret":"{secret}"}}"#)
}

#[given("empty basic credentials for server {server}")]
fn empty_basic_credentials(registry_credentials_state: &RegistryCredentialsState, server: String) {
    registry_credentials_state.source.set(SourceSpec::Basic {
        encoded: String::new(),
        server_address: server,
    });
}

#[given("basic credentials encoding the token {token}")]
fn basic_credentials_with_token(registry_credentials_state: &RegistryCredentialsState, token: String) {
    set_basic(registry_credentials_state, &format!("<token>:{token}"));
}

#[given("basic credentials encoding the user {username} with password {password}")]
fn basic_credentials_with_password(
    registry_credentials_state: &RegistryCredentialsState,
    username: String,
    password: String,
) {
    set_basic(registry_credentials_state, &format!("{username}:{password}"));
}

#[given("a credential helper that reports no stored credentials")]
fn helper_reports_nothing(registry_credentials_state: &RegistryCredentialsState) {
    set_helper_output(
        registry_credentials_state,
        1,
        String::from("credentials not found in native keychain\n"),
    );
}

#[given("a credential helper that returns the token {token}")]
fn helper_returns_token(registry_credentials_state: &RegistryCredentialsState, token: String) {
    set_helper_output(registry_credentials_state, 0, helper_json("<token>", &token));
}

#[given("a credential helper that returns the user {username} with secret {secret}")]
fn helper_returns_password(
    registry_credentials_state: &RegistryCredentialsState,
    username: String,
    secret: String,
) {
    set_helper_output(registry_credentials_state, 0, helper_json(&username, &secret));
}

#[given("a credential helper that exits with code {code}")]
fn helper_exits_with_code(registry_credentials_state: &RegistryCredentialsState, code: i32) {
    set_helper_output(
        registry_credentials_state,
        code,
        String::from("something went wrong"),
    );
}

#[given("a credential helper that does not exist")]
fn helper_does_not_exist(registry_credentials_state: &RegistryCredentialsState) {
    registry_credentials_state
        .source
        .set(SourceSpec::Helper(HelperBehaviour::Missing {
            executable: String::from("docker-credential-missing"),
        }));
}

#[when("the credentials are loaded")]
fn credentials_are_loaded(registry_credentials_state: &RegistryCredentialsState) -> StepResult<()> {
    let source = registry_credentials_state
        .source
        .get()
        .ok_or_else(|| String::from("credentials source should be configured"))?;

    let result = match source {
        SourceSpec::Basic {
            encoded,
            server_address,
        } => BasicCredentialsSource::new(encoded, server_address)
            .load()
            .map(Some),
        SourceSpec::Helper(behaviour) => {
            let helper = match &behaviour {
                HelperBehaviour::Missing { executable } => executable.clone(),
                HelperBehaviour::Exits { .. } => String::from(HELPER),
            };
            let runner = StubRunner { behaviour };
            HelperCredentialsSource::new(helper, SERVER, &runner).load()
        }
    };

    let outcome = match result {
        Ok(Some(credentials)) => LoadOutcome::Found(credentials),
        Ok(None) => LoadOutcome::NotFound,
        Err(error) => LoadOutcome::Failed {
            message: error.to_string(),
        },
    };
    registry_credentials_state.outcome.set(outcome);
    Ok(())
}
