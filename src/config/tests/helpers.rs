//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use ortho_config::MergeComposer;
use ortho_config::serde_json::json;
use rstest::fixture;

use crate::config::AppConfig;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        engine_socket = "unix:///run/user/1000/docker.sock"
        docker_config_path = "/home/user/.docker/config.json"

        [environment]
        PROXY = "${HTTP_PROXY:-}"
        PORT = 5432
        PRICE = "\\$5"
        USER = "$USER"

        [registry.credentials."ghcr.io"]
        helper = "docker-credential-pass"

        [registry.credentials."registry.example.com"]
        auth = "YWxpY2U6c2VjcmV0"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Creates a composer with defaults, a file layer, and an environment layer.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "engine_socket": "unix:///from/file.sock",
            "docker_config_path": "/from/file/config.json",
            "environment": { "MODE": "file" }
        }),
        None,
    );

    composer.push_environment(json!({
        "engine_socket": "unix:///from/env.sock"
    }));

    Ok(composer)
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(
        config.engine_socket.is_none(),
        "engine_socket should be None"
    );
    assert!(
        config.docker_config_path.is_none(),
        "docker_config_path should be None"
    );
    assert!(
        config.environment.is_empty(),
        "environment should be empty"
    );
    assert!(
        config.registry.credentials.is_empty(),
        "registry.credentials should be empty"
    );
}
