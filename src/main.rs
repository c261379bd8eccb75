//! `taskdock` application entry point.
//!
//! This binary exposes the resolution layer on the command line: evaluating
//! configured environment values, reporting which registry credentials an
//! image pull would use, encoding socket hostnames, and checking that the
//! container engine responds. It uses `eyre` for opaque error handling at the
//! application boundary, converting domain-specific errors into
//! human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/taskdock/config.toml` or path from `TASKDOCK_CONFIG_PATH`)
//! 3. Environment variables (`TASKDOCK_*`)
//! 4. Command-line arguments
//!
//! Diagnostics go to stderr through `tracing`; set `TASKDOCK_LOG` to a filter
//! such as `taskdock=debug` to see resolution decisions.

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use mockable::DefaultEnv;
use taskdock::config::{
    AppConfig, Cli, Commands, CredentialsArgs, EnvironmentExpression, EvalArgs, SocketHostArgs,
    evaluate_environment, load_config,
};
use taskdock::credentials::{
    DockerClientConfig, RegistryCredentials, RegistryCredentialsProvider, SystemProcessRunner,
};
use taskdock::engine::{EngineConnector, SocketResolver, encode_path};
use taskdock::error::Result as TaskdockResult;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV_VAR: &str = "TASKDOCK_LOG";

/// Application entry point.
///
/// Loads configuration with layered precedence via `OrthoConfig`, then dispatches
/// to the appropriate subcommand handler.
fn main() -> EyreResult<()> {
    // Parse CLI first (for subcommand dispatch and global options).
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration with layered precedence: defaults < file < env < CLI.
    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).map_err(Report::from)
}

/// Install the stderr subscriber. `TASKDOCK_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(cli: &Cli, config: &AppConfig) -> TaskdockResult<()> {
    let env = DefaultEnv::new();
    match &cli.command {
        Commands::Env => print_environment(config, &env),
        Commands::Eval(args) => evaluate_expression(args, &env),
        Commands::Credentials(args) => report_credentials(config, args, &env),
        Commands::SocketHost(args) => print_socket_host(args),
        Commands::Ping => ping_engine(config, &env),
    }
}

/// Evaluate the configured container environment and print `NAME=value` lines.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_environment(config: &AppConfig, env: &DefaultEnv) -> TaskdockResult<()> {
    for (name, value) in evaluate_environment(&config.environment, env)? {
        println!("{name}={value}");
    }
    Ok(())
}

/// Parse and evaluate a single expression.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn evaluate_expression(args: &EvalArgs, env: &DefaultEnv) -> TaskdockResult<()> {
    let expression = EnvironmentExpression::parse(&args.expression)?;
    println!("{}", expression.evaluate(env)?);
    Ok(())
}

/// Report which credentials would be used to pull an image, without
/// revealing any secret.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn report_credentials(
    config: &AppConfig,
    args: &CredentialsArgs,
    env: &DefaultEnv,
) -> TaskdockResult<()> {
    let docker_config = DockerClientConfig::load(config.docker_config_path.as_deref(), env)?;
    let runner = SystemProcessRunner::new();
    let provider =
        RegistryCredentialsProvider::new(&config.registry.credentials, docker_config, &runner);

    let Some(source) = provider.source_for_image(&args.image) else {
        println!("{}: no credentials configured", args.image);
        return Ok(());
    };

    let summary = match source.load()? {
        None => String::from("no credentials stored"),
        Some(RegistryCredentials::Token { .. }) => String::from("token"),
        Some(RegistryCredentials::Password { username, .. }) => format!("password for {username}"),
    };
    println!("{} ({}): {summary}", args.image, source.server_address());
    Ok(())
}

/// Print the synthetic hostname for a socket path.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
#[expect(
    clippy::unnecessary_wraps,
    reason = "every subcommand handler shares the same signature for dispatch"
)]
fn print_socket_host(args: &SocketHostArgs) -> TaskdockResult<()> {
    println!("{}", encode_path(&args.path));
    Ok(())
}

/// Resolve the engine socket and check that the engine responds.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn ping_engine(config: &AppConfig, env: &DefaultEnv) -> TaskdockResult<()> {
    let resolver = SocketResolver::new(env);
    let client =
        EngineConnector::connect_with_fallback_and_verify(config.engine_socket.as_deref(), &resolver)?;
    println!("engine at {} is responding", client.socket_path().display());
    Ok(())
}
