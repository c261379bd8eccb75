//! Command-line argument definitions for taskdock.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for taskdock.
#[derive(Debug, Parser)]
#[command(name = "taskdock")]
#[command(
    author,
    version,
    about = "Resolve container engine connectivity, registry credentials, and environment values"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Container engine socket path or `unix://` URL.
    #[arg(long, global = true)]
    pub engine_socket: Option<String>,

    /// Path to the Docker client `config.json`.
    #[arg(long, global = true)]
    pub docker_config: Option<Utf8PathBuf>,

    /// Log resolution decisions to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate the configured container environment against the host.
    Env,

    /// Parse and evaluate a single environment expression.
    Eval(EvalArgs),

    /// Report which registry credentials would be used for an image.
    Credentials(CredentialsArgs),

    /// Print the synthetic hostname that addresses a Unix socket.
    SocketHost(SocketHostArgs),

    /// Check that the container engine responds.
    Ping,
}

/// Arguments for the `eval` subcommand.
#[derive(Debug, Parser)]
pub struct EvalArgs {
    /// Expression such as `${HOME}` or `${PORT:-8080}`.
    #[arg(required = true, allow_hyphen_values = true)]
    pub expression: String,
}

/// Arguments for the `credentials` subcommand.
#[derive(Debug, Parser)]
pub struct CredentialsArgs {
    /// Image reference, for example `ghcr.io/owner/app:latest`.
    #[arg(required = true)]
    pub image: String,
}

/// Arguments for the `socket-host` subcommand.
#[derive(Debug, Parser)]
pub struct SocketHostArgs {
    /// Filesystem path of the Unix socket.
    #[arg(required = true)]
    pub path: String,
}
