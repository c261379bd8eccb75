//! Process execution for credential helpers.
//!
//! The resolver only needs "run this command with this standard input and give
//! me the exit code and output". Keeping that behind [`ProcessRunner`] lets the
//! helper protocol be tested without spawning anything.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Exit code reported when the child was terminated by a signal.
const SIGNALLED_EXIT_CODE: i32 = -1;

/// Exit status and captured output of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// The process exit code, or `-1` if it was killed by a signal.
    pub exit_code: i32,
    /// Standard output followed by standard error, lossily decoded as UTF-8.
    pub output: String,
}

/// Failures that prevent a process from running to completion.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// No command was given.
    #[error("cannot run an empty command")]
    EmptyCommand,

    /// The executable could not be found on the search path.
    #[error("the executable '{executable}' could not be found")]
    ExecutableNotFound {
        /// The executable that was requested.
        executable: String,
    },

    /// Spawning, feeding, or waiting on the process failed.
    #[error("failed to run '{executable}': {source}")]
    Io {
        /// The executable that was requested.
        executable: String,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Behaviour required to run an external command and capture its output.
pub trait ProcessRunner {
    /// Run `command` (program followed by arguments), writing `stdin` to the
    /// process's standard input, and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` when the program does not
    /// exist, and `ProcessError::Io` for any other failure to run it. A
    /// non-zero exit is not an error.
    fn run_and_capture_output(
        &self,
        command: &[String],
        stdin: &str,
    ) -> Result<ProcessOutput, ProcessError>;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Creates a new runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run_and_capture_output(
        &self,
        command: &[String],
        stdin: &str,
    ) -> Result<ProcessOutput, ProcessError> {
        let (program, args) = command.split_first().ok_or(ProcessError::EmptyCommand)?;
        let io_error = |source: io::Error| ProcessError::Io {
            executable: program.clone(),
            source,
        };

        debug!(%program, ?args, "spawning process");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => ProcessError::ExecutableNotFound {
                    executable: program.clone(),
                },
                _ => io_error(source),
            })?;

        if let Some(mut pipe) = child.stdin.take() {
            // The child may exit without reading its input.
            let written = pipe
                .write_all(stdin.as_bytes())
                .and_then(|()| pipe.write_all(b"\n"));
            match written {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(io_error(e)),
                _ => {}
            }
        }

        let finished = child.wait_with_output().map_err(io_error)?;

        let mut output = String::from_utf8_lossy(&finished.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&finished.stderr));
        let exit_code = finished.status.code().unwrap_or(SIGNALLED_EXIT_CODE);

        debug!(%program, exit_code, "process exited");

        Ok(ProcessOutput { exit_code, output })
    }
}
