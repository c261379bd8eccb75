//! Error classification helpers for container engine connection failures.
//!
//! This module converts `hyper_util` client errors into semantic
//! `ContainerError` variants so callers receive actionable diagnostics.

use std::error::Error;
use std::io;
use std::path::Path;

use crate::error::ContainerError;

/// Classify an I/O error kind into a semantic `ContainerError`.
fn classify_io_error_kind(kind: io::ErrorKind, socket_path: &Path, message: String) -> ContainerError {
    match kind {
        io::ErrorKind::PermissionDenied => ContainerError::PermissionDenied {
            path: socket_path.to_path_buf(),
        },
        io::ErrorKind::NotFound => ContainerError::SocketNotFound {
            path: socket_path.to_path_buf(),
        },
        _ => ContainerError::ConnectionFailed { message },
    }
}

/// Classify a failed engine request into a semantic `ContainerError`.
///
/// Falls back to `ConnectionFailed` for errors without an underlying
/// `io::Error` or with an unrecognised kind.
pub(super) fn classify_request_error(
    error: &hyper_util::client::legacy::Error,
    socket_path: &Path,
) -> ContainerError {
    let message = chain_message(error);

    match io_error_kind_in_chain(error) {
        Some(kind) => classify_io_error_kind(kind, socket_path, message),
        None => ContainerError::ConnectionFailed { message },
    }
}

/// Joins an error and its sources into one line.
fn chain_message(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(err) = current {
        message.push_str(": ");
        message.push_str(&err.to_string());
        current = err.source();
    }
    message
}

/// Walk the error source chain looking for an `io::Error` kind.
fn io_error_kind_in_chain(error: &dyn Error) -> Option<io::ErrorKind> {
    let mut current: Option<&(dyn Error + 'static)> = error.source();
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        current = err.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::path::PathBuf;

    use rstest::rstest;

    use super::*;

    #[derive(Debug)]
    struct Wrapper {
        source: io::Error,
    }

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "client error (Connect)")
        }
    }

    impl Error for Wrapper {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.source)
        }
    }

    #[derive(Debug)]
    struct Outer {
        source: Wrapper,
    }

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.source)
        }
    }

    fn nested(kind: io::ErrorKind) -> Outer {
        Outer {
            source: Wrapper {
                source: io::Error::new(kind, "os failure"),
            },
        }
    }

    #[rstest]
    fn io_error_kind_in_chain_finds_nested_io_error_kind() {
        assert_eq!(
            io_error_kind_in_chain(&nested(io::ErrorKind::PermissionDenied)),
            Some(io::ErrorKind::PermissionDenied)
        );
    }

    #[rstest]
    fn chain_message_includes_every_source() {
        assert_eq!(
            chain_message(&nested(io::ErrorKind::Other)),
            "request failed: client error (Connect): os failure"
        );
    }

    #[rstest]
    #[case::not_found(io::ErrorKind::NotFound, "SocketNotFound")]
    #[case::permission(io::ErrorKind::PermissionDenied, "PermissionDenied")]
    #[case::refused(io::ErrorKind::ConnectionRefused, "ConnectionFailed")]
    fn io_kinds_map_to_container_errors(#[case] kind: io::ErrorKind, #[case] expected: &str) {
        let path = PathBuf::from("/run/engine.sock");
        let error = classify_io_error_kind(kind, &path, String::from("boom"));
        let variant = format!("{error:?}");
        assert!(
            variant.starts_with(expected),
            "expected {expected}, got {variant}"
        );
    }
}
