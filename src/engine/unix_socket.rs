//! Addressing a Unix domain socket through hostname-based HTTP clients.
//!
//! HTTP client stacks resolve a hostname and then dial the result. To point
//! one at a socket file, the socket path is encoded into a synthetic hostname:
//! the lowercase hex of the path's UTF-8 bytes followed by the
//! [`UNIX_SOCKET_MARKER`] suffix. The resolver adapter answers lookups for such
//! names with a placeholder address, and the connector decodes the name back
//! into the path and opens the socket instead.
//!
//! ```
//! use taskdock::engine::{decode_path, encode_path};
//!
//! let hostname = encode_path("/var/run/docker.sock");
//! assert_eq!(hostname, "2f7661722f72756e2f646f636b65722e736f636b.unixsocket");
//! assert_eq!(decode_path(&hostname).ok().as_deref(), Some("/var/run/docker.sock"));
//! ```

use std::future::{Ready, ready};
use std::net::{Ipv4Addr, SocketAddr};
use std::task::{Context, Poll};

use hyper_util::client::legacy::connect::dns::Name;

use crate::error::AddressError;

/// Suffix that marks a hostname as an encoded socket path.
pub const UNIX_SOCKET_MARKER: &str = ".unixsocket";

/// A hostname paired with the address it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// The hostname that was looked up.
    pub hostname: String,
    /// The resolved address. Always [`Ipv4Addr::UNSPECIFIED`] for socket
    /// hostnames; it is never dialled.
    pub address: Ipv4Addr,
}

/// Encodes a socket path as a synthetic hostname.
#[must_use]
pub fn encode_path(path: &str) -> String {
    format!("{}{UNIX_SOCKET_MARKER}", hex::encode(path))
}

/// Recovers the socket path from a synthetic hostname.
///
/// # Errors
///
/// Returns `AddressError::InvalidArgument` when `hostname` lacks the marker
/// suffix, and `AddressError::InvalidEncoding` when the remainder is not hex
/// of valid UTF-8.
pub fn decode_path(hostname: &str) -> Result<String, AddressError> {
    let encoded = strip_marker(hostname)?;
    let invalid = |reason: String| AddressError::InvalidEncoding {
        hostname: String::from(hostname),
        reason,
    };

    let bytes = hex::decode(encoded).map_err(|e| invalid(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))
}

/// Resolves a synthetic hostname to a single placeholder address.
///
/// # Errors
///
/// Returns `AddressError::InvalidArgument` when `hostname` lacks the marker
/// suffix.
pub fn lookup(hostname: &str) -> Result<Vec<ResolvedAddress>, AddressError> {
    strip_marker(hostname)?;
    Ok(vec![ResolvedAddress {
        hostname: String::from(hostname),
        address: Ipv4Addr::UNSPECIFIED,
    }])
}

fn strip_marker(hostname: &str) -> Result<&str, AddressError> {
    hostname
        .strip_suffix(UNIX_SOCKET_MARKER)
        .ok_or_else(|| AddressError::InvalidArgument {
            hostname: String::from(hostname),
        })
}

/// Name resolver for `hyper_util`'s connectors that only accepts socket
/// hostnames.
///
/// Pass it to `HttpConnector::new_with_resolver` when a stack resolves names
/// before handing the connection to a socket-aware connector. The crate's own
/// [`EngineClient`](crate::engine::EngineClient) does not need it:
/// `UnixSocketConnector` decodes the host itself and never resolves it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixSocketDns;

impl tower::Service<Name> for UnixSocketDns {
    type Response = std::vec::IntoIter<SocketAddr>;
    type Error = AddressError;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, name: Name) -> Self::Future {
        ready(lookup(name.as_str()).map(|resolved| {
            resolved
                .into_iter()
                .map(|entry| SocketAddr::from((entry.address, 0)))
                .collect::<Vec<_>>()
                .into_iter()
        }))
    }
}
