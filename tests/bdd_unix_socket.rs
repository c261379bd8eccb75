//! Behavioural tests for Unix-socket hostname encoding.
//!
//! These tests validate that socket paths round-trip through synthetic
//! hostnames and that ordinary hostnames are refused.

// Test-specific lint exceptions: expect is standard practice in tests
#![expect(clippy::expect_used, reason = "expect is standard practice in tests")]

use std::net::Ipv4Addr;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use taskdock::engine::{UNIX_SOCKET_MARKER, decode_path, encode_path, lookup};

/// State shared across Unix socket scenarios.
#[derive(Default, ScenarioState)]
struct SocketState {
    /// The socket path under test.
    path: Slot<String>,
    /// The hostname under test.
    hostname: Slot<String>,
}

/// Fixture providing a fresh socket state.
#[fixture]
fn socket_state() -> SocketState {
    SocketState::default()
}

fn hostname(socket_state: &SocketState) -> String {
    socket_state
        .hostname
        .get()
        .expect("hostname should be set")
}

// Step definitions

#[given("the socket path {path}")]
fn socket_path(socket_state: &SocketState, path: String) {
    socket_state.path.set(path);
}

#[given("the hostname {name}")]
fn plain_hostname(socket_state: &SocketState, name: String) {
    socket_state.hostname.set(name);
}

#[when("the path is encoded as a hostname")]
fn path_is_encoded(socket_state: &SocketState) {
    let path = socket_state.path.get().expect("path should be set");
    socket_state.hostname.set(encode_path(&path));
}

#[then("the hostname ends with the socket marker")]
fn hostname_ends_with_marker(socket_state: &SocketState) {
    let name = hostname(socket_state);
    assert!(
        name.ends_with(UNIX_SOCKET_MARKER),
        "Expected {name} to end with {UNIX_SOCKET_MARKER}"
    );
}

#[then("decoding the hostname yields {expected}")]
fn decoding_yields(socket_state: &SocketState, expected: String) {
    let decoded = decode_path(&hostname(socket_state)).expect("hostname should decode");
    assert_eq!(decoded, expected);
}

#[then("looking up the hostname yields 0.0.0.0")]
fn lookup_yields_placeholder(socket_state: &SocketState) {
    let name = hostname(socket_state);
    let resolved = lookup(&name).expect("lookup should succeed");
    assert_eq!(resolved.len(), 1, "Expected exactly one address");
    assert!(
        resolved
            .iter()
            .all(|entry| entry.hostname == name && entry.address == Ipv4Addr::UNSPECIFIED),
        "Unexpected lookup result: {resolved:?}"
    );
}

#[then("looking up the hostname fails")]
fn lookup_fails(socket_state: &SocketState) {
    assert!(lookup(&hostname(socket_state)).is_err());
}

#[then("decoding the hostname fails")]
fn decoding_fails(socket_state: &SocketState) {
    assert!(decode_path(&hostname(socket_state)).is_err());
}

// Scenario bindings

#[scenario(
    path = "tests/features/unix_socket.feature",
    name = "Socket paths survive encoding"
)]
fn socket_paths_survive_encoding(socket_state: SocketState) {
    let _ = socket_state;
}

#[scenario(
    path = "tests/features/unix_socket.feature",
    name = "Looking up an encoded hostname yields the placeholder address"
)]
fn lookup_yields_placeholder_address(socket_state: SocketState) {
    let _ = socket_state;
}

#[scenario(
    path = "tests/features/unix_socket.feature",
    name = "Ordinary hostnames are refused"
)]
fn ordinary_hostnames_refused(socket_state: SocketState) {
    let _ = socket_state;
}
