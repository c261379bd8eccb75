//! HTTP over a Unix socket, addressed through synthetic hostnames.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use http_body_util::Empty;
use hyper::Uri;
use hyper::body::{Bytes, Incoming};
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioIo};
use tokio::net::UnixStream;
use tracing::debug;

use super::error_classification::classify_request_error;
use crate::engine::{decode_path, encode_path};
use crate::error::ContainerError;

/// Connector that opens the Unix socket named by the request's host.
///
/// The host must be a synthetic socket hostname produced by
/// [`encode_path`]; any other host is refused with
/// `io::ErrorKind::InvalidInput` before any I/O happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixSocketConnector;

impl tower::Service<Uri> for UnixSocketConnector {
    type Response = TokioIo<UnixStream>;
    type Error = io::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let socket_path = uri
            .host()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "request URI has no host"))
            .and_then(|host| {
                decode_path(host).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
            });

        Box::pin(async move {
            let path = socket_path?;
            debug!(%path, "connecting to engine socket");
            let stream = UnixStream::connect(&path).await?;
            Ok(TokioIo::new(stream))
        })
    }
}

/// HTTP client bound to one container engine socket.
#[derive(Debug, Clone)]
pub struct EngineClient {
    client: Client<UnixSocketConnector, Empty<Bytes>>,
    socket_path: PathBuf,
    hostname: String,
}

impl EngineClient {
    /// Creates a client for the socket at `socket_path`.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ConnectionFailed` if the path is not valid
    /// UTF-8 and so cannot be carried in a hostname.
    pub fn new(socket_path: impl Into<PathBuf>) -> Result<Self, ContainerError> {
        let path = socket_path.into();
        let hostname = path
            .to_str()
            .map(encode_path)
            .ok_or_else(|| ContainerError::ConnectionFailed {
                message: format!("socket path {} is not valid UTF-8", path.display()),
            })?;

        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build(UnixSocketConnector),
            socket_path: path,
            hostname,
        })
    }

    /// The socket this client connects to.
    #[must_use]
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// The synthetic hostname requests are addressed to.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Builds the request URI for an API path such as `/_ping`.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `path` is not a valid URI path.
    pub fn uri(&self, path: &str) -> Result<Uri, hyper::http::uri::InvalidUri> {
        format!("http://{}{path}", self.hostname).parse()
    }

    /// Sends a `GET` request for `path`.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::SocketNotFound` or
    /// `ContainerError::PermissionDenied` when the socket cannot be opened
    /// for those reasons, and `ContainerError::ConnectionFailed` for any
    /// other request failure.
    pub async fn get(&self, path: &str) -> Result<hyper::Response<Incoming>, ContainerError> {
        let uri = self.uri(path).map_err(|e| ContainerError::ConnectionFailed {
            message: format!("invalid request path '{path}': {e}"),
        })?;

        self.client
            .get(uri)
            .await
            .map_err(|e| classify_request_error(&e, &self.socket_path))
    }
}
