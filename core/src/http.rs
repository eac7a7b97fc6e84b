use crate::{Error, Result};
use bytes::Bytes;
use std::fmt::Debug;

/// HttpSend is the boundary to the external HTTP transport.
///
/// The engine only needs one synchronous operation: execute a request and
/// hand back the full response, or fail with a transport error. Status-code
/// interpretation stays on the engine side so it can branch between
/// parsing-as-success and parsing-as-error.
///
/// Implementations are expected to reuse connections across calls; how they
/// do that (a pool, one connection per calling thread) is up to them.
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send an http request and return the response.
    ///
    /// An `Err` here means the request never completed at the HTTP level,
    /// e.g. a connection failure. A response with a non-success status is
    /// still `Ok`.
    fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// NoopHttpSend is a no-op implementation that always returns an error.
///
/// This is used when no HTTP client is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

impl HttpSend for NoopHttpSend {
    fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(
            "HTTP sending not supported: no HTTP client configured",
        ))
    }
}
