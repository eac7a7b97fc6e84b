//! HTTP transport for quesign backed by `reqwest::blocking`.
//!
//! The blocking client keeps a connection pool internally, so every caller
//! gets a reusable connection without the engine managing any per-thread
//! transport state itself.

use bytes::Bytes;
use quesign_core::{Error, HttpSend, Result};
use reqwest::blocking::{Client, Request};

/// HttpSend implementation over a shared `reqwest::blocking::Client`.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a preconfigured client.
    ///
    /// Use this to control timeouts, proxies or TLS settings; `default()`
    /// works for everything else.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl HttpSend for ReqwestHttpSend {
    fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("request rejected by transport").with_source(e))?;

        let resp = self
            .client
            .execute(req)
            .map_err(|e| Error::transport("http request failed").with_source(e))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;

        let mut resp = http::Response::builder().status(status).body(body)?;
        *resp.headers_mut() = headers;

        Ok(resp)
    }
}
