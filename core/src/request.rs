use crate::Result;
use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

/// A ready-to-send, signed request descriptor.
///
/// This is the value a service crate produces from an operation and hands to
/// the transport. It is deliberately `Clone`: the retry layer replays the
/// exact same signed bytes when it decides a fault was transient, without
/// re-canonicalizing or re-signing.
#[derive(Clone, Debug)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: Method,
    /// Full request URI, including the signed query string if any.
    pub uri: Uri,
    /// HTTP headers, including the `Authorization` header if any.
    pub headers: HeaderMap,
    /// Request body; empty for bodyless requests.
    pub body: Bytes,
}

impl SignedRequest {
    /// Render the descriptor as an `http::Request` for the transport.
    ///
    /// Building never mutates the descriptor, so a retry can call this again
    /// on the same value.
    pub fn to_http(&self) -> Result<http::Request<Bytes>> {
        let mut req = http::Request::builder()
            .method(self.method.clone())
            .uri(self.uri.clone())
            .body(self.body.clone())?;
        *req.headers_mut() = self.headers.clone();

        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_http_is_repeatable() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "text/plain".parse().unwrap());

        let signed = SignedRequest {
            method: Method::PUT,
            uri: "https://queue.example.com/acct/q/back".parse().unwrap(),
            headers,
            body: Bytes::from_static(b"hello"),
        };

        let first = signed.to_http().unwrap();
        let second = signed.to_http().unwrap();

        assert_eq!(first.method(), second.method());
        assert_eq!(first.uri(), second.uri());
        assert_eq!(first.headers(), second.headers());
        assert_eq!(first.body(), second.body());
    }
}
