use crate::constants::*;
use crate::Credential;
use bytes::Bytes;
use chrono::TimeDelta;
use http::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use http::uri::PathAndQuery;
use http::{HeaderMap, HeaderValue, Method, Uri};
use log::debug;
use percent_encoding::percent_decode_str;
use quesign_core::hash::base64_hmac_sha1;
use quesign_core::time::{format_http_date, format_iso8601, now, DateTime};
use quesign_core::{Error, Result, SignedRequest};

/// RequestBuilder canonicalizes and signs operations for both wire protocols.
///
/// - Query protocol: `GET {resource-path}?{sorted-and-signed-query-string}`
///   with signature version 1 (base64 HMAC-SHA1 over the sorted parameter
///   concatenation) attached as the `Signature` parameter.
/// - REST protocol: caller-specified verb against the resource path, with
///   the signature over the fixed 5-line canonical string attached as the
///   `Authorization` header.
///
/// Building is referentially transparent given the same inputs and clock;
/// nothing here mutates shared state.
#[derive(Debug)]
pub(crate) struct RequestBuilder {
    endpoint: Uri,

    time: Option<DateTime>,
}

impl RequestBuilder {
    /// Create a builder for the given endpoint (scheme and authority only).
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint: Uri = endpoint.parse()?;
        if endpoint.scheme().is_none() || endpoint.authority().is_none() {
            return Err(Error::config_invalid(format!(
                "endpoint must carry a scheme and host: {endpoint}"
            )));
        }

        Ok(Self {
            endpoint,
            time: None,
        })
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Build a signed query-protocol request for `action`.
    ///
    /// `queue_url` is the out-of-band target resource: its path becomes the
    /// request path but it never appears in the signed parameter set.
    pub fn query(
        &self,
        cred: &Credential,
        action: &str,
        queue_url: Option<&str>,
        params: &[(&str, Option<String>)],
    ) -> Result<SignedRequest> {
        let time = self.time.unwrap_or_else(now);
        let path = resource_path(queue_url)?;
        let expires = format_iso8601(time + TimeDelta::seconds(REQUEST_TTL));

        // Merge caller parameters with the control fields. Optional entries
        // with no value were already dropped and never reach the wire.
        let mut entries = filter_params(params);
        entries.push(("Action".to_string(), action.to_string()));
        entries.push(("Expires".to_string(), expires));
        entries.push(("AWSAccessKeyId".to_string(), cred.access_key_id.clone()));
        entries.push(("Version".to_string(), API_VERSION.to_string()));
        entries.push(("SignatureVersion".to_string(), SIGNATURE_VERSION.to_string()));

        let canonical = canonical_query_form(&mut entries);
        debug!("canonical form for {action}: {canonical}");
        let signature = base64_hmac_sha1(cred.secret_access_key.as_bytes(), canonical.as_bytes());

        let mut query = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &entries {
            query.append_pair(k, v);
        }
        query.append_pair("Signature", &signature);

        Ok(SignedRequest {
            method: Method::GET,
            uri: self.uri_for(&path, Some(&query.finish()))?,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        })
    }

    /// Build a signed REST-protocol request against `queue_url`.
    ///
    /// Parameters ride along as an unsigned query string; only the method,
    /// fixed headers and decoded resource path are covered by the signature.
    pub fn rest(
        &self,
        cred: &Credential,
        method: Method,
        queue_url: &str,
        params: &[(&str, Option<String>)],
        body: Option<Bytes>,
    ) -> Result<SignedRequest> {
        let time = self.time.unwrap_or_else(now);
        let path = resource_path(Some(queue_url))?;
        let date = format_http_date(time);

        let entries = filter_params(params);
        let query = if entries.is_empty() {
            None
        } else {
            let mut q = form_urlencoded::Serializer::new(String::new());
            for (k, v) in &entries {
                q.append_pair(k, v);
            }
            Some(q.finish())
        };

        let string_to_sign = rest_string_to_sign(&method, &date, &path);
        debug!("string to sign: {string_to_sign}");
        let signature =
            base64_hmac_sha1(cred.secret_access_key.as_bytes(), string_to_sign.as_bytes());

        let mut headers = HeaderMap::new();
        headers.insert("content-md5", HeaderValue::from_static(""));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(REST_CONTENT_TYPE));
        headers.insert(DATE, date.parse()?);
        headers.insert(AWS_VERSION, HeaderValue::from_static(API_VERSION));
        headers.insert(AUTHORIZATION, {
            let mut value: HeaderValue =
                format!("AWS {}:{}", cred.access_key_id, signature).parse()?;
            value.set_sensitive(true);

            value
        });

        Ok(SignedRequest {
            method,
            uri: self.uri_for(&path, query.as_deref())?,
            headers,
            body: body.unwrap_or_default(),
        })
    }

    fn uri_for(&self, path: &str, query: Option<&str>) -> Result<Uri> {
        let paq = match query {
            Some(q) => format!("{path}?{q}"),
            None => path.to_string(),
        };

        let mut parts = self.endpoint.clone().into_parts();
        parts.path_and_query = Some(paq.parse::<PathAndQuery>()?);

        Ok(Uri::from_parts(parts)?)
    }
}

/// Render the merged parameter set into the exact string that gets signed.
///
/// Signature version 1: entries sort by key compared case-insensitively, and
/// the canonical form is each key immediately followed by its value with no
/// separators. This string itself is signed, not a digest of it.
fn canonical_query_form(entries: &mut [(String, String)]) -> String {
    entries.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));

    let mut s = String::with_capacity(128);
    for (k, v) in entries.iter() {
        s.push_str(k);
        s.push_str(v);
    }

    s
}

/// Construct the REST string to sign.
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// decoded-resource-path
/// ```
///
/// Content-MD5 is always empty: no body checksum is computed in this
/// protocol. The resource path is signed percent-decoded.
fn rest_string_to_sign(method: &Method, date: &str, path: &str) -> String {
    let decoded_path = percent_decode_str(path).decode_utf8_lossy();

    format!("{method}\n\n{REST_CONTENT_TYPE}\n{date}\n{decoded_path}")
}

/// Drop optional parameters that carry no value.
fn filter_params(params: &[(&str, Option<String>)]) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(k, v)| match v {
            Some(v) if !v.is_empty() => Some((k.to_string(), v.clone())),
            _ => None,
        })
        .collect()
}

/// Path portion of a queue's address, `/` when no resource is given.
fn resource_path(queue_url: Option<&str>) -> Result<String> {
    let Some(url) = queue_url else {
        return Ok("/".to_string());
    };
    let uri: Uri = url.parse()?;

    Ok(uri.path().to_string())
}
