use std::fmt;
use thiserror::Error;

/// The error type for quesign operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    fault: Option<ServiceFault>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (missing credentials, invalid endpoint)
    ConfigInvalid,

    /// Request cannot be built or signed (missing required fields, etc.)
    RequestInvalid,

    /// Network or connection failure reported by the HTTP transport
    Transport,

    /// Response body does not match the expected shape for the operation
    ResponseInvalid,

    /// The service answered with an error response that was not recovered
    Service,

    /// Unexpected errors (I/O, encoding, etc.)
    Unexpected,
}

/// One `{code, message}` record extracted from an error response body.
///
/// A single error response may carry several of these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Service-assigned error code, e.g. `ServiceUnavailable`.
    pub code: String,
    /// Human readable description of the error.
    pub message: String,
}

/// Everything extracted from a failed service response.
///
/// Carried by [`ErrorKind::Service`] errors so callers can implement their
/// own retry policy on top of the single automatic replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFault {
    /// HTTP status code of the failed response.
    pub status: u16,
    /// Service-assigned request identifier, when present.
    pub request_id: Option<String>,
    /// All error records found in the response body.
    pub errors: Vec<ErrorRecord>,
}

impl fmt::Display for ServiceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.errors.iter().enumerate() {
            if idx != 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.code, err.message)?;
        }
        write!(f, " (status {}", self.status)?;
        if let Some(id) = &self.request_id {
            write!(f, ", request id {id}")?;
        }
        f.write_str(")")
    }
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fault: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the service fault carried by this error, if any.
    ///
    /// Only [`ErrorKind::Service`] errors carry one.
    pub fn service_fault(&self) -> Option<&ServiceFault> {
        self.fault.as_ref()
    }

    /// Check if this error is a service fault matching the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.fault
            .as_ref()
            .is_some_and(|f| f.errors.iter().any(|e| e.code == code))
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a response invalid error
    pub fn response_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResponseInvalid, message)
    }

    /// Create a service error from a fault extracted out of a failed response
    pub fn service(fault: ServiceFault) -> Self {
        let mut err = Self::new(ErrorKind::Service, fault.to_string());
        err.fault = Some(fault);
        err
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Transport => write!(f, "transport failure"),
            ErrorKind::ResponseInvalid => write!(f, "invalid response"),
            ErrorKind::Service => write!(f, "service error"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_service_fault_display() {
        let fault = ServiceFault {
            status: 503,
            request_id: Some("b0d1d2af-1e0c".to_string()),
            errors: vec![
                ErrorRecord {
                    code: "ServiceUnavailable".to_string(),
                    message: "Service AmazonSQS is currently unavailable".to_string(),
                },
                ErrorRecord {
                    code: "InternalError".to_string(),
                    message: "internal service error".to_string(),
                },
            ],
        };

        assert_eq!(
            fault.to_string(),
            "ServiceUnavailable: Service AmazonSQS is currently unavailable; \
             InternalError: internal service error (status 503, request id b0d1d2af-1e0c)"
        );
    }

    #[test]
    fn test_service_error_carries_fault() {
        let fault = ServiceFault {
            status: 400,
            request_id: None,
            errors: vec![ErrorRecord {
                code: "AccessDenied".to_string(),
                message: "Access to the resource is denied.".to_string(),
            }],
        };

        let err = Error::service(fault.clone());
        assert_eq!(err.kind(), ErrorKind::Service);
        assert_eq!(err.service_fault(), Some(&fault));
        assert!(err.has_code("AccessDenied"));
        assert!(!err.has_code("ServiceUnavailable"));
    }
}
