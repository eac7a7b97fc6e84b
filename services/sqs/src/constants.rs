/// Version of the queue service wire API.
pub const API_VERSION: &str = "2007-05-01";

/// Version of the query-string signature scheme.
pub const SIGNATURE_VERSION: &str = "1";

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://queue.amazonaws.com";

/// How long a signed query request stays acceptable to the service, in seconds.
pub const REQUEST_TTL: i64 = 30;

/// Visibility timeout (seconds) applied when the caller does not pick one.
pub const DEFAULT_VISIBILITY_TIMEOUT: u64 = 30;

/// Content type carried on every REST request.
pub const REST_CONTENT_TYPE: &str = "text/plain";

/// Protocol-version header on REST requests.
pub const AWS_VERSION: &str = "aws-version";

/// Error signatures that mark a fault as service-side and transient.
///
/// An unmodified replay of the request is expected to succeed when the error
/// code or message contains one of these, compared case-insensitively.
pub const DEFAULT_SERVICE_PROBLEMS: &[&str] = &[
    "internal service error",
    "is currently unavailable",
    "no response from",
];

// Env value for config loading.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const QUESIGN_SQS_ENDPOINT: &str = "QUESIGN_SQS_ENDPOINT";
