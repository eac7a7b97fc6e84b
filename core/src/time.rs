//! Time related utils.

/// DateTime used across the quesign crates.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// The current UTC time.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Format time into ISO 8601 with separators: `2007-05-01T07:20:04Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Format time into HTTP date: `Tue, 01 May 2007 07:20:04 GMT`
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
