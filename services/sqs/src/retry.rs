//! Error classification for failed responses.
//!
//! A failed response body is consumed with the same streaming mechanism as a
//! success, just with the error-shaped table. The extracted fault is then
//! matched against the client's transient signatures to decide whether the
//! dispatcher may replay the request.

use crate::parse::ErrorResponseParser;
use bytes::Bytes;
use quesign_core::{parse_xml, Result, ServiceFault};

/// Extract every error record and the request id out of a failed response.
pub(crate) fn extract_fault(resp: &http::Response<Bytes>) -> Result<ServiceFault> {
    let mut parser = ErrorResponseParser::default();
    parse_xml(resp.body(), &mut parser)?;

    Ok(ServiceFault {
        status: resp.status().as_u16(),
        request_id: parser.request_id,
        errors: parser.errors,
    })
}

/// Check whether a fault matches any known transient signature.
///
/// Signatures match as case-insensitive substrings of an error record's code
/// or message.
pub(crate) fn is_transient(fault: &ServiceFault, problems: &[String]) -> bool {
    fault.errors.iter().any(|err| {
        let code = err.code.to_lowercase();
        let message = err.message.to_lowercase();
        problems.iter().any(|problem| {
            let problem = problem.to_lowercase();
            code.contains(&problem) || message.contains(&problem)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quesign_core::ErrorRecord;

    fn fault(code: &str, message: &str) -> ServiceFault {
        ServiceFault {
            status: 500,
            request_id: None,
            errors: vec![ErrorRecord {
                code: code.to_string(),
                message: message.to_string(),
            }],
        }
    }

    fn problems() -> Vec<String> {
        crate::constants::DEFAULT_SERVICE_PROBLEMS
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_matches_on_message() {
        let f = fault(
            "ServiceUnavailable",
            "Service AmazonSQS is currently unavailable. Please try again later.",
        );
        assert!(is_transient(&f, &problems()));
    }

    #[test]
    fn test_matches_on_code_case_insensitively() {
        let f = fault("ServiceUnavailable", "");
        assert!(is_transient(&f, &["SERVICE".to_string()]));
    }

    #[test]
    fn test_matches_on_message_case_insensitively() {
        let f = fault("", "NO RESPONSE FROM server");
        assert!(is_transient(&f, &problems()));
    }

    #[test]
    fn test_no_match_is_permanent() {
        let f = fault("AccessDenied", "Access to the resource is denied.");
        assert!(!is_transient(&f, &problems()));
    }

    #[test]
    fn test_any_record_can_match() {
        let f = ServiceFault {
            status: 500,
            request_id: None,
            errors: vec![
                ErrorRecord {
                    code: "AccessDenied".to_string(),
                    message: "Access to the resource is denied.".to_string(),
                },
                ErrorRecord {
                    code: "InternalError".to_string(),
                    message: "We encountered an internal service error.".to_string(),
                },
            ],
        };
        assert!(is_transient(&f, &problems()));
    }
}
