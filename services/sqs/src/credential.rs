use quesign_core::utils::Redact;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key and secret key.
///
/// Immutable for the client's lifetime.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for the queue service.
    pub access_key_id: String,
    /// Secret access key for the queue service.
    pub secret_access_key: String,
}

impl Credential {
    /// Create a credential from an access key pair.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
        }
    }

    /// Check if the credential is usable: neither half may be blank.
    pub fn is_valid(&self) -> bool {
        !self.access_key_id.trim().is_empty() && !self.secret_access_key.trim().is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(Credential::new("AKID", "secret").is_valid());
        assert!(!Credential::new("", "secret").is_valid());
        assert!(!Credential::new("AKID", "").is_valid());
        assert!(!Credential::new("  ", "secret").is_valid());
        assert!(!Credential::default().is_valid());
    }

    #[test]
    fn test_debug_is_redacted() {
        let cred = Credential::new("AKIDEXAMPLEKEY", "hgTHt68JY07JKUY08ftHYtERkjgtfERn");
        let out = format!("{cred:?}");
        assert!(!out.contains("hgTHt68JY07JKUY08ftHYtERkjgtfERn"));
        assert!(out.contains("AKI***KEY"));
    }
}
