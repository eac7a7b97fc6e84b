use super::constants::*;
use quesign_core::utils::Redact;
use std::fmt::{Debug, Formatter};

/// Config carries all the configuration for the queue service client.
#[derive(Clone)]
pub struct Config {
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// Service endpoint, scheme and authority only.
    ///
    /// - defaults to [`DEFAULT_ENDPOINT`]
    /// - env value: [`QUESIGN_SQS_ENDPOINT`]
    pub endpoint: String,
    /// Error signatures treated as transient service faults.
    ///
    /// Owned by the client built from this config; replace the list here to
    /// change what the retry layer recovers from.
    pub service_problems: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_key_id: None,
            secret_access_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            service_problems: DEFAULT_SERVICE_PROBLEMS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load config values from the process environment.
    pub fn from_env(mut self) -> Self {
        if let Ok(v) = std::env::var(AWS_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Ok(v) = std::env::var(AWS_SECRET_ACCESS_KEY) {
            self.secret_access_key.get_or_insert(v);
        }
        if let Ok(v) = std::env::var(QUESIGN_SQS_ENDPOINT) {
            self.endpoint = v;
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("endpoint", &self.endpoint)
            .field("service_problems", &self.service_problems)
            .finish()
    }
}
