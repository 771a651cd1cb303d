//! Admin API and submission configuration

use std::time::Duration;

/// Status id assigned to new return requests unless configured otherwise.
pub const DEFAULT_RETURN_STATUS_ID: i64 = 4;

/// Connection settings for the admin REST backend.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Backend base URL (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub default_status_id: i64,
    pub submission: SubmissionOptions,
}

/// Knobs for the evidence-upload leg of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOptions {
    pub evidence_max_attempts: u32,
    pub evidence_retry_delay: Duration,
}

impl Default for SubmissionOptions {
    fn default() -> Self {
        Self { evidence_max_attempts: 3, evidence_retry_delay: Duration::from_millis(500) }
    }
}

impl AdminConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: 30,
            default_status_id: DEFAULT_RETURN_STATUS_ID,
            submission: SubmissionOptions::default(),
        }
    }

    /// Reads `ADMIN_API_*`, `RETURN_DEFAULT_STATUS_ID` and `EVIDENCE_*` variables,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let submission = SubmissionOptions {
            evidence_max_attempts: env_parse("EVIDENCE_MAX_ATTEMPTS").unwrap_or(defaults.submission.evidence_max_attempts).max(1),
            evidence_retry_delay: env_parse("EVIDENCE_RETRY_DELAY_MS").map(Duration::from_millis).unwrap_or(defaults.submission.evidence_retry_delay),
        };
        Self {
            base_url: std::env::var("ADMIN_API_BASE_URL").unwrap_or(defaults.base_url),
            token: std::env::var("ADMIN_API_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout_secs: env_parse("ADMIN_API_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
            default_status_id: env_parse("RETURN_DEFAULT_STATUS_ID").unwrap_or(defaults.default_status_id),
            submission,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    pub fn with_submission(mut self, submission: SubmissionOptions) -> Self {
        self.submission = submission;
        self
    }

    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AdminConfig::new("http://admin.local").with_token("t0k").with_timeout(5);
        assert_eq!(config.base_url, "http://admin.local");
        assert_eq!(config.token.as_deref(), Some("t0k"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.default_status_id, DEFAULT_RETURN_STATUS_ID);
        assert_eq!(config.submission.evidence_max_attempts, 3);
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        std::env::set_var("OPENSASE_RETURNS_TEST_NUM", " 12 ");
        std::env::set_var("OPENSASE_RETURNS_TEST_BAD", "twelve");
        assert_eq!(env_parse::<u64>("OPENSASE_RETURNS_TEST_NUM"), Some(12));
        assert_eq!(env_parse::<u64>("OPENSASE_RETURNS_TEST_BAD"), None);
        assert_eq!(env_parse::<u64>("OPENSASE_RETURNS_TEST_UNSET"), None);
    }
    #[test]
    fn test_from_env_floors_attempts_and_ignores_empty_token() {
        std::env::set_var("EVIDENCE_MAX_ATTEMPTS", "0");
        std::env::set_var("ADMIN_API_TOKEN", "");
        std::env::set_var("RETURN_DEFAULT_STATUS_ID", "6");
        let config = AdminConfig::from_env();
        std::env::remove_var("EVIDENCE_MAX_ATTEMPTS");
        std::env::remove_var("ADMIN_API_TOKEN");
        std::env::remove_var("RETURN_DEFAULT_STATUS_ID");

        assert_eq!(config.submission.evidence_max_attempts, 1);
        assert_eq!(config.token, None);
        assert_eq!(config.default_status_id, 6);
    }
}
