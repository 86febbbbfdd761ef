//! Client configuration.

use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_NUM_RETRIES: u32 = 5000;

/// Per-client settings.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use thematic_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .poll_interval(Duration::from_millis(500))
///     .num_retries(10)
///     .log_requests(true)
///     .build();
/// assert_eq!(config.num_retries(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Timeout applied to every HTTP request.
    timeout: Duration,
    /// Sleep between job status polls.
    poll_interval: Duration,
    /// Consecutive status fetch failures tolerated while waiting on a job.
    num_retries: u32,
    /// Log every request URL at `info` instead of `debug`.
    log_requests: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            num_retries: DEFAULT_NUM_RETRIES,
            log_requests: false,
        }
    }
}

impl ClientConfig {
    /// Create a new builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `THEMATIC_TIMEOUT_SECS`: request timeout in seconds
    /// - `THEMATIC_POLL_INTERVAL_MS`: poll interval in milliseconds
    /// - `THEMATIC_NUM_RETRIES`: tolerated consecutive poll failures
    /// - `THEMATIC_LOG_REQUESTS`: "true" or "1" to log request URLs
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let timeout = lookup("THEMATIC_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let poll_interval = lookup("THEMATIC_POLL_INTERVAL_MS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);

        let num_retries = lookup("THEMATIC_NUM_RETRIES")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(defaults.num_retries);

        let log_requests = lookup("THEMATIC_LOG_REQUESTS")
            .map(|s| s.eq_ignore_ascii_case("true") || s == "1")
            .unwrap_or(defaults.log_requests);

        Self {
            timeout,
            poll_interval,
            num_retries,
            log_requests,
        }
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the poll interval.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Get the poll retry budget.
    pub fn num_retries(&self) -> u32 {
        self.num_retries
    }

    /// Check if request URLs are logged at `info`.
    pub fn log_requests(&self) -> bool {
        self.log_requests
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    num_retries: Option<u32>,
    log_requests: Option<bool>,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the sleep between job status polls.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Set how many consecutive status fetch failures a wait tolerates.
    pub fn num_retries(mut self, retries: u32) -> Self {
        self.num_retries = Some(retries);
        self
    }

    /// Log request URLs at `info`.
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = Some(enabled);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            poll_interval: self.poll_interval.unwrap_or(defaults.poll_interval),
            num_retries: self.num_retries.unwrap_or(defaults.num_retries),
            log_requests: self.log_requests.unwrap_or(defaults.log_requests),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.num_retries(), 5000);
        assert!(!config.log_requests());
    }

    #[test]
    fn test_builder_overrides_only_given_fields() {
        let config = ClientConfig::builder()
            .poll_interval(Duration::from_millis(10))
            .build();
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.num_retries(), DEFAULT_NUM_RETRIES);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("THEMATIC_TIMEOUT_SECS", "5"),
            ("THEMATIC_POLL_INTERVAL_MS", "250"),
            ("THEMATIC_NUM_RETRIES", "3"),
            ("THEMATIC_LOG_REQUESTS", "TRUE"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.num_retries(), 3);
        assert!(config.log_requests());
    }

    #[test]
    fn test_from_lookup_ignores_garbage() {
        let config = ClientConfig::from_lookup(|k| match k {
            "THEMATIC_NUM_RETRIES" => Some("lots".to_string()),
            "THEMATIC_LOG_REQUESTS" => Some("nope".to_string()),
            _ => None,
        });
        assert_eq!(config, ClientConfig::default());
    }
}
