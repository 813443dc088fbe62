use serde::Deserialize;
use std::time::Duration;

/// Tunables for one scan run. Shared read-only with workers.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Width of the bounded fetch/probe worker pool.
    pub concurrency: usize,
    /// Per-request timeout for batch fetches, in seconds.
    pub timeout_secs: u64,
    /// Run the active probe checks in addition to passive extraction.
    pub run_checks: bool,
    /// Requests issued by the rate-limit probe against a single URL.
    pub rate_limit_requests: usize,
    /// The rate-limit probe is slow by nature and gets its own, shorter
    /// per-request budget.
    pub rate_limit_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout_secs: 10,
            run_checks: false,
            rate_limit_requests: 50,
            rate_limit_timeout_secs: 5,
        }
    }
}

impl ScanConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rate_limit_timeout(&self) -> Duration {
        Duration::from_secs(self.rate_limit_timeout_secs)
    }
}
