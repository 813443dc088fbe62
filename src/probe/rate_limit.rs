use crate::config::ScanConfig;
use crate::model::{Finding, FindingCategory, Severity};
use crate::probe::ProbeCheck;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Fraction of requests that must succeed before the absence of rate
/// limiting is flagged: 90%.
const SUCCESS_THRESHOLD_PERCENT: usize = 90;

/// Hammers one URL with sequential GETs and flags targets that never
/// start throttling. Inherently slow, so it runs on its own shorter
/// per-request budget instead of the batch fetch timeout.
pub struct RateLimitCheck;

#[async_trait]
impl ProbeCheck for RateLimitCheck {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    async fn run(&self, client: &Client, url: &str, cfg: &ScanConfig) -> Result<Vec<Finding>> {
        let total = cfg.rate_limit_requests;
        let mut succeeded = 0usize;
        for _ in 0..total {
            let response = client.get(url).timeout(cfg.rate_limit_timeout()).send().await?;
            if response.status().as_u16() == 200 {
                succeeded += 1;
            }
        }
        Ok(evaluate(url, succeeded, total).into_iter().collect())
    }
}

/// Pure threshold decision with the success ratio in the detail.
pub fn evaluate(url: &str, succeeded: usize, total: usize) -> Option<Finding> {
    if total == 0 || succeeded * 100 < total * SUCCESS_THRESHOLD_PERCENT {
        return None;
    }
    Some(Finding::new(
        "No Rate Limiting",
        FindingCategory::Check,
        Severity::Medium,
        url,
        "",
        format!("{succeeded}/{total} requests succeeded"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_success_run_is_flagged_with_ratio_detail() {
        let finding = evaluate("https://t.example/api", 50, 50).unwrap();
        assert_eq!(finding.kind, "No Rate Limiting");
        assert_eq!(finding.severity, Severity::Medium);
        assert_eq!(finding.detail, "50/50 requests succeeded");
    }

    #[test]
    fn ninety_percent_is_the_boundary() {
        assert!(evaluate("u", 45, 50).is_some());
        assert!(evaluate("u", 44, 50).is_none());
    }

    #[test]
    fn zero_requests_never_flags() {
        assert!(evaluate("u", 0, 0).is_none());
    }
}
