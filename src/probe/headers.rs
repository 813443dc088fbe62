use crate::config::ScanConfig;
use crate::fetch::header_map;
use crate::model::{Finding, FindingCategory, Severity};
use crate::probe::ProbeCheck;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Hardening headers every response is expected to carry.
pub const REQUIRED_HEADERS: &[&str] = &[
    "X-Frame-Options",
    "X-Content-Type-Options",
    "Strict-Transport-Security",
    "Content-Security-Policy",
    "X-XSS-Protection",
];

/// Single-fetch audit for missing security headers.
pub struct SecurityHeadersCheck;

#[async_trait]
impl ProbeCheck for SecurityHeadersCheck {
    fn name(&self) -> &'static str {
        "security_headers"
    }

    async fn run(&self, client: &Client, url: &str, cfg: &ScanConfig) -> Result<Vec<Finding>> {
        let response = client.get(url).timeout(cfg.request_timeout()).send().await?;
        let headers = header_map(response.headers());
        Ok(audit(url, &headers).into_iter().collect())
    }
}

/// Pure audit over a lowercased header map: all omissions collapse into a
/// single low-severity finding listing the missing names.
pub fn audit(url: &str, headers: &HashMap<String, String>) -> Option<Finding> {
    let missing: SmallVec<[&str; 5]> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|name| !headers.contains_key(&name.to_ascii_lowercase()))
        .collect();

    if missing.is_empty() {
        return None;
    }
    Some(Finding::new(
        "Missing Security Headers",
        FindingCategory::Check,
        Severity::Low,
        url,
        "",
        format!("Missing: {}", missing.join(", ")),
    ))
}
