use crate::config::ScanConfig;
use crate::model::{Finding, FindingCategory, Severity};
use crate::probe::ProbeCheck;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Origins no production API should ever reflect.
const HOSTILE_ORIGINS: &[&str] = &["https://evil.com", "null", "https://attacker.com"];

/// Re-requests the target with spoofed `Origin` headers and flags
/// reflected origins or wildcards in `Access-Control-Allow-Origin`.
pub struct CorsCheck;

#[async_trait]
impl ProbeCheck for CorsCheck {
    fn name(&self) -> &'static str {
        "cors"
    }

    async fn run(&self, client: &Client, url: &str, cfg: &ScanConfig) -> Result<Vec<Finding>> {
        for origin in HOSTILE_ORIGINS {
            let response = match client
                .get(url)
                .header("Origin", *origin)
                .timeout(cfg.request_timeout())
                .send()
                .await
            {
                Ok(r) => r,
                Err(_) => continue,
            };

            let allow_origin = header_value(&response, "access-control-allow-origin");
            let allow_credentials = header_value(&response, "access-control-allow-credentials");

            if let Some(finding) = evaluate(url, origin, &allow_origin, &allow_credentials) {
                // one finding per target is enough, stop at the first
                // reflected origin
                return Ok(vec![finding]);
            }
        }
        Ok(Vec::new())
    }
}

fn header_value(response: &reqwest::Response, name: &str) -> String {
    response
        .headers()
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

/// Pure decision: reflected origin or wildcard is a misconfiguration;
/// credentials alongside it escalate the severity.
pub fn evaluate(url: &str, origin: &str, allow_origin: &str, allow_credentials: &str) -> Option<Finding> {
    if !(allow_origin == "*" || allow_origin.contains(origin)) {
        return None;
    }
    let with_credentials = allow_credentials.eq_ignore_ascii_case("true");
    let severity = if with_credentials { Severity::High } else { Severity::Medium };
    Some(Finding::new(
        "CORS Misconfiguration",
        FindingCategory::Check,
        severity,
        url,
        allow_origin,
        format!("Origin {origin} reflected, Credentials: {with_credentials}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflected_origin_with_credentials_is_high() {
        let finding =
            evaluate("https://t.example", "https://evil.com", "https://evil.com", "true").unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.kind, "CORS Misconfiguration");
    }

    #[test]
    fn wildcard_without_credentials_is_medium() {
        let finding = evaluate("https://t.example", "https://evil.com", "*", "").unwrap();
        assert_eq!(finding.severity, Severity::Medium);
    }

    #[test]
    fn unrelated_origin_is_clean() {
        assert!(evaluate("https://t.example", "https://evil.com", "https://t.example", "true")
            .is_none());
        assert!(evaluate("https://t.example", "https://evil.com", "", "").is_none());
    }
}
