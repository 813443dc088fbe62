use crate::config::ScanConfig;
use crate::model::{Finding, FindingCategory, Severity};
use crate::probe::ProbeCheck;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Method};

const PROBED_METHODS: [Method; 5] =
    [Method::PUT, Method::DELETE, Method::PATCH, Method::OPTIONS, Method::TRACE];

/// Issues the write-capable and diagnostic HTTP methods against the
/// target and flags the ones a hardened endpoint should reject.
pub struct VerbTamperingCheck;

#[async_trait]
impl ProbeCheck for VerbTamperingCheck {
    fn name(&self) -> &'static str {
        "verb_tampering"
    }

    async fn run(&self, client: &Client, url: &str, cfg: &ScanConfig) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();
        for method in PROBED_METHODS {
            let response = match client
                .request(method.clone(), url)
                .timeout(cfg.request_timeout())
                .send()
                .await
            {
                Ok(r) => r,
                Err(_) => continue,
            };
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if let Some(finding) = evaluate(url, method.as_str(), status, &body) {
                findings.push(finding);
            }
        }
        Ok(findings)
    }
}

/// Pure decision per method. A success status on PUT/DELETE/PATCH is verb
/// tampering; a TRACE response reflecting the request URL is the legacy
/// cross-site-tracing issue.
pub fn evaluate(url: &str, method: &str, status: u16, body: &str) -> Option<Finding> {
    if !matches!(status, 200 | 201 | 204) {
        return None;
    }
    match method {
        "TRACE" if body.contains(url) => Some(Finding::new(
            "HTTP TRACE Enabled",
            FindingCategory::Check,
            Severity::Low,
            url,
            method,
            "TRACE method reflects request",
        )),
        "PUT" | "DELETE" | "PATCH" => Some(Finding::new(
            "Verb Tampering",
            FindingCategory::Check,
            Severity::Medium,
            url,
            method,
            format!("{method} method allowed"),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_write_methods_are_medium() {
        for method in ["PUT", "DELETE", "PATCH"] {
            let finding = evaluate("https://t.example/api", method, 200, "").unwrap();
            assert_eq!(finding.kind, "Verb Tampering");
            assert_eq!(finding.severity, Severity::Medium);
            assert_eq!(finding.detail, format!("{method} method allowed"));
        }
    }

    #[test]
    fn rejected_methods_are_clean() {
        assert!(evaluate("https://t.example/api", "PUT", 405, "").is_none());
        assert!(evaluate("https://t.example/api", "DELETE", 403, "").is_none());
    }

    #[test]
    fn trace_reflection_is_low() {
        let url = "https://t.example/api";
        let body = format!("TRACE {url} HTTP/1.1");
        let finding = evaluate(url, "TRACE", 200, &body).unwrap();
        assert_eq!(finding.kind, "HTTP TRACE Enabled");
        assert_eq!(finding.severity, Severity::Low);
    }

    #[test]
    fn trace_without_reflection_is_clean() {
        assert!(evaluate("https://t.example/api", "TRACE", 200, "ok").is_none());
    }

    #[test]
    fn options_never_raises() {
        assert!(evaluate("https://t.example/api", "OPTIONS", 200, "").is_none());
    }
}
