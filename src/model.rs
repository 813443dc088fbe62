//! Core value types shared across the fetch, extraction, probe, and
//! reporting stages. Everything here is an immutable record once built;
//! the only mutable state in a run lives in `report::Aggregator`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Coarse impact ranking for a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Parse a severity label. Unknown labels normalize to `info` so a
    /// malformed classification can never invent a sixth level downstream.
    pub fn parse(label: &str) -> Severity {
        match label.to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which result document a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingCategory {
    /// Masked credential material matched by a secret pattern.
    Secret,
    /// Result of an active probe check.
    Check,
    /// Passive content signal (technology fingerprint).
    Content,
}

impl FindingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::Secret => "secret",
            FindingCategory::Check => "check",
            FindingCategory::Content => "content",
        }
    }
}

/// A single reported security-relevant observation. Secrets are masked
/// before construction; the raw value never leaves the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Pattern name or check name, e.g. `aws_access_key` or `IDOR`.
    pub kind: String,
    pub category: FindingCategory,
    pub severity: Severity,
    pub url: String,
    /// Extracted value (masked for secrets), or the affected parameter.
    pub value: String,
    pub detail: String,
}

impl Finding {
    pub fn new(
        kind: impl Into<String>,
        category: FindingCategory,
        severity: Severity,
        url: impl Into<String>,
        value: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            category,
            severity,
            url: url.into(),
            value: value.into(),
            detail: detail.into(),
        }
    }
}

/// Why a fetch produced no scannable body. Failures are recorded, never
/// raised: a flaky target must not abort the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailure {
    Timeout,
    Connect(String),
    Request(String),
    Body(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Timeout => write!(f, "request timed out"),
            FetchFailure::Connect(msg) => write!(f, "connect failed: {msg}"),
            FetchFailure::Request(msg) => write!(f, "request failed: {msg}"),
            FetchFailure::Body(msg) => write!(f, "body read failed: {msg}"),
        }
    }
}

/// Completed fetch for one target. Exactly one of `body` / `error` is
/// populated; headers are lowercased at the boundary.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub status: Option<u16>,
    pub body: Option<String>,
    pub headers: HashMap<String, String>,
    pub error: Option<FetchFailure>,
}

impl FetchResult {
    pub fn failed(url: impl Into<String>, failure: FetchFailure) -> Self {
        Self {
            url: url.into(),
            status: None,
            body: None,
            headers: HashMap::new(),
            error: Some(failure),
        }
    }

    /// Only a 200 with a body is valid extraction input; anything else
    /// yields an empty extraction for the unit, not an error.
    pub fn is_scannable(&self) -> bool {
        self.status == Some(200) && self.body.is_some()
    }
}

/// One line that matched the interesting-keyword list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordHit {
    pub keyword: String,
    /// 1-based line number in the fetched content.
    pub line: usize,
    /// Trimmed line context, truncated to 200 characters.
    pub context: String,
}

/// Everything extracted from a single fetched unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub url: String,
    /// Unique, sorted endpoint strings.
    pub endpoints: Vec<String>,
    pub secrets: Vec<Finding>,
    pub keyword_hits: Vec<KeywordHit>,
    pub technologies: Vec<Finding>,
}

impl ExtractionResult {
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            endpoints: Vec::new(),
            secrets: Vec::new(),
            keyword_hits: Vec::new(),
            technologies: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parse_is_canonical() {
        assert_eq!(Severity::parse("critical"), Severity::Critical);
        assert_eq!(Severity::parse("HIGH"), Severity::High);
        assert_eq!(Severity::parse("bogus"), Severity::Info);
        assert_eq!(Severity::parse(""), Severity::Info);
    }

    #[test]
    fn fetch_result_scannable_only_on_200_with_body() {
        let mut r = FetchResult::failed("https://a.example", FetchFailure::Timeout);
        assert!(!r.is_scannable());
        r.error = None;
        r.status = Some(404);
        r.body = Some("not found".into());
        assert!(!r.is_scannable());
        r.status = Some(200);
        assert!(r.is_scannable());
    }
}
