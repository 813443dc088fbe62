//! Run-level aggregation.
//!
//! The `Aggregator` is the only mutable state in a scan and has a single
//! logical owner: the driver folds completed, immutable per-unit results
//! into it as they arrive off the completion channels. Workers never touch
//! it, so no locking is needed. The fold is commutative — completion order
//! never changes the finalized report.

pub mod writers;

use crate::model::{ExtractionResult, Finding, Severity};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A keyword hit annotated with the unit it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestingLine {
    pub url: String,
    pub keyword: String,
    pub line: usize,
    pub context: String,
}

/// Immutable snapshot of a finished run, the document handed to the
/// report/notification boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub units_scanned: usize,
    pub findings_total: usize,
    pub by_severity: BTreeMap<String, usize>,
    pub by_kind: BTreeMap<String, usize>,
    pub findings: Vec<Finding>,
    /// Exact-string deduplicated, sorted for reproducibility.
    pub endpoints: Vec<String>,
    pub interesting_lines: Vec<InterestingLine>,
}

impl RunReport {
    /// Flat key→count map for the notification layer: total plus every
    /// canonical severity, zero-filled.
    pub fn summary_counters(&self) -> BTreeMap<String, usize> {
        let mut counters = BTreeMap::new();
        counters.insert("total".to_string(), self.findings_total);
        for severity in Severity::ALL {
            let count = self.by_severity.get(severity.as_str()).copied().unwrap_or(0);
            counters.insert(severity.as_str().to_string(), count);
        }
        counters
    }
}

/// Single-owner reducer for per-unit results.
#[derive(Default)]
pub struct Aggregator {
    units: usize,
    by_severity: BTreeMap<String, usize>,
    by_kind: BTreeMap<String, usize>,
    endpoints: BTreeSet<String>,
    findings: Vec<Finding>,
    interesting: Vec<InterestingLine>,
    seen_findings: AHashSet<String>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one unit's extraction: endpoints, secrets, technology
    /// findings, and keyword hits. Bumps the processed-unit count.
    pub fn fold_extraction(&mut self, extraction: ExtractionResult) {
        self.units += 1;
        self.endpoints.extend(extraction.endpoints);
        for finding in extraction.secrets {
            self.push_finding(finding);
        }
        for finding in extraction.technologies {
            self.push_finding(finding);
        }
        for hit in extraction.keyword_hits {
            self.interesting.push(InterestingLine {
                url: extraction.url.clone(),
                keyword: hit.keyword,
                line: hit.line,
                context: hit.context,
            });
        }
    }

    /// Fold a batch of probe findings for one target.
    pub fn fold_findings(&mut self, findings: Vec<Finding>) {
        for finding in findings {
            self.push_finding(finding);
        }
    }

    fn push_finding(&mut self, finding: Finding) {
        let key = format!(
            "{}\x1f{}\x1f{}\x1f{}",
            finding.kind, finding.url, finding.value, finding.detail
        );
        if !self.seen_findings.insert(key) {
            return;
        }
        *self.by_severity.entry(finding.severity.as_str().to_string()).or_insert(0) += 1;
        *self.by_kind.entry(finding.kind.clone()).or_insert(0) += 1;
        self.findings.push(finding);
    }

    /// Produce the immutable run snapshot. Consumes the aggregator, so no
    /// fold can happen after finalization.
    pub fn finalize(self) -> RunReport {
        RunReport {
            units_scanned: self.units,
            findings_total: self.findings.len(),
            by_severity: self.by_severity,
            by_kind: self.by_kind,
            findings: self.findings,
            endpoints: self.endpoints.into_iter().collect(),
            interesting_lines: self.interesting,
        }
    }
}
