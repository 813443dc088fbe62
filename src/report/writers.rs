//! Flat-file output boundary: one JSON document per scan category, the
//! full run report, the deduplicated endpoint list, and a CSV export.

use crate::model::{Finding, FindingCategory};
use crate::report::RunReport;
use crate::utils::ensure_dir;
use anyhow::Result;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Write every result artifact under `out_dir`.
pub fn write_reports(report: &RunReport, out_dir: &Path) -> Result<()> {
    ensure_dir(out_dir)?;

    write_json(&out_dir.join("report.json"), &serde_json::to_value(report)?)?;
    write_json(&out_dir.join("secrets.json"), &secrets_document(report))?;
    write_json(&out_dir.join("checks.json"), &checks_document(report))?;
    write_json(&out_dir.join("content.json"), &content_document(report))?;
    write_endpoints(report, &out_dir.join("endpoints.txt"))?;
    write_findings_csv(report, &out_dir.join("findings.csv"))?;

    Ok(())
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn in_category<'r>(report: &'r RunReport, category: FindingCategory) -> Vec<&'r Finding> {
    report.findings.iter().filter(|f| f.category == category).collect()
}

fn severity_counts(findings: &[&Finding]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for finding in findings {
        *counts.entry(finding.severity.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

fn kind_counts(findings: &[&Finding]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for finding in findings {
        *counts.entry(finding.kind.clone()).or_insert(0) += 1;
    }
    counts
}

fn secrets_document(report: &RunReport) -> serde_json::Value {
    let secrets = in_category(report, FindingCategory::Secret);
    json!({
        "urls_scanned": report.units_scanned,
        "secrets_found": secrets.len(),
        "by_severity": severity_counts(&secrets),
        "secrets": secrets,
    })
}

fn checks_document(report: &RunReport) -> serde_json::Value {
    let checks = in_category(report, FindingCategory::Check);
    json!({
        "urls_checked": report.units_scanned,
        "findings": checks.len(),
        "by_type": kind_counts(&checks),
        "vulnerabilities": checks,
    })
}

fn content_document(report: &RunReport) -> serde_json::Value {
    let technologies = in_category(report, FindingCategory::Content);
    json!({
        "files_processed": report.units_scanned,
        "total_endpoints": report.endpoints.len(),
        "endpoints": report.endpoints,
        "technologies": technologies,
        "interesting_lines": report.interesting_lines,
    })
}

/// One endpoint per line, already deduplicated and sorted by the
/// aggregator.
fn write_endpoints(report: &RunReport, path: &Path) -> Result<()> {
    let mut body = report.endpoints.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(path, body)?;
    Ok(())
}

fn write_findings_csv(report: &RunReport, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["kind", "category", "severity", "url", "value", "detail"])?;
    for finding in &report.findings {
        writer.write_record([
            finding.kind.as_str(),
            finding.category.as_str(),
            finding.severity.as_str(),
            finding.url.as_str(),
            finding.value.as_str(),
            finding.detail.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Finding, FindingCategory, Severity};
    use crate::report::Aggregator;

    fn sample_report() -> RunReport {
        let mut agg = Aggregator::new();
        agg.fold_findings(vec![
            Finding::new(
                "aws_access_key",
                FindingCategory::Secret,
                Severity::Critical,
                "https://a.example/app.js",
                "AKIA...MNOP",
                "pattern match in response body",
            ),
            Finding::new(
                "IDOR",
                FindingCategory::Check,
                Severity::High,
                "https://a.example/api?id=5",
                "id",
                "Different response when changing id",
            ),
        ]);
        agg.finalize()
    }

    #[test]
    fn category_documents_partition_findings() {
        let report = sample_report();
        let secrets = secrets_document(&report);
        assert_eq!(secrets["secrets_found"], 1);
        assert_eq!(secrets["by_severity"]["critical"], 1);

        let checks = checks_document(&report);
        assert_eq!(checks["findings"], 1);
        assert_eq!(checks["by_type"]["IDOR"], 1);
    }

    #[test]
    fn written_artifacts_exist() {
        let dir = std::env::temp_dir().join("websweep-writer-test");
        let _ = fs::remove_dir_all(&dir);
        write_reports(&sample_report(), &dir).unwrap();
        for name in ["report.json", "secrets.json", "checks.json", "content.json", "endpoints.txt", "findings.csv"] {
            assert!(dir.join(name).is_file(), "missing {name}");
        }
    }
}
