use crate::config::ScanConfig;
use crate::model::{Finding, FindingCategory, Severity};
use crate::probe::ProbeCheck;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use smallvec::SmallVec;
use url::Url;

/// Query parameter names that conventionally carry object identifiers.
pub const ID_PARAMS: &[&str] =
    &["id", "user_id", "uid", "account_id", "order_id", "item_id", "doc_id", "file_id"];

/// Mutated responses shorter than this read as error pages, not data.
const MIN_BODY_LEN: usize = 100;

/// Mutates identifier-looking query parameters and compares response
/// bodies. A differing 200 body is a heuristic signal only: dynamic
/// content can differ per request without any authorization flaw, so a
/// hit means "look here", not "proven bypass".
pub struct IdorCheck;

#[async_trait]
impl ProbeCheck for IdorCheck {
    fn name(&self) -> &'static str {
        "idor"
    }

    async fn run(&self, client: &Client, url: &str, cfg: &ScanConfig) -> Result<Vec<Finding>> {
        let Ok(parsed) = Url::parse(url) else {
            return Ok(Vec::new());
        };

        let id_params: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(name, _)| ID_PARAMS.contains(&name.as_ref()))
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        if id_params.is_empty() {
            return Ok(Vec::new());
        }

        let baseline = client.get(url).timeout(cfg.request_timeout()).send().await?;
        if baseline.status().as_u16() != 200 {
            return Ok(Vec::new());
        }
        let original_body = baseline.text().await?;

        let mut findings = Vec::new();
        for (param, original_value) in id_params {
            for candidate in mutation_values(&original_value) {
                let mutated_url = with_param_value(&parsed, &param, &candidate);
                let response = match client
                    .get(mutated_url.as_str())
                    .timeout(cfg.request_timeout())
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(_) => continue,
                };
                let status = response.status().as_u16();
                let Ok(mutated_body) = response.text().await else {
                    continue;
                };
                if let Some(finding) = evaluate(url, &param, status, &original_body, &mutated_body)
                {
                    findings.push(finding);
                    // one finding per parameter; further mutations add noise
                    break;
                }
            }
        }
        Ok(findings)
    }
}

/// Candidate replacement values for one identifier: the well-known low
/// IDs plus the numeric successor of the original.
fn mutation_values(original: &str) -> SmallVec<[String; 3]> {
    let mut values: SmallVec<[String; 3]> = SmallVec::new();
    values.push("1".to_string());
    values.push("0".to_string());
    if let Ok(n) = original.parse::<u64>() {
        values.push((n + 1).to_string());
    }
    values.retain(|v| v != original);
    values
}

fn with_param_value(url: &Url, param: &str, value: &str) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, current)| {
            if name == param {
                (name.into_owned(), value.to_string())
            } else {
                (name.into_owned(), current.into_owned())
            }
        })
        .collect();

    let mut mutated = url.clone();
    {
        let mut serializer = mutated.query_pairs_mut();
        serializer.clear();
        for (name, val) in &pairs {
            serializer.append_pair(name, val);
        }
    }
    mutated
}

/// Pure comparison: a mutated request that succeeds with a substantial,
/// different body raises one high finding for the parameter.
pub fn evaluate(
    url: &str,
    param: &str,
    mutated_status: u16,
    original_body: &str,
    mutated_body: &str,
) -> Option<Finding> {
    if mutated_status == 200 && mutated_body.len() > MIN_BODY_LEN && mutated_body != original_body {
        return Some(Finding::new(
            "IDOR",
            FindingCategory::Check,
            Severity::High,
            url,
            param,
            format!("Different response when changing {param}"),
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn differing_substantial_body_raises_high_idor() {
        let original = "a".repeat(150);
        let mutated = "b".repeat(150);
        let finding =
            evaluate("https://t.example/api/users?id=5", "id", 200, &original, &mutated).unwrap();
        assert_eq!(finding.kind, "IDOR");
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.value, "id");
        assert_eq!(finding.detail, "Different response when changing id");
    }

    #[test]
    fn short_or_equal_bodies_are_clean() {
        let original = "a".repeat(150);
        assert!(evaluate("u", "id", 200, &original, &original).is_none());
        assert!(evaluate("u", "id", 200, &original, "tiny").is_none());
        assert!(evaluate("u", "id", 403, &original, &"b".repeat(150)).is_none());
    }

    #[test]
    fn mutations_skip_the_original_value() {
        let values = mutation_values("1");
        assert!(!values.contains(&"1".to_string()));
        assert!(values.contains(&"0".to_string()));
        assert!(values.contains(&"2".to_string()));
    }

    #[test]
    fn non_numeric_values_get_fixed_probes_only() {
        let values = mutation_values("abc-123");
        assert_eq!(values.as_slice(), &["1".to_string(), "0".to_string()]);
    }

    #[test]
    fn param_replacement_preserves_other_params() {
        let url = Url::parse("https://t.example/api?page=2&id=5").unwrap();
        let mutated = with_param_value(&url, "id", "6");
        assert_eq!(mutated.as_str(), "https://t.example/api?page=2&id=6");
    }
}
