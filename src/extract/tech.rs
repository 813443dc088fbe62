use crate::model::{Finding, FindingCategory};
use crate::patterns::{patterns_for, PatternCategory};

/// Fingerprint frameworks and platforms from body signatures. One finding
/// per matching technology, registry order.
pub fn detect_technologies(content: &str, source_url: &str) -> Vec<Finding> {
    patterns_for(PatternCategory::Technology)
        .filter(|pattern| pattern.regex.is_match(content))
        .map(|pattern| {
            Finding::new(
                pattern.name,
                FindingCategory::Content,
                pattern.severity,
                source_url,
                "",
                "signature present in response body",
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    #[test]
    fn detects_wordpress_markers() {
        let content = r#"<link href="/wp-content/themes/site/style.css">"#;
        let findings = detect_technologies(content, "https://blog.example");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, "tech_wordpress");
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn reports_each_technology_once() {
        let content = "wp-content wp-includes __NUXT__";
        let kinds: Vec<String> = detect_technologies(content, "")
            .into_iter()
            .map(|f| f.kind)
            .collect();
        assert_eq!(kinds, vec!["tech_wordpress".to_string(), "tech_nuxt".to_string()]);
    }

    #[test]
    fn clean_content_has_no_findings() {
        assert!(detect_technologies("plain body", "").is_empty());
    }
}
