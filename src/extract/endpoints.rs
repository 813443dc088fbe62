use crate::patterns::{patterns_for, PatternCategory};
use ahash::AHashSet;
use url::Url;

/// Extensions that are static assets, never API surface.
const EXCLUDED_EXTENSIONS: &[&str] =
    &[".css", ".png", ".jpg", ".gif", ".svg", ".ico", ".woff", ".ttf"];

/// Run every endpoint pattern over the content and collect unique
/// candidates. Root-relative paths are resolved against `base` when it is
/// known; output is sorted so extraction stays order-stable.
pub fn extract_endpoints(content: &str, base: Option<&Url>) -> Vec<String> {
    let mut seen = AHashSet::new();

    for pattern in patterns_for(PatternCategory::Endpoint) {
        for caps in pattern.regex.captures_iter(content) {
            let Some(candidate) = pattern.extract(&caps).map(str::trim) else {
                continue;
            };
            if !is_valid_endpoint(candidate) {
                continue;
            }
            let resolved = resolve(candidate, base);
            seen.insert(resolved);
        }
    }

    let mut endpoints: Vec<String> = seen.into_iter().collect();
    endpoints.sort();
    endpoints
}

fn resolve(candidate: &str, base: Option<&Url>) -> String {
    // only root-relative paths get resolved; protocol-relative and
    // absolute candidates are stored as matched
    if candidate.starts_with('/') && !candidate.starts_with("//") {
        if let Some(resolved) = base.and_then(|b| b.join(candidate).ok()) {
            return resolved.to_string();
        }
    }
    candidate.to_string()
}

fn is_valid_endpoint(candidate: &str) -> bool {
    if candidate.len() < 2 {
        return false;
    }
    if candidate.starts_with('#') {
        return false;
    }
    let lower = candidate.to_lowercase();
    !EXCLUDED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://app.example.com/static/main.js").unwrap()
    }

    #[test]
    fn extracts_and_resolves_api_paths() {
        let content = r#"fetch("/api/v1/users"); const doc = "/docs/intro";"#;
        let endpoints = extract_endpoints(content, Some(&base()));
        assert!(endpoints.contains(&"https://app.example.com/api/v1/users".to_string()));
        assert!(endpoints.contains(&"https://app.example.com/docs/intro".to_string()));
    }

    #[test]
    fn skips_static_assets_and_fragments() {
        let content = r##"load("/assets/logo.png"); style("/theme/app.css"); nav("#top");"##;
        let endpoints = extract_endpoints(content, Some(&base()));
        assert!(endpoints.is_empty());
    }

    #[test]
    fn keeps_absolute_urls_verbatim() {
        let content = r#"const api = "https://api.example.net/v2/items";"#;
        let endpoints = extract_endpoints(content, Some(&base()));
        assert_eq!(endpoints, vec!["https://api.example.net/v2/items".to_string()]);
    }

    #[test]
    fn unresolved_relative_path_without_base() {
        let content = r#"fetch("/api/orders")"#;
        let endpoints = extract_endpoints(content, None);
        assert_eq!(endpoints, vec!["/api/orders".to_string()]);
    }

    #[test]
    fn deduplicates_across_patterns() {
        // matched by both the quoted-path and the fetch-call pattern
        let content = r#"fetch("/api/users"); const u = "/api/users";"#;
        let endpoints = extract_endpoints(content, None);
        assert_eq!(endpoints.len(), 1);
    }

    #[test]
    fn output_is_sorted_and_stable() {
        let content = r#"fetch("/api/zebra"); fetch("/api/alpha");"#;
        let first = extract_endpoints(content, None);
        let second = extract_endpoints(content, None);
        assert_eq!(first, second);
        assert_eq!(first, vec!["/api/alpha".to_string(), "/api/zebra".to_string()]);
    }
}
