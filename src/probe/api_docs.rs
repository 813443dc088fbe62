use crate::config::ScanConfig;
use crate::model::{Finding, FindingCategory, Severity};
use crate::probe::ProbeCheck;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

/// Conventional machine-readable API documentation paths.
const DOC_PATHS: &[&str] = &[
    "/swagger.json",
    "/openapi.json",
    "/swagger-ui.html",
    "/api-docs",
    "/v2/swagger.json",
    "/v3/api-docs",
    "/docs/openapi.json",
    "/.well-known/openapi.json",
];

/// Checks whether the target exposes its API specification at a
/// well-known path.
pub struct ApiDocsCheck;

#[async_trait]
impl ProbeCheck for ApiDocsCheck {
    fn name(&self) -> &'static str {
        "api_docs"
    }

    async fn run(&self, client: &Client, url: &str, cfg: &ScanConfig) -> Result<Vec<Finding>> {
        let Ok(parsed) = Url::parse(url) else {
            return Ok(Vec::new());
        };
        let origin = parsed.origin().ascii_serialization();
        if origin == "null" {
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        for path in DOC_PATHS {
            let endpoint = format!("{origin}{path}");
            let response = match client
                .get(&endpoint)
                .timeout(cfg.request_timeout())
                .send()
                .await
            {
                Ok(r) => r,
                Err(_) => continue,
            };
            if response.status().as_u16() != 200 {
                continue;
            }
            let Ok(body) = response.text().await else {
                continue;
            };
            if looks_like_api_doc(&body) {
                findings.push(Finding::new(
                    "Exposed API Documentation",
                    FindingCategory::Check,
                    Severity::Low,
                    endpoint,
                    *path,
                    format!("{path} returns an API specification"),
                ));
            }
        }
        Ok(findings)
    }
}

/// An OpenAPI/Swagger document declares its version key or a paths map; a
/// Swagger UI page carries its bundle markers.
pub fn looks_like_api_doc(body: &str) -> bool {
    if let Ok(doc) = serde_json::from_str::<Value>(body) {
        if let Some(object) = doc.as_object() {
            return object.contains_key("swagger")
                || object.contains_key("openapi")
                || object.contains_key("paths");
        }
        return false;
    }
    let lower = body.to_lowercase();
    lower.contains("swagger-ui") || lower.contains("swaggeruibundle")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_are_recognized() {
        assert!(looks_like_api_doc(r#"{"openapi":"3.0.1","paths":{}}"#));
        assert!(looks_like_api_doc(r#"{"swagger":"2.0"}"#));
    }

    #[test]
    fn swagger_ui_pages_are_recognized() {
        assert!(looks_like_api_doc("<html><script src=\"swagger-ui-bundle.js\"></script></html>"));
    }

    #[test]
    fn ordinary_responses_are_not() {
        assert!(!looks_like_api_doc(r#"{"status":"ok"}"#));
        assert!(!looks_like_api_doc("<html>welcome</html>"));
        assert!(!looks_like_api_doc("[1,2,3]"));
    }
}
