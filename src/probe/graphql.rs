use crate::config::ScanConfig;
use crate::model::{Finding, FindingCategory, Severity};
use crate::probe::ProbeCheck;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

/// Conventional GraphQL mount points.
const GRAPHQL_PATHS: &[&str] = &["/graphql", "/api/graphql", "/v1/graphql"];

const INTROSPECTION_QUERY: &str = "{ __schema { types { name } } }";

/// Posts an introspection query to the conventional GraphQL paths of the
/// target's origin and flags servers that answer it.
pub struct GraphqlIntrospectionCheck;

#[async_trait]
impl ProbeCheck for GraphqlIntrospectionCheck {
    fn name(&self) -> &'static str {
        "graphql_introspection"
    }

    async fn run(&self, client: &Client, url: &str, cfg: &ScanConfig) -> Result<Vec<Finding>> {
        let Some(origin) = target_origin(url) else {
            return Ok(Vec::new());
        };

        let mut findings = Vec::new();
        for path in GRAPHQL_PATHS {
            let endpoint = format!("{origin}{path}");
            let response = match client
                .post(&endpoint)
                .json(&json!({ "query": INTROSPECTION_QUERY }))
                .timeout(cfg.request_timeout())
                .send()
                .await
            {
                Ok(r) => r,
                Err(_) => continue,
            };
            let status = response.status().as_u16();
            let Ok(body) = response.text().await else {
                continue;
            };
            if is_introspection_enabled(status, &body) {
                findings.push(Finding::new(
                    "GraphQL Introspection",
                    FindingCategory::Check,
                    Severity::Medium,
                    endpoint,
                    "",
                    "Introspection query enabled",
                ));
            }
        }
        Ok(findings)
    }
}

fn target_origin(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let origin = parsed.origin().ascii_serialization();
    (origin != "null").then_some(origin)
}

pub fn is_introspection_enabled(status: u16, body: &str) -> bool {
    status == 200 && body.contains("__schema")
}
