//! Active probe checks.
//!
//! Each check issues one or more correlated requests against a target and
//! derives findings from response comparison. Checks are failure-isolated:
//! a check returning `Err` is logged and contributes zero findings, which
//! keeps "check failed" distinguishable from "no finding" without ever
//! aborting the sweep. No retries — this is a breadth-first heuristic
//! pass, a miss on one target is acceptable.

pub mod api_docs;
pub mod cors;
pub mod graphql;
pub mod headers;
pub mod idor;
pub mod rate_limit;
pub mod verbs;

use crate::config::ScanConfig;
use crate::model::Finding;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait ProbeCheck: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, client: &Client, url: &str, cfg: &ScanConfig) -> Result<Vec<Finding>>;
}

/// The full probe suite in execution order.
pub fn default_checks() -> Vec<Box<dyn ProbeCheck>> {
    vec![
        Box::new(cors::CorsCheck),
        Box::new(headers::SecurityHeadersCheck),
        Box::new(idor::IdorCheck),
        Box::new(verbs::VerbTamperingCheck),
        Box::new(rate_limit::RateLimitCheck),
        Box::new(graphql::GraphqlIntrospectionCheck),
        Box::new(api_docs::ApiDocsCheck),
    ]
}

/// Run every check against one target, isolating failures per check.
pub async fn run_checks(
    client: &Client,
    url: &str,
    cfg: &ScanConfig,
    checks: &[Box<dyn ProbeCheck>],
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for check in checks {
        match check.run(client, url, cfg).await {
            Ok(mut found) => findings.append(&mut found),
            Err(e) => {
                tracing::debug!(check = check.name(), url, error = %e, "probe check failed")
            }
        }
    }
    findings
}

/// Probe a batch of targets through a bounded worker pool. Each target's
/// findings arrive on the returned channel as a completed batch.
pub fn spawn_checks(
    client: Client,
    urls: Vec<String>,
    cfg: Arc<ScanConfig>,
    cancel: CancellationToken,
) -> mpsc::Receiver<Vec<Finding>> {
    let width = cfg.concurrency.max(1);
    let (tx, rx) = mpsc::channel(width);

    tokio::spawn(async move {
        let checks: Arc<Vec<Box<dyn ProbeCheck>>> = Arc::new(default_checks());
        let semaphore = Arc::new(Semaphore::new(width));
        let mut workers = FuturesUnordered::new();

        for url in urls {
            if cancel.is_cancelled() {
                tracing::info!("cancellation requested, no further probes submitted");
                break;
            }
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let client = client.clone();
            let cfg = cfg.clone();
            let checks = checks.clone();
            let tx = tx.clone();
            workers.push(tokio::spawn(async move {
                let findings = run_checks(&client, &url, &cfg, &checks).await;
                drop(permit);
                let _ = tx.send(findings).await;
            }));
        }
        drop(tx);

        while workers.next().await.is_some() {}
    });

    rx
}
