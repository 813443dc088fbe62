//! Bounded-concurrency HTTP fetching.
//!
//! `fetch` never returns `Err`: every network, protocol, and timeout
//! failure is folded into `FetchResult.error` so one dead host cannot
//! abort a batch. `spawn_batch` runs a semaphore-bounded worker pool and
//! hands completed results back over a channel in completion order; the
//! driver owns all aggregation.

pub mod client;

pub use client::{build_client, SCAN_CLIENT};

use crate::model::{FetchFailure, FetchResult};
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

/// Lowercase the header names at the boundary; values are adversarial
/// input and may not be valid UTF-8.
pub fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_ascii_lowercase(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Bodies beyond this are truncated before extraction; responses are
/// adversarial input and may be arbitrarily large.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Fetch one URL. All failure modes land in `FetchResult.error`.
pub async fn fetch(client: &Client, url: &str, timeout: Duration) -> FetchResult {
    let response = match tokio::time::timeout(timeout, client.get(url).send()).await {
        Err(_) => return FetchResult::failed(url, FetchFailure::Timeout),
        Ok(Err(e)) => {
            let failure = if e.is_timeout() {
                FetchFailure::Timeout
            } else if e.is_connect() {
                FetchFailure::Connect(e.to_string())
            } else {
                FetchFailure::Request(e.to_string())
            };
            return FetchResult::failed(url, failure);
        }
        Ok(Ok(r)) => r,
    };

    let status = response.status().as_u16();
    let headers = header_map(response.headers());

    match tokio::time::timeout(timeout, response.bytes()).await {
        Err(_) => FetchResult {
            url: url.to_string(),
            status: Some(status),
            body: None,
            headers,
            error: Some(FetchFailure::Timeout),
        },
        Ok(Err(e)) => FetchResult {
            url: url.to_string(),
            status: Some(status),
            body: None,
            headers,
            error: Some(FetchFailure::Body(e.to_string())),
        },
        Ok(Ok(bytes)) => {
            // lossy decode: malformed encodings degrade to replacement
            // characters instead of failing the unit
            let slice = &bytes[..bytes.len().min(MAX_BODY_BYTES)];
            FetchResult {
                url: url.to_string(),
                status: Some(status),
                body: Some(String::from_utf8_lossy(slice).into_owned()),
                headers,
                error: None,
            }
        }
    }
}

/// Fetch a batch through a bounded worker pool. Results are delivered on
/// the returned channel as they complete, not in submission order.
/// Cancelling the token stops new submissions; in-flight requests drain.
pub fn spawn_batch(
    client: Client,
    urls: Vec<String>,
    concurrency: usize,
    timeout: Duration,
    cancel: CancellationToken,
) -> mpsc::Receiver<FetchResult> {
    let width = concurrency.max(1);
    let (tx, rx) = mpsc::channel(width);

    tokio::spawn(async move {
        let semaphore = Arc::new(Semaphore::new(width));
        let mut workers = FuturesUnordered::new();

        for url in urls {
            if cancel.is_cancelled() {
                tracing::info!("cancellation requested, no further targets submitted");
                break;
            }
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let client = client.clone();
            let tx = tx.clone();
            workers.push(tokio::spawn(async move {
                let result = fetch(&client, &url, timeout).await;
                drop(permit);
                let _ = tx.send(result).await;
            }));
        }
        drop(tx);

        while workers.next().await.is_some() {}
    });

    rx
}
