//! Passive extraction over fetched content.
//!
//! All pattern matching is driven by the registry; each submodule owns one
//! concern. Extraction is deterministic: identical content and source URL
//! always produce an identical, order-stable `ExtractionResult`.

pub mod endpoints;
pub mod keywords;
pub mod secrets;
pub mod tech;

pub use secrets::mask_secret;

use crate::model::{ExtractionResult, FetchResult};
use url::Url;

/// Run every passive detector over one fetched unit of content.
pub fn extract(content: &str, source_url: &str) -> ExtractionResult {
    let base = Url::parse(source_url).ok();
    ExtractionResult {
        url: source_url.to_string(),
        endpoints: endpoints::extract_endpoints(content, base.as_ref()),
        secrets: secrets::extract_secrets(content, source_url),
        keyword_hits: keywords::scan_keywords(content),
        technologies: tech::detect_technologies(content, source_url),
    }
}

/// Extraction entry point for a completed fetch. Anything other than a
/// 200 with a body yields an empty result for the unit, not an error.
pub fn extract_from_fetch(fetched: &FetchResult) -> ExtractionResult {
    match (&fetched.status, &fetched.body) {
        (Some(200), Some(body)) => extract(body, &fetched.url),
        _ => ExtractionResult::empty(fetched.url.clone()),
    }
}
