use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Shared HTTP client with the default 10s request timeout.
pub static SCAN_CLIENT: Lazy<Client> = Lazy::new(|| build_client(10));

/// Build the scanning client with connection pooling and compression.
pub fn build_client(timeout_secs: u64) -> Client {
    ClientBuilder::new()
        // Connection pooling - reuse connections aggressively
        .pool_max_idle_per_host(50)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .tcp_nodelay(true)

        // Timeouts
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(5))

        // Compression
        .gzip(true)
        .brotli(true)

        // TLS
        .use_rustls_tls()
        .tls_sni(true)
        .https_only(false)

        // Redirects
        .redirect(reqwest::redirect::Policy::limited(5))

        // Realistic browser user agent; naive bot filters drop obvious tool UAs
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")

        // Scan targets routinely present self-signed or expired certs;
        // certificate validation is intentionally disabled (ONLY for security research!)
        .danger_accept_invalid_certs(true)

        .build()
        .expect("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        // builder must not panic with the scan defaults
        let _client = build_client(10);
    }
}
