// src/probe/http.rs
// =============================================================================
// Issues one batch of HTTP checks concurrently and collects one result per
// URL.
//
// Key behavior:
// - Every URL in the batch is in flight at once (bounded by batch size)
// - Results come back aligned with batch order, even when requests complete
//   out of order, so the log stays deterministic
// - A transport failure on one URL never aborts or delays its siblings; it
//   becomes status 0 plus an ErrorKind on that URL's result
// - One attempt per URL per run, never retried
// =============================================================================

use std::error::Error as _;
use std::io;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::probe::options::RequestOptions;

/// Classifies a transport-level failure, i.e. anything that prevented a
/// determinate HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connect or total-request deadline exceeded
    Timeout,
    /// The host actively refused the connection
    ConnectionRefused,
    /// Hostname could not be resolved
    Dns,
    /// TLS negotiation or certificate failure
    Tls,
    /// Any other transport failure
    Other,
}

/// The outcome of checking a single URL. Produced exactly once per target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The URL that was checked
    pub url: String,
    /// Real HTTP status code, or 0 on transport failure
    pub status: u16,
    /// Wall-clock seconds from send to response (or to failure)
    pub elapsed_secs: f64,
    /// Transport failure classification, None when a response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl ProbeResult {
    /// Whether this check counts as successful. With `fail_on_http_error`
    /// set, a received status >= 400 counts as a failure too - but only for
    /// classification; the recorded status code is unaffected.
    pub fn succeeded(&self, fail_on_http_error: bool) -> bool {
        self.error.is_none() && !(fail_on_http_error && self.status >= 400)
    }
}

/// Check every URL in `batch` concurrently, returning one result per URL in
/// batch order.
///
/// Returns only once every request has completed or definitively failed -
/// no unresolved requests leak past the batch boundary.
pub async fn run_batch(
    client: &Client,
    options: &RequestOptions,
    batch: &[String],
) -> Vec<ProbeResult> {
    let probes = batch.iter().map(|url| {
        // Client is an Arc around its connection pool, cheap to clone per task
        let client = client.clone();
        let url = url.clone();
        let head_only = options.head_only;
        async move { probe_one(client, url, head_only).await }
    });

    // buffered (not buffer_unordered) keeps completion results aligned with
    // submission order while still driving the whole batch concurrently.
    stream::iter(probes)
        .buffered(batch.len().max(1))
        .collect()
        .await
}

/// Issue a single check and fold any failure into the result.
async fn probe_one(client: Client, url: String, head_only: bool) -> ProbeResult {
    let request = if head_only {
        client.head(&url)
    } else {
        client.get(&url)
    };

    let start = Instant::now();

    match request.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let elapsed_secs = start.elapsed().as_secs_f64();
            debug!(url = %url, status, elapsed_secs, "probe completed");

            ProbeResult {
                url,
                status,
                elapsed_secs,
                error: None,
            }
        }
        Err(e) => {
            let kind = classify_error(&e);
            let elapsed_secs = start.elapsed().as_secs_f64();
            debug!(url = %url, kind = ?kind, elapsed_secs, "probe failed: {e}");

            ProbeResult {
                url,
                status: 0,
                elapsed_secs,
                error: Some(kind),
            }
        }
    }
}

/// Map a reqwest error onto the transport failure taxonomy.
fn classify_error(error: &reqwest::Error) -> ErrorKind {
    if error.is_timeout() {
        return ErrorKind::Timeout;
    }

    // The interesting cause usually sits in an io::Error buried a few
    // levels down the source chain (reqwest -> hyper -> io).
    if let Some(kind) = io_error_kind(error) {
        match kind {
            io::ErrorKind::ConnectionRefused => return ErrorKind::ConnectionRefused,
            io::ErrorKind::TimedOut => return ErrorKind::Timeout,
            _ => {}
        }
    }

    let text = error_chain_text(error);

    if text.contains("dns") || text.contains("resolve") {
        ErrorKind::Dns
    } else if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
        ErrorKind::Tls
    } else if text.contains("connection refused") {
        ErrorKind::ConnectionRefused
    } else {
        ErrorKind::Other
    }
}

/// First io::Error kind found in the error's source chain, if any.
fn io_error_kind(error: &reqwest::Error) -> Option<io::ErrorKind> {
    let mut source = error.source();
    while let Some(inner) = source {
        if let Some(io_error) = inner.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
        source = inner.source();
    }
    None
}

/// Flatten the full error chain into one lowercase string for matching.
fn error_chain_text(error: &reqwest::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A localhost URL with no listener behind it.
    fn refused_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}/")
    }

    fn test_options() -> RequestOptions {
        RequestOptions::new(5, 2, "url-checker-test".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_successful_head_probe() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("HEAD", "/ping")
            .with_status(200)
            .create_async()
            .await;

        let options = test_options();
        let client = options.build_client().unwrap();
        let batch = vec![format!("{}/ping", server.url())];

        let results = run_batch(&client, &options, &batch).await;

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, 200);
        assert!(results[0].error.is_none());
        assert!(results[0].elapsed_secs >= 0.0);
        assert!(results[0].succeeded(true));
    }

    #[tokio::test]
    async fn test_get_probe_when_head_disabled() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let mut options = test_options();
        options.head_only = false;
        let client = options.build_client().unwrap();
        let batch = vec![format!("{}/page", server.url())];

        let results = run_batch(&client, &options, &batch).await;

        mock.assert_async().await;
        assert_eq!(results[0].status, 200);
    }

    #[tokio::test]
    async fn test_connection_refused_is_classified_and_isolated() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("HEAD", "/alive")
            .with_status(200)
            .expect(2)
            .create_async()
            .await;

        let options = test_options();
        let client = options.build_client().unwrap();
        let alive = format!("{}/alive", server.url());
        let batch = vec![alive.clone(), refused_url(), alive.clone()];

        let results = run_batch(&client, &options, &batch).await;

        mock.assert_async().await;
        assert_eq!(results.len(), 3);

        // The failed sibling did not disturb the others
        assert_eq!(results[0].status, 200);
        assert!(results[0].error.is_none());
        assert_eq!(results[2].status, 200);
        assert!(results[2].error.is_none());

        assert_eq!(results[1].status, 0);
        assert_eq!(results[1].error, Some(ErrorKind::ConnectionRefused));
        assert!(!results[1].succeeded(false));
    }

    #[tokio::test]
    async fn test_results_align_with_batch_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock_a = server
            .mock("HEAD", "/a")
            .with_status(200)
            .create_async()
            .await;
        let _mock_b = server
            .mock("HEAD", "/b")
            .with_status(404)
            .create_async()
            .await;

        let options = test_options();
        let client = options.build_client().unwrap();
        let batch = vec![
            format!("{}/a", server.url()),
            refused_url(),
            format!("{}/b", server.url()),
        ];

        let results = run_batch(&client, &options, &batch).await;

        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, batch.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(results[0].status, 200);
        assert_eq!(results[1].status, 0);
        assert_eq!(results[2].status, 404);
    }

    #[tokio::test]
    async fn test_http_error_keeps_real_status_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("HEAD", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let options = test_options();
        let client = options.build_client().unwrap();
        let batch = vec![format!("{}/missing", server.url())];

        let results = run_batch(&client, &options, &batch).await;

        // The 404 is recorded as-is; fail_on_http_error only flips the
        // success classification, never the recorded code.
        assert_eq!(results[0].status, 404);
        assert!(results[0].error.is_none());
        assert!(results[0].succeeded(false));
        assert!(!results[0].succeeded(true));
    }

    #[tokio::test]
    async fn test_unresponsive_server_is_a_timeout() {
        // Accepts the TCP handshake (kernel backlog) but never responds, so
        // the total-request deadline fires.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/");

        let options = RequestOptions::new(1, 0, "url-checker-test".to_string()).unwrap();
        let client = options.build_client().unwrap();

        let results = run_batch(&client, &options, &[url]).await;

        assert_eq!(results[0].status, 0);
        assert_eq!(results[0].error, Some(ErrorKind::Timeout));
        drop(listener);
    }

    #[tokio::test]
    async fn test_dns_failure_classification() {
        let options = test_options();
        let client = options.build_client().unwrap();
        let batch = vec!["http://definitely-not-a-real-host.invalid/".to_string()];

        let results = run_batch(&client, &options, &batch).await;

        assert_eq!(results[0].status, 0);
        assert_eq!(results[0].error, Some(ErrorKind::Dns));
    }

    #[test]
    fn test_succeeded_predicate() {
        let ok = ProbeResult {
            url: "http://x/".to_string(),
            status: 200,
            elapsed_secs: 0.1,
            error: None,
        };
        assert!(ok.succeeded(true));

        let not_found = ProbeResult {
            status: 404,
            ..ok.clone()
        };
        assert!(not_found.succeeded(false));
        assert!(!not_found.succeeded(true));

        let failed = ProbeResult {
            status: 0,
            error: Some(ErrorKind::Other),
            ..ok
        };
        assert!(!failed.succeeded(false));
    }
}
