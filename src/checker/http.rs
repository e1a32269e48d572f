// src/checker/http.rs
// =============================================================================
// This module fetches URLs and measures how long they take.
//
// Key functionality:
// - One GET per call, no retries: a failed attempt is reported immediately
// - Follows redirects by hand so we can count the hops
// - Optionally measures TTFB (time until the status line and headers arrive)
// - Decodes gzip/deflate bodies while keeping the Content-Encoding header
// - Turns transport errors (timeout, DNS, TLS...) into a FetchFailure value
//   instead of an error the caller has to propagate
//
// Rust concepts:
// - async/await: reqwest is async, but we await every request before the
//   next one starts, so nothing runs concurrently
// - Result<T, E>: FetchOutcome is a plain Result whose error side is data
// - Instant: monotonic clock for timing
// =============================================================================

use std::io::Read;
use std::time::{Duration, Instant};

use flate2::read::{GzDecoder, ZlibDecoder};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::error::{AuditError, Result};

/// Same hop limit reqwest applies when it follows redirects itself.
pub const MAX_REDIRECTS: usize = 10;

/// Why a fetch produced no response at all.
///
/// The Display text is what ends up in the `error` field of the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("could not resolve hostname")]
    DnsError,
    #[error("connection failed")]
    ConnectionFailed,
    #[error("SSL certificate error")]
    SslError,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Other(String),
}

/// A response that was received and fully read.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Where the redirect chain ended
    pub final_url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Body after Content-Encoding has been undone
    pub body: Vec<u8>,
    /// Number of redirect hops followed
    pub redirects: usize,
    /// Request start until the full body was read
    pub elapsed: Duration,
    /// Request start until headers were available; only set when asked for
    pub ttfb: Option<Duration>,
}

pub type FetchOutcome = std::result::Result<FetchResult, FetchFailure>;

// Wraps the one HTTP client used for a whole audit run.
//
// The client keeps connections alive between requests. It is owned by
// whoever creates the Fetcher; there is no global client.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Builds the client.
    //
    // Parameters:
    //   timeout: applied to every single request
    //   user_agent: sent with every request
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        // We decode bodies ourselves (reqwest's own decompression would strip
        // the Content-Encoding header), so we advertise only what flate2 reads.
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate"),
        );

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(Policy::none())
            .build()?;

        Ok(Self { client })
    }

    // Performs a single GET and reads the whole body.
    //
    // Parameters:
    //   url: absolute URL to fetch
    //   measure_ttfb: record the time at which headers became available
    //
    // Returns: Ok(FetchResult) for any HTTP response, including 404 or 500.
    //          Err(FetchFailure) only when no response could be obtained.
    pub async fn fetch(&self, url: &str, measure_ttfb: bool) -> FetchOutcome {
        let mut current =
            Url::parse(url).map_err(|e| FetchFailure::InvalidUrl(format!("{url}: {e}")))?;
        let mut redirects = 0;

        let start = Instant::now();

        let response = loop {
            debug!(url = %current, "sending GET");
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(categorize_error)?;

            match redirect_target(&current, &response) {
                Some(next) => {
                    if redirects >= MAX_REDIRECTS {
                        return Err(FetchFailure::TooManyRedirects);
                    }
                    redirects += 1;
                    debug!(from = %current, to = %next, "following redirect");
                    current = next;
                }
                None => break response,
            }
        };

        // reqwest hands us the Response as soon as the headers are in,
        // the body is still on the wire at this point.
        let ttfb = measure_ttfb.then(|| start.elapsed());

        let status = response.status();
        let headers = response.headers().clone();
        let raw = response.bytes().await.map_err(categorize_error)?;
        let elapsed = start.elapsed();

        let encoding = headers
            .get(header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok());
        let body = match decode_body(encoding, &raw) {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %current, error = %e, "keeping undecoded body");
                raw.to_vec()
            }
        };

        debug!(
            url = %current,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "fetched"
        );

        Ok(FetchResult {
            final_url: current,
            status,
            headers,
            body,
            redirects,
            elapsed,
            ttfb,
        })
    }
}

// Returns the next URL if this response is a redirect we can follow.
//
// A 3xx without a usable Location header (e.g. 304) ends the chain.
fn redirect_target(current: &Url, response: &Response) -> Option<Url> {
    if !response.status().is_redirection() {
        return None;
    }

    let location = response
        .headers()
        .get(header::LOCATION)?
        .to_str()
        .ok()?;

    current.join(location).ok()
}

// Undoes the Content-Encoding of a body.
//
// Unknown or missing encodings pass the bytes through unchanged.
pub(crate) fn decode_body(encoding: Option<&str>, raw: &[u8]) -> Result<Vec<u8>> {
    let encoding = encoding.unwrap_or("").trim().to_ascii_lowercase();
    let mut decoded = Vec::new();

    let read = match encoding.as_str() {
        "gzip" | "x-gzip" => GzDecoder::new(raw).read_to_end(&mut decoded),
        "deflate" => ZlibDecoder::new(raw).read_to_end(&mut decoded),
        _ => return Ok(raw.to_vec()),
    };

    read.map_err(|source| AuditError::Decode { encoding, source })?;
    Ok(decoded)
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - etc.
fn categorize_error(error: reqwest::Error) -> FetchFailure {
    // The interesting detail (dns, certificate...) usually sits deeper in the
    // source chain, so we flatten the whole chain into one string.
    let error_string = error_chain(&error).to_lowercase();

    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_redirect() {
        FetchFailure::TooManyRedirects
    } else if error_string.contains("certificate")
        || error_string.contains("ssl")
        || error_string.contains("tls")
    {
        FetchFailure::SslError
    } else if error.is_connect() {
        if error_string.contains("dns") {
            FetchFailure::DnsError
        } else {
            FetchFailure::ConnectionFailed
        }
    } else {
        FetchFailure::Other(error_chain(&error))
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why follow redirects by hand?
//    - reqwest can follow them itself, but then it hides how many hops there were
//    - With Policy::none() every 3xx comes back to us as a normal response
//    - We read Location, join it onto the current URL and go around the loop
//
// 2. What is `loop { ... break value }`?
//    - `loop` is an expression in Rust, so it can produce a value
//    - `break response` ends the loop and hands `response` to the `let`
//
// 3. What is `.then(|| ...)` on a bool?
//    - `true.then(|| x)` is Some(x), `false.then(|| x)` is None
//    - A compact way to build an Option from a condition
//
// 4. Why is FetchOutcome a Result and not an error we bubble up with `?`?
//    - A page that times out is a finding, not a crash
//    - The caller matches on it and writes it into the report
//
// 5. What does map_err do?
//    - Converts the error side of a Result and leaves Ok untouched
//    - Here it turns a reqwest::Error into our FetchFailure
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_decode_gzip_body() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<html></html>").unwrap();
        let compressed = encoder.finish().unwrap();

        let body = decode_body(Some("gzip"), &compressed).unwrap();
        assert_eq!(body, b"<html></html>");
    }

    #[test]
    fn test_identity_body_passes_through() {
        assert_eq!(decode_body(None, b"plain").unwrap(), b"plain");
        assert_eq!(decode_body(Some("br"), b"opaque").unwrap(), b"opaque");
    }

    #[test]
    fn test_corrupt_gzip_is_an_error() {
        let err = decode_body(Some("gzip"), b"definitely not gzip").unwrap_err();
        assert!(matches!(err, AuditError::Decode { .. }));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(FetchFailure::Timeout.to_string(), "request timed out");
        assert_eq!(
            FetchFailure::TooManyRedirects.to_string(),
            "too many redirects"
        );
    }

    #[tokio::test]
    async fn test_invalid_url_is_reported_not_raised() {
        let fetcher = Fetcher::new(Duration::from_secs(1), "test-agent").unwrap();
        let outcome = fetcher.fetch("not a url", false).await;
        assert!(matches!(outcome, Err(FetchFailure::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_refused_connection_is_reported_not_raised() {
        // Grab a free port and release it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = Fetcher::new(Duration::from_secs(2), "test-agent").unwrap();
        let outcome = fetcher
            .fetch(&format!("http://127.0.0.1:{port}/"), true)
            .await;
        assert!(outcome.is_err());
    }
}
