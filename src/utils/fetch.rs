use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

// Firefox ESR User-Agent string to reduce server-side variance
pub const FIREFOX_UA: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:115.0) Gecko/20100101 Firefox/115.0";

/// Default ceiling for a fetched document body.
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 500 * 1024 * 1024; // 500 MiB

/// Default timeout applied to the whole HTTP fetch.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("file URL does not map to a local path")]
    BadFilePath,

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("file read error: {0}")]
    File(#[from] std::io::Error),

    #[error("document of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },
}

/// A fully materialized document body plus the Content-Type the server
/// reported, when any. `file://` reads carry no Content-Type.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Fetches document bytes over `http(s)` or from the local filesystem.
/// The client is built once with the configured timeout and reused for
/// every request.
pub struct DocumentFetcher {
    client: Client,
    max_bytes: u64,
}

impl DocumentFetcher {
    pub fn new(timeout: Duration, max_bytes: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, max_bytes })
    }

    /// Resolves the URL and returns the full document body. `file://` URLs
    /// are read from disk so filesystem-backed callers work without a
    /// server; every other scheme besides `http(s)` is refused.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => self.fetch_file(url).await,
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }

    async fn fetch_http(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
        info!(target: "fetch", url = %url, "starting HTTP fetch");

        let response = self
            .client
            .get(url.as_str())
            .header("User-Agent", FIREFOX_UA)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "fetch", url = %url, "HTTP transport error: {}", e);
                FetchError::Request(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(target: "fetch", url = %url, status = status.as_u16(), "HTTP non-success status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|ct| ct.to_str().ok())
            .map(|s| s.to_string());

        // Refuse early when the server announces an oversized body
        if let Some(declared) = response.content_length() {
            self.check_size(declared)?;
        }

        let body = response.bytes().await.map_err(|e| {
            warn!(target: "fetch", url = %url, "body read failed: {}", e);
            FetchError::Request(e)
        })?;
        self.check_size(body.len() as u64)?;

        info!(target: "fetch", url = %url, size = body.len(), ct = ?content_type, "HTTP fetch completed");
        Ok(FetchedDocument {
            bytes: body.to_vec(),
            content_type,
        })
    }

    async fn fetch_file(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
        let path = url.to_file_path().map_err(|_| FetchError::BadFilePath)?;
        info!(target: "fetch", path = %path.display(), "reading local file");

        let bytes = tokio::fs::read(&path).await?;
        self.check_size(bytes.len() as u64)?;

        Ok(FetchedDocument {
            bytes,
            content_type: None,
        })
    }

    fn check_size(&self, size: u64) -> Result<(), FetchError> {
        if size > self.max_bytes {
            return Err(FetchError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fetcher(max_bytes: u64) -> DocumentFetcher {
        DocumentFetcher::new(Duration::from_secs(5), max_bytes).expect("client builds")
    }

    #[tokio::test]
    async fn refuses_unsupported_scheme() {
        let url = Url::parse("ftp://example.com/invoice.pdf").unwrap();
        let err = fetcher(1024).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme(scheme) if scheme == "ftp"));
    }

    #[tokio::test]
    async fn reads_local_file_fully() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"local invoice bytes").unwrap();
        let url = Url::from_file_path(file.path()).unwrap();

        let doc = fetcher(1024).fetch(&url).await.unwrap();
        assert_eq!(doc.bytes, b"local invoice bytes");
        assert!(doc.content_type.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let url = Url::parse("file:///no/such/invoice.pdf").unwrap();
        let err = fetcher(1024).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::File(_)));
    }

    #[tokio::test]
    async fn enforces_size_ceiling_on_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        let url = Url::from_file_path(file.path()).unwrap();

        let err = fetcher(16).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { size: 64, limit: 16 }));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        // Nothing listens on port 1; the connection is refused immediately.
        let url = Url::parse("http://127.0.0.1:1/invoice.pdf").unwrap();
        let err = fetcher(1024).fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
    }
}
