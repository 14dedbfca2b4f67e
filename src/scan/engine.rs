use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use url::Url;

use super::error::ScanError;
use crate::utils::fetch::{DocumentFetcher, FetchError};
use crate::utils::pdf::extract_document_text;

/// Classification result of a completed (non-fatal) scan.
///
/// `rejected` and `message` always agree; outcomes are built only through
/// [`ScanOutcome::accepted`] and [`ScanOutcome::rejected`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub rejected: bool,
    pub message: String,
}

impl ScanOutcome {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            rejected: false,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            rejected: true,
            message: message.into(),
        }
    }
}

/// A pluggable secondary validation over extracted document text, run after
/// the denylist match. Any failing check rejects the document. The default
/// engine carries no checks, so everything passes.
pub trait DocumentCheck: Send + Sync {
    /// Short name used in rejection messages and logs.
    fn name(&self) -> &str;

    /// Returns false to reject the document.
    fn passes(&self, text: &str) -> bool;
}

/// Runs the scan pipeline: fetch the document, extract its text, classify
/// against the denylist and the configured checks.
///
/// Shared state is read-only after construction, so one engine behind an
/// `Arc` serves any number of concurrent requests without locking.
pub struct ScanEngine {
    fetcher: DocumentFetcher,
    denylist: Vec<String>,
    checks: Vec<Box<dyn DocumentCheck>>,
}

impl ScanEngine {
    pub fn new(
        denylist: Vec<String>,
        fetch_timeout: Duration,
        max_document_bytes: u64,
    ) -> anyhow::Result<Self> {
        let fetcher = DocumentFetcher::new(fetch_timeout, max_document_bytes)
            .context("failed to build HTTP client")?;

        Ok(Self {
            fetcher,
            denylist,
            checks: Vec::new(),
        })
    }

    pub fn with_checks(mut self, checks: Vec<Box<dyn DocumentCheck>>) -> Self {
        self.checks = checks;
        self
    }

    /// Scans the document behind `raw_url` end to end. A malformed URL is
    /// an acquisition failure like any other unreachable document.
    pub async fn scan_url(&self, raw_url: &str) -> Result<ScanOutcome, ScanError> {
        let url = Url::parse(raw_url).map_err(|e| {
            warn!(target: "scan", url = raw_url, "URL parse failed: {}", e);
            ScanError::Acquisition(FetchError::Url(e))
        })?;

        let document = self.fetcher.fetch(&url).await?;
        let text = extract_document_text(document.content_type.as_deref(), &document.bytes)?;
        info!(target: "scan", url = %url, chars = text.len(), "text extraction completed");

        self.classify(&text)
    }

    /// Classifies already-extracted text. Zero-length text is fatal rather
    /// than a rejection, even when the denylist is empty.
    pub fn classify(&self, text: &str) -> Result<ScanOutcome, ScanError> {
        if text.is_empty() {
            return Err(ScanError::EmptyContent);
        }

        // Exact substring containment, no IBAN normalization: an entry
        // written with grouping spaces only matches text spaced the same way.
        let matched = self
            .denylist
            .iter()
            .find(|entry| text.contains(entry.as_str()));

        let failed_check = self.checks.iter().find(|check| !check.passes(text));

        match (matched, failed_check) {
            (Some(entry), _) => {
                info!(target: "scan", entry = %entry, "denylisted identifier found");
                Ok(ScanOutcome::rejected(
                    "Validation failed: document contains a denylisted IBAN.",
                ))
            }
            (None, Some(check)) => {
                info!(target: "scan", check = check.name(), "document check failed");
                Ok(ScanOutcome::rejected(format!(
                    "Validation failed: document did not pass the '{}' check.",
                    check.name()
                )))
            }
            (None, None) => Ok(ScanOutcome::accepted(
                "PDF is valid - no denylisted IBAN found.",
            )),
        }
    }
}
