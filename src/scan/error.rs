use thiserror::Error;

use crate::utils::fetch::FetchError;
use crate::utils::pdf::ExtractError;

/// Machine-fatal failure categories of the scan pipeline. Every variant
/// surfaces as the same processing-failure outcome at the HTTP boundary;
/// a denylist hit is not an error but a rejected `ScanOutcome`.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to fetch document: {0}")]
    Acquisition(#[from] FetchError),

    #[error("failed to extract text from document: {0}")]
    Format(#[from] ExtractError),

    #[error("document contains no extractable text")]
    EmptyContent,
}
