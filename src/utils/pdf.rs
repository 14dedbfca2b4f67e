// PDF detection and text extraction for the scan pipeline.
// The binary parsing itself is delegated to the `pdf-extract` crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("document is not a PDF (content-type: {0})")]
    NotPdf(String),

    #[error("failed to parse PDF: {0}")]
    Parse(#[from] pdf_extract::OutputError),
}

/// Returns true if given content-type or head indicates a PDF file.
/// - Content-Type: application/pdf (case-insensitive, substring match)
/// - Magic bytes: %PDF-
pub fn is_pdf(content_type: Option<&str>, head: &[u8]) -> bool {
    let ct = content_type.unwrap_or("").to_ascii_lowercase();
    ct.contains("application/pdf") || head.starts_with(b"%PDF-")
}

/// Extracts the concatenated text of every page from a PDF held fully in
/// memory, in page order. Page separation is whatever the parser emits;
/// callers must not rely on exact whitespace between pages.
///
/// Bytes that do not look like a PDF at all are refused up front instead of
/// being handed to the parser.
pub fn extract_document_text(
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<String, ExtractError> {
    if !is_pdf(content_type, bytes) {
        return Err(ExtractError::NotPdf(
            content_type.unwrap_or("unknown").to_string(),
        ));
    }

    let text = pdf_extract::extract_text_from_mem(bytes)?;
    Ok(text)
}
