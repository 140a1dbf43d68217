//! services/api/src/adapters/pdf.rs
//!
//! PDF text extraction adapter, implementing the `TextExtractor` port with
//! the `pdf-extract` crate. Extraction runs in-memory on the bytes the
//! pipeline fetched from the blob gateway.

use article_simplifier_core::ports::{PortError, PortResult, TextExtractor};

/// Extracts plain text from PDF bytes.
#[derive(Clone, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> PortResult<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| PortError::Unexpected(format!("PDF parse failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupted_byte_stream_is_an_error_not_a_panic() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract_text(b"this is not a pdf");
        assert!(result.is_err());
    }
}
