//! CV file-to-text extraction and text normalization.
//!
//! The extracted text goes straight back to the extension, which stores it
//! client-side — nothing is retained here.

use crate::errors::AppError;

/// Extracts plain text from an uploaded CV file.
///
/// Supported: PDF (via `pdf-extract`, in memory) and plain text/markdown.
/// DOCX is rejected until a proper parser is wired in — the extension tells
/// users to export as PDF.
pub fn extract_text(
    bytes: &[u8],
    filename: &str,
    content_type: Option<&str>,
) -> Result<String, AppError> {
    let name = filename.to_lowercase();
    let content_type = content_type.unwrap_or_default();

    if content_type == "application/pdf" || name.ends_with(".pdf") {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            tracing::warn!(error = %e, "PDF extraction failed");
            AppError::Validation(
                "Could not read this PDF. Try re-exporting it or uploading plain text.".to_string(),
            )
        })?;
        return Ok(normalize_text(&text));
    }

    if name.ends_with(".docx") || name.ends_with(".doc") {
        return Err(AppError::Validation(
            "DOCX is not supported. Export your CV as PDF or plain text.".to_string(),
        ));
    }

    if content_type.starts_with("text/")
        || content_type.is_empty()
        || name.ends_with(".txt")
        || name.ends_with(".md")
    {
        return Ok(normalize_text(&String::from_utf8_lossy(bytes)));
    }

    Err(AppError::Validation(format!(
        "Unsupported CV format '{content_type}'. Upload PDF or plain text."
    )))
}

/// Normalizes extracted text: CRLF/CR to LF, runs of 3+ newlines collapsed to
/// exactly one blank line, outer whitespace trimmed.
pub fn normalize_text(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n").replace('\r', "\n");
    while out.contains("\n\n\n") {
        out = out.replace("\n\n\n", "\n\n");
    }
    out.trim().to_string()
}
