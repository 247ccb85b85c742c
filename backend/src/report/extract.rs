//! PDF text extraction for the report-analysis flow.
//!
//! The upload is written to a named temp file before pdfium reads it; the
//! file is deleted on drop, on every exit path. pdfium is CPU-bound and not
//! async-safe, so callers run this under `web::block`.

use std::io::Write;

use pdfium_render::prelude::*;

use crate::error::ReportError;

/// Extract the concatenated text of all pages, in page order, trimmed.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, ReportError> {
    let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile()?;
    tmp.write_all(pdf_bytes)?;
    tmp.flush()?;

    let bindings = Pdfium::bind_to_system_library()
        .map_err(|e| ReportError::Pdf(format!("failed to bind pdfium library: {e:?}")))?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_file(tmp.path(), None)
        .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;

    let mut text = String::new();
    for page in document.pages().iter() {
        let page_text = page
            .text()
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
        text.push_str(&page_text.all());
    }

    Ok(text.trim().to_string())
}
