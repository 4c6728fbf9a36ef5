//! Knowledge sources: documents the runtime reads to ground an agent's answer.

use std::path::Path;

use super::LlmError;

/// Reads a staged PDF and returns its text.
///
/// Extraction is CPU-bound and `pdf-extract` may panic on malformed input, so it
/// runs on the blocking pool; a panic surfaces as a `Document` error.
pub async fn extract_document_text(path: &Path) -> Result<String, LlmError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LlmError::Document(format!("cannot read {}: {e}", path.display())))?;

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| LlmError::Document(format!("extraction aborted: {e}")))?
        .map_err(|e| LlmError::Document(format!("extraction failed: {e}")))?;

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(LlmError::Document(format!(
            "{} contains no extractable text",
            path.display()
        )));
    }
    Ok(text)
}

/// Appends the document text to a rendered stage prompt.
pub fn attach_knowledge(prompt: &str, document_text: &str) -> String {
    format!("{prompt}\n\nKNOWLEDGE SOURCE (resume text):\n<<<\n{document_text}\n>>>")
}

/// Collapses runs of blank lines and trailing spaces left behind by PDF layout.
fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
