//! Placeholder substitution engine.
//!
//! Templates are UTF-8 text documents; a paragraph is a line. For every
//! placeholder key that occurs as a literal substring of a paragraph, all its
//! occurrences in that paragraph are replaced with the mapped value. Keys are
//! matched independently in mapping order, so callers must not rely on the
//! behavior of keys that are substrings of other keys.
//!
//! Everything that can go wrong while opening or decoding the template maps to
//! one generic processing error; there is no partial-document recovery.

use crate::errors::{Error, Result};
use base64::{Engine as _, engine::general_purpose};
use std::collections::HashMap;
use std::path::Path;
use tracing::instrument;

/// Replace placeholders paragraph by paragraph, preserving line endings.
pub fn fill_paragraphs(text: &str, placeholders: &HashMap<String, String>) -> String {
    if !text.contains('\n') {
        return fill_one_paragraph(text, placeholders);
    }

    text.split_inclusive('\n')
        .map(|paragraph| fill_one_paragraph(paragraph, placeholders))
        .collect()
}

fn fill_one_paragraph(paragraph: &str, placeholders: &HashMap<String, String>) -> String {
    let mut filled = paragraph.to_string();
    for (key, value) in placeholders {
        if filled.contains(key.as_str()) {
            filled = filled.replace(key.as_str(), value);
        }
    }
    filled
}

/// Fill the template at `path` and return the resulting document bytes.
#[instrument(skip(placeholders), err)]
pub async fn fill_template(path: &Path, placeholders: &HashMap<String, String>) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path).await.map_err(|e| Error::Processing {
        operation: format!("open template '{}': {e}", path.display()),
    })?;

    let text = String::from_utf8(bytes).map_err(|_| Error::Processing {
        operation: format!("decode template '{}' as UTF-8", path.display()),
    })?;

    Ok(fill_paragraphs(&text, placeholders).into_bytes())
}

/// Encode a filled document for JSON transport.
pub fn encode_document(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}
