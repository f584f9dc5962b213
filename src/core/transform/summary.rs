//! Summary extraction

use super::markup::{first_paragraph_text, inner_text};
use crate::domain::Result;

/// Synthesized summary of a raw field value
///
/// The text of the first `<p>` when there is one, otherwise the text of the
/// whole fragment.
///
/// # Errors
///
/// Returns [`crate::domain::XtractorError::Markup`] when the fragment
/// cannot be read.
pub fn summary_of(raw: &str) -> Result<String> {
    match first_paragraph_text(raw)? {
        Some(text) => Ok(text),
        None => inner_text(raw),
    }
}
