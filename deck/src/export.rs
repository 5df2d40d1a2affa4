//! Output naming and the raw data export.
//!
//! File names derive deterministically from the presentation topic; the
//! JSON export is the literal serialization of the presentation and must
//! round-trip losslessly.

use std::fs;
use std::path::{Path, PathBuf};

use tutor_core::model::Presentation;

use crate::error::DeckResult;
use crate::pdf::render_pdf;

/// Replaces each whitespace run in a topic with a single underscore
pub fn sanitize_topic(topic: &str) -> String {
    let mut out = String::with_capacity(topic.len());
    let mut in_whitespace = false;
    for ch in topic.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

/// File name for the PDF document
pub fn pdf_file_name(topic: &str) -> String {
    format!("{}_presentation.pdf", sanitize_topic(topic))
}

/// File name for the raw data export
pub fn data_file_name(topic: &str) -> String {
    format!("{}_data.json", sanitize_topic(topic))
}

/// Serializes a presentation to its export JSON
pub fn presentation_to_json(presentation: &Presentation) -> DeckResult<String> {
    Ok(serde_json::to_string(presentation)?)
}

/// Writes the PDF document into `dir` and returns its path
pub fn write_presentation_pdf(presentation: &Presentation, dir: &Path) -> DeckResult<PathBuf> {
    let path = dir.join(pdf_file_name(&presentation.topic));
    let bytes = render_pdf(presentation)?;
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Writes the raw data export into `dir` and returns its path
pub fn write_presentation_data(presentation: &Presentation, dir: &Path) -> DeckResult<PathBuf> {
    let path = dir.join(data_file_name(&presentation.topic));
    fs::write(&path, presentation_to_json(presentation)?)?;
    Ok(path)
}
