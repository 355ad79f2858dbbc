use std::path::Path;

use serde::{Deserialize, Serialize};

use super::citations::strip_citations;
use super::heading::is_heading;
use super::paragraphs::assemble_text;

/// One numbered section of a source file, ready for indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDocument {
    pub section: String,
    pub section_title: String,
    pub source: String,
    pub file_name: String,
    pub text: String,
}

impl SectionDocument {
    /// `"<source> > <section>"`, the label shown next to a retrieved passage.
    pub fn citation_label(&self) -> String {
        format!("{} > {}", self.source, self.section)
    }
}

/// Per-file label: the first non-blank line, unless it is itself a heading
/// (or there is none), in which case the file stem.
pub fn source_label<S: AsRef<str>>(lines: &[S], file_name: &str) -> String {
    let first = lines
        .iter()
        .map(|l| l.as_ref().trim())
        .find(|l| !l.is_empty());
    match first {
        Some(line) if !is_heading(line) => line.to_string(),
        _ => file_stem(file_name),
    }
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// Build the document for one flushed section, or `None` when nothing is left
/// of the body once citations are stripped and paragraphs assembled.
pub fn build_document(
    section: &str,
    title: Option<&str>,
    body: &[String],
    source: &str,
    file_name: &str,
) -> Option<SectionDocument> {
    if body.iter().all(|l| l.trim().is_empty()) {
        return None;
    }
    let text = assemble_text(strip_citations(body));
    if text.is_empty() {
        return None;
    }
    Some(SectionDocument {
        section: section.to_string(),
        section_title: title.unwrap_or_default().to_string(),
        source: source.to_string(),
        file_name: file_name.to_string(),
        text,
    })
}
