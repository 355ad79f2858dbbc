use std::collections::HashSet;

use tracing::debug;

use super::document::{build_document, source_label, SectionDocument};
use super::heading::match_heading;
use super::join::push_line;
use super::title::looks_like_title;

/// Trimmed lines made up entirely of bold glyphs, across every page of a file.
pub type BoldLineSet = HashSet<String>;

/// Section currently being filled.
#[derive(Debug)]
struct SectionBuffer {
    number: String,
    title: Option<String>,
    body: Vec<String>,
}

/// Everything the scan of one file mutates. Built fresh per file.
struct SplitContext<'a> {
    bold: &'a BoldLineSet,
    source: String,
    file_name: &'a str,
    current: Option<SectionBuffer>,
    docs: Vec<SectionDocument>,
}

impl<'a> SplitContext<'a> {
    fn new(source: String, file_name: &'a str, bold: &'a BoldLineSet) -> Self {
        SplitContext {
            bold,
            source,
            file_name,
            current: None,
            docs: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        let line = line.trim_end();

        if line.is_empty() {
            // paragraph break, only meaningful inside a section
            if let Some(buf) = self.current.as_mut() {
                buf.body.push(String::new());
            }
            return;
        }

        let trimmed = line.trim_start();
        if let Some(heading) = match_heading(trimmed) {
            self.flush();
            let rest = heading.rest.trim();
            let mut buf = SectionBuffer {
                number: heading.number.to_string(),
                title: None,
                body: Vec::new(),
            };
            if self.bold.contains(trimmed) && looks_like_title(rest) {
                buf.title = Some(rest.to_string());
            } else if !rest.is_empty() {
                buf.body.push(rest.to_string());
            }
            self.current = Some(buf);
            return;
        }

        // Lines before the first heading have nowhere to go.
        if let Some(buf) = self.current.as_mut() {
            push_line(&mut buf.body, line);
        }
    }

    fn flush(&mut self) {
        let Some(buf) = self.current.take() else {
            return;
        };
        match build_document(
            &buf.number,
            buf.title.as_deref(),
            &buf.body,
            &self.source,
            self.file_name,
        ) {
            Some(doc) => self.docs.push(doc),
            None => debug!(file = self.file_name, section = %buf.number, "Empty section skipped"),
        }
    }

    fn finish(mut self) -> Vec<SectionDocument> {
        self.flush();
        self.docs
    }
}

/// Split the line stream of one file into section documents, in encounter order.
pub fn split_sections<S: AsRef<str>>(
    lines: &[S],
    bold: &BoldLineSet,
    file_name: &str,
) -> Vec<SectionDocument> {
    let source = source_label(lines, file_name);
    let mut ctx = SplitContext::new(source, file_name, bold);
    for line in lines {
        ctx.feed(line.as_ref());
    }
    ctx.finish()
}

// ── Tests ──
