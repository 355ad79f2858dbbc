//! Page text provider.
//!
//! Walks each page's content stream and rebuilds its text line by line,
//! remembering which glyph runs were drawn with a bold font. The full page
//! text and the bold-only text come out of the same walk, so a line drawn
//! entirely in bold reads identically in both.
//!
//! Glyph positions come from the text matrix alone. Runs whose baselines
//! agree form one line wherever they were drawn in the stream, and a
//! horizontal gap between runs reads as a space.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;
use tracing::{debug, warn};

/// Kerning (thousandths of an em) beyond which a `TJ` gap reads as a space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;
/// Baselines closer than this belong to the same line.
const Y_TOLERANCE: f32 = 1.0;
/// Estimated glyph width as a fraction of the font size.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;
/// Horizontal gap between runs that reads as a word break.
const MIN_WORD_GAP: f32 = 1.5;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Page {0} has no readable content stream")]
    MissingContent(u32),
}

/// Extracted text of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    /// Every glyph, newline-separated.
    pub text: String,
    /// Only glyphs drawn with a bold font, newline-separated.
    pub bold_text: String,
}

pub trait PageSource {
    fn pages(&self) -> Result<Vec<PageText>, ExtractionError>;
}

impl PageSource for Vec<PageText> {
    fn pages(&self) -> Result<Vec<PageText>, ExtractionError> {
        Ok(self.clone())
    }
}

pub struct PdfFile {
    doc: Document,
}

impl PdfFile {
    pub fn open(path: &Path) -> Result<Self, ExtractionError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractionError> {
        let doc = Document::load_mem(bytes)?;
        Ok(PdfFile { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }
}

impl PageSource for PdfFile {
    fn pages(&self) -> Result<Vec<PageText>, ExtractionError> {
        self.doc
            .get_pages()
            .into_iter()
            .map(|(page_num, page_id)| extract_page(&self.doc, page_num, page_id))
            .collect()
    }
}

/// A piece of text drawn by one show operator, in page space.
#[derive(Debug)]
struct Span {
    text: String,
    bold: bool,
    x: f32,
    y: f32,
    end_x: f32,
}

/// Text-positioning state between `BT` and `ET`. Only the translation part of
/// the line matrix is tracked through `Td`; `Tm` sets the full matrix.
#[derive(Debug)]
struct TextState {
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    font_size: f32,
    leading: f32,
    char_spacing: f32,
    word_spacing: f32,
    bold: bool,
}

impl TextState {
    const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

    fn new() -> Self {
        TextState {
            text_matrix: Self::IDENTITY,
            line_matrix: Self::IDENTITY,
            font_size: 12.0,
            leading: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            bold: false,
        }
    }

    fn begin_text(&mut self) {
        self.text_matrix = Self::IDENTITY;
        self.line_matrix = Self::IDENTITY;
    }

    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    fn translate_line(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.line_matrix;
        self.line_matrix = [a, b, c, d, tx * a + ty * c + e, tx * b + ty * d + f];
        self.text_matrix = self.line_matrix;
    }

    fn set_matrix(&mut self, m: [f32; 6]) {
        self.line_matrix = m;
        self.text_matrix = m;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }

    /// Move along the baseline by `dx` text-space units.
    fn advance(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Estimated width of `text`: no glyph metrics, so every glyph counts as
    /// half an em.
    fn width_of(&self, text: &str) -> f32 {
        text.chars()
            .map(|c| {
                let glyph = self.font_size * APPROX_CHAR_WIDTH_RATIO + self.char_spacing;
                if c == ' ' {
                    glyph + self.word_spacing
                } else {
                    glyph
                }
            })
            .sum()
    }

    fn show(&mut self, text: String, spans: &mut Vec<Span>) {
        let (x, y) = (self.x(), self.y());
        self.advance(self.width_of(&text));
        if !text.is_empty() {
            spans.push(Span { text, bold: self.bold, x, y, end_x: self.x() });
        }
    }

    /// `TJ`: strings interleaved with kerning in thousandths of an em.
    fn show_array(&mut self, items: &[Object], spans: &mut Vec<Span>) {
        let (x, y) = (self.x(), self.y());
        let mut text = String::new();
        for item in items {
            if let Some(s) = string_operand(item) {
                self.advance(self.width_of(&s));
                text.push_str(&s);
            } else if let Ok(k) = item.as_float() {
                if -k > TJ_SPACE_THRESHOLD {
                    text.push(' ');
                }
                self.advance(-k / 1000.0 * self.font_size);
            }
        }
        if !text.is_empty() {
            spans.push(Span { text, bold: self.bold, x, y, end_x: self.x() });
        }
    }
}

#[derive(Debug)]
struct Run {
    text: String,
    bold: bool,
    space_before: bool,
}

/// Spans grouped into lines: same baseline within [`Y_TOLERANCE`], top to
/// bottom, left to right.
fn group_into_lines(mut spans: Vec<Span>) -> Vec<Vec<Run>> {
    spans.sort_by(|a, b| b.y.total_cmp(&a.y));

    let mut rows: Vec<Vec<Span>> = Vec::new();
    for span in spans {
        match rows.last_mut() {
            Some(row) if (row[0].y - span.y).abs() <= Y_TOLERANCE => row.push(span),
            _ => rows.push(vec![span]),
        }
    }

    rows.into_iter()
        .map(|mut row| {
            row.sort_by(|a, b| a.x.total_cmp(&b.x));
            let mut prev_end: Option<f32> = None;
            let mut prev_ends_blank = true;
            row.into_iter()
                .map(|span| {
                    let gap = prev_end.map_or(0.0, |end| span.x - end);
                    let space_before = gap >= MIN_WORD_GAP
                        && !prev_ends_blank
                        && !span.text.starts_with(char::is_whitespace);
                    prev_end = Some(prev_end.map_or(span.end_x, |end| end.max(span.end_x)));
                    prev_ends_blank = span.text.ends_with(char::is_whitespace);
                    Run { text: span.text, bold: span.bold, space_before }
                })
                .collect()
        })
        .collect()
}

/// Join each line's runs, keeping only bold runs when `bold_only`. A dropped
/// regular run between two bold runs leaves a space behind.
fn render(lines: &[Vec<Run>], bold_only: bool) -> String {
    lines
        .iter()
        .map(|line| {
            let mut out = String::new();
            let mut pending_space = false;
            for run in line {
                pending_space |= run.space_before;
                if bold_only && !run.bold {
                    pending_space |= !out.is_empty();
                    continue;
                }
                if pending_space && !out.is_empty() && !out.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
                out.push_str(&run.text);
                pending_space = false;
            }
            out
        })
        .filter(|l| !bold_only || !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn extract_page(
    doc: &Document,
    page_num: u32,
    page_id: ObjectId,
) -> Result<PageText, ExtractionError> {
    let fonts: HashMap<Vec<u8>, bool> = doc
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, is_bold_font(font)))
        .collect();

    let raw = doc
        .get_page_content(page_id)
        .map_err(|_| ExtractionError::MissingContent(page_num))?;
    let content = Content::decode(&raw)?;

    let mut state = TextState::new();
    let mut spans = Vec::new();

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => state.begin_text(),
            "Tf" => {
                state.font_size = operand_f32(op, 1);
                let name = op.operands.first().and_then(|o| o.as_name().ok());
                state.bold = match name.map(|n| (n, fonts.get(n))) {
                    Some((_, Some(&bold))) => bold,
                    Some((n, None)) => {
                        warn!(
                            page = page_num,
                            font = %String::from_utf8_lossy(n),
                            "Font not in page resources, treating as regular"
                        );
                        false
                    }
                    None => false,
                };
            }
            "TL" => state.leading = operand_f32(op, 0),
            "Tc" => state.char_spacing = operand_f32(op, 0),
            "Tw" => state.word_spacing = operand_f32(op, 0),
            "Td" => state.translate_line(operand_f32(op, 0), operand_f32(op, 1)),
            "TD" => {
                state.leading = -operand_f32(op, 1);
                state.translate_line(operand_f32(op, 0), operand_f32(op, 1));
            }
            "Tm" => state.set_matrix(std::array::from_fn(|i| operand_f32(op, i))),
            "T*" => state.next_line(),
            "Tj" => {
                if let Some(text) = op.operands.first().and_then(string_operand) {
                    state.show(text, &mut spans);
                }
            }
            "'" => {
                state.next_line();
                if let Some(text) = op.operands.first().and_then(string_operand) {
                    state.show(text, &mut spans);
                }
            }
            "\"" => {
                state.word_spacing = operand_f32(op, 0);
                state.char_spacing = operand_f32(op, 1);
                state.next_line();
                if let Some(text) = op.operands.get(2).and_then(string_operand) {
                    state.show(text, &mut spans);
                }
            }
            "TJ" => {
                if let Some(Ok(items)) = op.operands.first().map(Object::as_array) {
                    state.show_array(items, &mut spans);
                }
            }
            _ => {}
        }
    }

    let lines = group_into_lines(spans);
    debug!(page = page_num, lines = lines.len(), "Page extracted");
    Ok(PageText {
        text: render(&lines, false),
        bold_text: render(&lines, true),
    })
}

fn is_bold_font(font: &Dictionary) -> bool {
    font.get(b"BaseFont")
        .and_then(Object::as_name)
        .map(|name| String::from_utf8_lossy(name).contains("Bold"))
        .unwrap_or(false)
}

fn operand_f32(op: &Operation, idx: usize) -> f32 {
    op.operands
        .get(idx)
        .and_then(|o| o.as_float().ok())
        .unwrap_or(0.0)
}

fn string_operand(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// UTF-16BE when the string carries a byte-order mark, Latin-1 otherwise.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| win_ansi_char(b)).collect()
}

fn win_ansi_char(b: u8) -> char {
    match b {
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        _ => b as char,
    }
}
