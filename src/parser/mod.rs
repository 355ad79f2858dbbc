pub mod citations;
pub mod document;
pub mod heading;
pub mod join;
pub mod paragraphs;
pub mod sections;
pub mod title;

pub use document::SectionDocument;
pub use sections::{split_sections, BoldLineSet};

use crate::pdf::PageText;

/// All extracted text of one file, ready to be split.
#[derive(Debug, Clone, Default)]
pub struct FileText {
    pub file_name: String,
    pub lines: Vec<String>,
    pub bold: BoldLineSet,
}

impl FileText {
    /// Two passes: every page's bold lines are collected before the page texts
    /// are joined into one line stream.
    pub fn from_pages(file_name: &str, pages: &[PageText]) -> Self {
        let bold: BoldLineSet = pages
            .iter()
            .flat_map(|p| p.bold_text.lines())
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        let full_text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let lines = full_text.lines().map(str::to_string).collect();

        FileText {
            file_name: file_name.to_string(),
            lines,
            bold,
        }
    }

    pub fn split(&self) -> Vec<SectionDocument> {
        split_sections(&self.lines, &self.bold, &self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str, bold_text: &str) -> PageText {
        PageText {
            text: text.to_string(),
            bold_text: bold_text.to_string(),
        }
    }

    #[test]
    fn pages_joined_and_bold_collected() {
        let pages = [
            page("Code of Laws\n1. Theft\nThieves hang.", "1. Theft\n"),
            page("2. Debts\nDebts are paid.", "  2. Debts  \n\n"),
        ];
        let file = FileText::from_pages("code.pdf", &pages);
        assert_eq!(
            file.lines,
            vec!["Code of Laws", "1. Theft", "Thieves hang.", "2. Debts", "Debts are paid."]
        );
        assert_eq!(file.bold.len(), 2);
        assert!(file.bold.contains("2. Debts"));
    }

    #[test]
    fn bold_evidence_from_later_page_applies_to_earlier_heading() {
        // the heading on page 1 is only confirmed bold by page 2's bold text
        let pages = [
            page("1. Theft\nThieves hang.", ""),
            page("More text here.", "1. Theft"),
        ];
        let docs = FileText::from_pages("code.pdf", &pages).split();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].section_title, "Theft");
        assert_eq!(docs[0].source, "code");
    }

    #[test]
    fn empty_pages_produce_nothing() {
        let file = FileText::from_pages("blank.pdf", &[page("", ""), page("", "")]);
        assert!(file.bold.is_empty());
        assert!(file.split().is_empty());
    }
}
