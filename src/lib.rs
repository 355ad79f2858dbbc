//! Split extracted PDF text into numbered, titled section documents.

pub mod db;
pub mod parser;
pub mod pdf;
pub mod pipeline;
pub mod settings;

pub use parser::{split_sections, BoldLineSet, FileText, SectionDocument};
pub use pdf::{ExtractionError, PageSource, PageText, PdfFile};
