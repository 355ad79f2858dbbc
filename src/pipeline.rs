use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::parser::{FileText, SectionDocument};
use crate::pdf::{PageSource, PdfFile};

const PDF_EXTENSION: &str = "pdf";

/// PDF files directly inside `dir`, sorted by path.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION));
        if is_pdf && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    info!(dir = ?dir, files = paths.len(), "Discovered PDFs");
    Ok(paths)
}

/// Sections of one source whose pages are already at hand.
pub fn process_source(file_name: &str, source: &impl PageSource) -> Result<Vec<SectionDocument>> {
    let pages = source
        .pages()
        .with_context(|| format!("Failed to extract text from {}", file_name))?;
    let file = FileText::from_pages(file_name, &pages);
    let docs = file.split();
    debug!(
        file = file_name,
        pages = pages.len(),
        lines = file.lines.len(),
        bold_lines = file.bold.len(),
        sections = docs.len(),
        "File split"
    );
    Ok(docs)
}

pub fn process_file(path: &Path) -> Result<Vec<SectionDocument>> {
    let file_name = file_name(path);
    let pdf = PdfFile::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    process_source(&file_name, &pdf)
}

/// Split every file in parallel. Output keeps the order of `paths`, then
/// section order within each file. `on_done` runs once per finished file.
pub fn process_files<F>(paths: &[PathBuf], on_done: F) -> Result<Vec<SectionDocument>>
where
    F: Fn(&Path) + Sync,
{
    let per_file: Vec<Result<Vec<SectionDocument>>> = paths
        .par_iter()
        .map(|path| {
            let docs = process_file(path);
            on_done(path);
            docs
        })
        .collect();

    let mut docs = Vec::new();
    for result in per_file {
        docs.extend(result?);
    }
    Ok(docs)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{line_ops, pdf_bytes};
    use crate::pdf::PageText;

    fn write_pdf(dir: &Path, name: &str, lines: &[(&str, bool)]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, pdf_bytes(&[line_ops(lines)])).unwrap();
        path
    }

    #[test]
    fn discovery_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.pdf"), b"").unwrap();
        fs::write(dir.path().join("a.PDF"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("c.pdf")).unwrap();

        let names: Vec<String> = discover_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_pdfs(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn in_memory_source() {
        let pages = vec![PageText {
            text: "Charter\n1. Oaths\nOaths bind.".to_string(),
            bold_text: "1. Oaths".to_string(),
        }];
        let docs = process_source("charter.pdf", &pages).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source, "Charter");
        assert_eq!(docs[0].section_title, "Oaths");
        assert_eq!(docs[0].file_name, "charter.pdf");
    }

    #[test]
    fn files_processed_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        write_pdf(
            dir.path(),
            "b_laws.pdf",
            &[("Second Book", false), ("1. Debts", true), ("Debts are paid.", false)],
        );
        write_pdf(
            dir.path(),
            "a_laws.pdf",
            &[
                ("1. Theft", true),
                ("Thieves hang.", false),
                ("2. Tax Evasion", true),
                ("Evaders are banished.", false),
            ],
        );

        let paths = discover_pdfs(dir.path()).unwrap();
        let done = std::sync::atomic::AtomicUsize::new(0);
        let docs = process_files(&paths, |_| {
            done.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        })
        .unwrap();

        assert_eq!(done.into_inner(), 2);
        let labels: Vec<(String, String)> = docs
            .iter()
            .map(|d| (d.file_name.clone(), d.section.clone()))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("a_laws.pdf".to_string(), "1".to_string()),
                ("a_laws.pdf".to_string(), "2".to_string()),
                ("b_laws.pdf".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(docs[0].source, "a_laws");
        assert_eq!(docs[0].section_title, "Theft");
        assert_eq!(docs[1].section_title, "Tax Evasion");
        assert_eq!(docs[2].source, "Second Book");
    }

    #[test]
    fn unreadable_file_fails_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_pdf(dir.path(), "a.pdf", &[("1. Theft", true), ("Thieves hang.", false)]);
        fs::write(dir.path().join("b.pdf"), b"garbage").unwrap();
        let paths = discover_pdfs(dir.path()).unwrap();
        let err = process_files(&paths, |_| {}).unwrap_err();
        assert!(format!("{:#}", err).contains("b.pdf"));
    }
}
