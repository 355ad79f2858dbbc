use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pdf_sections::settings::Settings;
use pdf_sections::{db, pipeline, SectionDocument};

#[derive(Parser)]
#[command(name = "pdf_sections", about = "Split PDFs into numbered section documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse PDFs and print the sections found
    Split {
        /// Directory to scan for PDFs (default: settings docs_dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Parse PDFs and write sections as JSON Lines
    Export {
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Parse PDFs and store sections in the database
    Save {
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Show stored section counts per file
    Stats,
    /// Print stored sections of one file
    Show {
        /// File name as stored, e.g. "laws.pdf"
        #[arg(short, long)]
        file: String,
        /// Only this section number
        #[arg(short, long)]
        section: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(docs_dir = ?settings.docs_dir, db_path = ?settings.db_path, "Settings loaded");

    let result = match cli.command {
        Commands::Split { dir, limit } => {
            let docs = parse_dir(dir.as_deref().unwrap_or(settings.docs_dir.as_path()))?;
            if docs.is_empty() {
                println!("No sections found.");
                return Ok(());
            }
            print_table(&docs, limit);
            Ok(())
        }
        Commands::Export { dir, out } => {
            let docs = parse_dir(dir.as_deref().unwrap_or(settings.docs_dir.as_path()))?;
            match out {
                Some(path) => {
                    let file = fs::File::create(&path)
                        .with_context(|| format!("Failed to create {:?}", path))?;
                    write_jsonl(BufWriter::new(file), &docs)?;
                    eprintln!("Wrote {} sections to {:?}", docs.len(), path);
                }
                None => write_jsonl(io::stdout().lock(), &docs)?,
            }
            Ok(())
        }
        Commands::Save { dir } => {
            let docs = parse_dir(dir.as_deref().unwrap_or(settings.docs_dir.as_path()))?;
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let saved = db::save_documents(&conn, &docs)?;
            println!("Saved {} sections to {:?}.", saved, settings.db_path);
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let stats = db::get_stats(&conn)?;
            if stats.is_empty() {
                println!("No sections stored. Run 'save' first.");
                return Ok(());
            }
            println!(
                "{:<28} | {:<32} | {:>8} | {:>6} | {:>8}",
                "File", "Source", "Sections", "Titled", "Chars"
            );
            println!("{}", "-".repeat(92));
            for s in &stats {
                println!(
                    "{:<28} | {:<32} | {:>8} | {:>6} | {:>8}",
                    clip(&s.file_name, 28),
                    clip(&s.source, 32),
                    s.sections,
                    s.titled,
                    s.chars
                );
            }
            Ok(())
        }
        Commands::Show { file, section } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let docs = match section.as_deref() {
                Some(number) => db::find_section(&conn, &file, number)?,
                None => db::fetch_documents(&conn, Some(file.as_str()))?,
            };
            if docs.is_empty() {
                println!("No stored sections for {}.", file);
                return Ok(());
            }
            for doc in &docs {
                if doc.section_title.is_empty() {
                    println!("── {} ──", doc.citation_label());
                } else {
                    println!("── {} ({}) ──", doc.citation_label(), doc.section_title);
                }
                println!("{}\n", doc.text);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn parse_dir(dir: &Path) -> Result<Vec<SectionDocument>> {
    let paths = pipeline::discover_pdfs(dir)?;
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let docs = pipeline::process_files(&paths, |_| pb.inc(1));
    pb.finish_and_clear();

    let docs = docs?;
    info!(files = paths.len(), sections = docs.len(), "Parsed PDFs");
    Ok(docs)
}

fn write_jsonl<W: Write>(mut w: W, docs: &[SectionDocument]) -> Result<()> {
    for doc in docs {
        serde_json::to_writer(&mut w, doc)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

fn print_table(docs: &[SectionDocument], limit: usize) {
    println!(
        "{:>3} | {:<8} | {:<24} | {:<24} | {:<20} | {:>6}",
        "#", "Section", "Title", "Source", "File", "Chars"
    );
    println!("{}", "-".repeat(100));

    for (i, d) in docs.iter().take(limit).enumerate() {
        println!(
            "{:>3} | {:<8} | {:<24} | {:<24} | {:<20} | {:>6}",
            i + 1,
            clip(&d.section, 8),
            clip(&d.section_title, 24),
            clip(&d.source, 24),
            clip(&d.file_name, 20),
            d.text.chars().count()
        );
    }

    if docs.len() > limit {
        println!("... {} more", docs.len() - limit);
    }
    println!("\n{} sections", docs.len());
}

/// Fit `s` into `width` columns, marking a cut with a trailing ellipsis.
fn clip(s: &str, width: usize) -> String {
    match s.char_indices().nth(width) {
        None => s.to_string(),
        Some(_) => {
            let kept: String = s.chars().take(width.saturating_sub(1)).collect();
            format!("{}…", kept.trim_end())
        }
    }
}
