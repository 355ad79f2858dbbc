use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::parser::SectionDocument;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS section_documents (
            id            INTEGER PRIMARY KEY,
            file_name     TEXT NOT NULL,
            position      INTEGER NOT NULL,
            section       TEXT NOT NULL,
            section_title TEXT NOT NULL DEFAULT '',
            source        TEXT NOT NULL,
            text          TEXT NOT NULL CHECK(length(trim(text)) > 0),
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(file_name, position)
        );
        CREATE INDEX IF NOT EXISTS idx_docs_section ON section_documents(file_name, section);
        ",
    )?;
    Ok(())
}

/// Replace the stored sections of every file present in `docs`. Position is
/// the section's index within its file, since numbers may repeat.
pub fn save_documents(conn: &Connection, docs: &[SectionDocument]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut positions: BTreeMap<&str, i64> = BTreeMap::new();
    let mut count = 0;
    {
        let mut delete = tx.prepare("DELETE FROM section_documents WHERE file_name = ?1")?;
        let mut insert = tx.prepare(
            "INSERT INTO section_documents (file_name, position, section, section_title, source, text)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for doc in docs {
            let position = positions.entry(doc.file_name.as_str()).or_insert(-1);
            if *position < 0 {
                delete.execute(params![doc.file_name])?;
            }
            *position += 1;
            count += insert.execute(params![
                doc.file_name,
                *position,
                doc.section,
                doc.section_title,
                doc.source,
                doc.text,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_documents(conn: &Connection, file_name: Option<&str>) -> Result<Vec<SectionDocument>> {
    let mut stmt = conn.prepare(
        "SELECT section, section_title, source, file_name, text
         FROM section_documents
         WHERE ?1 IS NULL OR file_name = ?1
         ORDER BY file_name, position",
    )?;
    let rows = stmt
        .query_map(params![file_name], row_to_document)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Every stored section of `file_name` numbered `section`.
pub fn find_section(conn: &Connection, file_name: &str, section: &str) -> Result<Vec<SectionDocument>> {
    let mut stmt = conn.prepare(
        "SELECT section, section_title, source, file_name, text
         FROM section_documents
         WHERE file_name = ?1 AND section = ?2
         ORDER BY position",
    )?;
    let rows = stmt
        .query_map(params![file_name, section], row_to_document)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<SectionDocument> {
    Ok(SectionDocument {
        section: row.get(0)?,
        section_title: row.get(1)?,
        source: row.get(2)?,
        file_name: row.get(3)?,
        text: row.get(4)?,
    })
}

pub struct FileStats {
    pub file_name: String,
    pub source: String,
    pub sections: usize,
    pub titled: usize,
    pub chars: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Vec<FileStats>> {
    let mut stmt = conn.prepare(
        "SELECT file_name, MIN(source), COUNT(*),
                SUM(CASE WHEN section_title != '' THEN 1 ELSE 0 END),
                SUM(length(text))
         FROM section_documents
         GROUP BY file_name
         ORDER BY file_name",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(FileStats {
                file_name: row.get(0)?,
                source: row.get(1)?,
                sections: row.get::<_, i64>(2)? as usize,
                titled: row.get::<_, i64>(3)? as usize,
                chars: row.get::<_, i64>(4)? as usize,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
