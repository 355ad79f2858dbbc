use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Layered: built-in defaults, then `pdf_sections.toml` if present, then
/// `PDF_SECTIONS_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub docs_dir: PathBuf,
    pub db_path: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("pdf_sections").required(false))
                .add_source(Environment::with_prefix("PDF_SECTIONS")),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let settings = builder
            .set_default("docs_dir", "docs")?
            .set_default("db_path", "data/sections.sqlite")?
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::from_builder(Config::builder()).unwrap();
        assert_eq!(s.docs_dir, PathBuf::from("docs"));
        assert_eq!(s.db_path, PathBuf::from("data/sections.sqlite"));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let builder = Config::builder().set_override("docs_dir", "/srv/laws").unwrap();
        let s = Settings::from_builder(builder).unwrap();
        assert_eq!(s.docs_dir, PathBuf::from("/srv/laws"));
        assert_eq!(s.db_path, PathBuf::from("data/sections.sqlite"));
    }
}
