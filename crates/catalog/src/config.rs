//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `.ts` catalogs (default: ./translations).
    pub translations_dir: PathBuf,

    /// Catalog code used when none is requested (default: main_en).
    pub default_language: String,

    /// Catalog consulted when the requested one has no translation.
    pub fallback_language: Option<String>,

    /// Serve unfinished translations that carry text (default: false).
    pub include_unfinished: bool,

    /// Explicit path to the languages manifest. When unset the manifest is
    /// `<translations_dir>/languages.json`.
    pub languages_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translations_dir: PathBuf::from("./translations"),
            languages_file: None,
            default_language: "main_en".to_string(),
            fallback_language: None,
            include_unfinished: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let translations_dir = var("TSCAT_TRANSLATIONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./translations"));

        let default_language =
            var("TSCAT_DEFAULT_LANGUAGE").unwrap_or_else(|| "main_en".to_string());

        let fallback_language = var("TSCAT_FALLBACK_LANGUAGE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let include_unfinished = var("TSCAT_INCLUDE_UNFINISHED")
            .map(|v| parse_bool(&v))
            .transpose()
            .context("TSCAT_INCLUDE_UNFINISHED must be true or false")?
            .unwrap_or(false);

        let languages_file = var("TSCAT_LANGUAGES_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            translations_dir,
            default_language,
            fallback_language,
            include_unfinished,
            languages_file,
        })
    }

    /// Location of the languages manifest.
    pub fn languages_path(&self) -> PathBuf {
        self.languages_file
            .clone()
            .unwrap_or_else(|| self.translations_dir.join("languages.json"))
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid boolean '{other}'"),
    }
}
