//! Parser for the `languages.json` manifest.
//!
//! The manifest maps the display name shown in the language picker to the
//! catalog code stored in the language setting:
//!
//! ```json
//! { "English": "main_en", "Français": "main_fr" }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CatalogError, CatalogResult};

/// Supported languages, ordered by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageManifest {
    languages: BTreeMap<String, String>,
}

impl LanguageManifest {
    /// Parse a manifest file from the given path.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Self::parse_str(&content, path)
    }

    /// Parse a manifest from a JSON string.
    pub fn parse_str(content: &str, path: &Path) -> CatalogResult<Self> {
        let languages: BTreeMap<String, String> =
            serde_json::from_str(content).map_err(|e| CatalogError::InvalidManifest {
                path: path.display().to_string(),
                details: e.to_string(),
            })?;

        let manifest = Self { languages };
        manifest.validate(path)?;
        Ok(manifest)
    }

    fn validate(&self, path: &Path) -> CatalogResult<()> {
        let invalid = |details: String| CatalogError::InvalidManifest {
            path: path.display().to_string(),
            details,
        };

        for (name, code) in &self.languages {
            if name.trim().is_empty() {
                return Err(invalid(format!("empty display name for code '{code}'")));
            }
            if code.is_empty() || code.contains(['/', '\\']) || code.starts_with('.') {
                return Err(invalid(format!("invalid catalog code '{code}' for '{name}'")));
            }
        }
        Ok(())
    }

    /// `(display name, code)` pairs ordered by display name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.languages
            .iter()
            .map(|(name, code)| (name.as_str(), code.as_str()))
    }

    /// Catalog code for a display name.
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.languages.get(name).map(String::as_str)
    }

    /// Display name for a catalog code.
    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.iter().find(|(_, c)| *c == code).map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
