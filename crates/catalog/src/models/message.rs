//! Translatable message model.
//!
//! A message is keyed by its source text and optional disambiguation
//! comment. It carries either one translation or an ordered list of
//! numerus forms, plus a status flag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Translation status, as carried by the `type` attribute of `<translation>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    /// Reviewed translation; no `type` attribute.
    #[default]
    Finished,
    /// Placeholder awaiting a translator.
    Unfinished,
    /// Source string no longer extracted from the application.
    Vanished,
    /// Legacy spelling of `Vanished` used by older tooling.
    Obsolete,
}

impl TranslationStatus {
    /// Value of the `type` attribute, or `None` for finished translations.
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Vanished => Some("vanished"),
            Self::Obsolete => Some("obsolete"),
        }
    }

    /// Whether the application no longer references this message.
    pub fn is_orphaned(self) -> bool {
        matches!(self, Self::Vanished | Self::Obsolete)
    }
}

impl FromStr for TranslationStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Finished),
            "unfinished" => Ok(Self::Unfinished),
            "vanished" => Ok(Self::Vanished),
            "obsolete" => Ok(Self::Obsolete),
            other => Err(CatalogError::invalid_attribute("translation", "type", other)),
        }
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_attr().unwrap_or("finished"))
    }
}

/// Translated text: a single string or plural-sensitive numerus forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Translation {
    Single(String),
    Numerus(Vec<String>),
}

impl Default for Translation {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl Translation {
    /// All translated texts (one for single, every form for numerus).
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(text) => std::slice::from_ref(text),
            Self::Numerus(forms) => forms,
        };
        slice.iter().map(String::as_str)
    }

    /// Whether every text is empty.
    pub fn is_empty(&self) -> bool {
        self.texts().all(str::is_empty)
    }
}

/// A source file reference recorded by the extraction tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Kept as text: lupdate writes relative offsets such as `+3`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

/// One translatable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    /// Disambiguation comment; part of the lookup key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    pub translation: Translation,
    #[serde(default)]
    pub status: TranslationStatus,
}

impl Message {
    /// Create a finished single-form message.
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Translation::Single(translation.into()),
            ..Default::default()
        }
    }

    /// Create a finished plural-sensitive message.
    pub fn numerus<I, S>(source: impl Into<String>, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: source.into(),
            translation: Translation::Numerus(forms.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    /// Set the status.
    pub fn with_status(mut self, status: TranslationStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark as unfinished.
    pub fn unfinished(self) -> Self {
        self.with_status(TranslationStatus::Unfinished)
    }

    /// Set the disambiguation comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Whether this message carries `numerus="yes"`.
    pub fn is_numerus(&self) -> bool {
        matches!(self.translation, Translation::Numerus(_))
    }

    pub fn is_finished(&self) -> bool {
        self.status == TranslationStatus::Finished
    }

    /// Disambiguation comment, empty when absent.
    pub fn comment_str(&self) -> &str {
        self.comment.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_attribute_roundtrip() {
        for status in [
            TranslationStatus::Finished,
            TranslationStatus::Unfinished,
            TranslationStatus::Vanished,
            TranslationStatus::Obsolete,
        ] {
            let attr = status.as_attr().unwrap_or_default();
            assert_eq!(attr.parse::<TranslationStatus>().ok(), Some(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("halfdone".parse::<TranslationStatus>().is_err());
    }

    #[test]
    fn orphaned_statuses() {
        assert!(TranslationStatus::Vanished.is_orphaned());
        assert!(TranslationStatus::Obsolete.is_orphaned());
        assert!(!TranslationStatus::Unfinished.is_orphaned());
    }

    #[test]
    fn numerus_texts_in_order() {
        let msg = Message::numerus("%n day(s) ago", ["il y a %n jour", "il y a %n jours"]);
        assert!(msg.is_numerus());
        let texts: Vec<&str> = msg.translation.texts().collect();
        assert_eq!(texts, vec!["il y a %n jour", "il y a %n jours"]);
    }

    #[test]
    fn empty_translation_detection() {
        assert!(Message::new("Pair Device", "").translation.is_empty());
        assert!(Translation::Numerus(vec![String::new(), String::new()]).is_empty());
        assert!(!Message::new("Cancel", "Annuler").translation.is_empty());
    }
}
