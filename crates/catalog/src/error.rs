//! Catalog error types with clear, actionable messages.
//!
//! Errors are only raised while reading or writing catalog files. Lookups
//! never fail; they fall back to the source text instead.

use thiserror::Error;

/// Errors that can occur while loading or parsing a translation catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("catalog '{path}': failed to read file: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("malformed XML at byte {position}: {details}")]
    Xml { position: usize, details: String },

    /// The root element is not `<TS>`.
    #[error("expected root element <TS>, found <{found}>")]
    UnexpectedRoot { found: String },

    /// The document ended before the root element was closed.
    #[error("unexpected end of document inside <{element}>")]
    UnexpectedEof { element: String },

    /// A `<context>` element has no `<name>`.
    #[error("context #{index} has no <name> element")]
    MissingContextName { index: usize },

    /// A `<message>` element has no `<source>`.
    #[error("context '{context}': message #{index} has no <source> element")]
    MissingSource { context: String, index: usize },

    /// A `<numerusform>` appeared in a message not marked `numerus="yes"`.
    #[error("context '{context}': message '{source_text}' has numerus forms but is not marked numerus=\"yes\"")]
    UnexpectedNumerus { context: String, source_text: String },

    /// An attribute carried a value the format does not define.
    #[error("invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    /// The languages manifest could not be parsed.
    #[error("languages manifest '{path}': {details}")]
    InvalidManifest { path: String, details: String },
}

impl CatalogError {
    /// Create an I/O error for the given path.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create an XML error from a quick-xml failure at a byte offset.
    pub fn xml(position: usize, err: impl std::fmt::Display) -> Self {
        Self::Xml {
            position,
            details: err.to_string(),
        }
    }

    /// Create an invalid attribute error.
    pub fn invalid_attribute(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Result type alias using CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;
