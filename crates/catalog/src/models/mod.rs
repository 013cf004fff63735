//! Catalog data models.

pub mod catalog;
pub mod message;

pub use catalog::{Catalog, Context, TS_VERSION};
pub use message::{Location, Message, Translation, TranslationStatus};
