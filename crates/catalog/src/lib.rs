//! tscat: Qt Linguist translation catalogs.
//!
//! Parses and writes `.ts` files, resolves translations with plural forms
//! and placeholder substitution, and validates catalog data quality.
//! The `tscat` binary wraps these for the command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{CatalogError, CatalogResult};
pub use models::{Catalog, Context, Message, Translation, TranslationStatus};
pub use services::locale::{LocaleService, TranslationTable};
pub use services::ts_parser::{load_ts, parse_ts};
pub use services::ts_writer::{save_ts, write_ts};
