//! Catalog services.
//!
//! Reading and writing `.ts` files, resolving lookups, and checking data
//! quality. Everything here operates on the models in `crate::models`.

pub mod coverage;
pub mod languages;
pub mod locale;
pub mod placeholder;
pub mod plural;
pub mod ts_parser;
pub mod ts_writer;
pub mod validate;
