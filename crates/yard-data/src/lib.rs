//! Catalog fetch boundary.
//!
//! This crate provides:
//! - `CatalogQuery` - Group and single-variant queries with their wire body
//! - `CatalogSource` - Async source of raw catalog responses
//! - `StaticSource` / `JsonFileSource` - In-memory and file-backed sources
//! - `CatalogLoader` - Turns responses into variant groups or "no data"

mod error;
mod loader;
mod request;
mod source;

pub use error::FetchError;
pub use loader::CatalogLoader;
pub use request::{CatalogQuery, QueryBody};
pub use source::{CatalogFile, CatalogSource, JsonFileSource, StaticSource};
