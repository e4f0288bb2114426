//! Catalog sources.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::request::CatalogQuery;

/// Something that can answer catalog queries with raw JSON.
///
/// Group queries answer `{ "Id": ..., "Products": { key: [records] } }`;
/// variant queries answer an array of records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Value, FetchError>;
}

/// In-memory source.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    responses: HashMap<CatalogQuery, Value>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, id: &str, response: Value) -> Self {
        self.responses.insert(CatalogQuery::group(id), response);
        self
    }

    pub fn with_variant(mut self, id: &str, records: Value) -> Self {
        self.responses.insert(CatalogQuery::variant(id), records);
        self
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Value, FetchError> {
        self.responses
            .get(query)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(query.to_string()))
    }
}

/// On-disk catalog layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub groups: BTreeMap<String, Value>,
    #[serde(default)]
    pub variants: BTreeMap<String, Value>,
}

impl CatalogFile {
    /// Look up a query; stored ids match case-insensitively.
    pub fn lookup(&self, query: &CatalogQuery) -> Option<&Value> {
        let table = match query {
            CatalogQuery::Group(_) => &self.groups,
            CatalogQuery::Variant(_) => &self.variants,
        };
        table
            .iter()
            .find(|(id, _)| id.to_lowercase() == query.id())
            .map(|(_, value)| value)
    }
}

/// Source backed by a JSON file, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<CatalogFile, FetchError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl CatalogSource for JsonFileSource {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Value, FetchError> {
        let file = self.read().await?;
        tracing::debug!(path = %self.path.display(), %query, "catalog file read");
        file.lookup(query)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(query.to_string()))
    }
}
