//! Loading variant groups from a catalog source.

use std::sync::Arc;

use serde_json::Value;
use yard_catalog::catalog::{Variant, VariantGroup};
use yard_catalog::events::{CatalogEvent, EventSink, TracingSink};
use yard_catalog::parse::{parse_group, parse_variants, RawGroup, RawVariant};
use yard_catalog::CatalogError;

use crate::request::CatalogQuery;
use crate::source::CatalogSource;

/// Fetches and parses catalog data.
///
/// Every failure (fetch error, wrong shape, empty payload, unknown
/// category) is reported to the event sink and comes back as "no data":
/// `None` for groups, an empty list for variants. Nothing is retried.
pub struct CatalogLoader<S> {
    source: S,
    sink: Arc<dyn EventSink>,
}

impl<S: CatalogSource> CatalogLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Every key under a product-group id.
    pub async fn load_group(&self, id: &str) -> Option<VariantGroup> {
        let query = CatalogQuery::group(id);
        let value = self.fetch(&query).await?;

        let raw: RawGroup = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                self.no_data(&query, e.to_string());
                return None;
            }
        };
        if raw.products.values().all(Vec::is_empty) {
            self.no_data(&query, "response has no products".to_string());
            return None;
        }

        match parse_group(&raw) {
            Ok(group) => {
                group.report_collisions(&*self.sink);
                tracing::debug!(group = %group.id(), keys = group.len(), "group loaded");
                Some(group)
            }
            Err(e) => {
                self.parse_failed(&query, e);
                None
            }
        }
    }

    /// The facility variants of one id.
    pub async fn load_variant(&self, id: &str) -> Vec<Variant> {
        let query = CatalogQuery::variant(id);
        let Some(value) = self.fetch(&query).await else {
            return Vec::new();
        };

        let records: Vec<RawVariant> = match serde_json::from_value(value) {
            Ok(records) => records,
            Err(e) => {
                self.no_data(&query, e.to_string());
                return Vec::new();
            }
        };
        if records.is_empty() {
            self.no_data(&query, "response has no records".to_string());
            return Vec::new();
        }

        parse_variants(&records).unwrap_or_else(|e| {
            self.parse_failed(&query, e);
            Vec::new()
        })
    }

    /// A group holding one id's variants under that id.
    pub async fn load_variant_group(&self, id: &str) -> Option<VariantGroup> {
        let variants = self.load_variant(id).await;
        if variants.is_empty() {
            return None;
        }
        let query = CatalogQuery::variant(id);
        VariantGroup::single(query.id(), variants)
            .map_err(|e| self.parse_failed(&query, e))
            .ok()
    }

    async fn fetch(&self, query: &CatalogQuery) -> Option<Value> {
        match self.source.fetch(query).await {
            Ok(value) => Some(value),
            Err(e) => {
                self.no_data(query, e.to_string());
                None
            }
        }
    }

    fn parse_failed(&self, query: &CatalogQuery, error: CatalogError) {
        match error {
            CatalogError::UnrecognizedCategory(category) => {
                self.sink.emit(&CatalogEvent::UnrecognizedCategory { category });
            }
            other => self.no_data(query, other.to_string()),
        }
    }

    fn no_data(&self, query: &CatalogQuery, reason: String) {
        self.sink.emit(&CatalogEvent::NoData {
            query: query.to_string(),
            reason,
        });
    }
}
