//! Catalog queries and their wire body.

use std::fmt;

use serde::Serialize;

/// A request for catalog data. Ids are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogQuery {
    /// Every key under a product-group id.
    Group(String),
    /// The facility variants of one id.
    Variant(String),
}

impl CatalogQuery {
    pub fn group(id: impl AsRef<str>) -> Self {
        CatalogQuery::Group(id.as_ref().to_lowercase())
    }

    pub fn variant(id: impl AsRef<str>) -> Self {
        CatalogQuery::Variant(id.as_ref().to_lowercase())
    }

    pub fn id(&self) -> &str {
        match self {
            CatalogQuery::Group(id) | CatalogQuery::Variant(id) => id,
        }
    }

    /// Request body sent to the catalog service.
    pub fn body(&self) -> QueryBody<'_> {
        match self {
            CatalogQuery::Group(pgid) => QueryBody::GetProductsByPgid { pgid },
            CatalogQuery::Variant(id) => QueryBody::GetProductById { id },
        }
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogQuery::Group(id) => write!(f, "group {id}"),
            CatalogQuery::Variant(id) => write!(f, "variant {id}"),
        }
    }
}

/// JSON body of a catalog request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action")]
pub enum QueryBody<'a> {
    #[serde(rename = "getProductsByPGID")]
    GetProductsByPgid { pgid: &'a str },
    #[serde(rename = "getProductById")]
    GetProductById { id: &'a str },
}
