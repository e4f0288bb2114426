//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while building or querying a catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Category string not recognized.
    #[error("Unrecognized category: {0}")]
    UnrecognizedCategory(String),

    /// Variant has no price tiers.
    #[error("Variant {0} has no price tiers")]
    NoPriceTiers(String),

    /// Pack size must be positive.
    #[error("Variant {0} has a tier with pack size 0")]
    ZeroPackSize(String),

    /// Two tiers share a pack size.
    #[error("Variant {variant} has duplicate pack size {pack_size}")]
    DuplicatePackSize { variant: String, pack_size: u64 },

    /// Unit price must not be negative.
    #[error("Variant {0} has a negative unit price")]
    NegativePrice(String),

    /// Group has no keys.
    #[error("Variant group {0} is empty")]
    EmptyGroup(String),

    /// Key maps to an empty variant list.
    #[error("Key {key} in group {group} has no variants")]
    EmptyKey { group: String, key: String },

    /// Variants in a group disagree on category.
    #[error("Variant group {group} mixes categories {expected} and {found}")]
    MixedCategories {
        group: String,
        expected: String,
        found: String,
    },

    /// Batch of raw records was empty.
    #[error("No records to parse")]
    NoRecords,
}

/// Errors from tier decomposition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Greedy decomposition left a remainder after the smallest tier.
    #[error("Quantity {quantity} leaves {remainder} unfilled after tier decomposition")]
    Indivisible { quantity: u64, remainder: u64 },
}
