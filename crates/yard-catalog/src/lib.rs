//! Variant resolution and tiered pricing for lumber and sheet goods.
//!
//! This crate turns a group of supplier variants into shopper-facing
//! choices and prices:
//!
//! - **Catalog**: Variants, categories, attribute values, variant groups
//! - **Trie**: Compressed attribute trie mapping choices to a variant key
//! - **Selector**: Cascade of ambiguous attributes with pluggable defaults
//! - **Pricing**: Tier decomposition, purchasable quantities, suggestions
//! - **Session**: Selection and quantity state for one shopper
//!
//! # Example
//!
//! ```rust,ignore
//! use yard_catalog::prelude::*;
//!
//! let group = parse_group(&raw)?;
//! let mut session = ShopperSession::new(Arc::new(group), Box::new(FirstChoice))?;
//!
//! session.select_option(Attribute::Length, AttrValue::from(120))?;
//! session.set_quantity(40, Direction::Up);
//!
//! if let Some(quote) = session.quote() {
//!     println!("Total: {}", quote.money(Currency::USD));
//! }
//! ```

pub mod error;
pub mod events;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod format;
pub mod parse;
pub mod pricing;
pub mod selector;
pub mod session;
pub mod stable_id;
pub mod trie;

pub use error::{CatalogError, PricingError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CatalogError, PricingError};
    pub use crate::events::{CatalogEvent, EventSink, NullSink, RecordingSink, Severity, TracingSink};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        AttrValue, Attribute, Category, CategoryDetails, Dimensions, LumberDetails, PriceTier,
        SheetGoodDetails, Variant, VariantGroup,
    };
    pub use crate::format::format_distance;
    pub use crate::parse::{parse_group, parse_variants, RawGroup, RawVariant};
    pub use crate::stable_id::stable_id;
    pub use crate::trie::{AttributeTrie, TrieError};

    // Selection
    pub use crate::selector::{
        Cascade, ChoicePolicy, Choices, DefaultChoice, FirstChoice, RandomChoice, ResolveError,
        Selector, SelectorCascade,
    };

    // Pricing
    pub use crate::pricing::{
        cost_for_variant, Direction, PricingConfig, PricingEngine, Quote, Suggestion,
    };
    pub use crate::session::{SessionError, SessionOptions, ShopperSession};
}
