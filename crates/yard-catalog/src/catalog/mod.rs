//! Product catalog module.
//!
//! Contains categories, attribute values, variants and variant groups.

mod attribute;
mod category;
mod group;
mod variant;

pub use attribute::{sort_options, AttrValue};
pub use category::{Attribute, Category, TableRow};
pub use group::VariantGroup;
pub use variant::{
    CategoryDetails, Dimensions, LumberDetails, PriceTier, SheetGoodDetails, Variant,
};
