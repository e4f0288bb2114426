//! Selector cascade: one choice point per ambiguous attribute.

mod cascade;
mod policy;

pub use cascade::{Cascade, Choices, ResolveError, Selector, SelectorCascade};
pub use policy::{ChoicePolicy, DefaultChoice, FirstChoice, RandomChoice};
