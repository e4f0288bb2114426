//! Shopper session: selection state, quantity, and price for one group.

use std::sync::Arc;

use thiserror::Error;

use crate::catalog::{AttrValue, Attribute, Variant, VariantGroup};
use crate::events::{EventSink, TracingSink};
use crate::ids::SessionId;
use crate::pricing::{Direction, PricingConfig, PricingEngine, Quote, Suggestion};
use crate::selector::{Cascade, ChoicePolicy, Choices, ResolveError, Selector, SelectorCascade};

/// Errors from session interactions. The session state is unchanged when
/// one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("No selector for attribute {0}")]
    UnknownSelector(Attribute),
}

/// Session knobs.
#[derive(Clone)]
pub struct SessionOptions {
    pub pricing: PricingConfig,
    pub sink: Arc<dyn EventSink>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            sink: Arc::new(TracingSink),
        }
    }
}

/// Current selection, resolved key, and quantity for one shopper.
///
/// Every selection change recomputes the cascade from scratch and resets
/// the quantity to the first purchasable one. Quantity changes only
/// re-run pricing.
pub struct ShopperSession {
    id: SessionId,
    group: Arc<VariantGroup>,
    policy: Box<dyn ChoicePolicy>,
    sink: Arc<dyn EventSink>,
    pricing: PricingConfig,
    cascade: Cascade,
    key: String,
    quantity: u64,
}

impl ShopperSession {
    pub fn new(
        group: Arc<VariantGroup>,
        policy: Box<dyn ChoicePolicy>,
    ) -> Result<Self, SessionError> {
        Self::with_options(group, policy, SessionOptions::default())
    }

    pub fn with_options(
        group: Arc<VariantGroup>,
        mut policy: Box<dyn ChoicePolicy>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let cascade =
            SelectorCascade::new(&group).compute(&Choices::new(), policy.as_mut(), &*options.sink);
        let key = cascade.resolved.clone()?;

        let mut session = Self {
            id: SessionId::generate(),
            group,
            policy,
            sink: options.sink,
            pricing: options.pricing,
            cascade,
            key,
            quantity: 0,
        };
        session.reset_quantity();
        Ok(session)
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn group(&self) -> &VariantGroup {
        &self.group
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.cascade.selectors
    }

    pub fn choices(&self) -> Choices {
        self.cascade.choices()
    }

    pub fn resolved_key(&self) -> &str {
        &self.key
    }

    /// Facility variants at the resolved key.
    pub fn variants(&self) -> &[Variant] {
        self.group.get(&self.key).unwrap_or_default()
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Recompute selectors with `choices`. On failure nothing changes.
    pub fn apply_choices(&mut self, choices: &Choices) -> Result<(), SessionError> {
        let cascade =
            SelectorCascade::new(&self.group).compute(choices, self.policy.as_mut(), &*self.sink);
        let key = cascade.resolved.clone()?;

        self.cascade = cascade;
        self.key = key;
        self.reset_quantity();
        Ok(())
    }

    /// Pick `value` on the selector for `attribute`, keeping the choices
    /// made upstream of it.
    pub fn select_option(
        &mut self,
        attribute: Attribute,
        value: AttrValue,
    ) -> Result<(), SessionError> {
        let choices = self
            .cascade
            .selector(attribute)
            .ok_or(SessionError::UnknownSelector(attribute))?
            .choices_with(value);
        self.apply_choices(&choices)
    }

    /// Move to the nearest purchasable quantity from `value`. Returns the
    /// new quantity, or `None` (quantity unchanged) if nothing qualifies.
    pub fn set_quantity(&mut self, value: u64, direction: Direction) -> Option<u64> {
        let next = self.engine().next_allowed_quantity(value, direction)?;
        self.quantity = next;
        Some(next)
    }

    pub fn increment(&mut self) -> Option<u64> {
        self.set_quantity(self.quantity.saturating_add(1), Direction::Up)
    }

    pub fn decrement(&mut self) -> Option<u64> {
        self.set_quantity(self.quantity.saturating_sub(1), Direction::Down)
    }

    /// Best total for the current quantity.
    pub fn quote(&self) -> Option<Quote<'_>> {
        self.engine().best_price(self.quantity)
    }

    pub fn suggestion(&self) -> Option<Suggestion> {
        self.engine().discount_suggestion(self.quantity)
    }

    pub fn engine(&self) -> PricingEngine<'_> {
        PricingEngine::new(self.variants())
            .with_config(self.pricing)
            .with_sink(&*self.sink)
    }

    fn reset_quantity(&mut self) {
        self.quantity = self
            .engine()
            .next_allowed_quantity(1, Direction::Up)
            .unwrap_or(0);
    }
}

impl std::fmt::Debug for ShopperSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopperSession")
            .field("id", &self.id)
            .field("group", self.group.id())
            .field("key", &self.key)
            .field("quantity", &self.quantity)
            .finish()
    }
}
