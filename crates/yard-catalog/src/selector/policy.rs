//! Default-choice policies for selectors the shopper has not set.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::catalog::{AttrValue, Attribute};

/// Picks a selector's value when the caller gave none.
pub trait ChoicePolicy: Send {
    /// Choose one of `options`, which are sorted and hold at least two values.
    fn choose_default<'v>(
        &mut self,
        attribute: Attribute,
        options: &'v [AttrValue],
    ) -> Option<&'v AttrValue>;
}

/// Uniform random pick. Placeholder until merchandising weights exist.
#[derive(Debug, Clone)]
pub struct RandomChoice {
    rng: StdRng,
}

impl RandomChoice {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible picks for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomChoice {
    fn default() -> Self {
        Self::new()
    }
}

impl ChoicePolicy for RandomChoice {
    fn choose_default<'v>(
        &mut self,
        _attribute: Attribute,
        options: &'v [AttrValue],
    ) -> Option<&'v AttrValue> {
        options.choose(&mut self.rng)
    }
}

/// Always the first (lowest) option.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChoice;

impl ChoicePolicy for FirstChoice {
    fn choose_default<'v>(
        &mut self,
        _attribute: Attribute,
        options: &'v [AttrValue],
    ) -> Option<&'v AttrValue> {
        options.first()
    }
}

/// Configured default-choice policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultChoice {
    #[default]
    Random,
    First,
}

impl DefaultChoice {
    pub fn into_policy(self) -> Box<dyn ChoicePolicy> {
        match self {
            DefaultChoice::Random => Box::new(RandomChoice::new()),
            DefaultChoice::First => Box::new(FirstChoice),
        }
    }
}
