//! Cascade computation and key resolution.

use std::collections::BTreeMap;

use thiserror::Error;

use super::ChoicePolicy;
use crate::catalog::{sort_options, AttrValue, Attribute, Variant, VariantGroup};
use crate::events::{CatalogEvent, EventSink};
use crate::trie::TrieError;

/// Attribute choices fixed so far.
pub type Choices = BTreeMap<Attribute, AttrValue>;

/// Why a cascade could not resolve to a key.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Selector path does not match the attribute trie: {0}")]
    Trie(#[from] TrieError),

    #[error("Resolved key {key} is not in group {group}")]
    KeyNotFound { group: String, key: String },
}

/// One choice point shown to the shopper.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub attribute: Attribute,
    pub display_name: &'static str,
    pub current: AttrValue,
    /// Distinct values still reachable, sorted.
    pub options: Vec<AttrValue>,
    /// Formatted labels for dimension values.
    pub option_labels: BTreeMap<AttrValue, String>,
    /// Choices made by earlier selectors in the cascade.
    pub ancestor_choices: Choices,
}

impl Selector {
    /// Label for an option: the formatted dimension if there is one,
    /// otherwise the value itself.
    pub fn label(&self, value: &AttrValue) -> String {
        self.option_labels
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }

    /// Choices to recompute with after picking `value` here.
    pub fn choices_with(&self, value: AttrValue) -> Choices {
        let mut choices = self.ancestor_choices.clone();
        choices.insert(self.attribute, value);
        choices
    }

    /// Find the option a user typed, by value or by label.
    pub fn option_matching(&self, input: &str) -> Option<&AttrValue> {
        let input = input.trim();
        let parsed = AttrValue::parse(input);
        self.options
            .iter()
            .find(|option| **option == parsed || self.label(option) == input)
    }
}

/// Result of one cascade pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Cascade {
    pub selectors: Vec<Selector>,
    pub resolved: Result<String, ResolveError>,
    /// Candidate representatives remaining after each attribute, in order.
    pub candidate_counts: Vec<usize>,
}

impl Cascade {
    /// The choice set this cascade settled on.
    pub fn choices(&self) -> Choices {
        self.selectors
            .iter()
            .map(|s| (s.attribute, s.current.clone()))
            .collect()
    }

    pub fn selector(&self, attribute: Attribute) -> Option<&Selector> {
        self.selectors.iter().find(|s| s.attribute == attribute)
    }

    pub fn resolved_key(&self) -> Option<&str> {
        self.resolved.as_deref().ok()
    }
}

/// Derives selectors for a group from a partial choice set.
pub struct SelectorCascade<'g> {
    group: &'g VariantGroup,
}

impl<'g> SelectorCascade<'g> {
    pub fn new(group: &'g VariantGroup) -> Self {
        Self { group }
    }

    /// Recompute every selector from scratch and resolve the key.
    ///
    /// Attributes with a single remaining value get no selector and do not
    /// narrow the candidates. A choice outside the remaining values is
    /// replaced by the policy's default.
    pub fn compute(
        &self,
        choices: &Choices,
        policy: &mut dyn ChoicePolicy,
        sink: &dyn EventSink,
    ) -> Cascade {
        let mut candidates: Vec<&Variant> = self.group.representatives().collect();
        let mut ancestors = Choices::new();
        let mut selectors = Vec::new();
        let mut candidate_counts = Vec::new();

        for &attribute in self.group.category().identifying_attributes() {
            let (options, option_labels) = collect_options(attribute, &candidates);
            if options.len() < 2 {
                candidate_counts.push(candidates.len());
                continue;
            }

            let current = pick(attribute, choices.get(&attribute), &options, policy, sink);
            candidates.retain(|v| v.attribute(attribute) == current);
            candidate_counts.push(candidates.len());

            selectors.push(Selector {
                attribute,
                display_name: attribute.display_name(),
                current: current.clone(),
                options,
                option_labels,
                ancestor_choices: ancestors.clone(),
            });
            ancestors.insert(attribute, current);
        }

        let resolved = self.resolve(&selectors, sink);
        Cascade {
            selectors,
            resolved,
            candidate_counts,
        }
    }

    fn resolve(&self, selectors: &[Selector], sink: &dyn EventSink) -> Result<String, ResolveError> {
        let path: Vec<AttrValue> = selectors.iter().map(|s| s.current.clone()).collect();
        let trie = self.group.trie();
        let key = trie.resolve(&path)?;

        if !self.group.contains_key(key) {
            sink.emit(&CatalogEvent::KeyNotFound {
                group: self.group.id().to_string(),
                key: key.to_string(),
            });
            return Err(ResolveError::KeyNotFound {
                group: self.group.id().to_string(),
                key: key.to_string(),
            });
        }
        Ok(key.to_string())
    }
}

fn collect_options(
    attribute: Attribute,
    candidates: &[&Variant],
) -> (Vec<AttrValue>, BTreeMap<AttrValue, String>) {
    let mut options = Vec::new();
    let mut labels = BTreeMap::new();
    for variant in candidates {
        let value = variant.attribute(attribute);
        if options.contains(&value) {
            continue;
        }
        if attribute.is_dimension() && !value.is_absent() {
            if let Some(label) = variant.dimension_label(attribute) {
                labels.insert(value.clone(), label);
            }
        }
        options.push(value);
    }
    sort_options(&mut options);
    (options, labels)
}

fn pick(
    attribute: Attribute,
    requested: Option<&AttrValue>,
    options: &[AttrValue],
    policy: &mut dyn ChoicePolicy,
    sink: &dyn EventSink,
) -> AttrValue {
    if let Some(value) = requested {
        if options.contains(value) {
            return value.clone();
        }
        sink.emit(&CatalogEvent::InvalidChoice {
            attribute,
            value: value.to_string(),
        });
    }
    policy
        .choose_default(attribute, options)
        .or_else(|| options.first())
        .cloned()
        .unwrap_or(AttrValue::Absent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CategoryDetails, Dimensions, LumberDetails, PriceTier};
    use crate::events::{NullSink, RecordingSink};
    use crate::selector::FirstChoice;
    use rust_decimal::Decimal;

    fn board(key: &str, length: i64, grade: &str, species: Option<&str>) -> (String, Vec<Variant>) {
        let v = Variant::new(
            format!("lumber#f1#{key}"),
            "f1",
            CategoryDetails::Lumber(LumberDetails {
                profile: Some("2x4".to_string()),
                grade: Some(grade.to_string()),
                species: species.map(str::to_string),
                ..Default::default()
            }),
            Dimensions::new(Decimal::from(length), Decimal::new(35, 1), Decimal::new(15, 1)),
            vec![PriceTier::new(Decimal::from(5), 1)],
        )
        .unwrap();
        (key.to_string(), vec![v])
    }

    fn group() -> VariantGroup {
        VariantGroup::new(
            "pg-2x4",
            [
                board("a96", 96, "#2", Some("SPF")),
                board("b96", 96, "#1", Some("SPF")),
                board("c120", 120, "#2", Some("SPF")),
                board("d120", 120, "#2", None),
                board("e144", 144, "#2", Some("SPF")),
            ]
            .into_iter()
            .collect(),
        )
        .unwrap()
    }

    fn choices(pairs: &[(Attribute, AttrValue)]) -> Choices {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_selectors_follow_category_order() {
        let group = group();
        let cascade = SelectorCascade::new(&group).compute(&Choices::new(), &mut FirstChoice, &NullSink);

        let attrs: Vec<_> = cascade.selectors.iter().map(|s| s.attribute).collect();
        // Under 96 grade varies; species does not.
        assert_eq!(attrs, vec![Attribute::Length, Attribute::Grade]);
        assert_eq!(cascade.selectors[0].options.len(), 3);
        assert_eq!(cascade.selectors[1].current, AttrValue::from("#1"));
        assert_eq!(cascade.resolved_key(), Some("b96"));
    }

    #[test]
    fn test_dimension_labels() {
        let group = group();
        let cascade = SelectorCascade::new(&group).compute(&Choices::new(), &mut FirstChoice, &NullSink);

        let length = cascade.selector(Attribute::Length).unwrap();
        assert_eq!(length.label(&AttrValue::from(96)), "8ft.");
        assert_eq!(length.label(&AttrValue::from(144)), "12ft.");
        assert_eq!(length.display_name, "Length");

        let grade = cascade.selector(Attribute::Grade).unwrap();
        assert!(grade.option_labels.is_empty());
        assert_eq!(grade.label(&AttrValue::from("#2")), "#2");
    }

    #[test]
    fn test_absent_values_form_a_bucket() {
        let group = group();
        let cascade = SelectorCascade::new(&group).compute(
            &choices(&[(Attribute::Length, AttrValue::from(120))]),
            &mut FirstChoice,
            &NullSink,
        );

        let species = cascade.selector(Attribute::Species).unwrap();
        assert_eq!(
            species.options,
            vec![AttrValue::Absent, AttrValue::from("SPF")]
        );
        assert_eq!(cascade.resolved_key(), Some("d120"));

        let spf = SelectorCascade::new(&group).compute(
            &species.choices_with(AttrValue::from("SPF")),
            &mut FirstChoice,
            &NullSink,
        );
        assert_eq!(spf.resolved_key(), Some("c120"));
    }

    #[test]
    fn test_downstream_recomputed_on_change() {
        let group = group();
        let first = SelectorCascade::new(&group).compute(&Choices::new(), &mut FirstChoice, &NullSink);
        let length = first.selector(Attribute::Length).unwrap();

        let next = SelectorCascade::new(&group).compute(
            &length.choices_with(AttrValue::from(144)),
            &mut FirstChoice,
            &NullSink,
        );
        assert_eq!(next.selectors.len(), 1);
        assert_eq!(next.resolved_key(), Some("e144"));
    }

    #[test]
    fn test_invalid_choice_falls_back_to_policy() {
        let group = group();
        let sink = RecordingSink::new();
        let cascade = SelectorCascade::new(&group).compute(
            &choices(&[(Attribute::Length, AttrValue::from(200))]),
            &mut FirstChoice,
            &sink,
        );

        assert_eq!(cascade.selectors[0].current, AttrValue::from(96));
        assert_eq!(sink.names(), vec!["invalid_choice"]);
    }

    #[test]
    fn test_idempotent_on_resolved_choices() {
        let group = group();
        let mut policy = crate::selector::RandomChoice::seeded(3);
        let first = SelectorCascade::new(&group).compute(&Choices::new(), &mut policy, &NullSink);
        let again = SelectorCascade::new(&group).compute(&first.choices(), &mut policy, &NullSink);
        let third = SelectorCascade::new(&group).compute(&again.choices(), &mut policy, &NullSink);

        assert_eq!(first, again);
        assert_eq!(again, third);
    }

    #[test]
    fn test_candidates_never_grow() {
        let group = group();
        let cascade = SelectorCascade::new(&group).compute(&Choices::new(), &mut FirstChoice, &NullSink);
        assert!(cascade.candidate_counts.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(cascade.candidate_counts.last(), Some(&1));
    }

    #[test]
    fn test_option_matching() {
        let group = group();
        let cascade = SelectorCascade::new(&group).compute(&Choices::new(), &mut FirstChoice, &NullSink);
        let length = cascade.selector(Attribute::Length).unwrap();

        assert_eq!(length.option_matching("120"), Some(&AttrValue::from(120)));
        assert_eq!(length.option_matching("12ft."), Some(&AttrValue::from(144)));
        assert_eq!(length.option_matching("7"), None);
    }

    #[test]
    fn test_single_key_group_resolves_without_selectors() {
        let (key, variants) = board("only", 96, "#2", Some("SPF"));
        let group = VariantGroup::single(key, variants).unwrap();
        let cascade = SelectorCascade::new(&group).compute(&Choices::new(), &mut FirstChoice, &NullSink);

        assert!(cascade.selectors.is_empty());
        assert_eq!(cascade.resolved_key(), Some("only"));
    }

    #[test]
    fn test_leaf_id_missing_from_group() {
        // The leaf stores the id's terminal, which here differs from the map key.
        let (_, mismatched) = board("zzz", 120, "#2", Some("SPF"));
        let group = VariantGroup::new(
            "pg",
            [board("a", 96, "#2", Some("SPF")), ("b".to_string(), mismatched)]
                .into_iter()
                .collect(),
        )
        .unwrap();
        let sink = RecordingSink::new();

        let cascade = SelectorCascade::new(&group).compute(
            &choices(&[(Attribute::Length, AttrValue::from(120))]),
            &mut FirstChoice,
            &sink,
        );
        assert_eq!(
            cascade.resolved,
            Err(ResolveError::KeyNotFound {
                group: "pg".to_string(),
                key: "zzz".to_string(),
            })
        );
        assert_eq!(cascade.resolved_key(), None);
        assert_eq!(sink.names(), vec!["key_not_found"]);
    }
}
