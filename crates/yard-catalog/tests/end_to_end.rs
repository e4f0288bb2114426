//! End-to-end resolution and pricing over parsed catalog data.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use yard_catalog::prelude::*;

fn record(
    id: &str,
    facility: &str,
    length: i64,
    grade: &str,
    prices: serde_json::Value,
) -> serde_json::Value {
    json!({
        "UniqueId": id,
        "Category": "lumber",
        "Length": length,
        "Width": 3.5,
        "Thickness": 1.5,
        "FacilityId": facility,
        "Prices": prices,
        "Profile": "2x4",
        "Grade": grade,
        "Species": "SPF"
    })
}

fn two_by_four_group() -> VariantGroup {
    let mut raw: RawGroup = serde_json::from_value(json!({
        "Id": "pg-2x4",
        "Products": {
            "a": [
                record("lumber#f1#a", "f1", 96, "#2", json!([[12, 1], [10, 50]])),
                record("lumber#f2#a", "f2", 96, "#2", json!([[11, 1]]))
            ],
            "b": [record("lumber#f1#b", "f1", 96, "#1", json!([[14, 1]]))],
            "c": [record("lumber#f1#c", "f1", 120, "#2", json!([[15, 1], [13, 24]]))],
            "d": [record("lumber#f1#d", "f1", 144, "#2", json!([[18, 12]]))]
        }
    }))
    .unwrap();

    // f1 only has 40 pieces of "a"
    raw.products.get_mut("a").unwrap()[0].inventory = Some(40);
    parse_group(&raw).unwrap()
}

#[test]
fn test_facility_with_insufficient_stock_loses() {
    let group = two_by_four_group();
    let variants = group.get("a").unwrap();
    let engine = PricingEngine::new(variants);

    let quote = engine.best_price(50).unwrap();
    assert_eq!(quote.total, Decimal::from(550));
    assert_eq!(quote.variant.facility_id().as_str(), "f2");
}

#[test]
fn test_bulk_tier_wins_when_stocked() {
    let mut group = two_by_four_group();
    let mut variants = group.get("a").unwrap().to_vec();
    variants[0] = variants[0].clone().with_inventory(None);
    group.load_key("a", variants).unwrap();

    let engine = PricingEngine::new(group.get("a").unwrap());
    let quote = engine.best_price(50).unwrap();
    assert_eq!(quote.total, Decimal::from(500));
    assert_eq!(quote.variant.facility_id().as_str(), "f1");
}

#[test]
fn test_trie_has_one_leaf_per_key() {
    let group = two_by_four_group();
    let trie = group.trie();

    let mut leaves = trie.leaves();
    leaves.sort();
    assert_eq!(leaves, group.keys().collect::<Vec<_>>());

    for (path, key) in trie.paths() {
        assert_eq!(trie.resolve(&path), Ok(key));
    }
}

#[test]
fn test_every_key_is_reachable_through_selectors() {
    let group = two_by_four_group();
    let cascade = SelectorCascade::new(&group);

    for (path, key) in group.trie().paths() {
        let mut choices = Choices::new();
        let mut result = cascade.compute(&choices, &mut FirstChoice, &NullSink);
        for (depth, value) in path.iter().enumerate() {
            let selector = &result.selectors[depth];
            choices = selector.choices_with(value.clone());
            result = cascade.compute(&choices, &mut FirstChoice, &NullSink);
        }
        assert_eq!(result.resolved_key(), Some(key));
    }
}

#[test]
fn test_cascade_is_idempotent_and_narrows() {
    let group = two_by_four_group();
    let cascade = SelectorCascade::new(&group);
    let mut policy = RandomChoice::seeded(11);

    for _ in 0..20 {
        let first = cascade.compute(&Choices::new(), &mut policy, &NullSink);
        let again = cascade.compute(&first.choices(), &mut policy, &NullSink);
        assert_eq!(first.selectors, again.selectors);
        assert_eq!(first.resolved, again.resolved);
        assert!(first.candidate_counts.windows(2).all(|w| w[1] <= w[0]));
    }
}

#[test]
fn test_session_walkthrough() {
    let sink = Arc::new(RecordingSink::new());
    let mut session = ShopperSession::with_options(
        Arc::new(two_by_four_group()),
        Box::new(FirstChoice),
        SessionOptions {
            pricing: PricingConfig::default(),
            sink: sink.clone(),
        },
    )
    .unwrap();

    // 96 then "#1" sorts first
    assert_eq!(session.resolved_key(), "b");
    session
        .select_option(Attribute::Grade, AttrValue::from("#2"))
        .unwrap();
    assert_eq!(session.resolved_key(), "a");
    assert_eq!(session.quantity(), 1);
    assert_eq!(session.quote().unwrap().total, Decimal::from(11));

    session
        .select_option(Attribute::Length, AttrValue::from(144))
        .unwrap();
    assert_eq!(session.resolved_key(), "d");
    assert_eq!(session.quantity(), 12);
    assert_eq!(session.decrement(), Some(12));
    assert_eq!(session.increment(), Some(24));
    assert_eq!(session.engine().pack_sizes_label(), "12pc");

    session
        .select_option(Attribute::Length, AttrValue::from(120))
        .unwrap();
    session.set_quantity(20, Direction::Up);
    let suggestion = session.suggestion().unwrap();
    assert_eq!(suggestion.quantity, 24);
    assert_eq!(
        suggestion.message(Currency::USD),
        "Save $48.00 by rounding up to 24 pieces"
    );

    assert!(sink.events().is_empty());
}

#[test]
fn test_no_suggestion_when_larger_quantities_cost_more_per_piece() {
    let group = two_by_four_group();
    let engine = PricingEngine::new(group.get("b").unwrap());
    for q in 1..10 {
        assert!(engine.discount_suggestion(q).is_none());
    }
}

#[test]
fn test_stable_ids_distinguish_keys() {
    let group = two_by_four_group();
    let ids: Vec<String> = group.representatives().map(stable_id).collect();

    assert!(ids.iter().all(|id| id.len() == 10));
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());

    // Facility does not affect the id.
    let a = group.get("a").unwrap();
    assert_eq!(stable_id(&a[0]), stable_id(&a[1]));
}
