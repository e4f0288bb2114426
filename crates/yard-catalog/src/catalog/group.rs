//! Variant groups: every key reachable under one product-group id.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::{Category, Variant};
use crate::error::CatalogError;
use crate::events::{CatalogEvent, EventSink};
use crate::ids::GroupId;
use crate::trie::AttributeTrie;

/// Variants keyed by SKU-like key, plus the derived attribute trie.
///
/// Each key maps to one variant per supplying facility; the first variant
/// of a key is its representative for trie building and selector
/// computation. The trie is rebuilt and swapped whole whenever keys change,
/// so a reader holding [`VariantGroup::trie`] always sees a complete trie.
#[derive(Debug, Clone)]
pub struct VariantGroup {
    id: GroupId,
    variants: BTreeMap<String, Vec<Variant>>,
    category: Category,
    trie: Arc<AttributeTrie>,
}

impl VariantGroup {
    /// Create a group, checking that every key is non-empty and every
    /// variant shares one category.
    pub fn new(
        id: impl Into<GroupId>,
        variants: BTreeMap<String, Vec<Variant>>,
    ) -> Result<Self, CatalogError> {
        let id = id.into();
        let category = variants
            .values()
            .next()
            .and_then(|list| list.first())
            .map(Variant::category)
            .ok_or_else(|| CatalogError::EmptyGroup(id.to_string()))?;

        for (key, list) in &variants {
            check_key(&id, category, key, list)?;
        }

        let trie = Arc::new(build_trie(category, &variants));
        Ok(Self {
            id,
            variants,
            category,
            trie,
        })
    }

    /// A group holding the variants of a single key.
    pub fn single(key: impl Into<String>, variants: Vec<Variant>) -> Result<Self, CatalogError> {
        let key = key.into();
        let mut map = BTreeMap::new();
        map.insert(key.clone(), variants);
        Self::new(key, map)
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    /// Category shared by every variant in the group.
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.variants.contains_key(key)
    }

    /// Variants at `key`, if present.
    pub fn get(&self, key: &str) -> Option<&[Variant]> {
        self.variants.get(key).map(Vec::as_slice)
    }

    /// Variants at `key`; a missing key is reported and yields no variants.
    pub fn variants_for(&self, key: &str, sink: &dyn EventSink) -> &[Variant] {
        match self.get(key) {
            Some(list) => list,
            None => {
                sink.emit(&CatalogEvent::KeyNotFound {
                    group: self.id.to_string(),
                    key: key.to_string(),
                });
                &[]
            }
        }
    }

    /// First variant of every key, in key order.
    pub fn representatives(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values().filter_map(|list| list.first())
    }

    /// Current trie snapshot.
    pub fn trie(&self) -> Arc<AttributeTrie> {
        Arc::clone(&self.trie)
    }

    /// Add or replace one key, then swap in a rebuilt trie.
    pub fn load_key(
        &mut self,
        key: impl Into<String>,
        variants: Vec<Variant>,
    ) -> Result<(), CatalogError> {
        let key = key.into();
        check_key(&self.id, self.category, &key, &variants)?;
        self.variants.insert(key, variants);
        self.trie = Arc::new(build_trie(self.category, &self.variants));
        Ok(())
    }

    /// Add or replace several keys at once with a single trie rebuild.
    ///
    /// Nothing is applied if any key is invalid.
    pub fn load_variants(
        &mut self,
        records: BTreeMap<String, Vec<Variant>>,
    ) -> Result<(), CatalogError> {
        for (key, list) in &records {
            check_key(&self.id, self.category, key, list)?;
        }
        self.variants.extend(records);
        self.trie = Arc::new(build_trie(self.category, &self.variants));
        Ok(())
    }

    /// Report trie path collisions to `sink`.
    pub fn report_collisions(&self, sink: &dyn EventSink) {
        for collision in self.trie.collisions() {
            sink.emit(&CatalogEvent::PathCollision {
                group: self.id.to_string(),
                kept: collision.kept.clone(),
                replaced: collision.replaced.clone(),
            });
        }
    }
}

fn check_key(
    group: &GroupId,
    category: Category,
    key: &str,
    list: &[Variant],
) -> Result<(), CatalogError> {
    if list.is_empty() {
        return Err(CatalogError::EmptyKey {
            group: group.to_string(),
            key: key.to_string(),
        });
    }
    if let Some(other) = list.iter().find(|v| v.category() != category) {
        return Err(CatalogError::MixedCategories {
            group: group.to_string(),
            expected: category.to_string(),
            found: other.category().to_string(),
        });
    }
    Ok(())
}

fn build_trie(category: Category, variants: &BTreeMap<String, Vec<Variant>>) -> AttributeTrie {
    AttributeTrie::build(
        category.identifying_attributes(),
        variants.values().filter_map(|list| list.first()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AttrValue, CategoryDetails, Dimensions, LumberDetails, PriceTier, SheetGoodDetails,
    };
    use crate::events::RecordingSink;
    use rust_decimal::Decimal;

    fn board(id: &str, length: i64) -> Variant {
        Variant::new(
            id,
            "f1",
            CategoryDetails::Lumber(LumberDetails::default()),
            Dimensions::new(Decimal::from(length), Decimal::ONE, Decimal::ONE),
            vec![PriceTier::new(Decimal::ONE, 1)],
        )
        .unwrap()
    }

    fn panel(id: &str) -> Variant {
        Variant::new(
            id,
            "f1",
            CategoryDetails::SheetGood(SheetGoodDetails::default()),
            Dimensions::new(Decimal::from(96), Decimal::from(48), Decimal::ONE),
            vec![PriceTier::new(Decimal::ONE, 1)],
        )
        .unwrap()
    }

    fn group(entries: Vec<(&str, Vec<Variant>)>) -> Result<VariantGroup, CatalogError> {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        VariantGroup::new("pg1", map)
    }

    #[test]
    fn test_category_from_first_variant() {
        let g = group(vec![("aaa", vec![board("aaa", 96)])]).unwrap();
        assert_eq!(g.category(), Category::Lumber);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_rejects_empty_and_mixed() {
        assert!(matches!(group(vec![]), Err(CatalogError::EmptyGroup(_))));
        assert!(matches!(
            group(vec![("aaa", vec![board("aaa", 96)]), ("bbb", vec![])]),
            Err(CatalogError::EmptyKey { .. })
        ));
        assert!(matches!(
            group(vec![("aaa", vec![board("aaa", 96)]), ("bbb", vec![panel("bbb")])]),
            Err(CatalogError::MixedCategories { .. })
        ));
    }

    #[test]
    fn test_missing_key_reports_and_returns_empty() {
        let g = group(vec![("aaa", vec![board("aaa", 96)])]).unwrap();
        let sink = RecordingSink::new();

        assert!(g.variants_for("zzz", &sink).is_empty());
        assert_eq!(sink.names(), vec!["key_not_found"]);
        assert_eq!(g.variants_for("aaa", &sink).len(), 1);
    }

    #[test]
    fn test_load_key_swaps_trie() {
        let mut g = group(vec![("aaa", vec![board("aaa", 96)])]).unwrap();
        let before = g.trie();
        assert!(before.is_trivial());

        g.load_key("bbb", vec![board("bbb", 120)]).unwrap();
        let after = g.trie();

        // The old snapshot is untouched.
        assert!(before.is_trivial());
        assert_eq!(after.resolve(&[AttrValue::from(120)]), Ok("bbb"));
        assert_eq!(after.leaves().len(), 2);
    }

    #[test]
    fn test_load_variants_is_all_or_nothing() {
        let mut g = group(vec![("aaa", vec![board("aaa", 96)])]).unwrap();
        let mut batch = BTreeMap::new();
        batch.insert("bbb".to_string(), vec![board("bbb", 120)]);
        batch.insert("ccc".to_string(), vec![panel("ccc")]);

        assert!(g.load_variants(batch).is_err());
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_report_collisions() {
        let g = group(vec![
            ("aaa", vec![board("aaa", 96)]),
            ("bbb", vec![board("bbb", 96)]),
        ])
        .unwrap();
        let sink = RecordingSink::new();
        g.report_collisions(&sink);
        assert_eq!(sink.names(), vec!["path_collision"]);
    }
}
