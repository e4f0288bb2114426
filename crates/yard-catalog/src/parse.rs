//! Raw catalog records as delivered by the fetch layer.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{
    Category, CategoryDetails, Dimensions, LumberDetails, PriceTier, SheetGoodDetails, Variant,
    VariantGroup,
};
use crate::error::CatalogError;

/// One raw variant record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawVariant {
    pub unique_id: String,
    pub category: String,
    #[serde(default)]
    pub length: Decimal,
    #[serde(default)]
    pub width: Decimal,
    #[serde(default)]
    pub thickness: Decimal,
    #[serde(default)]
    pub weight: Decimal,
    #[serde(default)]
    pub facility_id: String,
    /// `[price, packSize]` pairs.
    #[serde(default)]
    pub prices: Vec<(Decimal, u64)>,
    #[serde(default)]
    pub price_type: Option<String>,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub subheading: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// A zero count upstream means no cap.
    #[serde(default)]
    pub inventory: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    /// Loosely typed upstream; any truthy value means metric.
    #[serde(default)]
    pub metric: Option<serde_json::Value>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub precision: Option<String>,
    #[serde(default)]
    pub finger_joint: Option<String>,
    #[serde(default, rename = "BDFT")]
    pub bdft: Decimal,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub panel_type: Option<String>,
    #[serde(default)]
    pub edge: Option<String>,
    #[serde(default)]
    pub finish: Option<String>,
}

/// A product-group response: keys mapped to raw records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGroup {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Products", default)]
    pub products: BTreeMap<String, Vec<RawVariant>>,
}

impl RawVariant {
    /// Build a variant, reading category-specific fields for `category`.
    pub fn to_variant(&self, category: Category) -> Result<Variant, CatalogError> {
        let details = match category {
            Category::Lumber => CategoryDetails::Lumber(LumberDetails {
                profile: self.profile.clone(),
                grade: self.grade.clone(),
                species: self.species.clone(),
                finger_joint: self.finger_joint.clone(),
                precision: self.precision.clone(),
                treatment: self.treatment.clone(),
                board_feet: self.bdft,
            }),
            Category::SheetGood => CategoryDetails::SheetGood(SheetGoodDetails {
                panel_type: self.panel_type.clone(),
                grade: self.grade.clone(),
                species: self.species.clone(),
                treatment: self.treatment.clone(),
                edge: self.edge.clone(),
                finish: self.finish.clone(),
            }),
        };
        let tiers = self
            .prices
            .iter()
            .map(|(price, pack)| PriceTier::new(*price, *pack))
            .collect();

        let variant = Variant::new(
            self.unique_id.as_str(),
            self.facility_id.as_str(),
            details,
            Dimensions::new(self.length, self.width, self.thickness),
            tiers,
        )?
        .with_weight(self.weight)
        .with_inventory(self.inventory.filter(|&count| count > 0))
        .with_brand(non_empty(&self.brand))
        .with_origin(non_empty(&self.origin))
        .with_metric(self.metric.as_ref().is_some_and(truthy))
        .with_description(non_empty(&self.description))
        .with_listing(
            self.heading.clone(),
            self.subheading.clone(),
            self.image.clone(),
        );
        Ok(variant)
    }
}

/// Parse a batch of records that share the first record's category.
pub fn parse_variants(records: &[RawVariant]) -> Result<Vec<Variant>, CatalogError> {
    let first = records.first().ok_or(CatalogError::NoRecords)?;
    let category = Category::parse(&first.category)
        .ok_or_else(|| CatalogError::UnrecognizedCategory(first.category.clone()))?;
    records.iter().map(|r| r.to_variant(category)).collect()
}

/// Parse a group response; keys with no records are skipped.
pub fn parse_group(raw: &RawGroup) -> Result<VariantGroup, CatalogError> {
    let variants = raw
        .products
        .iter()
        .filter(|(_, records)| !records.is_empty())
        .map(|(key, records)| Ok((key.clone(), parse_variants(records)?)))
        .collect::<Result<BTreeMap<_, _>, CatalogError>>()?;
    VariantGroup::new(raw.id.as_str(), variants)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttrValue, Attribute};
    use serde_json::json;

    fn lumber_record(id: &str, facility: &str) -> serde_json::Value {
        json!({
            "UniqueId": id,
            "Category": "Lumber",
            "Length": 96,
            "Width": 3.5,
            "Thickness": 1.5,
            "Weight": 9.0625,
            "FacilityId": facility,
            "Prices": [[10, 50], [12, 1]],
            "Grade": "#2",
            "Profile": "2x4",
            "Species": "SPF",
            "BDFT": 5.3333,
            "Inventory": 40
        })
    }

    #[test]
    fn test_parse_lumber_batch() {
        let records: Vec<RawVariant> =
            serde_json::from_value(json!([lumber_record("lumber#f1#aaa", "f1")])).unwrap();
        let variants = parse_variants(&records).unwrap();

        let v = &variants[0];
        assert_eq!(v.category(), Category::Lumber);
        assert_eq!(v.tiers()[0].pack_size, 1);
        assert_eq!(v.tiers()[1].unit_price, Decimal::from(10));
        assert_eq!(v.inventory(), Some(40));
        assert_eq!(v.weight(), Decimal::new(9063, 3));
        assert_eq!(v.attribute(Attribute::Species), AttrValue::from("SPF"));
        assert_eq!(v.attribute(Attribute::Treatment), AttrValue::Absent);
        assert_eq!(v.id().terminal(), "aaa");
    }

    #[test]
    fn test_unknown_category() {
        let records = vec![RawVariant {
            unique_id: "x".to_string(),
            category: "Hardware".to_string(),
            prices: vec![(Decimal::ONE, 1)],
            ..Default::default()
        }];
        assert_eq!(
            parse_variants(&records),
            Err(CatalogError::UnrecognizedCategory("Hardware".to_string()))
        );
        assert_eq!(parse_variants(&[]), Err(CatalogError::NoRecords));
    }

    #[test]
    fn test_zero_inventory_reads_as_unlimited() {
        let mut record = lumber_record("lumber#f1#aaa", "f1");
        record["Inventory"] = json!(0);
        let records: Vec<RawVariant> = serde_json::from_value(json!([record])).unwrap();
        let variants = parse_variants(&records).unwrap();

        assert_eq!(variants[0].inventory(), None);
        let engine = crate::pricing::PricingEngine::new(&variants);
        assert!(engine.is_purchasable(1));
        assert!(engine.is_purchasable(500));
    }

    #[test]
    fn test_metric_truthiness() {
        let mut raw = RawVariant {
            unique_id: "p".to_string(),
            category: "sheet_good".to_string(),
            prices: vec![(Decimal::from(40), 1)],
            metric: Some(json!(1)),
            ..Default::default()
        };
        assert!(raw.to_variant(Category::SheetGood).unwrap().is_metric());

        raw.metric = Some(json!(false));
        assert!(!raw.to_variant(Category::SheetGood).unwrap().is_metric());

        raw.metric = None;
        assert!(!raw.to_variant(Category::SheetGood).unwrap().is_metric());
    }

    #[test]
    fn test_parse_group_skips_empty_keys() {
        let raw: RawGroup = serde_json::from_value(json!({
            "Id": "pg1",
            "Products": {
                "aaa": [lumber_record("lumber#f1#aaa", "f1"), lumber_record("lumber#f2#aaa", "f2")],
                "bbb": []
            }
        }))
        .unwrap();

        let group = parse_group(&raw).unwrap();
        assert_eq!(group.id().as_str(), "pg1");
        assert_eq!(group.keys().collect::<Vec<_>>(), vec!["aaa"]);
        assert_eq!(group.get("aaa").map(|v| v.len()), Some(2));
    }
}
