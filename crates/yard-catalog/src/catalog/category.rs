//! Product categories and their attribute tables.
//!
//! Each category fixes the ordered list of identifying attributes. That
//! order drives stable-id hashing, attribute-trie branching and selector
//! order, so the three always agree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Lumber,
    SheetGood,
}

impl Category {
    /// Wire name (e.g., "sheet_good").
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Lumber => "lumber",
            Category::SheetGood => "sheet_good",
        }
    }

    /// Parse a wire name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lumber" => Some(Category::Lumber),
            "sheet_good" => Some(Category::SheetGood),
            _ => None,
        }
    }

    /// Identifying attributes in precedence order.
    pub fn identifying_attributes(&self) -> &'static [Attribute] {
        use Attribute::*;
        match self {
            Category::Lumber => &[
                Length,
                Profile,
                Grade,
                Species,
                FingerJoint,
                Precision,
                Treatment,
                Brand,
            ],
            Category::SheetGood => &[
                Length, Width, Thickness, Species, Grade, PanelType, Treatment, Edge, Finish,
                Brand, Origin, Metric,
            ],
        }
    }

    /// Rows shown in the product detail table, in order.
    ///
    /// The common weight and inventory rows come last.
    pub fn table_rows(&self) -> &'static [TableRow] {
        use TableRow::*;
        match self {
            Category::Lumber => &[
                Brand,
                Profile,
                Grade,
                Precision,
                FingerJoint,
                BoardFeet,
                Species,
                Treatment,
                Length,
                Width,
                Thickness,
                Weight,
                Inventory,
            ],
            Category::SheetGood => &[
                Brand, PanelType, Grade, Species, Treatment, Edge, Finish, Origin, Length,
                Width, Thickness, Weight, Inventory,
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An identifying attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Length,
    Width,
    Thickness,
    Profile,
    Grade,
    Species,
    FingerJoint,
    Precision,
    Treatment,
    Brand,
    PanelType,
    Edge,
    Finish,
    Origin,
    Metric,
}

impl Attribute {
    /// Key used in choice maps and on the wire (e.g., "fingerJoint").
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Length => "length",
            Attribute::Width => "width",
            Attribute::Thickness => "thickness",
            Attribute::Profile => "profile",
            Attribute::Grade => "grade",
            Attribute::Species => "species",
            Attribute::FingerJoint => "fingerJoint",
            Attribute::Precision => "precision",
            Attribute::Treatment => "treatment",
            Attribute::Brand => "brand",
            Attribute::PanelType => "panelType",
            Attribute::Edge => "edge",
            Attribute::Finish => "finish",
            Attribute::Origin => "origin",
            Attribute::Metric => "metric",
        }
    }

    /// Parse a key, ignoring case.
    pub fn from_key(key: &str) -> Option<Self> {
        const ALL: [Attribute; 15] = [
            Attribute::Length,
            Attribute::Width,
            Attribute::Thickness,
            Attribute::Profile,
            Attribute::Grade,
            Attribute::Species,
            Attribute::FingerJoint,
            Attribute::Precision,
            Attribute::Treatment,
            Attribute::Brand,
            Attribute::PanelType,
            Attribute::Edge,
            Attribute::Finish,
            Attribute::Origin,
            Attribute::Metric,
        ];
        ALL.into_iter()
            .find(|a| a.key().eq_ignore_ascii_case(key))
    }

    /// Human-readable selector name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Attribute::Length => "Length",
            Attribute::Width => "Width",
            Attribute::Thickness => "Thickness",
            Attribute::Profile => "Nominal Size",
            Attribute::Grade => "Grade",
            Attribute::Species => "Species",
            Attribute::FingerJoint => "Finger Joint",
            Attribute::Precision => "Precision End Trim",
            Attribute::Treatment => "Treatment",
            Attribute::Brand => "Brand",
            Attribute::PanelType => "Panel Type",
            Attribute::Edge => "Edge",
            Attribute::Finish => "Finish",
            Attribute::Origin => "Origin",
            Attribute::Metric => "Metric",
        }
    }

    /// Whether this attribute is a physical dimension.
    pub fn is_dimension(&self) -> bool {
        matches!(
            self,
            Attribute::Length | Attribute::Width | Attribute::Thickness
        )
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A row in the product detail table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TableRow {
    Brand,
    Profile,
    Grade,
    Precision,
    FingerJoint,
    BoardFeet,
    Species,
    Treatment,
    PanelType,
    Edge,
    Finish,
    Origin,
    Length,
    Width,
    Thickness,
    Weight,
    Inventory,
}

impl TableRow {
    pub fn label(&self) -> &'static str {
        match self {
            TableRow::Brand => "Brand",
            TableRow::Profile => "Nominal Size",
            TableRow::Grade => "Grade",
            TableRow::Precision => "Precision End Trim",
            TableRow::FingerJoint => "Finger Joint",
            TableRow::BoardFeet => "Board Footage",
            TableRow::Species => "Species",
            TableRow::Treatment => "Treatment",
            TableRow::PanelType => "Panel Type",
            TableRow::Edge => "Edge",
            TableRow::Finish => "Finish",
            TableRow::Origin => "Origin",
            TableRow::Length => "Length",
            TableRow::Width => "Width",
            TableRow::Thickness => "Thickness",
            TableRow::Weight => "Item Weight (lbs.)",
            TableRow::Inventory => "Pieces Available at this Price",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("Lumber"), Some(Category::Lumber));
        assert_eq!(Category::parse("SHEET_GOOD"), Some(Category::SheetGood));
        assert_eq!(Category::parse("hardware"), None);
    }

    #[test]
    fn test_lumber_attribute_order() {
        let keys: Vec<_> = Category::Lumber
            .identifying_attributes()
            .iter()
            .map(|a| a.key())
            .collect();
        assert_eq!(
            keys,
            [
                "length",
                "profile",
                "grade",
                "species",
                "fingerJoint",
                "precision",
                "treatment",
                "brand"
            ]
        );
    }

    #[test]
    fn test_sheet_good_attribute_order() {
        let attrs = Category::SheetGood.identifying_attributes();
        assert_eq!(attrs.len(), 12);
        assert_eq!(attrs[0], Attribute::Length);
        assert_eq!(attrs[11], Attribute::Metric);
    }

    #[test]
    fn test_attribute_key_roundtrip() {
        assert_eq!(Attribute::from_key("fingerJoint"), Some(Attribute::FingerJoint));
        assert_eq!(Attribute::from_key("PANELTYPE"), Some(Attribute::PanelType));
        assert_eq!(Attribute::from_key("color"), None);
        assert_eq!(Attribute::Profile.display_name(), "Nominal Size");
    }

    #[test]
    fn test_attribute_serde_key() {
        let json = serde_json::to_string(&Attribute::FingerJoint).unwrap();
        assert_eq!(json, "\"fingerJoint\"");
    }
}
