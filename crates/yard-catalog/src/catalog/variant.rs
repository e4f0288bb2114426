//! Variants and their price tiers.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::{AttrValue, Attribute, Category, TableRow};
use crate::error::CatalogError;
use crate::format::format_distance;
use crate::ids::{FacilityId, VariantId};

/// A pack size with its per-piece price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceTier {
    /// Price per piece when bought in this pack size.
    pub unit_price: Decimal,
    /// Pieces per pack.
    pub pack_size: u64,
}

impl PriceTier {
    pub fn new(unit_price: Decimal, pack_size: u64) -> Self {
        Self {
            unit_price,
            pack_size,
        }
    }

    /// Price of one full pack.
    pub fn pack_price(&self) -> Decimal {
        self.unit_price * Decimal::from(self.pack_size)
    }
}

/// Physical dimensions in inches (or millimetres for metric sheet goods).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub thickness: Decimal,
}

impl Dimensions {
    pub fn new(length: Decimal, width: Decimal, thickness: Decimal) -> Self {
        Self {
            length,
            width,
            thickness,
        }
    }
}

/// Lumber-specific fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LumberDetails {
    /// Nominal size, e.g. "2x4".
    pub profile: Option<String>,
    pub grade: Option<String>,
    pub species: Option<String>,
    pub finger_joint: Option<String>,
    pub precision: Option<String>,
    pub treatment: Option<String>,
    pub board_feet: Decimal,
}

/// Sheet-good-specific fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetGoodDetails {
    pub panel_type: Option<String>,
    pub grade: Option<String>,
    pub species: Option<String>,
    pub treatment: Option<String>,
    pub edge: Option<String>,
    pub finish: Option<String>,
}

/// Category tag plus the fields that only exist for that category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum CategoryDetails {
    Lumber(LumberDetails),
    SheetGood(SheetGoodDetails),
}

impl CategoryDetails {
    pub fn category(&self) -> Category {
        match self {
            CategoryDetails::Lumber(_) => Category::Lumber,
            CategoryDetails::SheetGood(_) => Category::SheetGood,
        }
    }
}

/// One sellable configuration from one supplying facility.
///
/// Immutable once built: tiers are sorted ascending by pack size with
/// unique pack sizes, and weight and board footage are rounded to three
/// decimal places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    id: VariantId,
    facility_id: FacilityId,
    details: CategoryDetails,
    dimensions: Dimensions,
    weight: Decimal,
    tiers: Vec<PriceTier>,
    inventory: Option<u64>,
    brand: Option<String>,
    origin: Option<String>,
    metric: bool,
    description: Option<String>,
    heading: Option<String>,
    subheading: Option<String>,
    image: Option<String>,
}

impl Variant {
    /// Create a variant, validating and sorting its tiers.
    pub fn new(
        id: impl Into<VariantId>,
        facility_id: impl Into<FacilityId>,
        details: CategoryDetails,
        dimensions: Dimensions,
        tiers: Vec<PriceTier>,
    ) -> Result<Self, CatalogError> {
        let id = id.into();
        let tiers = normalize_tiers(id.as_str(), tiers)?;
        let details = match details {
            CategoryDetails::Lumber(mut lumber) => {
                lumber.board_feet = round3(lumber.board_feet);
                CategoryDetails::Lumber(lumber)
            }
            other => other,
        };

        Ok(Self {
            id,
            facility_id: facility_id.into(),
            details,
            dimensions,
            weight: Decimal::ZERO,
            tiers,
            inventory: None,
            brand: None,
            origin: None,
            metric: false,
            description: None,
            heading: None,
            subheading: None,
            image: None,
        })
    }

    /// Set the inventory cap (`None` = unlimited).
    pub fn with_inventory(mut self, inventory: Option<u64>) -> Self {
        self.inventory = inventory;
        self
    }

    /// Set the item weight, rounded to three decimal places.
    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = round3(weight);
        self
    }

    pub fn with_brand(mut self, brand: Option<String>) -> Self {
        self.brand = brand;
        self
    }

    pub fn with_origin(mut self, origin: Option<String>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_metric(mut self, metric: bool) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set heading, subheading and image for listing pages.
    pub fn with_listing(
        mut self,
        heading: Option<String>,
        subheading: Option<String>,
        image: Option<String>,
    ) -> Self {
        self.heading = heading;
        self.subheading = subheading;
        self.image = image;
        self
    }

    pub fn id(&self) -> &VariantId {
        &self.id
    }

    pub fn facility_id(&self) -> &FacilityId {
        &self.facility_id
    }

    pub fn category(&self) -> Category {
        self.details.category()
    }

    pub fn details(&self) -> &CategoryDetails {
        &self.details
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn weight(&self) -> Decimal {
        self.weight
    }

    /// Tiers in ascending pack-size order.
    pub fn tiers(&self) -> &[PriceTier] {
        &self.tiers
    }

    pub fn inventory(&self) -> Option<u64> {
        self.inventory
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_metric(&self) -> bool {
        self.metric
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    pub fn subheading(&self) -> Option<&str> {
        self.subheading.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Smallest pack size; every purchasable quantity is a multiple of it.
    pub fn smallest_pack(&self) -> u64 {
        self.tiers.first().map(|t| t.pack_size).unwrap_or(1)
    }

    /// Largest pack size.
    pub fn largest_pack(&self) -> u64 {
        self.tiers.last().map(|t| t.pack_size).unwrap_or(1)
    }

    /// Whether inventory covers `quantity` pieces.
    pub fn can_fulfill(&self, quantity: u64) -> bool {
        self.inventory.map_or(true, |available| available >= quantity)
    }

    /// Whether this facility can sell exactly `quantity` pieces: a multiple
    /// of the smallest pack, and covered by inventory.
    pub fn can_supply(&self, quantity: u64) -> bool {
        quantity % self.smallest_pack() == 0 && self.can_fulfill(quantity)
    }

    /// Raw text of a text-valued identifying attribute.
    pub fn text_attribute(&self, attr: Attribute) -> Option<&str> {
        let field = match attr {
            Attribute::Brand => &self.brand,
            Attribute::Origin => &self.origin,
            _ => match &self.details {
                CategoryDetails::Lumber(d) => match attr {
                    Attribute::Profile => &d.profile,
                    Attribute::Grade => &d.grade,
                    Attribute::Species => &d.species,
                    Attribute::FingerJoint => &d.finger_joint,
                    Attribute::Precision => &d.precision,
                    Attribute::Treatment => &d.treatment,
                    _ => return None,
                },
                CategoryDetails::SheetGood(d) => match attr {
                    Attribute::PanelType => &d.panel_type,
                    Attribute::Grade => &d.grade,
                    Attribute::Species => &d.species,
                    Attribute::Treatment => &d.treatment,
                    Attribute::Edge => &d.edge,
                    Attribute::Finish => &d.finish,
                    _ => return None,
                },
            },
        };
        field.as_deref()
    }

    /// Raw value of a dimension attribute.
    pub fn dimension(&self, attr: Attribute) -> Option<Decimal> {
        match attr {
            Attribute::Length => Some(self.dimensions.length),
            Attribute::Width => Some(self.dimensions.width),
            Attribute::Thickness => Some(self.dimensions.thickness),
            _ => None,
        }
    }

    /// Value used for trie branching and selector grouping.
    pub fn attribute(&self, attr: Attribute) -> AttrValue {
        match attr {
            Attribute::Length | Attribute::Width | Attribute::Thickness => self
                .dimension(attr)
                .map(AttrValue::number)
                .unwrap_or(AttrValue::Absent),
            Attribute::Metric => AttrValue::flag(self.metric),
            _ => AttrValue::text(self.text_attribute(attr)),
        }
    }

    /// Human-readable label for a dimension attribute.
    ///
    /// Sheet-good thickness honors the metric flag; every other dimension
    /// is imperial.
    pub fn dimension_label(&self, attr: Attribute) -> Option<String> {
        let value = self.dimension(attr)?;
        let metric = attr == Attribute::Thickness
            && self.category() == Category::SheetGood
            && self.metric;
        Some(format_distance(value, metric))
    }

    pub fn formatted_length(&self) -> String {
        format_distance(self.dimensions.length, false)
    }

    pub fn formatted_width(&self) -> String {
        format_distance(self.dimensions.width, false)
    }

    pub fn formatted_thickness(&self) -> String {
        self.dimension_label(Attribute::Thickness)
            .unwrap_or_default()
    }

    /// Detail-table rows with a value present, in category order.
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        self.category()
            .table_rows()
            .iter()
            .filter_map(|row| self.table_value(*row).map(|v| (row.label(), v)))
            .collect()
    }

    fn table_value(&self, row: TableRow) -> Option<String> {
        let text = |attr: Attribute| self.text_attribute(attr).map(str::to_string);
        match row {
            TableRow::Brand => text(Attribute::Brand),
            TableRow::Profile => text(Attribute::Profile),
            TableRow::Grade => text(Attribute::Grade),
            TableRow::Precision => text(Attribute::Precision),
            TableRow::FingerJoint => text(Attribute::FingerJoint),
            TableRow::Species => text(Attribute::Species),
            TableRow::Treatment => text(Attribute::Treatment),
            TableRow::PanelType => text(Attribute::PanelType),
            TableRow::Edge => text(Attribute::Edge),
            TableRow::Finish => text(Attribute::Finish),
            TableRow::Origin => text(Attribute::Origin),
            TableRow::BoardFeet => match &self.details {
                CategoryDetails::Lumber(d) => nonzero(d.board_feet).map(|bf| bf.normalize().to_string()),
                CategoryDetails::SheetGood(_) => None,
            },
            TableRow::Length => nonzero(self.dimensions.length).map(|_| self.formatted_length()),
            TableRow::Width => nonzero(self.dimensions.width).map(|_| self.formatted_width()),
            TableRow::Thickness => {
                nonzero(self.dimensions.thickness).map(|_| self.formatted_thickness())
            }
            TableRow::Weight => nonzero(self.weight).map(|w| w.normalize().to_string()),
            TableRow::Inventory => self.inventory.map(|i| i.to_string()),
        }
    }
}

/// Zero reads as missing in the detail table.
fn nonzero(value: Decimal) -> Option<Decimal> {
    (!value.is_zero()).then_some(value)
}

/// Round half away from zero to three places.
fn round3(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

fn normalize_tiers(id: &str, mut tiers: Vec<PriceTier>) -> Result<Vec<PriceTier>, CatalogError> {
    if tiers.is_empty() {
        return Err(CatalogError::NoPriceTiers(id.to_string()));
    }
    if tiers.iter().any(|t| t.pack_size == 0) {
        return Err(CatalogError::ZeroPackSize(id.to_string()));
    }
    if tiers.iter().any(|t| t.unit_price.is_sign_negative() && !t.unit_price.is_zero()) {
        return Err(CatalogError::NegativePrice(id.to_string()));
    }

    tiers.sort_by_key(|t| t.pack_size);
    if let Some(dup) = tiers.windows(2).find(|w| w[0].pack_size == w[1].pack_size) {
        return Err(CatalogError::DuplicatePackSize {
            variant: id.to_string(),
            pack_size: dup[0].pack_size,
        });
    }
    Ok(tiers)
}
