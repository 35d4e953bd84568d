//! Exhibition configuration: stall types, rate overrides, discounts, taxes
//!
//! Immutable for the duration of a booking session. Deserialized straight
//! from the backend exhibition record.

use serde::{Deserialize, Serialize};

/// Stall type catalog entry with its default rate and display color.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StallType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub default_rate: f64,
    #[serde(default)]
    pub color: Option<String>,
}

/// Per-exhibition override of a stall type's default price per square meter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOverride {
    pub stall_type_id: i64,
    pub rate_per_sqm: f64,
}

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    /// `value` is a percentage of the aggregate base amount
    Percentage,
    /// `value` is a fixed currency amount
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    pub value: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tax {
    pub name: String,
    /// Percentage rate, applied to the discounted amount
    pub rate: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Exhibition record as consumed by the viewer: the rate/discount/tax
/// configuration the pricing engine runs against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionConfig {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub stall_rates: Vec<RateOverride>,
    #[serde(default)]
    pub tax_config: Vec<Tax>,
    #[serde(default, alias = "publicDiscountConfig")]
    pub discount_config: Vec<Discount>,
}

impl ExhibitionConfig {
    /// Rate override for a stall type, if the exhibition defines one.
    pub fn rate_override(&self, stall_type_id: i64) -> Option<f64> {
        self.stall_rates
            .iter()
            .find(|r| r.stall_type_id == stall_type_id)
            .map(|r| r.rate_per_sqm)
    }

    pub fn active_discounts(&self) -> Vec<&Discount> {
        self.discount_config.iter().filter(|d| d.is_active).collect()
    }

    pub fn active_taxes(&self) -> Vec<&Tax> {
        self.tax_config.iter().filter(|t| t.is_active).collect()
    }
}
