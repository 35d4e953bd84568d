//! Booking calculation and submission payloads
//!
//! `BookingCalculation` is a value object: computed once per selection
//! change by the pricing engine and attached verbatim to the outgoing
//! booking request. The backend invoices from this payload, so both sides
//! must agree on the algorithm.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Itemized line for one selected stall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StallLine {
    pub stall_id: i64,
    pub number: String,
    pub base_amount: f64,
    pub discount: f64,
    pub amount_after_discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLine {
    pub name: String,
    pub rate: f64,
    pub amount: f64,
}

/// The full itemized price breakdown for a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCalculation {
    pub stalls: Vec<StallLine>,
    pub total_base_amount: f64,
    pub total_discount_amount: f64,
    pub total_amount_after_discount: f64,
    pub taxes: Vec<TaxLine>,
    pub total_tax_amount: f64,
    pub total_amount: f64,
}

impl BookingCalculation {
    /// All-zero breakdown for an empty selection.
    pub fn empty() -> Self {
        Self {
            stalls: Vec::new(),
            total_base_amount: 0.0,
            total_discount_amount: 0.0,
            total_amount_after_discount: 0.0,
            taxes: Vec::new(),
            total_tax_amount: 0.0,
            total_amount: 0.0,
        }
    }
}

/// Customer fields collected by the booking form, passed through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// The immutable creation request sent to `POST bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Client-generated identity, lets the backend deduplicate retries
    pub reference: Uuid,
    pub exhibition_id: i64,
    pub stall_ids: Vec<i64>,
    pub customer: CustomerDetails,
    pub calculations: BookingCalculation,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculation_wire_shape_is_camel_case() {
        let calc = BookingCalculation {
            stalls: vec![StallLine {
                stall_id: 3,
                number: "A-03".to_string(),
                base_amount: 6000.0,
                discount: 600.0,
                amount_after_discount: 5400.0,
            }],
            total_base_amount: 6000.0,
            total_discount_amount: 600.0,
            total_amount_after_discount: 5400.0,
            taxes: vec![TaxLine {
                name: "GST".to_string(),
                rate: 18.0,
                amount: 972.0,
            }],
            total_tax_amount: 972.0,
            total_amount: 6372.0,
        };
        let json = serde_json::to_value(&calc).unwrap();
        assert_eq!(json["totalBaseAmount"], 6000.0);
        assert_eq!(json["stalls"][0]["amountAfterDiscount"], 5400.0);
        assert_eq!(json["taxes"][0]["rate"], 18.0);
    }

    #[test]
    fn test_empty_breakdown_is_all_zero() {
        let calc = BookingCalculation::empty();
        assert_eq!(calc.total_amount, 0.0);
        assert!(calc.stalls.is_empty());
        assert!(calc.taxes.is_empty());
    }
}
