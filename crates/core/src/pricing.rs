//! Pricing engine
//!
//! Pure, deterministic calculation of the itemized booking breakdown. Both
//! call sites (the layout viewer sidebar and the booking wizard) run this
//! exact function, which is what keeps their totals in agreement.
//!
//! Pipeline, in required order: per-stall area -> rounded base amount ->
//! aggregate base -> single discount -> proportional per-stall discount
//! distribution -> taxes on the discounted amount (additive, never
//! compounded) -> grand total.

use crate::models::{BookingCalculation, Discount, AdjustmentKind, StallLine, Tax, TaxLine};
use crate::selection::SelectedStall;

/// Round to 2 decimal places (currency minor units), half away from zero.
/// Applied uniformly at every rounding step of the pipeline.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the full breakdown for a selection.
///
/// Never fails and never produces NaN: an empty selection yields the
/// all-zero breakdown, and a zero aggregate base distributes zero discount.
pub fn calculate(
    stalls: &[SelectedStall],
    discount: Option<&Discount>,
    taxes: &[Tax],
) -> BookingCalculation {
    if stalls.is_empty() {
        return BookingCalculation::empty();
    }

    // Per-stall base amounts, rounded individually so that incremental
    // add/remove of stalls cannot drift the aggregate by fractions of a
    // penny.
    let bases: Vec<f64> = stalls
        .iter()
        .map(|s| round2(s.rate_per_sqm * s.area()))
        .collect();
    let total_base: f64 = bases.iter().sum();

    let discount_amount = match discount {
        Some(d) if d.is_active => match d.kind {
            AdjustmentKind::Fixed => round2(d.value),
            AdjustmentKind::Percentage => round2(total_base * d.value / 100.0),
        },
        _ => 0.0,
    };

    // Distribute proportionally to each stall's share of the base; guard
    // the zero-base case.
    let lines: Vec<StallLine> = stalls
        .iter()
        .zip(&bases)
        .map(|(stall, &base)| {
            let share = if total_base > 0.0 {
                round2(base * (discount_amount / total_base))
            } else {
                0.0
            };
            StallLine {
                stall_id: stall.stall_id,
                number: stall.stall_number.clone(),
                base_amount: base,
                discount: share,
                amount_after_discount: round2(base - share),
            }
        })
        .collect();

    let after_discount = total_base - discount_amount;

    let tax_lines: Vec<TaxLine> = taxes
        .iter()
        .filter(|t| t.is_active)
        .map(|t| TaxLine {
            name: t.name.clone(),
            rate: t.rate,
            amount: round2(after_discount * t.rate / 100.0),
        })
        .collect();
    let total_tax: f64 = tax_lines.iter().map(|t| t.amount).sum();

    BookingCalculation {
        stalls: lines,
        total_base_amount: total_base,
        total_discount_amount: discount_amount,
        total_amount_after_discount: after_discount,
        taxes: tax_lines,
        total_tax_amount: total_tax,
        total_amount: round2(after_discount + total_tax),
    }
}
