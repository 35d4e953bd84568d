//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::layout::FloorPlan;
use crate::models::BookingCalculation;
use crate::viewport::{Viewport, MAX_ZOOM, MIN_ZOOM};

/// Validate that a normalized floor plan is internally consistent.
pub fn assert_plan(plan: &FloorPlan) {
    for stall in plan.stalls.values() {
        debug_assert!(
            plan.halls.contains_key(&stall.hall_id),
            "Stall {} references missing hall {}",
            stall.id,
            stall.hall_id
        );
        debug_assert!(
            stall.size.width >= 0.0 && stall.size.height >= 0.0,
            "Stall {} has negative canvas size",
            stall.id
        );
        debug_assert!(
            stall.dimensions.width_m >= 0.0 && stall.dimensions.height_m >= 0.0,
            "Stall {} has negative physical dimensions",
            stall.id
        );
    }

    for hall in plan.halls.values() {
        debug_assert!(
            plan.spaces.contains_key(&hall.space_id),
            "Hall {} references missing space {}",
            hall.id,
            hall.space_id
        );
    }
}

/// Validate that a booking calculation re-adds consistently and contains
/// no non-finite amounts. Tolerance covers the per-step rounding.
pub fn assert_calculation(calc: &BookingCalculation) {
    const TOLERANCE: f64 = 0.01;

    let amounts = [
        calc.total_base_amount,
        calc.total_discount_amount,
        calc.total_amount_after_discount,
        calc.total_tax_amount,
        calc.total_amount,
    ];
    debug_assert!(
        amounts.iter().all(|a| a.is_finite()),
        "Calculation contains non-finite totals: {:?}",
        amounts
    );

    let base_sum: f64 = calc.stalls.iter().map(|l| l.base_amount).sum();
    debug_assert!(
        (base_sum - calc.total_base_amount).abs() < TOLERANCE,
        "Per-stall bases {} do not re-add to total {}",
        base_sum,
        calc.total_base_amount
    );

    let tax_sum: f64 = calc.taxes.iter().map(|t| t.amount).sum();
    debug_assert!(
        (tax_sum - calc.total_tax_amount).abs() < TOLERANCE,
        "Tax lines {} do not re-add to total {}",
        tax_sum,
        calc.total_tax_amount
    );

    debug_assert!(
        (calc.total_base_amount - calc.total_discount_amount
            - calc.total_amount_after_discount)
            .abs()
            < TOLERANCE,
        "Discounted amount is inconsistent"
    );

    debug_assert!(
        (calc.total_amount_after_discount + calc.total_tax_amount - calc.total_amount).abs()
            < TOLERANCE * 2.0,
        "Grand total is inconsistent"
    );
}

/// Validate that a viewport transform is within its clamps.
pub fn assert_viewport(viewport: &Viewport) {
    debug_assert!(
        viewport.zoom >= MIN_ZOOM && viewport.zoom <= MAX_ZOOM,
        "Zoom {} outside [{}, {}]",
        viewport.zoom,
        MIN_ZOOM,
        MAX_ZOOM
    );
    debug_assert!(
        viewport.pan.x.is_finite() && viewport.pan.y.is_finite(),
        "Pan is not finite: {:?}",
        viewport.pan
    );
}
