//! Floor-plan loading: wire payload types and normalization
//!
//! The backend delivers a nested `{spaces: [{halls: [{stalls: [..]}]}]}`
//! payload. `normalize` flattens it into three id-indexed collections and
//! resolves everything the viewer needs up front: physical dimensions and
//! the per-stall rate. Normalization is a pure transform - partial data is
//! recovered by dropping/defaulting with a logged warning, never an error.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::warn;

use crate::models::{
    Dimensions, ExhibitionConfig, Hall, Point, Rect, Size, Space, Stall, StallShape, StallStatus,
    StallType,
};
use crate::selection::SelectedStall;

/// Nested layout payload from `GET layout/exhibition/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPayload {
    #[serde(default)]
    pub spaces: Vec<SpacePayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacePayload {
    pub id: i64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub halls: Vec<HallPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HallPayload {
    pub id: i64,
    pub name: String,
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub stalls: Vec<StallPayload>,
}

/// Stall as it appears on the wire, both nested under a hall in the layout
/// payload and flat in `GET stalls/available` (where `hall_id` is set).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StallPayload {
    pub id: i64,
    #[serde(default)]
    pub hall_id: Option<i64>,
    pub stall_number: String,
    #[serde(default)]
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub dimensions: Option<DimensionsPayload>,
    pub stall_type_id: i64,
    #[serde(default)]
    pub status: StallStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionsPayload {
    pub width_meters: f64,
    pub height_meters: f64,
    #[serde(default)]
    pub shape_type: StallShape,
}

/// Flattened, id-indexed floor plan. Replaced wholesale on reload.
#[derive(Debug, Clone, Default)]
pub struct FloorPlan {
    pub spaces: HashMap<i64, Space>,
    pub halls: HashMap<i64, Hall>,
    pub stalls: HashMap<i64, Stall>,
    /// Stall ids dropped because their hall was missing (data-integrity
    /// warning, surfaced but not fatal)
    pub dropped_stalls: Vec<i64>,
}

impl FloorPlan {
    pub fn is_empty(&self) -> bool {
        self.stalls.is_empty()
    }

    /// Absolute canvas rectangle of a stall, composing its hall's origin.
    pub fn stall_rect(&self, stall: &Stall) -> Option<Rect> {
        let hall = self.halls.get(&stall.hall_id)?;
        Some(stall.absolute_rect(hall.position))
    }

    /// Bounding box of all halls (falling back to spaces), used by
    /// fit-to-screen. `None` for an empty plan.
    pub fn bounds(&self) -> Option<Rect> {
        let mut rects = self.halls.values().map(Hall::rect);
        let first = match rects.next() {
            Some(r) => r,
            None => {
                let space = self.spaces.values().next()?;
                return Some(Rect::new(0.0, 0.0, space.width, space.height));
            }
        };
        Some(rects.fold(first, |acc, r| acc.union(&r)))
    }
}

/// Resolve the price per square meter for a stall type: exhibition override
/// first, then the stall type's default rate, else zero (logged).
pub fn resolve_rate(
    stall_type_id: i64,
    stall_types: &[StallType],
    exhibition: &ExhibitionConfig,
) -> f64 {
    if let Some(rate) = exhibition.rate_override(stall_type_id) {
        return rate;
    }
    match stall_types.iter().find(|t| t.id == stall_type_id) {
        Some(t) => t.default_rate,
        None => {
            warn!(stall_type_id, "No rate configured for stall type, using 0");
            0.0
        }
    }
}

/// Physical dimensions for a stall: taken from the payload when present,
/// otherwise derived from canvas size via the units-per-meter scale so the
/// pricing engine always has something consistent to work with.
pub fn resolve_dimensions(payload: &StallPayload, units_per_meter: f64) -> Dimensions {
    match &payload.dimensions {
        Some(d) => Dimensions::new(d.width_meters, d.height_meters, d.shape_type),
        None => {
            warn!(
                stall_id = payload.id,
                "Stall has no physical dimensions, deriving from canvas size"
            );
            Dimensions::new(
                payload.size.width / units_per_meter,
                payload.size.height / units_per_meter,
                StallShape::Rectangle,
            )
        }
    }
}

/// Turn the flat `stalls/available` listing into selectable stalls, the
/// booking wizard's data path. Runs the same dimension and rate resolution
/// as `normalize`, which is what keeps the wizard's pricing in agreement
/// with the layout viewer's. The flat listing carries no hall names, so
/// `hall_name` is left empty.
pub fn selectable_stalls(
    payload: &[StallPayload],
    stall_types: &[StallType],
    exhibition: &ExhibitionConfig,
    units_per_meter: f64,
) -> Vec<SelectedStall> {
    payload
        .iter()
        .map(|stall| SelectedStall {
            stall_id: stall.id,
            stall_number: stall.stall_number.clone(),
            dimensions: resolve_dimensions(stall, units_per_meter),
            rate_per_sqm: resolve_rate(stall.stall_type_id, stall_types, exhibition),
            status: stall.status,
            hall_name: String::new(),
            stall_type_name: stall_types
                .iter()
                .find(|t| t.id == stall.stall_type_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "Standard".to_string()),
        })
        .collect()
}

/// Flatten the nested layout payload into a `FloorPlan`.
///
/// Every stall must resolve to exactly one hall; stalls arriving outside a
/// hall (or pointing at a hall that was not delivered) are dropped and
/// recorded in `dropped_stalls`.
pub fn normalize(
    payload: LayoutPayload,
    stall_types: &[StallType],
    exhibition: &ExhibitionConfig,
    units_per_meter: f64,
) -> FloorPlan {
    let mut plan = FloorPlan::default();

    for space in payload.spaces {
        plan.spaces.insert(
            space.id,
            Space {
                id: space.id,
                width: space.width,
                height: space.height,
            },
        );

        for hall in space.halls {
            let hall_id = hall.id;
            plan.halls.insert(
                hall_id,
                Hall {
                    id: hall_id,
                    space_id: space.id,
                    name: hall.name,
                    position: hall.position,
                    size: hall.size,
                    color: hall.color,
                },
            );

            for stall in hall.stalls {
                // A nested stall may still carry an explicit hall_id; if it
                // disagrees with the hall it arrived under, the reference is
                // broken and the stall is dropped.
                let owner = stall.hall_id.unwrap_or(hall_id);
                if owner != hall_id {
                    warn!(
                        stall_id = stall.id,
                        claimed_hall = owner,
                        actual_hall = hall_id,
                        "Dropping stall with mismatched hall reference"
                    );
                    plan.dropped_stalls.push(stall.id);
                    continue;
                }

                let dimensions = resolve_dimensions(&stall, units_per_meter);
                let rate = resolve_rate(stall.stall_type_id, stall_types, exhibition);
                plan.stalls.insert(
                    stall.id,
                    Stall {
                        id: stall.id,
                        hall_id,
                        stall_number: stall.stall_number,
                        position: stall.position,
                        size: stall.size,
                        dimensions,
                        rate_per_sqm: rate,
                        stall_type_id: stall.stall_type_id,
                        status: stall.status,
                    },
                );
            }
        }
    }

    if !plan.dropped_stalls.is_empty() {
        warn!(
            dropped = plan.dropped_stalls.len(),
            "Layout contained stalls without a resolvable hall"
        );
    }

    plan
}
