//! Stall model - the smallest bookable unit

use serde::{Deserialize, Serialize};

use super::{Point, Rect, Size};

/// Booking status as reported by the backend. Authoritative: the viewer
/// never mutates it, selection is a client-local overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StallStatus {
    #[default]
    Available,
    Reserved,
    Booked,
    /// Fallback for unrecognized wire values; rendered neutral gray and
    /// never selectable.
    #[serde(other)]
    Unknown,
}

impl StallStatus {
    pub fn is_available(self) -> bool {
        matches!(self, StallStatus::Available)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StallStatus::Available => "Available",
            StallStatus::Reserved => "Reserved",
            StallStatus::Booked => "Booked",
            StallStatus::Unknown => "Unknown",
        }
    }
}

/// Physical footprint shape of a stall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StallShape {
    #[default]
    #[serde(rename = "rectangle")]
    Rectangle,
    #[serde(rename = "l-shape")]
    LShape,
}

/// Physical dimensions in meters, used for pricing (distinct from canvas
/// `size`, which is used for drawing and hit-testing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width_m: f64,
    pub height_m: f64,
    pub shape: StallShape,
}

impl Dimensions {
    pub fn new(width_m: f64, height_m: f64, shape: StallShape) -> Self {
        Self {
            width_m,
            height_m,
            shape,
        }
    }

    /// Area in square meters.
    ///
    /// An L-shaped stall is priced as three quarters of its bounding
    /// rectangle (one quadrant removed).
    pub fn area(&self) -> f64 {
        let bounding = self.width_m * self.height_m;
        match self.shape {
            StallShape::Rectangle => bounding,
            StallShape::LShape => bounding * 0.75,
        }
    }
}

/// The bookable unit. Position is relative to the owning Hall; the absolute
/// canvas rectangle is `hall.position + stall.position` (translation only,
/// halls do not rotate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stall {
    pub id: i64,
    pub hall_id: i64,
    /// Display label, unique within the exhibition
    pub stall_number: String,
    pub position: Point,
    pub size: Size,
    pub dimensions: Dimensions,
    pub stall_type_id: i64,
    /// Rate resolved at load time from the exhibition rate config or the
    /// stall type default, so pricing never needs the full config again.
    pub rate_per_sqm: f64,
    pub status: StallStatus,
}

impl Stall {
    /// Absolute canvas rectangle given the owning hall's origin.
    pub fn absolute_rect(&self, hall_origin: Point) -> Rect {
        Rect {
            origin: hall_origin.translate(self.position.x, self.position.y),
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let s: StallStatus = serde_json::from_str("\"reserved\"").unwrap();
        assert_eq!(s, StallStatus::Reserved);
        let s: StallStatus = serde_json::from_str("\"under-offer\"").unwrap();
        assert_eq!(s, StallStatus::Unknown);
        assert!(!s.is_available());
    }

    #[test]
    fn test_shape_wire_names() {
        let s: StallShape = serde_json::from_str("\"l-shape\"").unwrap();
        assert_eq!(s, StallShape::LShape);
    }

    #[test]
    fn test_rectangle_area() {
        let d = Dimensions::new(4.0, 3.0, StallShape::Rectangle);
        assert_eq!(d.area(), 12.0);
    }

    #[test]
    fn test_l_shape_area_is_three_quarters() {
        let d = Dimensions::new(4.0, 4.0, StallShape::LShape);
        assert_eq!(d.area(), 12.0);
    }

    #[test]
    fn test_absolute_rect_composes_hall_origin() {
        let stall = Stall {
            id: 1,
            hall_id: 1,
            stall_number: "A-01".to_string(),
            position: Point::new(10.0, 5.0),
            size: Size::new(40.0, 30.0),
            dimensions: Dimensions::new(4.0, 3.0, StallShape::Rectangle),
            stall_type_id: 1,
            rate_per_sqm: 500.0,
            status: StallStatus::Available,
        };
        let r = stall.absolute_rect(Point::new(100.0, 200.0));
        assert_eq!(r, Rect::new(110.0, 205.0, 40.0, 30.0));
    }
}
