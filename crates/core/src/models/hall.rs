//! Hall model - a named sub-region of a Space containing stalls

use serde::{Deserialize, Serialize};

use super::{Point, Rect, Size};

/// A named sub-region of a Space. Created by the layout design tool,
/// read-only in the viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hall {
    pub id: i64,
    pub space_id: i64,
    pub name: String,
    /// Position relative to the Space origin
    pub position: Point,
    pub size: Size,
    /// Hex fill color from the design tool (e.g. "#e8eaf6")
    pub color: Option<String>,
}

impl Hall {
    pub fn rect(&self) -> Rect {
        Rect {
            origin: self.position,
            size: self.size,
        }
    }
}
