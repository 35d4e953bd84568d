//! Scene building and hit-testing
//!
//! The renderer is backend-agnostic: it turns the flattened floor plan plus
//! the current viewport, selection, and hover state into a flat display
//! list (`Scene`) of screen-space rectangles and labels that the UI layer
//! draws verbatim. Keeping this pure makes the color precedence rules and
//! hit-testing directly testable.

use std::collections::{HashMap, HashSet};

use crate::layout::FloorPlan;
use crate::models::{Point, StallStatus};
use crate::viewport::Viewport;

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse "#rrggbb" hall colors from the design tool; anything else
    /// falls back to the given default.
    pub fn from_hex_or(s: &str, default: Color) -> Color {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return default;
        }
        match (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            (Ok(r), Ok(g), Ok(b)) => Color::rgb(r, g, b),
            _ => default,
        }
    }
}

pub const COLOR_AVAILABLE: Color = Color::rgb(0x4c, 0xaf, 0x50);
pub const COLOR_RESERVED: Color = Color::rgb(0xff, 0x98, 0x00);
pub const COLOR_BOOKED: Color = Color::rgb(0xfd, 0xd8, 0x35);
pub const COLOR_UNKNOWN: Color = Color::rgb(0x9e, 0x9e, 0x9e);
pub const COLOR_HOVER: Color = Color::rgb(0x81, 0xc7, 0x84);
pub const COLOR_SELECTED: Color = Color::rgb(0x21, 0x96, 0xf3);
pub const COLOR_STALL_BORDER: Color = Color::rgb(0x33, 0x33, 0x33);
pub const COLOR_SELECTED_BORDER: Color = Color::rgb(0x0d, 0x47, 0xa1);
pub const COLOR_HALL_FILL: Color = Color::rgb(0xe8, 0xea, 0xf6);
pub const COLOR_HALL_BORDER: Color = Color::rgb(0x5c, 0x6b, 0xc0);
pub const COLOR_GRID: Color = Color {
    r: 0xb0,
    g: 0xb0,
    b: 0xb0,
    a: 90,
};
pub const COLOR_LABEL: Color = Color::rgb(0x21, 0x21, 0x21);

/// A filled, bordered rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub border: Color,
    pub border_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub size: f64,
    pub color: Color,
}

/// Display list for one frame, in draw order: grid, halls, stalls, labels.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub rects: Vec<SceneRect>,
    pub labels: Vec<SceneLabel>,
}

/// Visual properties of a stall under the precedence rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StallVisual {
    pub fill: Color,
    pub border: Color,
    pub border_width: f64,
}

/// Color precedence, later rules override earlier ones:
/// base by status -> hover (available only) -> selected (always wins).
pub fn stall_visual(status: StallStatus, selected: bool, hovered: bool) -> StallVisual {
    let mut fill = match status {
        StallStatus::Available => COLOR_AVAILABLE,
        StallStatus::Reserved => COLOR_RESERVED,
        StallStatus::Booked => COLOR_BOOKED,
        StallStatus::Unknown => COLOR_UNKNOWN,
    };
    let mut border = COLOR_STALL_BORDER;
    let mut border_width = 1.0;

    if hovered && status.is_available() {
        fill = COLOR_HOVER;
    }
    if selected {
        fill = COLOR_SELECTED;
        border = COLOR_SELECTED_BORDER;
        border_width = 2.5;
    }

    StallVisual {
        fill,
        border,
        border_width,
    }
}

/// Memoized per-stall visuals keyed by `(selected, hovered, status)`.
/// Avoids re-deriving styling for unchanged stalls on large plans.
#[derive(Debug, Default)]
pub struct VisualCache {
    entries: HashMap<i64, ((StallStatus, bool, bool), StallVisual)>,
}

impl VisualCache {
    pub fn get(&mut self, id: i64, status: StallStatus, selected: bool, hovered: bool) -> StallVisual {
        let key = (status, selected, hovered);
        match self.entries.get(&id) {
            Some((cached_key, visual)) if *cached_key == key => *visual,
            _ => {
                let visual = stall_visual(status, selected, hovered);
                self.entries.insert(id, (key, visual));
                visual
            }
        }
    }

    /// Drop all entries, e.g. when the plan is replaced.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Build the display list for the current frame.
pub fn build_scene(
    plan: &FloorPlan,
    viewport: &Viewport,
    selected: &HashSet<i64>,
    hovered: Option<i64>,
    units_per_meter: f64,
    cache: &mut VisualCache,
) -> Scene {
    let mut scene = Scene::default();
    let zoom = viewport.zoom;

    // Meter grid over each space. A non-positive step cannot advance the
    // loops, so the grid requires a valid scale.
    if units_per_meter > 0.0 {
        for space in plan.spaces.values() {
            let origin = viewport.to_screen(Point::new(0.0, 0.0));
            let extent = viewport.to_screen(Point::new(space.width, space.height));

            let mut x = 0.0;
            while x <= space.width {
                let sx = viewport.to_screen(Point::new(x, 0.0)).x;
                scene.rects.push(SceneRect {
                    x: sx,
                    y: origin.y,
                    width: 1.0,
                    height: extent.y - origin.y,
                    fill: COLOR_GRID,
                    border: COLOR_GRID,
                    border_width: 0.0,
                });
                x += units_per_meter;
            }
            let mut y = 0.0;
            while y <= space.height {
                let sy = viewport.to_screen(Point::new(0.0, y)).y;
                scene.rects.push(SceneRect {
                    x: origin.x,
                    y: sy,
                    width: extent.x - origin.x,
                    height: 1.0,
                    fill: COLOR_GRID,
                    border: COLOR_GRID,
                    border_width: 0.0,
                });
                y += units_per_meter;
            }
        }
    }

    // Halls, sorted for stable output
    let mut halls: Vec<_> = plan.halls.values().collect();
    halls.sort_by_key(|h| h.id);
    for hall in &halls {
        let origin = viewport.to_screen(hall.position);
        let fill = hall
            .color
            .as_deref()
            .map(|c| Color::from_hex_or(c, COLOR_HALL_FILL))
            .unwrap_or(COLOR_HALL_FILL);
        scene.rects.push(SceneRect {
            x: origin.x,
            y: origin.y,
            width: hall.size.width * zoom,
            height: hall.size.height * zoom,
            fill,
            border: COLOR_HALL_BORDER,
            border_width: 1.5,
        });
        scene.labels.push(SceneLabel {
            x: origin.x + 4.0,
            y: origin.y + 2.0,
            text: hall.name.clone(),
            size: (14.0 * zoom).clamp(9.0, 22.0),
            color: COLOR_HALL_BORDER,
        });
    }

    // Stalls and their number labels
    let mut stalls: Vec<_> = plan.stalls.values().collect();
    stalls.sort_by_key(|s| s.id);
    for stall in &stalls {
        let rect = match plan.stall_rect(stall) {
            Some(r) => r,
            None => continue,
        };
        let visual = cache.get(
            stall.id,
            stall.status,
            selected.contains(&stall.id),
            hovered == Some(stall.id),
        );
        let origin = viewport.to_screen(rect.origin);
        let w = rect.size.width * zoom;
        let h = rect.size.height * zoom;
        scene.rects.push(SceneRect {
            x: origin.x,
            y: origin.y,
            width: w,
            height: h,
            fill: visual.fill,
            border: visual.border,
            border_width: visual.border_width,
        });

        // Number label sized from the smaller stall dimension
        let size = (rect.size.width.min(rect.size.height) * zoom * 0.3).clamp(7.0, 24.0);
        scene.labels.push(SceneLabel {
            x: origin.x + w / 2.0,
            y: origin.y + h / 2.0,
            text: stall.stall_number.clone(),
            size,
            color: COLOR_LABEL,
        });
    }

    scene
}

/// Locate the stall under a screen-space pointer position, if any.
pub fn stall_at(plan: &FloorPlan, viewport: &Viewport, screen: Point) -> Option<i64> {
    let model = viewport.to_model(screen);
    plan.stalls
        .values()
        .find(|s| {
            plan.stall_rect(s)
                .map(|r| r.contains(model))
                .unwrap_or(false)
        })
        .map(|s| s.id)
}

/// Flicker-free hover tracking.
///
/// Entering a stall commits immediately; leaving (to empty space) is only
/// committed after a short grace delay, so crossing a 1px gap between
/// adjacent stalls does not relayout twice. Time is injected as a
/// millisecond timestamp.
#[derive(Debug)]
pub struct HoverTracker {
    committed: Option<i64>,
    leave_pending_since: Option<u64>,
    grace_ms: u64,
}

impl HoverTracker {
    pub fn new(grace_ms: u64) -> Self {
        Self {
            committed: None,
            leave_pending_since: None,
            grace_ms,
        }
    }

    pub fn committed(&self) -> Option<i64> {
        self.committed
    }

    /// Feed the raw hit-test result; returns true when the committed hover
    /// target changed.
    pub fn update(&mut self, target: Option<i64>, now_ms: u64) -> bool {
        match target {
            Some(id) => {
                self.leave_pending_since = None;
                if self.committed == Some(id) {
                    false
                } else {
                    self.committed = Some(id);
                    true
                }
            }
            None => {
                if self.committed.is_none() {
                    self.leave_pending_since = None;
                    return false;
                }
                match self.leave_pending_since {
                    Some(since) if now_ms.saturating_sub(since) >= self.grace_ms => {
                        self.committed = None;
                        self.leave_pending_since = None;
                        true
                    }
                    Some(_) => false,
                    None => {
                        self.leave_pending_since = Some(now_ms);
                        false
                    }
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.committed = None;
        self.leave_pending_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{normalize, LayoutPayload};
    use crate::models::{ExhibitionConfig, Size, StallType};

    fn plan() -> FloorPlan {
        let payload: LayoutPayload = serde_json::from_str(
            r#"{
            "spaces": [{
                "id": 1, "width": 200.0, "height": 100.0,
                "halls": [{
                    "id": 10, "name": "Hall A",
                    "position": {"x": 20.0, "y": 10.0},
                    "size": {"width": 160.0, "height": 80.0},
                    "stalls": [
                        {
                            "id": 100, "stallNumber": "A-01",
                            "position": {"x": 0.0, "y": 0.0},
                            "size": {"width": 40.0, "height": 40.0},
                            "stallTypeId": 1, "status": "available"
                        },
                        {
                            "id": 101, "stallNumber": "A-02",
                            "position": {"x": 41.0, "y": 0.0},
                            "size": {"width": 40.0, "height": 40.0},
                            "stallTypeId": 1, "status": "booked"
                        }
                    ]
                }]
            }]
        }"#,
        )
        .unwrap();
        let types = vec![StallType {
            id: 1,
            name: "Standard".to_string(),
            default_rate: 100.0,
            color: None,
        }];
        let ex = ExhibitionConfig {
            id: 1,
            name: "Expo".to_string(),
            stall_rates: Vec::new(),
            tax_config: Vec::new(),
            discount_config: Vec::new(),
        };
        normalize(payload, &types, &ex, 20.0)
    }

    #[test]
    fn test_color_precedence_selected_always_wins() {
        let v = stall_visual(StallStatus::Available, true, true);
        assert_eq!(v.fill, COLOR_SELECTED);
        assert_eq!(v.border, COLOR_SELECTED_BORDER);
        assert!(v.border_width > 1.0);
    }

    #[test]
    fn test_hover_only_tints_available_stalls() {
        assert_eq!(
            stall_visual(StallStatus::Available, false, true).fill,
            COLOR_HOVER
        );
        assert_eq!(
            stall_visual(StallStatus::Booked, false, true).fill,
            COLOR_BOOKED
        );
        assert_eq!(
            stall_visual(StallStatus::Reserved, false, true).fill,
            COLOR_RESERVED
        );
    }

    #[test]
    fn test_unknown_status_renders_neutral() {
        assert_eq!(
            stall_visual(StallStatus::Unknown, false, false).fill,
            COLOR_UNKNOWN
        );
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            Color::from_hex_or("#2196f3", COLOR_HALL_FILL),
            Color::rgb(0x21, 0x96, 0xf3)
        );
        assert_eq!(Color::from_hex_or("bogus", COLOR_HALL_FILL), COLOR_HALL_FILL);
    }

    #[test]
    fn test_hit_test_finds_stall_under_pointer() {
        let plan = plan();
        let mut viewport = Viewport::new(Size::new(800.0, 600.0));
        viewport.zoom = 2.0;
        viewport.pan = Point::new(10.0, 10.0);

        // Stall 100 occupies model (20,10)..(60,50)
        let screen = viewport.to_screen(Point::new(30.0, 20.0));
        assert_eq!(stall_at(&plan, &viewport, screen), Some(100));

        // The 1-unit gap between the stalls hits nothing
        let screen = viewport.to_screen(Point::new(60.5, 20.0));
        assert_eq!(stall_at(&plan, &viewport, screen), None);

        let screen = viewport.to_screen(Point::new(500.0, 500.0));
        assert_eq!(stall_at(&plan, &viewport, screen), None);
    }

    #[test]
    fn test_scene_contains_grid_halls_and_stalls() {
        let plan = plan();
        let viewport = Viewport::new(Size::new(800.0, 600.0));
        let mut cache = VisualCache::default();
        let scene = build_scene(
            &plan,
            &viewport,
            &HashSet::new(),
            None,
            20.0,
            &mut cache,
        );

        // 200x100 space at 20 units/m: 11 vertical + 6 horizontal grid
        // lines, 1 hall rect, 2 stall rects
        assert_eq!(scene.rects.len(), 11 + 6 + 1 + 2);
        // 1 hall label + 2 stall numbers
        assert_eq!(scene.labels.len(), 3);
        assert!(scene.labels.iter().any(|l| l.text == "A-01"));
    }

    #[test]
    fn test_non_positive_grid_step_skips_grid() {
        let plan = plan();
        let viewport = Viewport::new(Size::new(800.0, 600.0));
        for step in [0.0, -5.0] {
            let mut cache = VisualCache::default();
            let scene = build_scene(&plan, &viewport, &HashSet::new(), None, step, &mut cache);
            // No grid lines; the hall and both stalls still render
            assert_eq!(scene.rects.len(), 1 + 2);
        }
    }

    #[test]
    fn test_visual_cache_reuses_unchanged_entries() {
        let mut cache = VisualCache::default();
        let a = cache.get(1, StallStatus::Available, false, false);
        let b = cache.get(1, StallStatus::Available, false, false);
        assert_eq!(a, b);
        let c = cache.get(1, StallStatus::Available, true, false);
        assert_eq!(c.fill, COLOR_SELECTED);
    }

    #[test]
    fn test_hover_enter_commits_immediately() {
        let mut t = HoverTracker::new(50);
        assert!(t.update(Some(100), 0));
        assert_eq!(t.committed(), Some(100));
        // Switching directly to a neighbor is also immediate
        assert!(t.update(Some(101), 5));
        assert_eq!(t.committed(), Some(101));
    }

    #[test]
    fn test_hover_leave_waits_for_grace() {
        let mut t = HoverTracker::new(50);
        t.update(Some(100), 0);
        assert!(!t.update(None, 10));
        assert_eq!(t.committed(), Some(100));
        assert!(!t.update(None, 40));
        assert!(t.update(None, 70));
        assert_eq!(t.committed(), None);
    }

    #[test]
    fn test_hover_gap_crossing_does_not_flicker() {
        let mut t = HoverTracker::new(50);
        t.update(Some(100), 0);
        // Pointer crosses the 1px gap to the adjacent stall within grace
        assert!(!t.update(None, 10));
        assert!(t.update(Some(101), 20));
        assert_eq!(t.committed(), Some(101));
    }
}
