//! Viewport controller: zoom/pan state and coordinate transforms
//!
//! Transform law, both directions:
//!   screen = model * zoom + pan
//!   model  = (screen - pan) / zoom

use crate::models::{Point, Rect, Size};

/// Zoom bounds chosen to avoid degenerate rendering.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
/// Step factor for the zoom in/out buttons.
pub const ZOOM_STEP: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
    pub viewport_size: Size,
}

impl Viewport {
    pub fn new(viewport_size: Size) -> Self {
        Self {
            zoom: 1.0,
            pan: Point::default(),
            viewport_size,
        }
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    pub fn to_screen(&self, model: Point) -> Point {
        Point::new(
            model.x * self.zoom + self.pan.x,
            model.y * self.zoom + self.pan.y,
        )
    }

    pub fn to_model(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    pub fn zoom_in(&mut self) {
        self.zoom_centered(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_centered(1.0 / ZOOM_STEP);
    }

    /// Button zoom keeps the viewport center stationary.
    fn zoom_centered(&mut self, factor: f64) {
        let center = Point::new(
            self.viewport_size.width / 2.0,
            self.viewport_size.height / 2.0,
        );
        self.zoom_at_point(center, factor);
    }

    /// Zoom while keeping the model point under `pointer` stationary on
    /// screen (zoom-to-cursor invariant).
    pub fn zoom_at_point(&mut self, pointer: Point, factor: f64) {
        let anchor = self.to_model(pointer);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = Point::new(
            pointer.x - anchor.x * self.zoom,
            pointer.y - anchor.y * self.zoom,
        );
    }

    /// Translate without changing zoom (drag pan).
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = self.pan.translate(dx, dy);
    }

    /// Largest zoom <= 1 such that `bounds` plus `padding` on each side
    /// fits the viewport, centered. Idempotent: depends only on the inputs,
    /// never on the current transform.
    pub fn fit_to_screen(&mut self, bounds: Rect, padding: f64) {
        let avail_w = (self.viewport_size.width - 2.0 * padding).max(1.0);
        let avail_h = (self.viewport_size.height - 2.0 * padding).max(1.0);

        let zoom = if bounds.size.width > 0.0 && bounds.size.height > 0.0 {
            (avail_w / bounds.size.width)
                .min(avail_h / bounds.size.height)
                .min(1.0)
                .clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };

        self.zoom = zoom;
        self.pan = Point::new(
            (self.viewport_size.width - bounds.size.width * zoom) / 2.0 - bounds.origin.x * zoom,
            (self.viewport_size.height - bounds.size.height * zoom) / 2.0 - bounds.origin.y * zoom,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn viewport() -> Viewport {
        let mut v = Viewport::new(Size::new(1000.0, 700.0));
        v.zoom = 1.5;
        v.pan = Point::new(37.0, -12.5);
        v
    }

    #[test]
    fn test_transform_round_trip() {
        let v = viewport();
        for p in [
            Point::new(0.0, 0.0),
            Point::new(123.4, 567.8),
            Point::new(-50.0, 900.0),
        ] {
            assert!(close(v.to_model(v.to_screen(p)), p));
            assert!(close(v.to_screen(v.to_model(p)), p));
        }
    }

    #[test]
    fn test_zoom_to_cursor_keeps_point_stationary() {
        let mut v = viewport();
        let pointer = Point::new(420.0, 310.0);
        let before = v.to_model(pointer);
        v.zoom_at_point(pointer, 1.3);
        let after = v.to_model(pointer);
        assert!(close(before, after));

        v.zoom_at_point(pointer, 0.4);
        assert!(close(before, v.to_model(pointer)));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut v = viewport();
        for _ in 0..50 {
            v.zoom_in();
        }
        assert_eq!(v.zoom, MAX_ZOOM);
        for _ in 0..100 {
            v.zoom_out();
        }
        assert_eq!(v.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_fit_to_screen_idempotent() {
        let mut v = viewport();
        let bounds = Rect::new(50.0, 40.0, 400.0, 300.0);
        v.fit_to_screen(bounds, 40.0);
        let first = v;
        v.fit_to_screen(bounds, 40.0);
        assert_eq!(v, first);
    }

    #[test]
    fn test_fit_to_screen_never_enlarges_past_one() {
        let mut v = Viewport::new(Size::new(2000.0, 2000.0));
        v.fit_to_screen(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0);
        assert_eq!(v.zoom, 1.0);
    }

    #[test]
    fn test_fit_to_screen_centers_bounds() {
        let mut v = Viewport::new(Size::new(1000.0, 700.0));
        let bounds = Rect::new(100.0, 100.0, 400.0, 200.0);
        v.fit_to_screen(bounds, 50.0);

        let center_model = Point::new(300.0, 200.0);
        let center_screen = v.to_screen(center_model);
        assert!(close(center_screen, Point::new(500.0, 350.0)));
    }

    #[test]
    fn test_fit_to_screen_shrinks_large_plans() {
        let mut v = Viewport::new(Size::new(500.0, 500.0));
        v.fit_to_screen(Rect::new(0.0, 0.0, 4000.0, 1000.0), 50.0);
        assert!((v.zoom - 0.1).abs() < EPS);
    }

    #[test]
    fn test_pan_preserves_zoom() {
        let mut v = viewport();
        let zoom = v.zoom;
        v.pan_by(25.0, -10.0);
        assert_eq!(v.zoom, zoom);
        assert!(close(v.pan, Point::new(62.0, -22.5)));
    }

    #[test]
    fn test_degenerate_bounds_do_not_produce_nan() {
        let mut v = Viewport::new(Size::new(800.0, 600.0));
        v.fit_to_screen(Rect::new(10.0, 10.0, 0.0, 0.0), 40.0);
        assert!(v.zoom.is_finite());
        assert!(v.pan.x.is_finite() && v.pan.y.is_finite());
    }
}
