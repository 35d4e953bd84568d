//! Canvas input view model: pan, zoom, hover, and stall clicks

use std::sync::Arc;

use slint::ComponentHandle;

use expofloor_core::models::{Point, Size};
use expofloor_core::scene;
use expofloor_core::selection::SelectedStall;

use crate::state::AppState;
use crate::viewmodel;
use crate::MainWindow;

/// Pointer travel beyond which a press becomes a pan instead of a click.
const DRAG_THRESHOLD: f64 = 5.0;
/// Zoom factor per scroll-wheel notch.
const WHEEL_ZOOM: f64 = 1.1;

pub fn setup_canvas_bindings(window: &MainWindow, state: Arc<AppState>) {
    // Press: arm the click/drag tracker
    let state_press = state.clone();
    window.on_canvas_pressed(move |x, y| {
        let mut drag = state_press.drag.lock().unwrap();
        drag.pressed = true;
        drag.dragging = false;
        drag.start = Point::new(x as f64, y as f64);
        drag.last = drag.start;
    });

    // Drag: pan once past the threshold
    let state_drag = state.clone();
    let window_weak = window.as_weak();
    window.on_canvas_dragged(move |x, y| {
        let p = Point::new(x as f64, y as f64);
        let mut delta = None;
        {
            let mut drag = state_drag.drag.lock().unwrap();
            if !drag.pressed {
                return;
            }
            if !drag.dragging {
                let dx = p.x - drag.start.x;
                let dy = p.y - drag.start.y;
                if (dx * dx + dy * dy).sqrt() > DRAG_THRESHOLD {
                    drag.dragging = true;
                }
            }
            if drag.dragging {
                delta = Some((p.x - drag.last.x, p.y - drag.last.y));
                drag.last = p;
            }
        }

        if let Some((dx, dy)) = delta {
            state_drag.viewport.lock().unwrap().pan_by(dx, dy);
            if let Some(w) = window_weak.upgrade() {
                viewmodel::refresh_scene(&w, &state_drag);
            }
        }
    });

    // Release: a press that never became a drag is a stall click
    let state_release = state.clone();
    let window_weak = window.as_weak();
    window.on_canvas_released(move |x, y| {
        let was_drag = {
            let mut drag = state_release.drag.lock().unwrap();
            let was = drag.dragging;
            drag.pressed = false;
            drag.dragging = false;
            was
        };
        if was_drag || !state_release.is_ready() {
            return;
        }
        if let Some(w) = window_weak.upgrade() {
            handle_click(&w, &state_release, Point::new(x as f64, y as f64));
        }
    });

    // Hover tracking
    let state_hover = state.clone();
    let window_weak = window.as_weak();
    window.on_canvas_hovered(move |x, y| {
        if !state_hover.is_ready() {
            return;
        }
        let target = {
            let plan = state_hover.plan.lock().unwrap();
            let viewport = state_hover.viewport.lock().unwrap();
            plan.as_ref()
                .and_then(|p| scene::stall_at(p, &viewport, Point::new(x as f64, y as f64)))
        };
        let changed = state_hover
            .hover
            .lock()
            .unwrap()
            .update(target, state_hover.now_ms());
        if changed {
            if let Some(w) = window_weak.upgrade() {
                viewmodel::refresh_scene(&w, &state_hover);
            }
        }
    });

    // Wheel: zoom keeping the pointer position stationary
    let state_scroll = state.clone();
    let window_weak = window.as_weak();
    window.on_canvas_scrolled(move |x, y, delta| {
        if !state_scroll.is_ready() {
            return;
        }
        let factor = if delta > 0.0 { WHEEL_ZOOM } else { 1.0 / WHEEL_ZOOM };
        state_scroll
            .viewport
            .lock()
            .unwrap()
            .zoom_at_point(Point::new(x as f64, y as f64), factor);
        if let Some(w) = window_weak.upgrade() {
            viewmodel::refresh_scene(&w, &state_scroll);
        }
    });

    // Canvas resize: keep the viewport size in sync
    let state_resize = state.clone();
    window.on_canvas_resized(move |width, height| {
        state_resize
            .viewport
            .lock()
            .unwrap()
            .set_viewport_size(Size::new(width as f64, height as f64));
    });

    // Toolbar zoom controls
    let state_zoom = state.clone();
    let window_weak = window.as_weak();
    window.on_zoom_in(move || {
        state_zoom.viewport.lock().unwrap().zoom_in();
        if let Some(w) = window_weak.upgrade() {
            viewmodel::refresh_scene(&w, &state_zoom);
        }
    });

    let state_zoom = state.clone();
    let window_weak = window.as_weak();
    window.on_zoom_out(move || {
        state_zoom.viewport.lock().unwrap().zoom_out();
        if let Some(w) = window_weak.upgrade() {
            viewmodel::refresh_scene(&w, &state_zoom);
        }
    });

    let state_fit = state.clone();
    let window_weak = window.as_weak();
    window.on_fit_view(move || {
        viewmodel::layout::fit_viewport(&state_fit);
        if let Some(w) = window_weak.upgrade() {
            viewmodel::refresh_scene(&w, &state_fit);
        }
    });
}

/// Click contract: toggle selection for available stalls; clicking a
/// non-available stall surfaces a message instead of silently ignoring it.
fn handle_click(window: &MainWindow, state: &AppState, screen: Point) {
    let selected_stall = {
        let plan_guard = state.plan.lock().unwrap();
        let plan = match plan_guard.as_ref() {
            Some(p) => p,
            None => return,
        };
        let viewport = state.viewport.lock().unwrap();
        let stall_id = match scene::stall_at(plan, &viewport, screen) {
            Some(id) => id,
            None => return,
        };
        let stall = match plan.stalls.get(&stall_id) {
            Some(s) => s,
            None => return,
        };
        let hall = match plan.halls.get(&stall.hall_id) {
            Some(h) => h,
            None => return,
        };
        let types = state.stall_types.lock().unwrap();
        let stall_type = types.iter().find(|t| t.id == stall.stall_type_id);
        SelectedStall::from_stall(stall, hall, stall_type)
    };

    let result = {
        let mut session = state.session.lock().unwrap();
        match session.as_mut() {
            Some(s) => s.toggle(selected_stall),
            None => return,
        }
    };

    match result {
        Ok(_) => window.set_status_message("".into()),
        Err(e) => window.set_status_message(e.to_string().into()),
    }

    viewmodel::refresh_scene(window, state);
    viewmodel::booking::refresh_booking(window, state);
}
