//! View model bindings between the Slint window and the core state

pub mod booking;
pub mod canvas;
pub mod layout;

use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use slint::{Model, ModelRc, VecModel};

use crate::state::AppState;
use crate::{CanvasLabel, CanvasRect, MainWindow};

pub fn setup_bindings(window: &MainWindow, state: Arc<AppState>) {
    layout::setup_layout_bindings(window, state.clone());
    canvas::setup_canvas_bindings(window, state.clone());
    booking::setup_booking_bindings(window, state);
}

fn to_slint_color(c: expofloor_core::scene::Color) -> slint::Color {
    slint::Color::from_argb_u8(c.a, c.r, c.g, c.b)
}

/// Rebuild the display list from the current plan/viewport/selection and
/// push it into the canvas models.
pub fn refresh_scene(window: &MainWindow, state: &AppState) {
    let plan_guard = state.plan.lock().unwrap();
    let plan = match plan_guard.as_ref() {
        Some(p) => p,
        None => return,
    };
    let viewport = state.viewport.lock().unwrap();
    let session = state.session.lock().unwrap();
    let selected: HashSet<i64> = session
        .as_ref()
        .map(|s| s.selection().ids().into_iter().collect())
        .unwrap_or_default();
    let hovered = state.hover.lock().unwrap().committed();
    let mut visuals = state.visuals.lock().unwrap();

    let scene = expofloor_core::scene::build_scene(
        plan,
        &viewport,
        &selected,
        hovered,
        state.settings.canvas_units_per_meter,
        &mut visuals,
    );

    let rects: Vec<CanvasRect> = scene
        .rects
        .iter()
        .map(|r| CanvasRect {
            x: r.x as f32,
            y: r.y as f32,
            width: r.width as f32,
            height: r.height as f32,
            fill: to_slint_color(r.fill),
            border: to_slint_color(r.border),
            border_width: r.border_width as f32,
        })
        .collect();

    let labels: Vec<CanvasLabel> = scene
        .labels
        .iter()
        .map(|l| CanvasLabel {
            x: l.x as f32,
            y: l.y as f32,
            text: l.text.clone().into(),
            size: l.size as f32,
            color: to_slint_color(l.color),
        })
        .collect();

    window.set_rects(ModelRc::from(Rc::new(VecModel::from(rects))));
    window.set_labels(ModelRc::from(Rc::new(VecModel::from(labels))));
}

/// True when the discount dropdown needs rebuilding (avoids resetting the
/// user's choice on every refresh).
pub(crate) fn discount_model_differs(
    current: &ModelRc<slint::SharedString>,
    desired: &[slint::SharedString],
) -> bool {
    if current.row_count() != desired.len() {
        return true;
    }
    desired
        .iter()
        .enumerate()
        .any(|(i, s)| current.row_data(i).as_ref() != Some(s))
}
