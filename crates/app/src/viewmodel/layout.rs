//! Layout loading view model
//!
//! Fetches the floor plan, stall types, and exhibition config, normalizes
//! them into the spatial model, and fits the viewport. Responses from a
//! superseded load are discarded.

use std::sync::Arc;

use slint::ComponentHandle;
use tracing::{debug, info};

use expofloor_core::{invariants, layout, BookingSession};

use crate::state::{AppState, LoadPhase};
use crate::viewmodel;
use crate::MainWindow;

pub fn setup_layout_bindings(window: &MainWindow, state: Arc<AppState>) {
    let window_weak = window.as_weak();
    window.on_retry_load(move || {
        let exhibition_id = *state.exhibition_id.lock().unwrap();
        if let Some(w) = window_weak.upgrade() {
            load_exhibition(&w, state.clone(), exhibition_id);
        }
    });
}

/// Start (or restart) loading an exhibition. The viewer shows the loading
/// state and will not hit-test or select until everything has arrived.
pub fn load_exhibition(window: &MainWindow, state: Arc<AppState>, exhibition_id: i64) {
    *state.exhibition_id.lock().unwrap() = exhibition_id;
    let generation = state.begin_load();

    window.set_loading(true);
    window.set_load_error("".into());
    window.set_status_message("".into());

    info!(exhibition_id, "Loading exhibition layout");

    let window_weak = window.as_weak();
    let client = state.client.clone();
    tokio::spawn(async move {
        let result = tokio::try_join!(
            client.layout(exhibition_id),
            client.stall_types(exhibition_id),
            client.exhibition(exhibition_id),
        );

        if !state.is_current(generation) {
            debug!(generation, "Discarding stale layout response");
            return;
        }

        match result {
            Ok((payload, stall_types, exhibition)) => {
                let plan = layout::normalize(
                    payload,
                    &stall_types,
                    &exhibition,
                    state.settings.canvas_units_per_meter,
                );
                invariants::assert_plan(&plan);

                let dropped = plan.dropped_stalls.len();
                let stall_count = plan.stalls.len();
                info!(stall_count, dropped, "Floor plan loaded");

                {
                    *state.plan.lock().unwrap() = Some(plan);
                    *state.stall_types.lock().unwrap() = stall_types;
                    *state.session.lock().unwrap() =
                        Some(BookingSession::new(exhibition.clone()));
                    state.visuals.lock().unwrap().clear();
                    state.hover.lock().unwrap().reset();
                    *state.phase.lock().unwrap() = LoadPhase::Ready;
                }

                let state = state.clone();
                let _ = window_weak.upgrade_in_event_loop(move |w| {
                    w.set_loading(false);
                    w.set_exhibition_name(exhibition.name.as_str().into());
                    if dropped > 0 {
                        w.set_status_message(
                            format!("{dropped} stall(s) skipped: missing hall reference").into(),
                        );
                    }

                    fit_viewport(&state);
                    viewmodel::refresh_scene(&w, &state);
                    viewmodel::booking::refresh_booking(&w, &state);
                });
            }
            Err(e) => {
                *state.phase.lock().unwrap() = LoadPhase::Failed(e.to_string());
                tracing::error!(error = %e, "Failed to load exhibition");
                let message = format!("Failed to load floor plan: {e}");
                let _ = window_weak.upgrade_in_event_loop(move |w| {
                    w.set_loading(false);
                    w.set_load_error(message.into());
                });
            }
        }
    });
}

pub(crate) fn fit_viewport(state: &AppState) {
    let plan_guard = state.plan.lock().unwrap();
    let bounds = plan_guard.as_ref().and_then(|p| p.bounds());
    drop(plan_guard);

    if let Some(bounds) = bounds {
        let mut viewport = state.viewport.lock().unwrap();
        viewport.fit_to_screen(bounds, state.settings.fit_padding);
        invariants::assert_viewport(&viewport);
    }
}
