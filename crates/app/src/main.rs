//! Expofloor - exhibition floor-plan viewer and stall booking
//!
//! Desktop viewer for exhibition layouts: pan/zoom over the floor plan,
//! pick available stalls, and submit a booking with the itemized price
//! breakdown computed client-side.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod state;
mod viewmodel;

slint::include_modules!();

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Expofloor");

    // Initialize tokio runtime for backend fetches
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let _guard = runtime.enter();

    let settings = match expofloor_core::ViewerSettings::load() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            expofloor_core::ViewerSettings::default()
        }
    };

    let exhibition_id = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(settings.default_exhibition_id);

    let app_state = Arc::new(state::AppState::new(settings));

    // Create main window
    let main_window = MainWindow::new().unwrap();

    // Set up view model bindings
    viewmodel::setup_bindings(&main_window, app_state.clone());

    // Kick off the initial load
    viewmodel::layout::load_exhibition(&main_window, app_state, exhibition_id);

    // Run the application
    main_window.run().unwrap();
}
