//! Expofloor Core Library
//!
//! Spatial model, viewport transforms, scene building, selection state,
//! pricing engine, and booking session for the Expofloor viewer.

pub mod error;
pub mod invariants;
pub mod layout;
pub mod models;
pub mod pricing;
pub mod scene;
pub mod selection;
pub mod session;
pub mod settings;
pub mod viewport;

pub use error::{Error, Result};
pub use layout::{selectable_stalls, FloorPlan, LayoutPayload, StallPayload};
pub use models::*;
pub use pricing::calculate;
pub use scene::{HoverTracker, Scene, VisualCache};
pub use selection::{SelectedStall, SelectionState};
pub use session::BookingSession;
pub use settings::ViewerSettings;
pub use viewport::Viewport;
