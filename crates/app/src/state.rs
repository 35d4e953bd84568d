//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use expofloor_api::ApiClient;
use expofloor_core::models::{Point, Size, StallType};
use expofloor_core::{BookingSession, FloorPlan, HoverTracker, ViewerSettings, Viewport, VisualCache};

/// Where the viewer is in its load cycle. Hit-testing and selection are
/// no-ops until the plan is `Ready`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Left-button drag tracking: differentiates a click from a camera pan.
/// Once the pointer moves beyond the threshold the gesture is a pan and
/// the release is not treated as a stall click.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    pub pressed: bool,
    pub dragging: bool,
    pub start: Point,
    pub last: Point,
}

/// Main application state. Everything is owned by the single rendering
/// context; the mutexes only bridge the UI callbacks and the async load
/// task.
pub struct AppState {
    pub settings: ViewerSettings,
    pub client: ApiClient,
    pub exhibition_id: Mutex<i64>,
    pub plan: Mutex<Option<FloorPlan>>,
    pub stall_types: Mutex<Vec<StallType>>,
    pub viewport: Mutex<Viewport>,
    pub hover: Mutex<HoverTracker>,
    pub visuals: Mutex<VisualCache>,
    pub session: Mutex<Option<BookingSession>>,
    pub phase: Mutex<LoadPhase>,
    /// Load generation counter; in-flight responses from an older
    /// generation are discarded (stale-response guard)
    pub generation: AtomicU64,
    pub drag: Mutex<DragState>,
    started: Instant,
}

impl AppState {
    pub fn new(settings: ViewerSettings) -> Self {
        let client = ApiClient::new(settings.backend_url.as_str());
        let hover = HoverTracker::new(settings.hover_grace_ms);
        Self {
            settings,
            client,
            exhibition_id: Mutex::new(0),
            plan: Mutex::new(None),
            stall_types: Mutex::new(Vec::new()),
            viewport: Mutex::new(Viewport::new(Size::new(800.0, 600.0))),
            hover: Mutex::new(hover),
            visuals: Mutex::new(VisualCache::default()),
            session: Mutex::new(None),
            phase: Mutex::new(LoadPhase::Idle),
            generation: AtomicU64::new(0),
            drag: Mutex::new(DragState::default()),
            started: Instant::now(),
        }
    }

    /// Monotonic timestamp fed to the hover tracker.
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Start a new load cycle, invalidating any in-flight responses.
    pub fn begin_load(&self) -> u64 {
        *self.phase.lock().unwrap() = LoadPhase::Loading;
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    pub fn is_ready(&self) -> bool {
        *self.phase.lock().unwrap() == LoadPhase::Ready
    }
}
