//! Space model - the exhibition floor's outer bounding region

use serde::{Deserialize, Serialize};

/// One exhibition floor. Exactly one active Space per exhibition in current
/// scope. Immutable once loaded; replaced wholesale on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub id: i64,
    /// Width in canvas (design) units
    pub width: f64,
    /// Height in canvas (design) units
    pub height: f64,
}
