//! Selection state machine
//!
//! Tracks the set of stalls the user intends to book. Selection is a
//! client-local overlay over the backend-authoritative stall status: a
//! stall can only enter the selected state while its status is Available,
//! and the set is cleared on submit, cancel, or exhibition change.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Dimensions, Hall, Stall, StallStatus, StallType};

/// View-model wrapping a stall with the denormalized display fields the
/// sidebar and the pricing engine need. Exists only inside the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedStall {
    pub stall_id: i64,
    pub stall_number: String,
    pub dimensions: Dimensions,
    pub rate_per_sqm: f64,
    pub status: StallStatus,
    pub hall_name: String,
    pub stall_type_name: String,
}

impl SelectedStall {
    pub fn from_stall(stall: &Stall, hall: &Hall, stall_type: Option<&StallType>) -> Self {
        Self {
            stall_id: stall.id,
            stall_number: stall.stall_number.clone(),
            dimensions: stall.dimensions,
            rate_per_sqm: stall.rate_per_sqm,
            status: stall.status,
            hall_name: hall.name.clone(),
            stall_type_name: stall_type
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "Standard".to_string()),
        }
    }

    pub fn area(&self) -> f64 {
        self.dimensions.area()
    }
}

/// Per stall the machine has two states, unselected and selected, with no
/// intermediates. The aggregate is id-keyed with set semantics; insertion
/// order is kept for stable sidebar display.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    stalls: Vec<SelectedStall>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `unselected -> selected`; valid only while the stall is Available.
    pub fn select(&mut self, stall: SelectedStall) -> Result<()> {
        if !stall.status.is_available() {
            return Err(Error::StallUnavailable(stall.stall_number));
        }
        if self.is_selected(stall.stall_id) {
            return Err(Error::AlreadySelected(stall.stall_number));
        }
        self.stalls.push(stall);
        Ok(())
    }

    /// `selected -> unselected`.
    pub fn deselect(&mut self, stall_id: i64) -> Result<SelectedStall> {
        match self.stalls.iter().position(|s| s.stall_id == stall_id) {
            Some(idx) => Ok(self.stalls.remove(idx)),
            None => Err(Error::NotSelected(stall_id.to_string())),
        }
    }

    /// Reset every stall to unselected.
    pub fn clear(&mut self) {
        self.stalls.clear();
    }

    pub fn is_selected(&self, stall_id: i64) -> bool {
        self.stalls.iter().any(|s| s.stall_id == stall_id)
    }

    pub fn ids(&self) -> Vec<i64> {
        self.stalls.iter().map(|s| s.stall_id).collect()
    }

    pub fn stalls(&self) -> &[SelectedStall] {
        &self.stalls
    }

    pub fn len(&self) -> usize {
        self.stalls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stalls.is_empty()
    }
}
