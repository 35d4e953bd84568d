//! Booking session facade
//!
//! Glues the selection state machine to the pricing engine for the
//! duration of one booking attempt. Every transition synchronously
//! recomputes the breakdown, so the UI can never observe a stale
//! calculation; `submit` turns the session into the immutable creation
//! request and clears it.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{BookingCalculation, BookingRequest, CustomerDetails, Discount, ExhibitionConfig};
use crate::pricing;
use crate::selection::{SelectedStall, SelectionState};

#[derive(Debug)]
pub struct BookingSession {
    config: ExhibitionConfig,
    selection: SelectionState,
    /// Index into the exhibition's active discounts; `None` is "no
    /// discount", a valid choice.
    discount: Option<usize>,
    calculation: BookingCalculation,
}

impl BookingSession {
    pub fn new(config: ExhibitionConfig) -> Self {
        Self {
            config,
            selection: SelectionState::new(),
            discount: None,
            calculation: BookingCalculation::empty(),
        }
    }

    pub fn exhibition_id(&self) -> i64 {
        self.config.id
    }

    pub fn config(&self) -> &ExhibitionConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The current breakdown; always in sync with the selection.
    pub fn calculation(&self) -> &BookingCalculation {
        &self.calculation
    }

    pub fn chosen_discount(&self) -> Option<&Discount> {
        let idx = self.discount?;
        self.config.active_discounts().get(idx).copied()
    }

    pub fn select(&mut self, stall: SelectedStall) -> Result<()> {
        self.selection.select(stall)?;
        self.recompute();
        Ok(())
    }

    pub fn deselect(&mut self, stall_id: i64) -> Result<()> {
        self.selection.deselect(stall_id)?;
        self.recompute();
        Ok(())
    }

    /// Click contract: flip the stall's selected state. Returns whether the
    /// stall is selected afterwards; a non-available stall surfaces
    /// `StallUnavailable` so the UI can tell the user.
    pub fn toggle(&mut self, stall: SelectedStall) -> Result<bool> {
        if self.selection.is_selected(stall.stall_id) {
            self.deselect(stall.stall_id)?;
            Ok(false)
        } else {
            self.select(stall)?;
            Ok(true)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.recompute();
    }

    /// Pick a discount by index into the active list, or `None` for no
    /// discount.
    pub fn choose_discount(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(idx) = index {
            if idx >= self.config.active_discounts().len() {
                return Err(Error::UnknownDiscount(idx));
            }
        }
        self.discount = index;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        let discount = self.chosen_discount().cloned();
        let taxes: Vec<_> = self.config.active_taxes().into_iter().cloned().collect();
        self.calculation = pricing::calculate(self.selection.stalls(), discount.as_ref(), &taxes);
        crate::invariants::assert_calculation(&self.calculation);
    }

    /// Combine the session with the externally collected customer form
    /// into a creation request, then clear the session. Refuses an empty
    /// selection with a user-facing error.
    pub fn submit(&mut self, customer: CustomerDetails) -> Result<BookingRequest> {
        if self.selection.is_empty() {
            return Err(Error::EmptySelection);
        }

        let request = BookingRequest {
            reference: Uuid::new_v4(),
            exhibition_id: self.config.id,
            stall_ids: self.selection.ids(),
            customer,
            calculations: self.calculation.clone(),
            submitted_at: Utc::now(),
        };

        self.clear_selection();
        self.discount = None;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdjustmentKind, Dimensions, StallShape, StallStatus, Tax};

    fn config() -> ExhibitionConfig {
        ExhibitionConfig {
            id: 7,
            name: "Spring Expo".to_string(),
            stall_rates: Vec::new(),
            tax_config: vec![Tax {
                name: "GST".to_string(),
                rate: 18.0,
                is_active: true,
            }],
            discount_config: vec![Discount {
                name: "Early bird".to_string(),
                kind: AdjustmentKind::Percentage,
                value: 10.0,
                is_active: true,
            }],
        }
    }

    fn stall(id: i64) -> SelectedStall {
        SelectedStall {
            stall_id: id,
            stall_number: format!("A-{id:02}"),
            dimensions: Dimensions::new(4.0, 3.0, StallShape::Rectangle),
            rate_per_sqm: 500.0,
            status: StallStatus::Available,
            hall_name: "Hall A".to_string(),
            stall_type_name: "Standard".to_string(),
        }
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Ada Vendor".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            company: None,
        }
    }

    #[test]
    fn test_every_transition_recomputes() {
        let mut session = BookingSession::new(config());
        assert_eq!(session.calculation().total_amount, 0.0);

        session.select(stall(1)).unwrap();
        assert_eq!(session.calculation().total_base_amount, 6000.0);

        session.select(stall(2)).unwrap();
        assert_eq!(session.calculation().total_base_amount, 12000.0);

        session.deselect(1).unwrap();
        assert_eq!(session.calculation().total_base_amount, 6000.0);

        session.clear_selection();
        assert_eq!(session.calculation().total_amount, 0.0);
    }

    #[test]
    fn test_discount_choice_reprices() {
        let mut session = BookingSession::new(config());
        session.select(stall(1)).unwrap();
        assert_eq!(session.calculation().total_discount_amount, 0.0);

        session.choose_discount(Some(0)).unwrap();
        assert_eq!(session.calculation().total_discount_amount, 600.0);
        assert_eq!(session.calculation().total_amount, 6372.0);

        session.choose_discount(None).unwrap();
        assert_eq!(session.calculation().total_discount_amount, 0.0);
    }

    #[test]
    fn test_unknown_discount_index_rejected() {
        let mut session = BookingSession::new(config());
        assert!(matches!(
            session.choose_discount(Some(3)),
            Err(Error::UnknownDiscount(3))
        ));
    }

    #[test]
    fn test_toggle_flips_state() {
        let mut session = BookingSession::new(config());
        assert!(session.toggle(stall(1)).unwrap());
        assert!(!session.toggle(stall(1)).unwrap());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_toggle_unavailable_surfaces_error() {
        let mut session = BookingSession::new(config());
        let mut s = stall(1);
        s.status = StallStatus::Booked;
        assert!(matches!(
            session.toggle(s),
            Err(Error::StallUnavailable(_))
        ));
    }

    #[test]
    fn test_submit_refuses_empty_selection() {
        let mut session = BookingSession::new(config());
        assert!(matches!(
            session.submit(customer()),
            Err(Error::EmptySelection)
        ));
    }

    #[test]
    fn test_submit_carries_breakdown_and_clears() {
        let mut session = BookingSession::new(config());
        session.select(stall(1)).unwrap();
        session.choose_discount(Some(0)).unwrap();

        let request = session.submit(customer()).unwrap();
        assert_eq!(request.exhibition_id, 7);
        assert_eq!(request.stall_ids, vec![1]);
        assert_eq!(request.calculations.total_amount, 6372.0);

        assert!(session.selection().is_empty());
        assert_eq!(session.calculation().total_amount, 0.0);
        assert!(session.chosen_discount().is_none());
    }

    #[test]
    fn test_sidebar_and_wizard_paths_agree() {
        // The same stall set priced through a session and through a direct
        // engine call (the wizard path) must match exactly.
        let mut session = BookingSession::new(config());
        session.select(stall(1)).unwrap();
        session.select(stall(2)).unwrap();
        session.choose_discount(Some(0)).unwrap();

        let cfg = config();
        let discounts = cfg.active_discounts();
        let taxes: Vec<_> = cfg.active_taxes().into_iter().cloned().collect();
        let wizard = pricing::calculate(
            &[stall(1), stall(2)],
            discounts.first().copied(),
            &taxes,
        );
        assert_eq!(session.calculation(), &wizard);
    }
}
