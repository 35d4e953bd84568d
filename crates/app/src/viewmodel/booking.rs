//! Booking sidebar view model: line items, discount choice, totals, submit

use std::rc::Rc;
use std::sync::Arc;

use slint::{ComponentHandle, ModelRc, SharedString, VecModel};
use tracing::info;

use expofloor_core::models::CustomerDetails;

use crate::state::AppState;
use crate::viewmodel;
use crate::{MainWindow, SelectionRow, TaxRow};

fn fmt_money(value: f64) -> String {
    format!("{value:.2}")
}

/// Push the current calculation into the sidebar. Called after every
/// selection or discount change; the calculation itself is always in sync
/// with the selection (the session recomputes on each transition).
pub fn refresh_booking(window: &MainWindow, state: &AppState) {
    let session_guard = state.session.lock().unwrap();
    let session = match session_guard.as_ref() {
        Some(s) => s,
        None => return,
    };

    let calc = session.calculation();

    let rows: Vec<SelectionRow> = session
        .selection()
        .stalls()
        .iter()
        .zip(&calc.stalls)
        .map(|(stall, line)| SelectionRow {
            number: stall.stall_number.as_str().into(),
            hall: stall.hall_name.as_str().into(),
            area: format!("{:.1} m²", stall.area()).into(),
            base: fmt_money(line.base_amount).into(),
        })
        .collect();

    let taxes: Vec<TaxRow> = calc
        .taxes
        .iter()
        .map(|t| TaxRow {
            name: format!("{} ({}%)", t.name, t.rate).into(),
            amount: fmt_money(t.amount).into(),
        })
        .collect();

    let mut options: Vec<SharedString> = vec!["No discount".into()];
    options.extend(
        session
            .config()
            .active_discounts()
            .iter()
            .map(|d| SharedString::from(d.name.as_str())),
    );

    window.set_selection_rows(ModelRc::from(Rc::new(VecModel::from(rows))));
    window.set_tax_rows(ModelRc::from(Rc::new(VecModel::from(taxes))));
    window.set_total_base(fmt_money(calc.total_base_amount).into());
    window.set_total_discount(fmt_money(calc.total_discount_amount).into());
    window.set_total_after_discount(fmt_money(calc.total_amount_after_discount).into());
    window.set_total_tax(fmt_money(calc.total_tax_amount).into());
    window.set_grand_total(fmt_money(calc.total_amount).into());

    if viewmodel::discount_model_differs(&window.get_discount_options(), &options) {
        window.set_discount_options(ModelRc::from(Rc::new(VecModel::from(options))));
    }
}

pub fn setup_booking_bindings(window: &MainWindow, state: Arc<AppState>) {
    // Discount dropdown: index 0 is "no discount"
    let state_discount = state.clone();
    let window_weak = window.as_weak();
    window.on_discount_chosen(move |index| {
        let choice = if index <= 0 {
            None
        } else {
            Some((index - 1) as usize)
        };
        let result = {
            let mut session = state_discount.session.lock().unwrap();
            match session.as_mut() {
                Some(s) => s.choose_discount(choice),
                None => return,
            }
        };
        if let Some(w) = window_weak.upgrade() {
            if let Err(e) = result {
                w.set_status_message(e.to_string().into());
                return;
            }
            refresh_booking(&w, &state_discount);
        }
    });

    // Clear selection
    let state_clear = state.clone();
    let window_weak = window.as_weak();
    window.on_clear_selection(move || {
        {
            let mut session = state_clear.session.lock().unwrap();
            if let Some(s) = session.as_mut() {
                s.clear_selection();
            }
        }
        if let Some(w) = window_weak.upgrade() {
            w.set_status_message("".into());
            viewmodel::refresh_scene(&w, &state_clear);
            refresh_booking(&w, &state_clear);
        }
    });

    // Submit
    let state_submit = state;
    let window_weak = window.as_weak();
    window.on_submit_booking(move |name, email, phone| {
        let name = name.trim().to_string();
        let email = email.trim().to_string();
        let phone = phone.trim().to_string();

        let w = match window_weak.upgrade() {
            Some(w) => w,
            None => return,
        };

        if name.is_empty() || email.is_empty() {
            w.set_status_message("Name and email are required".into());
            return;
        }

        let request = {
            let mut session = state_submit.session.lock().unwrap();
            let session = match session.as_mut() {
                Some(s) => s,
                None => return,
            };
            session.submit(CustomerDetails {
                name,
                email,
                phone,
                company: None,
            })
        };

        let request = match request {
            Ok(r) => r,
            Err(e) => {
                w.set_status_message(e.to_string().into());
                return;
            }
        };

        info!(stalls = request.stall_ids.len(), "Submitting booking");

        let client = state_submit.client.clone();
        let state_async = state_submit.clone();
        let window_weak = window_weak.clone();
        tokio::spawn(async move {
            match client.submit_booking(&request).await {
                Ok(receipt) => {
                    info!(booking_id = receipt.id, "Booking created");
                    let _ = window_weak.upgrade_in_event_loop(move |w| {
                        w.set_status_message(
                            format!("Booking #{} created", receipt.id).into(),
                        );
                        // Reload so the freshly booked stalls show their new
                        // backend status
                        let exhibition_id = *state_async.exhibition_id.lock().unwrap();
                        viewmodel::layout::load_exhibition(&w, state_async.clone(), exhibition_id);
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Booking submission failed");
                    let _ = window_weak.upgrade_in_event_loop(move |w| {
                        w.set_status_message(format!("Booking failed: {e}").into());
                    });
                }
            }
        });
    });
}
