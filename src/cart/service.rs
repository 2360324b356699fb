//! Cart store.
//!
//! In-memory collection of cart lines, mirrored to the [`CART_SLOT`] after
//! every mutation and restored (with validity filtering) at construction.
//! Also owns the cart-view signals: adds open the cart, and opening it
//! without an authenticated identity raises the login prompt instead.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    auth::AuthSession,
    cart::models::CartLine,
    pricing,
    storage::{CART_SLOT, StateStore},
};

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The line failed the validity predicate and was not added.
    #[error("Tentativa de adicionar item inválido ao carrinho")]
    MalformedLine,
}

#[derive(Debug, Clone, Copy, Default)]
struct CartView {
    cart_open: bool,
    login_prompt: bool,
}

/// The cart: what the user currently intends to buy.
pub struct CartStore {
    lines: Vec<CartLine>,
    view: CartView,
    state: Arc<dyn StateStore>,
    auth: Arc<dyn AuthSession>,
}

impl CartStore {
    /// Restore the persisted collection and wire up collaborators.
    ///
    /// Corrupt slot contents are discarded (and logged); entries failing
    /// the validity predicate are dropped and the filtered collection is
    /// re-persisted so corruption never reappears on the next start.
    #[must_use]
    pub fn new(state: Arc<dyn StateStore>, auth: Arc<dyn AuthSession>) -> Self {
        let lines = restore_lines(state.as_ref());

        Self {
            lines,
            view: CartView::default(),
            state,
            auth,
        }
    }

    /// Add a line, merging with an existing booking of the same event,
    /// date and menu tier. Opens the cart view.
    ///
    /// The merge target's staffing fee tracks the guest count of whichever
    /// add touched it last.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MalformedLine`] (leaving the collection
    /// untouched) when the line fails the validity predicate.
    pub fn add(&mut self, line: CartLine) -> Result<(), CartError> {
        if !line.is_well_formed() {
            warn!(line_id = line.id, "rejected malformed cart line");
            return Err(CartError::MalformedLine);
        }

        let fee = pricing::staffing_fee(line.guest_count);

        if let Some(existing) = self.lines.iter_mut().find(|l| l.merges_with(&line)) {
            existing.quantity += line.quantity;
            existing.waiter_fee = fee;
            debug!(
                line_id = existing.id,
                quantity = existing.quantity,
                "merged repeat booking into existing cart line"
            );
        } else {
            let mut line = line;
            line.waiter_fee = fee;
            self.lines.push(line);
        }

        self.persist();
        self.view.cart_open = true;

        Ok(())
    }

    /// Remove the line with the given id; no-op when absent.
    pub fn remove(&mut self, id: i64) {
        self.lines.retain(|line| line.id != id);
        self.persist();
    }

    /// Replace the quantity on the matching line. Nothing else is
    /// recomputed; the staffing fee stays as-is.
    pub fn update_quantity(&mut self, id: i64, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }

        self.persist();
    }

    /// Fully replace the line matching `updated.id`, force-recomputing the
    /// staffing fee from the new guest count. This is the authoritative
    /// path for the edit-cart-item interaction.
    pub fn update_line(&mut self, updated: CartLine) {
        let fee = pricing::staffing_fee(updated.guest_count);

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == updated.id) {
            *line = CartLine {
                waiter_fee: fee,
                ..updated
            };
        }

        self.persist();
    }

    /// Empty the collection (after a fully successful checkout).
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Cart subtotal over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        pricing::cart_subtotal(&self.lines)
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Open the cart view. Without an authenticated identity the cart
    /// stays closed and the login prompt is raised instead.
    pub fn open_cart(&mut self) {
        if self.auth.current_user().is_none() {
            self.view.login_prompt = true;
            return;
        }

        self.view.cart_open = true;
    }

    /// Close the cart view.
    pub fn close_cart(&mut self) {
        self.view.cart_open = false;
    }

    /// Dismiss the login-required prompt.
    pub fn dismiss_login_prompt(&mut self) {
        self.view.login_prompt = false;
    }

    /// Whether the cart view is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.view.cart_open
    }

    /// Whether the login-required prompt is showing.
    #[must_use]
    pub fn login_prompt_shown(&self) -> bool {
        self.view.login_prompt
    }

    fn persist(&self) {
        persist_lines(self.state.as_ref(), &self.lines);
    }
}

fn restore_lines(state: &dyn StateStore) -> Vec<CartLine> {
    let Some(raw) = state.get(CART_SLOT) else {
        return Vec::new();
    };

    let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(%error, "discarding corrupt cart slot");
            state.remove(CART_SLOT);
            return Vec::new();
        }
    };

    let total = entries.len();

    let lines: Vec<CartLine> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<CartLine>(entry).ok())
        .filter(CartLine::is_well_formed)
        .collect();

    if lines.len() != total {
        warn!(
            dropped = total - lines.len(),
            "dropped invalid cart entries on restore"
        );
        persist_lines(state, &lines);
    }

    lines
}

fn persist_lines(state: &dyn StateStore, lines: &[CartLine]) {
    match serde_json::to_string(lines) {
        Ok(json) => state.set(CART_SLOT, &json),
        Err(error) => warn!(%error, "failed to serialize cart"),
    }
}
