//! Pending-selection relay.
//!
//! Holds at most one cart-eligible line created while the actor was not
//! authenticated, mirrors it to the [`PENDING_SLOT`], and feeds it into the
//! cart exactly once on the unauthenticated → authenticated transition.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    cart::{CartLine, CartStore},
    storage::{PENDING_SLOT, StateStore},
};

/// Relay for the single not-yet-authenticated selection.
pub struct PendingRelay {
    pending: Option<CartLine>,
    was_authenticated: bool,
    state: Arc<dyn StateStore>,
}

impl PendingRelay {
    /// Restore any persisted pending selection. Values failing the cart
    /// validity predicate are discarded before the relay logic ever sees
    /// them.
    #[must_use]
    pub fn new(state: Arc<dyn StateStore>) -> Self {
        let pending = restore_pending(state.as_ref());

        Self {
            pending,
            was_authenticated: false,
            state,
        }
    }

    /// Hold a selection until login. Last write wins; only one pending
    /// selection is retained at a time.
    pub fn stash(&mut self, line: CartLine) {
        match serde_json::to_string(&line) {
            Ok(json) => self.state.set(PENDING_SLOT, &json),
            Err(error) => warn!(%error, "failed to serialize pending selection"),
        }

        debug!(line_id = line.id, "stashed pending selection");
        self.pending = Some(line);
    }

    /// The currently held selection, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&CartLine> {
        self.pending.as_ref()
    }

    /// Observe an authentication-state change.
    ///
    /// Only the unauthenticated → authenticated edge consumes the pending
    /// selection: a valid one is added to the cart (which opens the cart
    /// view); an invalid one is discarded without surfacing anything.
    /// Repeated "already authenticated" notifications change nothing.
    pub fn on_auth_change(&mut self, authenticated: bool, cart: &mut CartStore) {
        let was = std::mem::replace(&mut self.was_authenticated, authenticated);

        if was || !authenticated {
            return;
        }

        let Some(line) = self.pending.take() else {
            return;
        };

        self.state.remove(PENDING_SLOT);

        if line.price > Decimal::ZERO && line.guest_count > 0 {
            if let Err(error) = cart.add(line) {
                warn!(%error, "pending selection rejected by cart");
            }
        } else {
            warn!(line_id = line.id, "discarding invalid pending selection");
        }
    }
}

fn restore_pending(state: &dyn StateStore) -> Option<CartLine> {
    let raw = state.get(PENDING_SLOT)?;

    match serde_json::from_str::<CartLine>(&raw) {
        Ok(line) if line.is_well_formed() => Some(line),
        Ok(line) => {
            warn!(line_id = line.id, "discarding invalid pending selection");
            state.remove(PENDING_SLOT);
            None
        }
        Err(error) => {
            warn!(%error, "discarding corrupt pending slot");
            state.remove(PENDING_SLOT);
            None
        }
    }
}
