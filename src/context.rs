//! Cart context.
//!
//! Explicit service object wiring the cart store, the pending-selection
//! relay and the injected authentication-state source together. Consumers
//! receive it by dependency passing; there is no ambient lookup.

use std::sync::Arc;

use crate::{
    auth::{AuthSession, UserId},
    cart::{CartError, CartLine, CartStore},
    pending::PendingRelay,
    storage::StateStore,
};

/// The cart-facing surface handed to the rest of the application.
pub struct CartContext {
    auth: Arc<dyn AuthSession>,
    cart: CartStore,
    pending: PendingRelay,
}

impl CartContext {
    /// Restore both persisted slots and wire up collaborators. Call
    /// [`CartContext::auth_state_changed`] once the authentication state
    /// first resolves, and again on every later transition.
    #[must_use]
    pub fn new(state: Arc<dyn StateStore>, auth: Arc<dyn AuthSession>) -> Self {
        Self {
            cart: CartStore::new(state.clone(), auth.clone()),
            pending: PendingRelay::new(state),
            auth,
        }
    }

    /// Add a line to the cart, or stash it as the pending selection when
    /// no authenticated identity exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MalformedLine`] when an authenticated add is
    /// rejected by the validity predicate.
    pub fn add_to_cart(&mut self, line: CartLine) -> Result<(), CartError> {
        if self.auth.current_user().is_none() {
            self.pending.stash(line);
            return Ok(());
        }

        self.cart.add(line)
    }

    /// Notify the engine that the authentication state may have changed.
    pub fn auth_state_changed(&mut self) {
        let authenticated = self.auth.current_user().is_some();
        self.pending.on_auth_change(authenticated, &mut self.cart);
    }

    /// The currently authenticated user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserId> {
        self.auth.current_user()
    }

    /// Read access to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Mutable access to the cart store.
    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// The pending selection, if one is held.
    #[must_use]
    pub fn pending_selection(&self) -> Option<&CartLine> {
        self.pending.pending()
    }
}
