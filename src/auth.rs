//! Authentication-state source.
//!
//! The engine never talks to the authentication provider; it only asks an
//! injected [`AuthSession`] whether an authenticated identity exists right
//! now. The surrounding application owns login, registration and session
//! refresh.

use std::sync::{Arc, Mutex, PoisonError};

use mockall::automock;

/// Identifier of an authenticated user, as known to the order backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

/// Read-only view of the current authentication state.
#[automock]
pub trait AuthSession: Send + Sync {
    /// The currently authenticated user, if any.
    fn current_user(&self) -> Option<UserId>;
}

/// Shared, mutable authentication state for hosts that drive login
/// transitions themselves (and for tests).
#[derive(Debug, Clone, Default)]
pub struct SharedAuthState {
    user: Arc<Mutex<Option<UserId>>>,
}

impl SharedAuthState {
    /// Create a state with no authenticated user.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a login or logout.
    pub fn set_user(&self, user: Option<UserId>) {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

impl AuthSession for SharedAuthState {
    fn current_user(&self) -> Option<UserId> {
        *self.user.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_state_starts_unauthenticated() {
        let auth = SharedAuthState::new();

        assert_eq!(auth.current_user(), None);
    }

    #[test]
    fn shared_state_tracks_login_and_logout() {
        let auth = SharedAuthState::new();

        auth.set_user(Some(UserId(7)));
        assert_eq!(auth.current_user(), Some(UserId(7)));

        auth.set_user(None);
        assert_eq!(auth.current_user(), None);
    }
}
