//! Shared auth/account state with subscription.
//!
//! One store instance is created at application start and lives for the
//! whole process. Logout resets the state to anonymous; the store itself is
//! never torn down. Components observe changes through a watch channel
//! rather than reading ambient globals.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Account payload as returned by the portal API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Grooming credits balance.
    pub credits: u32,
}

/// Snapshot of the current session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub account: Option<Account>,
    pub access_token: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.account.is_some() && self.access_token.is_some()
    }
}

/// Process-wide session container.
///
/// Cheap to clone; all clones share the same underlying channel.
#[derive(Clone)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Create a store holding the anonymous state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::default());
        Self { tx }
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Enter the authenticated state.
    pub fn login(&self, account: Account, access_token: String) {
        self.tx.send_replace(SessionState {
            account: Some(account),
            access_token: Some(access_token),
        });
    }

    /// Apply an in-place update to the signed-in account, if any.
    /// No-op (and no notification) when anonymous.
    pub fn update_account(&self, f: impl FnOnce(&mut Account)) {
        self.tx.send_if_modified(|state| match state.account.as_mut() {
            Some(account) => {
                f(account);
                true
            }
            None => false,
        });
    }

    /// Reset to the anonymous state.
    pub fn logout(&self) {
        self.tx.send_replace(SessionState::default());
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
