//! Session state subsystem.
//!
//! Cross-component shared auth/account state. The store is dependency-
//! injected wherever it is needed; subscribers observe transitions
//! (login, account updates, logout) through a watch channel.

pub mod store;

pub use store::{Account, SessionState, SessionStore};
