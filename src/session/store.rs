//! Session token store.
//!
//! [`SessionStore`] is a cheaply cloneable handle to the one authoritative
//! bearer token of a plugin instance. The application state and the API
//! client each hold a clone of the same handle, so a token cleared by the
//! client's 401 inspection is immediately absent for the route gate as well.
//!
//! The plugin runs on a single Zellij thread, so the handle is an
//! `Rc<RefCell<_>>` rather than a lock. Borrows never outlive a method call.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// An opaque bearer credential.
///
/// The value is never interpreted. `Debug` output is redacted so tokens do not
/// leak into trace files.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a token string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.len())
    }
}

/// Shared handle to the current session token.
///
/// Initialized empty (unauthenticated). Cloning the store clones the handle,
/// not the token: all clones observe the same value.
///
/// # Example
///
/// ```rust
/// use zusers::session::{SessionStore, SessionToken};
///
/// let store = SessionStore::default();
/// let client_view = store.clone();
///
/// store.set(SessionToken::new("QpwL5tke4Pnpja7X4"));
/// assert!(client_view.is_authenticated());
///
/// client_view.clear();
/// assert!(store.get().is_none());
/// ```
#[derive(Clone, Default)]
pub struct SessionStore {
    token: Rc<RefCell<Option<SessionToken>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current token.
    pub fn set(&self, token: SessionToken) {
        tracing::debug!(token = ?token, "session token set");
        *self.token.borrow_mut() = Some(token);
    }

    /// Returns a copy of the current token, if any.
    #[must_use]
    pub fn get(&self) -> Option<SessionToken> {
        self.token.borrow().clone()
    }

    /// Removes the current token.
    ///
    /// Returns `true` if a token was present.
    pub fn clear(&self) -> bool {
        let had_token = self.token.borrow_mut().take().is_some();
        if had_token {
            tracing::debug!("session token cleared");
        }
        had_token
    }

    /// Returns `true` while a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unauthenticated() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());
        assert!(store.get().is_none());
    }

    #[test]
    fn clones_share_one_token() {
        let store = SessionStore::new();
        let other = store.clone();

        store.set(SessionToken::new("first"));
        other.set(SessionToken::new("second"));

        assert_eq!(store.get().unwrap().as_str(), "second");
        assert!(other.clear());
        assert!(!store.is_authenticated());
        assert!(!store.clear());
    }

    #[test]
    fn debug_output_is_redacted() {
        let token = SessionToken::new("QpwL5tke4Pnpja7X4");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("QpwL5tke4Pnpja7X4"));
        assert_eq!(rendered, "SessionToken(<17 chars>)");
    }
}
