//! Route gate for protected views.
//!
//! The console has two routes: the public login screen at `/` and the
//! protected user list at `/users`. [`resolve`] is evaluated synchronously
//! before anything is rendered; a protected route without a session token
//! resolves to the login screen instead.

use super::store::SessionStore;

/// Client-visible routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`, the login screen.
    Login,
    /// `/users`, the user list. Requires a session.
    Users,
}

impl Route {
    /// Returns the route's path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Users => "/users",
        }
    }

    /// Returns `true` if the route requires a session token.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Users)
    }
}

/// Returns the route that may actually be shown for `requested`.
///
/// # Example
///
/// ```rust
/// use zusers::session::{resolve, Route, SessionStore, SessionToken};
///
/// let session = SessionStore::new();
/// assert_eq!(resolve(Route::Users, &session), Route::Login);
///
/// session.set(SessionToken::new("token"));
/// assert_eq!(resolve(Route::Users, &session), Route::Users);
/// ```
#[must_use]
pub fn resolve(requested: Route, session: &SessionStore) -> Route {
    if requested.is_protected() && !session.is_authenticated() {
        tracing::debug!(requested = requested.path(), "no session, redirecting to login");
        Route::Login
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionToken;

    #[test]
    fn login_is_always_reachable() {
        let session = SessionStore::new();
        assert_eq!(resolve(Route::Login, &session), Route::Login);
        session.set(SessionToken::new("t"));
        assert_eq!(resolve(Route::Login, &session), Route::Login);
    }

    #[test]
    fn users_redirects_after_clear() {
        let session = SessionStore::new();
        session.set(SessionToken::new("t"));
        assert_eq!(resolve(Route::Users, &session), Route::Users);

        session.clear();
        assert_eq!(resolve(Route::Users, &session), Route::Login);
    }
}
