//! Failure taxonomy for remote calls.

use thiserror::Error;

/// The four remote operations, used to label failures and decode responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Authenticate,
    ListUsers,
    UpdateUser,
    DeleteUser,
}

impl Operation {
    /// Returns `true` for operations sent with the bearer token.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        !matches!(self, Self::Authenticate)
    }

    /// Short verb phrase used in messages ("update user").
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Authenticate => "log in",
            Self::ListUsers => "load users",
            Self::UpdateUser => "update user",
            Self::DeleteUser => "delete user",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Typed failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The login endpoint rejected the request (a 4xx answered by the
    /// service, or a success body without a token).
    ///
    /// `reason` carries the server's `error` field when the body had one.
    #[error("Invalid credentials")]
    InvalidCredentials { reason: Option<String> },

    /// The login endpoint failed for a reason other than the credentials
    /// (5xx or a transport failure reported by the host).
    #[error("Login service unavailable (status {status})")]
    ServiceUnavailable { status: u16 },

    /// A list, update or delete call failed.
    #[error("Failed to {operation} (status {status})")]
    FetchFailed { operation: Operation, status: u16 },

    /// The service answered 401. The session has already been cleared.
    #[error("Session expired. Please login again.")]
    Unauthenticated,

    /// A page number below 1 was requested. No request was sent.
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    /// The request body could not be serialized. No request was sent.
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Returns `true` if this failure invalidated the session.
    #[must_use]
    pub const fn is_session_loss(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failed_names_the_operation() {
        let error = ApiError::FetchFailed {
            operation: Operation::DeleteUser,
            status: 500,
        };
        assert_eq!(error.to_string(), "Failed to delete user (status 500)");
    }

    #[test]
    fn only_login_skips_auth() {
        assert!(!Operation::Authenticate.requires_auth());
        assert!(Operation::ListUsers.requires_auth());
        assert!(Operation::UpdateUser.requires_auth());
        assert!(Operation::DeleteUser.requires_auth());
    }
}
