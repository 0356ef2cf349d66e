//! Storage record models for the persisted session.
//!
//! These types describe the on-disk representation and are kept apart from
//! the in-memory [`SessionStore`](crate::session::SessionStore).

use crate::session::SessionToken;
use serde::{Deserialize, Serialize};

/// Current version of the session file format.
pub const STORAGE_VERSION: u32 = 1;

/// A persisted session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// The bearer token issued at login.
    pub token: SessionToken,

    /// Unix timestamp of the login that produced the token.
    pub saved_at: i64,
}

impl SessionRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(token: SessionToken) -> Self {
        Self {
            token,
            saved_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Top-level structure of the session file.
///
/// ```json
/// {
///   "version": 1,
///   "session": { "token": "QpwL5tke4Pnpja7X4", "saved_at": 1718000000 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    pub version: u32,

    #[serde(default)]
    pub session: Option<SessionRecord>,
}

impl Default for SessionFile {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            session: None,
        }
    }
}
