//! Request/response pipeline applied to every remote call.
//!
//! [`AuthPipeline`] is the explicit replacement for a process-wide HTTP
//! interceptor. The API client runs every outgoing request through
//! [`AuthPipeline::outgoing`] and every incoming status through
//! [`AuthPipeline::incoming`], so both behaviors are visible at the call site:
//!
//! ```text
//! build request ─→ outgoing: bearer token, api key, content type ─→ web_request
//! WebRequestResult ─→ incoming: 401 clears the session ─→ decode per operation
//! ```

use super::error::Operation;
use super::request::HttpRequest;
use crate::session::SessionStore;

/// Outcome of inspecting a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inspection {
    /// The response may be decoded by the operation.
    Pass,
    /// The service rejected the session. The token has been cleared.
    SessionRejected,
}

/// Attaches credentials to requests and reacts to rejected sessions.
#[derive(Debug, Clone)]
pub struct AuthPipeline {
    session: SessionStore,
    api_key: Option<String>,
}

impl AuthPipeline {
    /// Creates a pipeline reading and clearing `session`.
    #[must_use]
    pub const fn new(session: SessionStore, api_key: Option<String>) -> Self {
        Self { session, api_key }
    }

    /// Returns the session handle this pipeline reads.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Decorates an outgoing request.
    ///
    /// The token is read exactly once here, so a request never mixes two
    /// tokens. The login call is sent without `Authorization`.
    pub fn outgoing(&self, operation: Operation, request: &mut HttpRequest) {
        request
            .headers
            .insert("Accept".to_string(), "application/json".to_string());

        if !request.body.is_empty() {
            request
                .headers
                .insert("Content-Type".to_string(), "application/json".to_string());
        }

        if let Some(api_key) = &self.api_key {
            request
                .headers
                .insert("x-api-key".to_string(), api_key.clone());
        }

        if operation.requires_auth() {
            if let Some(token) = self.session.get() {
                request.headers.insert(
                    "Authorization".to_string(),
                    format!("Bearer {}", token.as_str()),
                );
            } else {
                tracing::debug!(operation = %operation, "sending request without a session token");
            }
        }
    }

    /// Inspects an incoming response status.
    ///
    /// A 401 from any operation clears the session store as a side effect.
    pub fn incoming(&self, operation: Operation, status: u16) -> Inspection {
        if status == 401 {
            let had_token = self.session.clear();
            tracing::warn!(
                operation = %operation,
                had_token = had_token,
                "service rejected the session"
            );
            Inspection::SessionRejected
        } else {
            Inspection::Pass
        }
    }
}
