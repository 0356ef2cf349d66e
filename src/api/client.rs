//! Typed client for the remote user service.
//!
//! Zellij performs HTTP on the host and reports the result as a later event,
//! so every operation is split in two halves:
//!
//! 1. **prepare**: [`ApiClient::authenticate`], [`ApiClient::list_users`],
//!    [`ApiClient::update_user`] and [`ApiClient::delete_user`] build the
//!    request, run it through the [`AuthPipeline`], and stamp a fresh
//!    [`Ticket`] into its context.
//! 2. **complete**: [`ApiClient::complete`] takes the status and body of the
//!    matching `WebRequestResult` and decodes it into an [`ApiResponse`] or an
//!    [`ApiError`].
//!
//! # Example
//!
//! ```rust
//! use zusers::api::{ApiClient, ApiResponse, Operation};
//! use zusers::session::SessionStore;
//!
//! let session = SessionStore::new();
//! let mut client = ApiClient::new("https://reqres.in/api", session.clone(), None);
//!
//! let (_ticket, request) = client.authenticate("eve.holt@reqres.in", "cityslicka")?;
//! assert_eq!(request.url, "https://reqres.in/api/login");
//!
//! let response = client.complete(Operation::Authenticate, 200, br#"{"token":"QpwL5tke4Pnpja7X4"}"#);
//! assert!(matches!(response, Ok(ApiResponse::Token(_))));
//! # Ok::<(), zusers::api::ApiError>(())
//! ```

use super::error::{ApiError, Operation};
use super::pipeline::{AuthPipeline, Inspection};
use super::request::{HttpRequest, Method, Ticket};
use crate::domain::{PageResult, UserChanges};
use crate::session::{SessionStore, SessionToken};
use serde::{Deserialize, Serialize};

/// Default REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenBody {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Decoded success of a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// `authenticate` succeeded.
    Token(SessionToken),
    /// `list_users` succeeded.
    Page(PageResult),
    /// `update_user` succeeded. The body is not trusted.
    Updated,
    /// `delete_user` succeeded.
    Deleted,
}

/// Client for the four remote operations.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    pipeline: AuthPipeline,
    next_ticket: u64,
}

impl ApiClient {
    /// Creates a client for `base_url` (a trailing `/` is ignored).
    #[must_use]
    pub fn new(base_url: &str, session: SessionStore, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            pipeline: AuthPipeline::new(session, api_key),
            next_ticket: 1,
        }
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the session store shared with the pipeline.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        self.pipeline.session()
    }

    /// Prepares `POST /login`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if the body cannot be serialized.
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<(Ticket, HttpRequest), ApiError> {
        let body = serde_json::to_vec(&LoginBody { email, password })
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        let request = HttpRequest::new(Method::Post, format!("{}/login", self.base_url)).with_body(body);
        Ok(self.finish(Operation::Authenticate, request))
    }

    /// Prepares `GET /users?page=N`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPage`] for page 0.
    pub fn list_users(&mut self, page: u32) -> Result<(Ticket, HttpRequest), ApiError> {
        if page < 1 {
            return Err(ApiError::InvalidPage(page));
        }
        let request = HttpRequest::new(Method::Get, format!("{}/users?page={page}", self.base_url));
        Ok(self.finish(Operation::ListUsers, request))
    }

    /// Prepares `PUT /users/{id}` with all editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if the body cannot be serialized.
    pub fn update_user(&mut self, id: u64, changes: &UserChanges) -> Result<(Ticket, HttpRequest), ApiError> {
        let body = serde_json::to_vec(changes).map_err(|e| ApiError::Encode(e.to_string()))?;
        let request = HttpRequest::new(Method::Put, format!("{}/users/{id}", self.base_url)).with_body(body);
        Ok(self.finish(Operation::UpdateUser, request))
    }

    /// Prepares `DELETE /users/{id}`.
    ///
    /// # Errors
    ///
    /// Currently infallible; the signature matches the other operations.
    pub fn delete_user(&mut self, id: u64) -> Result<(Ticket, HttpRequest), ApiError> {
        let request = HttpRequest::new(Method::Delete, format!("{}/users/{id}", self.base_url));
        Ok(self.finish(Operation::DeleteUser, request))
    }

    fn finish(&mut self, operation: Operation, mut request: HttpRequest) -> (Ticket, HttpRequest) {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;

        self.pipeline.outgoing(operation, &mut request);
        request.set_ticket(ticket);

        tracing::debug!(
            operation = %operation,
            ticket = %ticket,
            url = %request.url,
            "request prepared"
        );

        (ticket, request)
    }

    /// Decodes the response to a prepared call.
    ///
    /// Every response first passes the pipeline's 401 inspection, which clears
    /// the session regardless of `operation`.
    ///
    /// # Errors
    ///
    /// - `Authenticate`: [`ApiError::InvalidCredentials`] for a 4xx with an
    ///   empty or JSON body, or a success body without a token.
    ///   [`ApiError::ServiceUnavailable`] for 5xx and for a 4xx with a
    ///   non-JSON body.
    /// - Other operations: [`ApiError::Unauthenticated`] for 401,
    ///   [`ApiError::FetchFailed`] for any other failure, including an
    ///   undecodable page body.
    pub fn complete(&self, operation: Operation, status: u16, body: &[u8]) -> Result<ApiResponse, ApiError> {
        let _span = tracing::debug_span!("api_complete", operation = %operation, status = status).entered();

        let inspection = self.pipeline.incoming(operation, status);
        let success = (200..300).contains(&status);

        match operation {
            Operation::Authenticate => Self::decode_login(status, success, body),
            _ if inspection == Inspection::SessionRejected => Err(ApiError::Unauthenticated),
            _ if !success => Err(ApiError::FetchFailed { operation, status }),
            Operation::ListUsers => serde_json::from_slice::<PageResult>(body)
                .map(ApiResponse::Page)
                .map_err(|e| {
                    tracing::debug!(error = %e, "failed to decode user page");
                    ApiError::FetchFailed { operation, status }
                }),
            Operation::UpdateUser => Ok(ApiResponse::Updated),
            Operation::DeleteUser => Ok(ApiResponse::Deleted),
        }
    }

    fn decode_login(status: u16, success: bool, body: &[u8]) -> Result<ApiResponse, ApiError> {
        if success {
            return serde_json::from_slice::<TokenBody>(body)
                .ok()
                .and_then(|b| b.token)
                .filter(|token| !token.is_empty())
                .map(|token| ApiResponse::Token(SessionToken::new(token)))
                .ok_or(ApiError::InvalidCredentials { reason: None });
        }

        if !(400..500).contains(&status) {
            return Err(ApiError::ServiceUnavailable { status });
        }

        // The host reports transport failures as a 4xx carrying plain error text.
        if body.is_empty() {
            return Err(ApiError::InvalidCredentials { reason: None });
        }
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(b) => Err(ApiError::InvalidCredentials { reason: b.error }),
            Err(_) => {
                tracing::debug!(body = %String::from_utf8_lossy(body), "login failed before reaching the service");
                Err(ApiError::ServiceUnavailable { status })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;

    fn client() -> ApiClient {
        ApiClient::new("https://reqres.in/api/", SessionStore::new(), None)
    }

    fn page_body(page: u32, ids: &[u64]) -> Vec<u8> {
        let data: Vec<User> = ids
            .iter()
            .map(|&id| User {
                id,
                first_name: format!("First{id}"),
                last_name: format!("Last{id}"),
                email: format!("user{id}@reqres.in"),
                avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
            })
            .collect();
        serde_json::to_vec(&serde_json::json!({
            "page": page,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": data,
        }))
        .unwrap()
    }

    #[test]
    fn login_request_shape() {
        let mut client = client();
        let (ticket, request) = client.authenticate("eve.holt@reqres.in", "cityslicka").unwrap();

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "https://reqres.in/api/login");
        assert_eq!(request.ticket(), Some(ticket));
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["email"], "eve.holt@reqres.in");
        assert_eq!(body["password"], "cityslicka");
    }

    #[test]
    fn tickets_increase() {
        let mut client = client();
        let (first, _) = client.list_users(1).unwrap();
        let (second, _) = client.list_users(2).unwrap();
        assert!(second > first);
    }

    #[test]
    fn page_zero_is_rejected_before_sending() {
        let mut client = client();
        assert_eq!(client.list_users(0).unwrap_err(), ApiError::InvalidPage(0));
    }

    #[test]
    fn token_is_carried_by_later_calls() {
        let session = SessionStore::new();
        let mut client = ApiClient::new(DEFAULT_BASE_URL, session.clone(), None);

        let response = client
            .complete(Operation::Authenticate, 200, br#"{"token":"QpwL5tke4Pnpja7X4"}"#)
            .unwrap();
        let ApiResponse::Token(token) = response else {
            panic!("expected a token");
        };
        assert!(!token.is_empty());
        session.set(token);

        let (_, list) = client.list_users(1).unwrap();
        let (_, update) = client
            .update_user(
                3,
                &UserChanges {
                    first_name: "Jane".to_string(),
                    last_name: "Wong".to_string(),
                    email: "jane@reqres.in".to_string(),
                },
            )
            .unwrap();
        let (_, delete) = client.delete_user(7).unwrap();

        for request in [&list, &update, &delete] {
            assert_eq!(request.header("Authorization"), Some("Bearer QpwL5tke4Pnpja7X4"));
        }
        assert_eq!(update.method, Method::Put);
        assert_eq!(update.url, "https://reqres.in/api/users/3");
        assert_eq!(delete.url, "https://reqres.in/api/users/7");
    }

    #[test]
    fn rejected_login_is_invalid_credentials() {
        let client = client();
        let error = client
            .complete(Operation::Authenticate, 400, br#"{"error":"user not found"}"#)
            .unwrap_err();

        assert_eq!(
            error,
            ApiError::InvalidCredentials {
                reason: Some("user not found".to_string())
            }
        );
        assert!(!client.session().is_authenticated());
    }

    #[test]
    fn login_transport_failure_is_service_unavailable() {
        let client = client();

        let error = client
            .complete(Operation::Authenticate, 400, b"error sending request: dns error")
            .unwrap_err();
        assert_eq!(error, ApiError::ServiceUnavailable { status: 400 });

        let error = client.complete(Operation::Authenticate, 503, b"").unwrap_err();
        assert_eq!(error, ApiError::ServiceUnavailable { status: 503 });

        let error = client.complete(Operation::Authenticate, 401, b"").unwrap_err();
        assert_eq!(error, ApiError::InvalidCredentials { reason: None });
    }

    #[test]
    fn login_without_token_is_invalid_credentials() {
        let client = client();
        for body in [&br#"{}"#[..], br#"{"token":""}"#, b"not json"] {
            assert_eq!(
                client.complete(Operation::Authenticate, 200, body).unwrap_err(),
                ApiError::InvalidCredentials { reason: None }
            );
        }
    }

    #[test]
    fn server_failure_on_login_is_distinguished() {
        let client = client();
        assert_eq!(
            client.complete(Operation::Authenticate, 503, b"").unwrap_err(),
            ApiError::ServiceUnavailable { status: 503 }
        );
    }

    #[test]
    fn list_decodes_page() {
        let client = client();
        let response = client
            .complete(Operation::ListUsers, 200, &page_body(2, &[7, 8, 9]))
            .unwrap();
        let ApiResponse::Page(page) = response else {
            panic!("expected a page");
        };
        assert_eq!(page.page, 2);
        assert_eq!(page.data.iter().map(|u| u.id).collect::<Vec<_>>(), vec![7, 8, 9]);
    }

    #[test]
    fn malformed_page_is_fetch_failed() {
        let client = client();
        assert_eq!(
            client.complete(Operation::ListUsers, 200, b"<html>").unwrap_err(),
            ApiError::FetchFailed {
                operation: Operation::ListUsers,
                status: 200
            }
        );
    }

    #[test]
    fn unauthorized_clears_session_and_propagates() {
        let session = SessionStore::new();
        session.set(SessionToken::new("expired"));
        let client = ApiClient::new(DEFAULT_BASE_URL, session.clone(), None);

        let error = client.complete(Operation::DeleteUser, 401, b"").unwrap_err();

        assert_eq!(error, ApiError::Unauthenticated);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn update_and_delete_ignore_bodies() {
        let client = client();
        assert_eq!(
            client
                .complete(Operation::UpdateUser, 200, br#"{"updatedAt":"2024-01-01"}"#)
                .unwrap(),
            ApiResponse::Updated
        );
        assert_eq!(client.complete(Operation::DeleteUser, 204, b"").unwrap(), ApiResponse::Deleted);
        assert_eq!(
            client.complete(Operation::UpdateUser, 404, b"{}").unwrap_err(),
            ApiError::FetchFailed {
                operation: Operation::UpdateUser,
                status: 404
            }
        );
    }
}
