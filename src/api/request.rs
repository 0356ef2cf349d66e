//! Host-independent HTTP request description.
//!
//! Requests are built as plain data so the pipeline can be exercised in tests.
//! The plugin shim converts an [`HttpRequest`] into a Zellij `web_request`
//! call; the [`Ticket`] travels in the request context and comes back with the
//! matching `WebRequestResult` event.

use std::collections::BTreeMap;

/// Context key under which the ticket is stored.
pub const TICKET_CONTEXT_KEY: &str = "zusers_ticket";

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Identifier pairing a response with the request that produced it.
///
/// Tickets are allocated in increasing order by the API client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

impl Ticket {
    /// Reads a ticket back from a response context.
    #[must_use]
    pub fn from_context(context: &BTreeMap<String, String>) -> Option<Self> {
        context
            .get(TICKET_CONTEXT_KEY)
            .and_then(|value| value.parse::<u64>().ok())
            .map(Self)
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fully built outgoing request.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub context: BTreeMap<String, String>,
}

impl HttpRequest {
    /// Creates a request with no headers, body or context.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: Vec::new(),
            context: BTreeMap::new(),
        }
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Stamps `ticket` into the request context.
    pub fn set_ticket(&mut self, ticket: Ticket) {
        self.context
            .insert(TICKET_CONTEXT_KEY.to_string(), ticket.0.to_string());
    }

    /// Returns the stamped ticket, if any.
    #[must_use]
    pub fn ticket(&self) -> Option<Ticket> {
        Ticket::from_context(&self.context)
    }

    /// Returns a header value.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

// Headers and body may carry credentials.
impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("header_names", &self.headers.keys().collect::<Vec<_>>())
            .field("body_len", &self.body.len())
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_round_trips_through_context() {
        let mut request = HttpRequest::new(Method::Get, "https://reqres.in/api/users?page=1");
        request.set_ticket(Ticket(42));

        assert_eq!(request.ticket(), Some(Ticket(42)));
        assert_eq!(Ticket::from_context(&request.context), Some(Ticket(42)));
    }

    #[test]
    fn foreign_context_has_no_ticket() {
        let mut context = BTreeMap::new();
        context.insert(TICKET_CONTEXT_KEY.to_string(), "not-a-number".to_string());
        assert_eq!(Ticket::from_context(&context), None);
        assert_eq!(Ticket::from_context(&BTreeMap::new()), None);
    }

    #[test]
    fn debug_hides_header_values() {
        let mut request = HttpRequest::new(Method::Post, "https://reqres.in/api/login")
            .with_body(br#"{"email":"a@b.co","password":"secret"}"#.to_vec());
        request
            .headers
            .insert("Authorization".to_string(), "Bearer secret-token".to_string());

        let rendered = format!("{request:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("Authorization"));
    }
}
