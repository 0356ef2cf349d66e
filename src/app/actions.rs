//! Side effects requested by the event handler.
//!
//! The handler never touches the Zellij host. It returns a `Vec<Action>`
//! which the plugin shim executes in order after each event.

use crate::api::HttpRequest;
use crate::worker::WorkerMessage;
use std::time::Duration;

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Issues an HTTP request through the host's `web_request`.
    ///
    /// The response comes back as an `HttpResponse` event carrying the same
    /// context map.
    SendRequest(HttpRequest),

    /// Posts a message to the persistence worker.
    PostToWorker(WorkerMessage),

    /// Arms a timer that later arrives as a `Tick` event.
    StartTimer(Duration),
}
