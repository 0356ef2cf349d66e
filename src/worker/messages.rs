//! Plugin ↔ worker message protocol.
//!
//! Messages travel as JSON through Zellij's `post_message_to` /
//! `post_message_to_plugin`. Each request carries an optional [`TraceContext`]
//! so the worker's spans join the trace of the plugin event that caused them.

use crate::session::SessionToken;
use serde::{Deserialize, Serialize};

/// Name under which the worker is registered and its replies are routed.
pub const WORKER_NAME: &str = "zusers";

/// Trace and parent span ids captured from the sending thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace id, 32 hex chars.
    pub trace_id: String,

    /// Span id of the sender, 16 hex chars.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the context of the current `tracing` span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span is
    /// not sampled.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that stamp the current [`TraceContext`].
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_session(LoadSession {}),
    save_session(SaveSession { token: SessionToken }),
    clear_session(ClearSession {}),
}

/// Requests from the plugin to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the persisted token, if any.
    LoadSession {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist a freshly issued token.
    SaveSession {
        token: SessionToken,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Forget the persisted token (logout or 401).
    ClearSession {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Returns the trace context attached to this message.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadSession { trace_context }
            | Self::SaveSession { trace_context, .. }
            | Self::ClearSession { trace_context } => trace_context.as_ref(),
        }
    }

    /// Short name for logs; never includes the token.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LoadSession { .. } => "load_session",
            Self::SaveSession { .. } => "save_session",
            Self::ClearSession { .. } => "clear_session",
        }
    }
}

/// Replies from the worker to the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Result of `LoadSession`. `None` when nothing was stored.
    SessionLoaded { token: Option<SessionToken> },

    SessionSaved,

    SessionCleared,

    /// A storage operation failed.
    Error { message: String },
}
