//! Worker thread that owns the session file.
//!
//! Zellij runs the worker on its own thread. The storage backend is opened
//! lazily on the first message, so a plugin configured without persistence
//! never touches the filesystem.

use crate::domain::error::{ConsoleError, Result};
use crate::infrastructure::paths;
use crate::storage::{JsonSessionStorage, SessionRecord, SessionStorage};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// Worker state for session persistence.
#[derive(Serialize, Deserialize, Default)]
pub struct ZusersWorker {
    #[serde(skip)]
    storage: Option<Box<dyn SessionStorage>>,
}

impl ZusersWorker {
    /// Creates a worker over an existing backend.
    #[must_use]
    pub fn with_storage(storage: Box<dyn SessionStorage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    fn ensure_storage(&mut self) -> Result<&mut Box<dyn SessionStorage>> {
        if self.storage.is_none() {
            let storage = JsonSessionStorage::new(paths::session_file())?;
            self.storage = Some(Box::new(storage));
        }
        self.storage
            .as_mut()
            .ok_or_else(|| ConsoleError::Worker("storage not initialized".to_string()))
    }

    fn respond<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }

    /// Runs one request against the backend.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = message.kind()).entered();

        match message {
            WorkerMessage::LoadSession { .. } => Self::respond(
                "load session",
                self.ensure_storage().and_then(|storage| storage.load()),
                |record| WorkerResponse::SessionLoaded {
                    token: record.map(|r| r.token).filter(|token| !token.is_empty()),
                },
            ),

            WorkerMessage::SaveSession { token, .. } => {
                let record = SessionRecord::new(token);
                Self::respond(
                    "save session",
                    self.ensure_storage().and_then(|storage| storage.save(&record)),
                    |()| WorkerResponse::SessionSaved,
                )
            }

            WorkerMessage::ClearSession { .. } => Self::respond(
                "clear session",
                self.ensure_storage().and_then(|storage| storage.clear()),
                |()| WorkerResponse::SessionCleared,
            ),
        }
    }
}

fn init_worker_tracing() {
    crate::observability::init_tracing(&crate::Config::default());
}

static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for ZusersWorker {
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            init_worker_tracing();
        }

        let response = match serde_json::from_str::<WorkerMessage>(&payload) {
            Ok(worker_message) => self.handle_message(worker_message),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                WorkerResponse::Error {
                    message: ConsoleError::Worker(format!("malformed request: {e}")).to_string(),
                }
            }
        };

        match serde_json::to_string(&response) {
            Ok(payload) => post_message_to_plugin(PluginMessage {
                name: message,
                payload,
                worker_name: None,
            }),
            Err(e) => tracing::debug!(error = %e, "failed to serialize worker response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionToken;

    fn worker(dir: &tempfile::TempDir) -> ZusersWorker {
        let storage = JsonSessionStorage::new(dir.path().join("session.json")).unwrap();
        ZusersWorker::with_storage(Box::new(storage))
    }

    #[test]
    fn save_then_load_returns_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker(&dir);

        assert_eq!(
            worker.handle_message(WorkerMessage::save_session(SessionToken::new("abc"))),
            WorkerResponse::SessionSaved
        );
        assert_eq!(
            worker.handle_message(WorkerMessage::load_session()),
            WorkerResponse::SessionLoaded {
                token: Some(SessionToken::new("abc"))
            }
        );
    }

    #[test]
    fn clear_forgets_token_across_workers() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = worker(&dir);
        first.handle_message(WorkerMessage::save_session(SessionToken::new("abc")));
        assert_eq!(
            first.handle_message(WorkerMessage::clear_session()),
            WorkerResponse::SessionCleared
        );

        let mut second = worker(&dir);
        assert_eq!(
            second.handle_message(WorkerMessage::load_session()),
            WorkerResponse::SessionLoaded { token: None }
        );
    }

    #[test]
    fn invalid_trace_context_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker(&dir);

        let message = WorkerMessage::LoadSession {
            trace_context: Some(crate::worker::TraceContext {
                trace_id: "zz".to_string(),
                parent_span_id: "zz".to_string(),
            }),
        };

        assert_eq!(
            worker.handle_message(message),
            WorkerResponse::SessionLoaded { token: None }
        );
    }
}
