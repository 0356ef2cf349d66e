//! Background worker for session persistence.
//!
//! - `messages`: request/response protocol with trace context propagation
//! - `handler`: the worker itself

pub mod handler;
pub mod messages;

pub use handler::ZusersWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse, WORKER_NAME};
