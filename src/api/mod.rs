//! Client for the remote user service.
//!
//! # Modules
//!
//! - [`client`]: the four typed operations, split into prepare/complete
//! - [`pipeline`]: bearer token attachment and 401 session invalidation
//! - [`request`]: host-independent request description and tickets
//! - [`error`]: failure taxonomy

pub mod client;
pub mod error;
pub mod pipeline;
pub mod request;

pub use client::{ApiClient, ApiResponse, DEFAULT_BASE_URL};
pub use error::{ApiError, Operation};
pub use pipeline::{AuthPipeline, Inspection};
pub use request::{HttpRequest, Method, Ticket, TICKET_CONTEXT_KEY};
