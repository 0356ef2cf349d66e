//! Session state and the protected-route gate.
//!
//! - [`store`]: the shared bearer token handle
//! - [`gate`]: route resolution against the current session

pub mod gate;
pub mod store;

pub use gate::{resolve, Route};
pub use store::{SessionStore, SessionToken};
