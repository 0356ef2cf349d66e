//! Domain layer for the zusers plugin.
//!
//! Core types independent of Zellij APIs: the user record served by the remote
//! service, the paginated list envelope, and the crate error type.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`user`]: User record, editable changes, and page envelope
//!
//! # Examples
//!
//! ```
//! use zusers::domain::{User, UserChanges};
//!
//! let user = User {
//!     id: 2,
//!     first_name: "Janet".to_string(),
//!     last_name: "Weaver".to_string(),
//!     email: "janet.weaver@reqres.in".to_string(),
//!     avatar: String::new(),
//! };
//! let changes = UserChanges::from(&user);
//! assert_eq!(changes.first_name, "Janet");
//! ```

pub mod error;
pub mod user;

pub use error::{ConsoleError, Result};
pub use user::{PageResult, User, UserChanges};
