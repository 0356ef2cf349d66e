//! Storage layer for the optionally persisted session token.
//!
//! Used only when the plugin is configured with `persist_session "true"`. All
//! file I/O happens on the worker thread.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction
//! - `json`: JSON file implementation with atomic writes
//! - `models`: On-disk record types

pub mod backend;
pub mod json;
pub mod models;

pub use backend::SessionStorage;
pub use json::JsonSessionStorage;
pub use models::{SessionFile, SessionRecord, STORAGE_VERSION};
