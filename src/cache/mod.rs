//! Client-side cache of the displayed user page.
//!
//! # Modules
//!
//! - `list`: the page cache and its `Loading -> Loaded | Error` state machine
//! - `filter`: case-insensitive substring search over cached users

pub mod filter;
pub mod list;

pub use filter::filter_users;
pub use list::{ListState, UserListCache};
