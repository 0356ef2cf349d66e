//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (main.rs) and the api/cache/session
//! layers:
//!
//! ```text
//! Keys, HTTP results ─→ Events ─→ handle_event ─→ State mutations ─→ Actions
//!          ↑                                                          │
//!          └────────── web_request / worker / timers ←────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use zusers::api::{ApiClient, DEFAULT_BASE_URL};
//! use zusers::app::{handle_event, AppState, Event};
//! use zusers::session::SessionStore;
//! use zusers::ui::theme::Theme;
//!
//! let client = ApiClient::new(DEFAULT_BASE_URL, SessionStore::new(), None);
//! let mut state = AppState::new(client, Theme::default());
//! let (render, actions) = handle_event(&mut state, &Event::Char('e'))?;
//! assert!(render);
//! assert!(actions.is_empty());
//! # Ok::<(), zusers::domain::error::ConsoleError>(())
//! ```

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{Dialog, InputMode, LoginField, NotificationKind, SearchFocus};
pub use state::{AppState, PendingCall};
