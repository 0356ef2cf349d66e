//! zusers: a Zellij plugin for managing the users of a REST service.
//!
//! The plugin signs in against `POST /login`, keeps the returned bearer token
//! in a shared session store, and then shows a paginated, searchable table of
//! `GET /users?page=N`, with edit (`PUT /users/{id}`) and delete
//! (`DELETE /users/{id}`) dialogs. The default service is
//! `https://reqres.in/api`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← keys, web_request, timers
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← events → state → actions
//! └─────────────────────────────────────────────────────┘
//!      │             │              │             │
//! ┌──────────┐ ┌───────────┐ ┌────────────┐ ┌──────────┐
//! │ api/     │ │ cache/    │ │ session/   │ │ ui/      │
//! │ client + │ │ page +    │ │ token +    │ │ view     │
//! │ pipeline │ │ filter    │ │ route gate │ │ models   │
//! └──────────┘ └───────────┘ └────────────┘ └──────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  worker/ + storage/: optional token persistence     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: request building, auth pipeline, response decoding
//! - [`app`]: event handler, state, dialogs
//! - [`cache`]: the displayed page and its search filter
//! - [`domain`]: `User`, `PageResult`, errors
//! - [`forms`]: login and edit form validation
//! - [`session`]: session token store and route gate
//! - [`storage`]: JSON file persistence for the token
//! - [`worker`]: background worker owning the storage
//! - [`ui`]: terminal rendering with themes
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/zusers.wasm" {
//!         base_url "https://reqres.in/api"
//!         api_key "reqres-free-v1"
//!         persist_session "true"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!         notification_seconds "3"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use zusers::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//!
//! for c in "eve.holt@reqres.in".chars() {
//!     handle_event(&mut state, &Event::Char(c))?;
//! }
//! handle_event(&mut state, &Event::NextField)?;
//! for c in "cityslicka".chars() {
//!     handle_event(&mut state, &Event::Char(c))?;
//! }
//!
//! let (_, actions) = handle_event(&mut state, &Event::Submit)?;
//! assert!(matches!(actions[0], Action::SendRequest(_)));
//! # Ok::<(), zusers::ConsoleError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod app;
pub mod cache;
pub mod domain;
pub mod forms;
pub mod infrastructure;
pub mod session;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus};
pub use domain::{ConsoleError, PageResult, Result, User, UserChanges};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::time::Duration;

/// Plugin configuration parsed from Zellij's configuration map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// REST base URL. A trailing `/` is trimmed by the client.
    pub base_url: String,

    /// Sent as `x-api-key` on every request when set.
    pub api_key: Option<String>,

    /// Keep the token on disk across plugin reloads.
    pub persist_session: bool,

    /// Built-in theme. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive, e.g. `"debug"` or `"zusers::api=trace"`.
    pub trace_level: String,

    pub notification_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
            api_key: None,
            persist_session: false,
            theme_name: None,
            theme_file: None,
            trace_level: "info".to_string(),
            notification_seconds: 3,
        }
    }
}

impl Config {
    /// Parses the configuration map Zellij passes to `load`.
    ///
    /// Missing, blank or unparsable values fall back to the defaults.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use zusers::Config;
    ///
    /// let map = BTreeMap::from([
    ///     ("persist_session".to_string(), "true".to_string()),
    ///     ("notification_seconds".to_string(), "5".to_string()),
    /// ]);
    ///
    /// let config = Config::from_zellij(&map);
    /// assert!(config.persist_session);
    /// assert_eq!(config.notification_seconds, 5);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let value = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let persist_session = value("persist_session")
            .map_or(defaults.persist_session, |v| matches!(v.to_ascii_lowercase().as_str(), "true" | "yes" | "1"));

        let notification_seconds = value("notification_seconds")
            .and_then(|v| or_warn(parse_seconds(&v)))
            .unwrap_or(defaults.notification_seconds);

        let base_url = value("base_url")
            .and_then(|v| or_warn(parse_base_url(&v)))
            .unwrap_or(defaults.base_url);

        Self {
            base_url,
            api_key: value("api_key"),
            persist_session,
            theme_name: value("theme"),
            theme_file: value("theme_file"),
            trace_level: value("trace_level").unwrap_or(defaults.trace_level),
            notification_seconds,
        }
    }

    fn load_theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            let path = infrastructure::paths::expand_tilde(theme_file);
            match Theme::from_file(&path) {
                Ok(theme) => return theme,
                Err(e) => tracing::warn!(theme_file = %theme_file, error = %e, "using default theme"),
            }
        }

        self.theme_name
            .as_deref()
            .and_then(|name| {
                let theme = Theme::from_name(name);
                if theme.is_none() {
                    tracing::warn!(theme_name = %name, "unknown theme, using default");
                }
                theme
            })
            .unwrap_or_default()
    }
}

fn parse_seconds(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|&s| s > 0)
        .ok_or_else(|| ConsoleError::Config(format!("notification_seconds must be a positive integer, got {raw:?}")))
}

fn parse_base_url(raw: &str) -> Result<String> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Ok(raw.to_string())
    } else {
        Err(ConsoleError::Config(format!("base_url must start with http:// or https://, got {raw:?}")))
    }
}

fn or_warn<T>(parsed: Result<T>) -> Option<T> {
    parsed.map_err(|e| tracing::warn!(error = %e, "ignoring configuration value")).ok()
}

/// Builds the initial state: login route, empty session, client for
/// `config.base_url`.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(base_url = %config.base_url, persist = config.persist_session, "initializing zusers");

    let client = api::ApiClient::new(&config.base_url, session::SessionStore::new(), config.api_key.clone());
    let mut state = AppState::new(client, config.load_theme());
    state.persist_session = config.persist_session;
    state.notification_duration = Duration::from_secs(config.notification_seconds);
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::from_zellij(&map(&[
            ("base_url", "http://localhost:8080/api/"),
            ("api_key", "reqres-free-v1"),
            ("persist_session", "TRUE"),
            ("theme", "catppuccin-latte"),
            ("trace_level", "debug"),
            ("notification_seconds", "7"),
        ]));

        assert_eq!(config.base_url, "http://localhost:8080/api/");
        assert_eq!(config.api_key.as_deref(), Some("reqres-free-v1"));
        assert!(config.persist_session);
        assert_eq!(config.theme_name.as_deref(), Some("catppuccin-latte"));
        assert_eq!(config.trace_level, "debug");
        assert_eq!(config.notification_seconds, 7);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_zellij(&map(&[
            ("api_key", "   "),
            ("persist_session", "maybe"),
            ("notification_seconds", "0"),
            ("base_url", "reqres.in/api"),
        ]));

        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, api::DEFAULT_BASE_URL);
        assert!(!config.persist_session);
        assert_eq!(config.notification_seconds, 3);
    }

    #[test]
    fn rejected_values_are_config_errors() {
        assert!(matches!(parse_seconds("soon"), Err(ConsoleError::Config(_))));
        assert!(matches!(parse_base_url("ftp://example.com"), Err(ConsoleError::Config(_))));
        assert_eq!(parse_seconds("4").unwrap(), 4);
        assert_eq!(parse_base_url("http://localhost/api").unwrap(), "http://localhost/api");
    }

    #[test]
    fn initialize_applies_config() {
        let config = Config {
            base_url: "http://localhost:8080/api/".to_string(),
            persist_session: true,
            theme_name: Some("catppuccin-frappe".to_string()),
            notification_seconds: 5,
            ..Config::default()
        };

        let state = initialize(&config);

        assert_eq!(state.client.base_url(), "http://localhost:8080/api");
        assert!(state.persist_session);
        assert_eq!(state.theme.name, "catppuccin-frappe");
        assert_eq!(state.notification_duration, Duration::from_secs(5));
        assert_eq!(state.route, session::Route::Login);
    }

    #[test]
    fn unknown_theme_uses_default() {
        let config = Config {
            theme_name: Some("no-such-theme".to_string()),
            theme_file: Some("/nonexistent/theme.toml".to_string()),
            ..Config::default()
        };

        assert_eq!(initialize(&config).theme, Theme::default());
    }
}
