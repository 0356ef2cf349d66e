//! Zellij plugin wrapper and entry point.
//!
//! Translates Zellij events into library [`Event`]s and executes the
//! returned [`Action`]s against the host API. All behavior lives in the
//! library.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │     Zellij Main Thread       │
//! │  ┌────────────────────────┐  │   web_request ──→ REST service
//! │  │  State (plugin)        │──┼─→ WebRequestResult ←──┘
//! │  └────────────────────────┘  │
//! │         │ JSON messages      │
//! │         ▼                    │
//! │  ┌────────────────────────┐  │
//! │  │  ZusersWorker          │  │   ← token persistence (opt-in)
//! │  └────────────────────────┘  │
//! └──────────────────────────────┘
//! ```
//!
//! # Keybindings
//!
//! Login screen and dialogs:
//! - `Tab` / `Shift+Tab`, `Down` / `Up`: next / previous field
//! - `Enter`: sign in, save, or confirm delete (`y` also confirms)
//! - `Esc`: cancel the dialog (`n` also cancels); on login, close the plugin
//!
//! User list:
//! - `j`/`Down`, `k`/`Up`: move selection
//! - `l`/`Right`, `h`/`Left`: next / previous page
//! - `/`: search, `Enter` in the search box moves to the results
//! - `e` or `Enter`: edit, `d`: delete, `r`: reload, `o`: logout
//! - `q`: close the plugin
//!
//! Everywhere: `Ctrl+n` / `Ctrl+p` move down / up, `Ctrl+c` closes.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use zusers::api::Method;
use zusers::worker::{WorkerMessage, WorkerResponse, ZusersWorker, WORKER_NAME};
use zusers::{handle_event, Action, Config, Event, InputMode};

register_plugin!(State);
register_worker!(ZusersWorker, zusers_worker, ZUSERS_WORKER);

struct State {
    app: zusers::AppState,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: zusers::initialize(&Config::default()),
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, requests permissions and subscribes to events.
    ///
    /// `WebAccess` is always needed. `FullHdAccess` is requested only when
    /// the token is persisted, since only the worker touches the disk.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        zusers::observability::init_tracing(&config);

        let _guard = tracing::debug_span!("plugin_load").entered();

        self.app = zusers::initialize(&config);

        let mut permissions = vec![PermissionType::WebAccess];
        if config.persist_session {
            permissions.push(PermissionType::FullHdAccess);
        }
        tracing::debug!(permissions = ?permissions, "requesting permissions");
        request_permission(&permissions);

        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
            EventType::Timer,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", otel.name = %format!("plugin_update::{event_name}"), event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                Event::HttpResponse { status, body, context }
            }
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                let granted = matches!(status, PermissionStatus::Granted);
                if !granted {
                    tracing::warn!("permissions denied - requests will fail");
                }
                Event::PermissionsResult { granted }
            }
            zellij_tile::prelude::Event::Timer(_) => Event::Tick,
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render = should_render, "event handled");
                for action in &actions {
                    Self::execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        zusers::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Maps keys to events. While a text field has focus every printable key
    /// is text; otherwise letters are commands.
    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        tracing::trace!(bare_key = ?key.bare_key, "key event");

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::KeyDown),
                BareKey::Char('p') => Some(Event::KeyUp),
                BareKey::Char('c') => Some(Event::CloseFocus),
                _ => None,
            };
        }

        if self.app.accepts_text() {
            return Some(match key.bare_key {
                BareKey::Tab if key.has_modifiers(&[KeyModifier::Shift]) => Event::PrevField,
                BareKey::Tab => Event::NextField,
                BareKey::Down => Event::KeyDown,
                BareKey::Up => Event::KeyUp,
                BareKey::Enter => Event::Submit,
                BareKey::Esc => Event::Escape,
                BareKey::Backspace => Event::Backspace,
                BareKey::Char(c) => Event::Char(c),
                _ => return None,
            });
        }

        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Right | BareKey::Char('l') => Event::NextPage,
            BareKey::Left | BareKey::Char('h') => Event::PrevPage,
            BareKey::Enter => Event::Submit,
            BareKey::Esc => Event::Escape,
            BareKey::Char('/') => match self.app.input_mode {
                InputMode::Normal => Event::SearchMode,
                InputMode::Search(_) => Event::FocusSearchBar,
            },
            BareKey::Char('e') => Event::EditSelected,
            BareKey::Char('d') => Event::DeleteSelected,
            BareKey::Char('r') => Event::Reload,
            BareKey::Char('o') => Event::Logout,
            BareKey::Char('q') => Event::CloseFocus,
            _ => return None,
        })
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(kind = message.kind(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize worker message"),
        }
    }

    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::SendRequest(request) => {
                tracing::debug!(method = ?request.method, url = %request.url, "sending request");
                let verb = match request.method {
                    Method::Get => HttpVerb::Get,
                    Method::Post => HttpVerb::Post,
                    Method::Put => HttpVerb::Put,
                    Method::Delete => HttpVerb::Delete,
                };
                web_request(
                    request.url.clone(),
                    verb,
                    request.headers.clone(),
                    request.body.clone(),
                    request.context.clone(),
                );
            }
            Action::PostToWorker(message) => Self::post_worker_message(message),
            Action::StartTimer(duration) => set_timeout(duration.as_secs_f64()),
        }
    }
}
