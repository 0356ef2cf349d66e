//! Application state and view model computation.
//!
//! [`AppState`] is the single source of truth for everything the plugin
//! shows: the current route, the login form, the cached user page with its
//! search filter and selection, the open dialog, the notification, and the
//! table of outstanding remote calls.
//!
//! # Outstanding calls
//!
//! Every request the handler issues is recorded in [`AppState::pending`]
//! under its [`Ticket`], together with what to do when it completes. A
//! response whose ticket is not in the table is dropped, which is how late
//! answers for views that no longer exist (after logout or a 401) are ignored.
//!
//! # Route gate
//!
//! [`AppState::enforce_route_gate`] re-resolves the route against the session
//! store after every event. Once the token is gone (logout, or a 401 cleared
//! it inside the API pipeline) the user list is unreachable and all of its
//! state is dropped.

use super::actions::Action;
use super::modes::{Dialog, EditField, InputMode, LoginField, LoginForm, Notification, NotificationKind, SearchFocus};
use crate::api::{ApiClient, ApiError, Operation, Ticket};
use crate::cache::{ListState, UserListCache};
use crate::domain::{User, UserChanges};
use crate::session::{resolve, Route, SessionStore};
use crate::ui::components::{ID_WIDTH, NAME_WIDTH};
use crate::ui::helpers::{match_ranges, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DialogInfo, DisplayItem, EmptyState, FieldInfo, FooterInfo, HeaderInfo, LoginViewInfo, NotificationInfo,
    PaginationInfo, SearchBarInfo, UIViewModel, UsersViewInfo, ViewBody,
};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default lifetime of a notification.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

/// What to do when the response to a ticket arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCall {
    Login,
    ListUsers,
    UpdateUser { id: u64, changes: UserChanges },
    DeleteUser { id: u64 },
}

impl PendingCall {
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Login => Operation::Authenticate,
            Self::ListUsers => Operation::ListUsers,
            Self::UpdateUser { .. } => Operation::UpdateUser,
            Self::DeleteUser { .. } => Operation::DeleteUser,
        }
    }
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Route currently shown. Always passes the gate after an event.
    pub route: Route,

    /// Shared token handle, the same one the API client reads.
    pub session: SessionStore,

    pub client: ApiClient,

    pub login: LoginForm,

    /// The displayed remote page.
    pub users: UserListCache,

    /// Zero-based index into the filtered users.
    pub selected_index: usize,

    pub input_mode: InputMode,

    /// Current filter string. Never mutates the cache.
    pub search_query: String,

    pub dialog: Option<Dialog>,

    pub notification: Option<Notification>,

    /// Outstanding remote calls by ticket.
    pub pending: BTreeMap<Ticket, PendingCall>,

    pub theme: Theme,

    /// Mirror token changes to the persistence worker.
    pub persist_session: bool,

    pub notification_duration: Duration,

    /// Timers armed for notifications that have not fired yet. The
    /// notification is cleared when the last one fires, so each new message
    /// lives for the full duration.
    pub notification_timers: usize,
}

impl AppState {
    /// Creates the initial state: login screen, empty cache.
    ///
    /// The session store is taken from `client`, so both always observe the
    /// same token.
    #[must_use]
    pub fn new(client: ApiClient, theme: Theme) -> Self {
        Self {
            route: Route::Login,
            session: client.session().clone(),
            client,
            login: LoginForm::default(),
            users: UserListCache::new(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            dialog: None,
            notification: None,
            pending: BTreeMap::new(),
            theme,
            persist_session: false,
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
            notification_timers: 0,
        }
    }

    /// Users matching the search query, in cache order.
    #[must_use]
    pub fn filtered_users(&self) -> Vec<&User> {
        self.users.filtered(&self.search_query)
    }

    #[must_use]
    pub fn selected_user(&self) -> Option<&User> {
        self.filtered_users().get(self.selected_index).copied()
    }

    /// Moves the cursor down, wrapping to the top.
    pub fn move_selection_down(&mut self) {
        let len = self.filtered_users().len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Moves the cursor up, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let len = self.filtered_users().len();
        if len == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            len - 1
        } else {
            self.selected_index - 1
        };
    }

    /// Keeps the cursor inside the filtered list.
    pub fn clamp_selection(&mut self) {
        let len = self.filtered_users().len();
        self.selected_index = if len == 0 { 0 } else { self.selected_index.min(len - 1) };
    }

    /// Returns `true` when typed characters are text rather than commands.
    #[must_use]
    pub fn accepts_text(&self) -> bool {
        match self.route {
            Route::Login => true,
            Route::Users => {
                self.dialog.is_some() || self.input_mode == InputMode::Search(SearchFocus::Typing)
            }
        }
    }

    /// Replaces the notification and arms its expiry timer.
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> Action {
        let message = message.into();
        tracing::debug!(kind = ?kind, message = %message, "notification shown");
        self.notification = Some(Notification { kind, message });
        self.notification_timers += 1;
        Action::StartTimer(self.notification_duration)
    }

    /// Shows `error` as an error notification.
    pub fn notify_error(&mut self, error: &ApiError) -> Action {
        self.notify(NotificationKind::Error, error.to_string())
    }

    /// Handles one fired notification timer. Returns `true` if the
    /// notification was cleared.
    pub fn expire_notification(&mut self) -> bool {
        self.notification_timers = self.notification_timers.saturating_sub(1);
        if self.notification_timers == 0 && self.notification.is_some() {
            self.notification = None;
            return true;
        }
        false
    }

    /// Issues the list request for `page` and moves the cache to `Loading`.
    ///
    /// Any earlier list request is superseded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPage`] for page 0; nothing is sent.
    pub fn request_page(&mut self, page: u32) -> Result<Action, ApiError> {
        let (ticket, request) = self.client.list_users(page)?;
        self.users.begin_fetch(page, ticket);
        self.pending.insert(ticket, PendingCall::ListUsers);
        self.selected_index = 0;
        Ok(Action::SendRequest(request))
    }

    /// Drops every piece of state that belongs to an authenticated view.
    pub fn reset_session_views(&mut self) {
        tracing::debug!(pending = self.pending.len(), "dropping session views");
        self.users.reset();
        self.pending.clear();
        self.dialog = None;
        self.input_mode = InputMode::Normal;
        self.search_query.clear();
        self.selected_index = 0;
        self.login.submitting = None;
    }

    /// Re-resolves the current route against the session.
    ///
    /// Returns `true` if the user was redirected to login.
    pub fn enforce_route_gate(&mut self) -> bool {
        let resolved = resolve(self.route, &self.session);
        if resolved == self.route {
            return false;
        }
        tracing::info!(from = self.route.path(), to = resolved.path(), "route gate redirect");
        self.route = resolved;
        self.reset_session_views();
        true
    }

    /// Computes a renderable view model for a pane of `rows` x `cols`.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let body = match resolve(self.route, &self.session) {
            Route::Login => ViewBody::Login(self.compute_login_view()),
            Route::Users => ViewBody::Users(self.compute_users_view(rows, cols)),
        };

        UIViewModel {
            header: self.compute_header(),
            body,
            footer: self.compute_footer(),
            notification: self.notification.as_ref().map(|n| NotificationInfo {
                message: n.message.clone(),
                is_error: n.kind == NotificationKind::Error,
            }),
        }
    }

    fn compute_login_view(&self) -> LoginViewInfo {
        let form = &self.login;
        LoginViewInfo {
            email: FieldInfo {
                label: "Email".to_string(),
                value: form.email.clone(),
                is_focused: form.focus == LoginField::Email,
                error: form.errors.email.map(str::to_string),
            },
            password: FieldInfo {
                label: "Password".to_string(),
                value: "*".repeat(form.password.chars().count()),
                is_focused: form.focus == LoginField::Password,
                error: form.errors.password.map(str::to_string),
            },
            button: if form.submitting.is_some() {
                "Signing in...".to_string()
            } else {
                "Sign In".to_string()
            },
        }
    }

    fn compute_users_view(&self, rows: usize, cols: usize) -> UsersViewInfo {
        let filtered = self.filtered_users();

        let search_bar = match self.input_mode {
            InputMode::Search(focus) => Some(SearchBarInfo {
                query: self.search_query.clone(),
                is_typing: focus == SearchFocus::Typing,
            }),
            InputMode::Normal => None,
        };

        let empty_state = self.compute_empty_state(filtered.len());

        let rows_out = if empty_state.is_some() {
            vec![]
        } else {
            let available_rows = self.calculate_available_rows(rows).max(1);

            let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
            let visible_end = (visible_start + available_rows).min(filtered.len());
            if visible_end - visible_start < available_rows && filtered.len() >= available_rows {
                visible_start = visible_end.saturating_sub(available_rows);
            }

            filtered[visible_start..visible_end]
                .iter()
                .enumerate()
                .map(|(offset, user)| self.compute_display_item(user, visible_start + offset, cols))
                .collect()
        };

        UsersViewInfo {
            search_bar,
            rows: rows_out,
            empty_state,
            pagination: PaginationInfo {
                text: format!("Page {} of {}", self.users.page(), self.users.total_pages()),
                total_text: self.users.total().map(|total| match total {
                    1 => "1 user".to_string(),
                    n => format!("{n} users"),
                }),
                has_previous: self.users.previous_page().is_some(),
                has_next: self.users.next_page().is_some(),
            },
            dialog: self.dialog.as_ref().map(Self::compute_dialog),
        }
    }

    fn compute_empty_state(&self, filtered_len: usize) -> Option<EmptyState> {
        let (message, subtitle) = match self.users.state() {
            ListState::Loading { page, .. } => ("Loading users...".to_string(), format!("Fetching page {page}")),
            ListState::Error => ("Failed to load users".to_string(), "Press r to retry".to_string()),
            ListState::Idle => ("No users loaded".to_string(), "Press r to load".to_string()),
            ListState::Loaded if self.users.users().is_empty() => {
                ("No users found".to_string(), "This page is empty".to_string())
            }
            ListState::Loaded if filtered_len == 0 => (
                format!("No users match \"{}\"", self.search_query),
                "Esc clears the search".to_string(),
            ),
            ListState::Loaded => return None,
        };
        Some(EmptyState { message, subtitle })
    }

    fn compute_display_item(&self, user: &User, absolute_idx: usize, cols: usize) -> DisplayItem {
        let email_width = cols.saturating_sub(ID_WIDTH + NAME_WIDTH + 1);
        let name = truncate(&user.full_name(), NAME_WIDTH - 2);
        let email = truncate(&user.email, email_width);

        let searching = matches!(self.input_mode, InputMode::Search(_)) && !self.search_query.is_empty();
        let (name_highlight, email_highlight) = if searching {
            (match_ranges(&name, &self.search_query), match_ranges(&email, &self.search_query))
        } else {
            (vec![], vec![])
        };

        DisplayItem {
            id: user.id.to_string(),
            name,
            email,
            is_selected: absolute_idx == self.selected_index,
            name_highlight,
            email_highlight,
        }
    }

    fn compute_dialog(dialog: &Dialog) -> DialogInfo {
        match dialog {
            Dialog::Edit(edit) => {
                let field = |label: &str, value: &str, which: EditField, error: Option<&'static str>| FieldInfo {
                    label: label.to_string(),
                    value: value.to_string(),
                    is_focused: edit.focus == which,
                    error: error.map(str::to_string),
                };
                DialogInfo::Edit {
                    title: "Edit User".to_string(),
                    avatar: avatar_line(edit.avatar.as_deref()),
                    fields: vec![
                        field("First Name", &edit.form.first_name, EditField::FirstName, edit.errors.first_name),
                        field("Last Name", &edit.form.last_name, EditField::LastName, edit.errors.last_name),
                        field("Email", &edit.form.email, EditField::Email, edit.errors.email),
                    ],
                    button: if edit.submitting.is_some() { "Saving..." } else { "Save" }.to_string(),
                    can_submit: edit.submitting.is_none() && edit.errors.is_empty(),
                }
            }
            Dialog::ConfirmDelete(confirm) => DialogInfo::ConfirmDelete {
                title: "Confirm Delete".to_string(),
                avatar: avatar_line(confirm.avatar.as_deref()),
                message: confirm.message(),
                button: if confirm.submitting.is_some() { "Deleting..." } else { "Delete" }.to_string(),
            },
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = match resolve(self.route, &self.session) {
            Route::Login => " User Management - Sign In ".to_string(),
            Route::Users => format!(" User Management ({}) ", self.filtered_users().len()),
        };
        HeaderInfo { title }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (resolve(self.route, &self.session), &self.dialog, self.input_mode) {
            (Route::Login, _, _) => "Tab: next field  Enter: sign in  Esc: close",
            (Route::Users, Some(Dialog::Edit(_)), _) => "Tab: next field  Enter: save  Esc: cancel",
            (Route::Users, Some(Dialog::ConfirmDelete(_)), _) => "Enter/y: delete  Esc/n: cancel",
            (Route::Users, None, InputMode::Search(SearchFocus::Typing)) => {
                "ESC: exit search  Enter: results  Type to filter"
            }
            (Route::Users, None, InputMode::Search(SearchFocus::Navigating)) => {
                "ESC: exit search  /: edit query  j/k: navigate  e: edit  d: delete"
            }
            (Route::Users, None, InputMode::Normal) => {
                "j/k: navigate  h/l: page  /: search  e: edit  d: delete  r: reload  o: logout  q: quit"
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    /// Rows left for table rows after the surrounding chrome.
    ///
    /// Notification line, header, border, table header, pagination, border
    /// and footer take 7 rows; the search bar adds 3.
    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.input_mode {
            InputMode::Normal => total_rows.saturating_sub(7),
            InputMode::Search(_) => total_rows.saturating_sub(10),
        }
    }
}

fn avatar_line(file: Option<&str>) -> String {
    file.map_or_else(|| "No avatar".to_string(), |file| format!("Avatar: {file}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DEFAULT_BASE_URL;
    use crate::domain::PageResult;
    use crate::session::SessionToken;
    use crate::app::modes::{DeleteDialog, EditDialog};

    fn user(id: u64, first: &str, last: &str) -> User {
        User {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
            avatar: String::new(),
        }
    }

    fn signed_in_with(users: Vec<User>) -> AppState {
        let client = ApiClient::new(DEFAULT_BASE_URL, SessionStore::new(), None);
        let mut state = AppState::new(client, Theme::default());
        state.session.set(SessionToken::new("token"));
        state.route = Route::Users;
        state.request_page(1).unwrap();
        let ticket = *state.pending.keys().next().unwrap();
        state.users.apply_page(
            ticket,
            PageResult {
                data: users,
                page: 1,
                total_pages: 2,
                per_page: Some(6),
                total: Some(12),
            },
        );
        state.pending.clear();
        state
    }

    #[test]
    fn selection_wraps() {
        let mut state = signed_in_with(vec![user(1, "Ann", "Lee"), user(2, "Bob", "Stone")]);
        state.move_selection_up();
        assert_eq!(state.selected_user().unwrap().id, 2);
        state.move_selection_down();
        assert_eq!(state.selected_user().unwrap().id, 1);
    }

    #[test]
    fn gate_drops_views_when_token_disappears() {
        let mut state = signed_in_with(vec![user(1, "Ann", "Lee")]);
        state.search_query = "ann".to_string();
        state.input_mode = InputMode::Search(SearchFocus::Typing);

        state.session.clear();

        assert!(state.enforce_route_gate());
        assert_eq!(state.route, Route::Login);
        assert!(state.users.users().is_empty());
        assert!(state.search_query.is_empty());
        assert!(!state.enforce_route_gate());
    }

    #[test]
    fn viewmodel_shows_pagination_and_rows() {
        let state = signed_in_with(vec![user(1, "Ann", "Lee"), user(2, "Bob", "Stone")]);

        let vm = state.compute_viewmodel(24, 80);

        let ViewBody::Users(users) = vm.body else {
            panic!("expected the users view");
        };
        assert_eq!(users.pagination.text, "Page 1 of 2");
        assert_eq!(users.pagination.total_text.as_deref(), Some("12 users"));
        assert!(users.pagination.has_next);
        assert!(!users.pagination.has_previous);
        assert_eq!(users.rows.len(), 2);
        assert_eq!(users.rows[0].name, "Ann Lee");
        assert!(users.rows[0].is_selected);
    }

    #[test]
    fn viewmodel_windows_rows_to_pane_height() {
        let many = (1..=20).map(|id| user(id, "User", &format!("N{id}"))).collect();
        let mut state = signed_in_with(many);
        state.selected_index = 15;

        let ViewBody::Users(users) = state.compute_viewmodel(12, 80).body else {
            panic!("expected the users view");
        };

        assert_eq!(users.rows.len(), 5);
        assert!(users.rows.iter().any(|row| row.is_selected && row.id == "16"));
    }

    #[test]
    fn dialogs_show_avatar_file() {
        let mut ann = user(1, "Ann", "Lee");
        ann.avatar = "https://reqres.in/img/faces/1-image.jpg".to_string();
        let mut state = signed_in_with(vec![ann.clone()]);

        state.dialog = Some(Dialog::ConfirmDelete(DeleteDialog::for_user(&ann)));
        let ViewBody::Users(users) = state.compute_viewmodel(24, 80).body else {
            panic!("expected the users view");
        };
        let Some(DialogInfo::ConfirmDelete { avatar, message, .. }) = users.dialog else {
            panic!("expected the delete dialog");
        };
        assert_eq!(message, "Are you sure you want to delete Ann Lee?");
        assert_eq!(avatar, "Avatar: 1-image.jpg");

        ann.avatar = String::new();
        state.dialog = Some(Dialog::Edit(EditDialog::for_user(&ann)));
        let ViewBody::Users(users) = state.compute_viewmodel(24, 80).body else {
            panic!("expected the users view");
        };
        let Some(DialogInfo::Edit { avatar, .. }) = users.dialog else {
            panic!("expected the edit dialog");
        };
        assert_eq!(avatar, "No avatar");
    }

    #[test]
    fn login_view_masks_password() {
        let client = ApiClient::new(DEFAULT_BASE_URL, SessionStore::new(), None);
        let mut state = AppState::new(client, Theme::default());
        state.login.password = "cityslicka".to_string();

        let ViewBody::Login(login) = state.compute_viewmodel(24, 80).body else {
            panic!("expected the login view");
        };
        assert_eq!(login.password.value, "**********");
        assert_eq!(login.button, "Sign In");
    }

    #[test]
    fn notification_lives_until_last_timer() {
        let client = ApiClient::new(DEFAULT_BASE_URL, SessionStore::new(), None);
        let mut state = AppState::new(client, Theme::default());

        state.notify(NotificationKind::Success, "first");
        state.notify(NotificationKind::Error, "second");

        assert!(!state.expire_notification());
        assert_eq!(state.notification.as_ref().unwrap().message, "second");
        assert!(state.expire_notification());
        assert!(state.notification.is_none());
    }
}
