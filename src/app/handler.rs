//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place state changes. It pattern-matches the
//! event, mutates [`AppState`], and returns whether a render is needed plus
//! the side effects to run, in order.
//!
//! # Event Types
//!
//! - **Input**: keys already translated by the plugin shim (`KeyDown`,
//!   `Char`, `Submit`, ...). Their meaning depends on the route and on the
//!   open dialog.
//! - **Remote**: `HttpResponse`, matched to the outstanding call by the
//!   ticket in its context.
//! - **System**: `WorkerResponse`, `PermissionsResult`, `Tick`.
//!
//! After every event the route gate runs; losing the session while on the
//! user list drops every list view and, if persistence is on, the stored token.

use super::modes::{DeleteDialog, Dialog, EditDialog, InputMode, LoginForm, NotificationKind, SearchFocus};
use super::state::PendingCall;
use crate::api::{ApiError, ApiResponse, Ticket};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::forms::validate_login;
use crate::session::Route;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::collections::BTreeMap;

pub const LOGIN_SUCCESS: &str = "Login successful";
pub const LOAD_FAILED: &str = "Failed to load users";
pub const UPDATE_SUCCESS: &str = "User updated successfully";
pub const UPDATE_FAILED: &str = "Failed to update user";
pub const DELETE_SUCCESS: &str = "User deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete user";

/// Events triggered by user input, remote responses, or the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Moves the cursor down (list) or to the next field (forms).
    KeyDown,
    /// Moves the cursor up (list) or to the previous field (forms).
    KeyUp,
    NextField,
    PrevField,
    /// A typed character. Commands are translated before reaching here.
    Char(char),
    Backspace,
    /// Enter: sign in, save, confirm, or open the selected user for editing.
    Submit,
    /// Closes the dialog or leaves search; on the login screen closes the plugin.
    Escape,

    /// Enters search mode with typing focus and an empty query.
    SearchMode,
    /// Returns from result navigation to typing.
    FocusSearchBar,

    NextPage,
    PrevPage,
    /// Fetches the current page again.
    Reload,
    EditSelected,
    DeleteSelected,
    Logout,

    /// Hides the plugin pane.
    CloseFocus,

    /// Result of a `web_request`.
    HttpResponse {
        status: u16,
        body: Vec<u8>,
        context: BTreeMap<String, String>,
    },

    /// Wraps a response from the persistence worker.
    WorkerResponse(WorkerResponse),

    /// Outcome of the permission request made at load.
    PermissionsResult { granted: bool },

    /// A notification timer fired.
    Tick,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns `(should_render, actions)`.
///
/// # Errors
///
/// Returns [`crate::domain::error::ConsoleError::Api`] when a list request
/// cannot be prepared. Failures of remote calls are not errors here; they
/// become notifications.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event, route = state.route.path()).entered();

    let (mut render, mut actions) = dispatch(state, event)?;

    if state.enforce_route_gate() {
        render = true;
        if state.persist_session {
            actions.push(Action::PostToWorker(WorkerMessage::clear_session()));
        }
    }

    Ok((render, actions))
}

fn dispatch(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::HttpResponse { status, body, context } => handle_response(state, *status, body, context),
        Event::WorkerResponse(response) => handle_worker_response(state, response),
        Event::PermissionsResult { granted } => {
            tracing::debug!(granted = granted, persist = state.persist_session, "permissions result");
            if *granted && state.persist_session {
                return Ok((false, vec![Action::PostToWorker(WorkerMessage::load_session())]));
            }
            Ok((false, vec![]))
        }
        Event::Tick => Ok((state.expire_notification(), vec![])),
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        _ => match state.route {
            Route::Login => handle_login_input(state, event),
            Route::Users if state.dialog.is_some() => handle_dialog_input(state, event),
            Route::Users => handle_list_input(state, event),
        },
    }
}

fn handle_login_input(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let form = &mut state.login;
    match event {
        Event::NextField | Event::PrevField | Event::KeyDown | Event::KeyUp => {
            form.focus = form.focus.toggle();
        }
        Event::Char(c) => {
            form.focused_value_mut().push(*c);
            if form.attempted {
                form.errors = validate_login(&form.email, &form.password);
            }
        }
        Event::Backspace => {
            form.focused_value_mut().pop();
            if form.attempted {
                form.errors = validate_login(&form.email, &form.password);
            }
        }
        Event::Submit => return Ok(submit_login(state)),
        Event::Escape => return Ok((false, vec![Action::CloseFocus])),
        _ => return Ok((false, vec![])),
    }
    Ok((true, vec![]))
}

fn submit_login(state: &mut AppState) -> (bool, Vec<Action>) {
    if let Some(ticket) = state.login.submitting {
        tracing::debug!(ticket = %ticket, "login already in flight");
        return (false, vec![]);
    }

    let form = &mut state.login;
    form.attempted = true;
    form.errors = validate_login(&form.email, &form.password);
    if !form.errors.is_empty() {
        tracing::debug!(errors = ?form.errors, "login form invalid");
        return (true, vec![]);
    }

    let email = form.email.trim().to_string();
    match state.client.authenticate(&email, &state.login.password) {
        Ok((ticket, request)) => {
            state.login.submitting = Some(ticket);
            state.pending.insert(ticket, PendingCall::Login);
            (true, vec![Action::SendRequest(request)])
        }
        Err(e) => {
            let action = state.notify_error(&e);
            (true, vec![action])
        }
    }
}

fn handle_dialog_input(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let Some(dialog) = state.dialog.as_mut() else {
        return Ok((false, vec![]));
    };

    match dialog {
        Dialog::Edit(edit) => match event {
            Event::NextField | Event::KeyDown => edit.focus = edit.focus.next(),
            Event::PrevField | Event::KeyUp => edit.focus = edit.focus.previous(),
            Event::Char(c) if edit.submitting.is_none() => {
                edit.focused_value_mut().push(*c);
                edit.revalidate();
            }
            Event::Backspace if edit.submitting.is_none() => {
                edit.focused_value_mut().pop();
                edit.revalidate();
            }
            Event::Submit => return Ok(submit_edit(state)),
            Event::Escape => state.dialog = None,
            _ => return Ok((false, vec![])),
        },
        Dialog::ConfirmDelete(_) => match event {
            Event::Submit | Event::Char('y' | 'Y') => return Ok(submit_delete(state)),
            Event::Escape | Event::Char('n' | 'N') => state.dialog = None,
            _ => return Ok((false, vec![])),
        },
    }
    Ok((true, vec![]))
}

fn submit_edit(state: &mut AppState) -> (bool, Vec<Action>) {
    let Some(Dialog::Edit(edit)) = state.dialog.as_mut() else {
        return (false, vec![]);
    };
    if edit.submitting.is_some() {
        return (false, vec![]);
    }

    edit.revalidate();
    if !edit.errors.is_empty() {
        tracing::debug!(user_id = edit.user_id, errors = ?edit.errors, "edit form invalid");
        return (true, vec![]);
    }

    let (id, changes) = (edit.user_id, edit.form.clone());
    match state.client.update_user(id, &changes) {
        Ok((ticket, request)) => {
            edit.submitting = Some(ticket);
            state.pending.insert(ticket, PendingCall::UpdateUser { id, changes });
            (true, vec![Action::SendRequest(request)])
        }
        Err(e) => {
            tracing::warn!(user_id = id, error = %e, "could not prepare update");
            let action = state.notify(NotificationKind::Error, UPDATE_FAILED);
            (true, vec![action])
        }
    }
}

fn submit_delete(state: &mut AppState) -> (bool, Vec<Action>) {
    let Some(Dialog::ConfirmDelete(confirm)) = state.dialog.as_mut() else {
        return (false, vec![]);
    };
    if confirm.submitting.is_some() {
        return (false, vec![]);
    }

    let id = confirm.user_id;
    match state.client.delete_user(id) {
        Ok((ticket, request)) => {
            confirm.submitting = Some(ticket);
            state.pending.insert(ticket, PendingCall::DeleteUser { id });
            (true, vec![Action::SendRequest(request)])
        }
        Err(e) => {
            tracing::warn!(user_id = id, error = %e, "could not prepare delete");
            state.dialog = None;
            let action = state.notify(NotificationKind::Error, DELETE_FAILED);
            (true, vec![action])
        }
    }
}

fn handle_list_input(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let typing = state.input_mode == InputMode::Search(SearchFocus::Typing);

    match event {
        Event::KeyDown => state.move_selection_down(),
        Event::KeyUp => state.move_selection_up(),
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            state.search_query.clear();
            state.selected_index = 0;
        }
        Event::FocusSearchBar => {
            if !matches!(state.input_mode, InputMode::Search(_)) {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::Search(SearchFocus::Typing);
        }
        Event::Char(c) if typing => {
            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, "search query updated");
            state.selected_index = 0;
        }
        Event::Backspace if typing => {
            state.search_query.pop();
            state.clamp_selection();
        }
        Event::Submit if typing => {
            state.input_mode = if state.search_query.is_empty() {
                InputMode::Normal
            } else {
                InputMode::Search(SearchFocus::Navigating)
            };
        }
        Event::Escape => {
            if state.input_mode == InputMode::Normal {
                return Ok((false, vec![]));
            }
            tracing::debug!(query = %state.search_query, "exiting search mode");
            state.input_mode = InputMode::Normal;
            state.search_query.clear();
            state.clamp_selection();
        }
        Event::NextPage => {
            let Some(page) = state.users.next_page() else {
                return Ok((false, vec![]));
            };
            return Ok((true, vec![state.request_page(page)?]));
        }
        Event::PrevPage => {
            let Some(page) = state.users.previous_page() else {
                return Ok((false, vec![]));
            };
            return Ok((true, vec![state.request_page(page)?]));
        }
        Event::Reload => {
            let page = state.users.page();
            return Ok((true, vec![state.request_page(page)?]));
        }
        Event::Submit | Event::EditSelected => {
            let Some(user) = state.selected_user() else {
                return Ok((false, vec![]));
            };
            state.dialog = Some(Dialog::Edit(EditDialog::for_user(user)));
        }
        Event::DeleteSelected => {
            let Some(user) = state.selected_user() else {
                return Ok((false, vec![]));
            };
            state.dialog = Some(Dialog::ConfirmDelete(DeleteDialog::for_user(user)));
        }
        Event::Logout => return Ok(logout(state)),
        _ => return Ok((false, vec![])),
    }
    Ok((true, vec![]))
}

fn logout(state: &mut AppState) -> (bool, Vec<Action>) {
    tracing::info!("logging out");
    state.session.clear();
    state.route = Route::Login;
    state.reset_session_views();
    state.login = LoginForm::default();

    let mut actions = vec![];
    if state.persist_session {
        actions.push(Action::PostToWorker(WorkerMessage::clear_session()));
    }
    (true, actions)
}

fn handle_response(
    state: &mut AppState,
    status: u16,
    body: &[u8],
    context: &BTreeMap<String, String>,
) -> Result<(bool, Vec<Action>)> {
    let Some(ticket) = Ticket::from_context(context) else {
        tracing::debug!(status = status, "response without ticket");
        return Ok((false, vec![]));
    };
    let Some(call) = state.pending.remove(&ticket) else {
        tracing::debug!(ticket = %ticket, status = status, "dropping response for unknown ticket");
        return Ok((false, vec![]));
    };

    let outcome = state.client.complete(call.operation(), status, body);
    tracing::debug!(ticket = %ticket, status = status, ok = outcome.is_ok(), "response received");

    if let Err(e) = &outcome {
        if e.is_session_loss() {
            tracing::warn!(ticket = %ticket, "session rejected by server");
            let action = state.notify_error(e);
            return Ok((true, vec![action]));
        }
    }

    match call {
        PendingCall::Login => complete_login(state, ticket, outcome),
        PendingCall::ListUsers => Ok(complete_list(state, ticket, outcome)),
        PendingCall::UpdateUser { id, changes } => {
            let closes_dialog = state.dialog.as_ref().is_some_and(|d| d.submitting() == Some(ticket));
            match outcome {
                Ok(_) => {
                    state.users.replace(id, &changes);
                    state.clamp_selection();
                    if closes_dialog {
                        state.dialog = None;
                    }
                    let action = state.notify(NotificationKind::Success, UPDATE_SUCCESS);
                    Ok((true, vec![action]))
                }
                Err(e) => {
                    tracing::warn!(user_id = id, error = %e, "update failed");
                    if let Some(Dialog::Edit(edit)) = state.dialog.as_mut() {
                        if closes_dialog {
                            edit.submitting = None;
                        }
                    }
                    let action = state.notify(NotificationKind::Error, UPDATE_FAILED);
                    Ok((true, vec![action]))
                }
            }
        }
        PendingCall::DeleteUser { id } => {
            if state.dialog.as_ref().is_some_and(|d| d.submitting() == Some(ticket)) {
                state.dialog = None;
            }
            let action = match outcome {
                Ok(_) => {
                    state.users.remove(id);
                    state.clamp_selection();
                    state.notify(NotificationKind::Success, DELETE_SUCCESS)
                }
                Err(e) => {
                    tracing::warn!(user_id = id, error = %e, "delete failed");
                    state.notify(NotificationKind::Error, DELETE_FAILED)
                }
            };
            Ok((true, vec![action]))
        }
    }
}

fn complete_login(
    state: &mut AppState,
    ticket: Ticket,
    outcome: std::result::Result<ApiResponse, ApiError>,
) -> Result<(bool, Vec<Action>)> {
    if state.login.submitting == Some(ticket) {
        state.login.submitting = None;
    }

    match outcome {
        Ok(ApiResponse::Token(token)) => {
            tracing::info!("login succeeded");
            let mut actions = vec![];
            if state.persist_session {
                actions.push(Action::PostToWorker(WorkerMessage::save_session(token.clone())));
            }
            state.session.set(token);
            state.route = Route::Users;
            state.login.password.clear();
            actions.push(state.notify(NotificationKind::Success, LOGIN_SUCCESS));
            actions.push(state.request_page(1)?);
            Ok((true, actions))
        }
        Ok(other) => {
            tracing::warn!(response = ?other, "unexpected login response");
            Ok((true, vec![]))
        }
        Err(e) => {
            tracing::info!(error = %e, "login failed");
            let action = state.notify_error(&e);
            Ok((true, vec![action]))
        }
    }
}

fn complete_list(
    state: &mut AppState,
    ticket: Ticket,
    outcome: std::result::Result<ApiResponse, ApiError>,
) -> (bool, Vec<Action>) {
    match outcome {
        Ok(ApiResponse::Page(page)) => {
            if !state.users.apply_page(ticket, page) {
                tracing::debug!(ticket = %ticket, "discarding stale page");
                return (false, vec![]);
            }
            state.clamp_selection();
            (true, vec![])
        }
        Ok(other) => {
            tracing::warn!(response = ?other, "unexpected list response");
            (false, vec![])
        }
        Err(e) => {
            if !state.users.fail_fetch(ticket) {
                tracing::debug!(ticket = %ticket, error = %e, "ignoring stale list failure");
                return (false, vec![]);
            }
            tracing::warn!(error = %e, "list fetch failed");
            let action = state.notify(NotificationKind::Error, LOAD_FAILED);
            (true, vec![action])
        }
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::SessionLoaded { token: Some(token) } => {
            if state.session.is_authenticated() || state.login.submitting.is_some() {
                tracing::debug!("ignoring restored session");
                return Ok((false, vec![]));
            }
            tracing::info!("restored persisted session");
            state.session.set(token.clone());
            state.route = Route::Users;
            Ok((true, vec![state.request_page(1)?]))
        }
        WorkerResponse::SessionLoaded { token: None } => {
            tracing::debug!("no persisted session");
            Ok((false, vec![]))
        }
        WorkerResponse::SessionSaved | WorkerResponse::SessionCleared => Ok((false, vec![])),
        WorkerResponse::Error { message } => {
            tracing::warn!(message = %message, "worker error");
            Ok((false, vec![]))
        }
    }
}
