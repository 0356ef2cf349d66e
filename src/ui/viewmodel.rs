//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and contain
//! only display-ready data: strings already formatted, passwords already
//! masked, rows already windowed to the pane height.

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub body: ViewBody,
    pub footer: FooterInfo,
    pub notification: Option<NotificationInfo>,
}

/// The route-specific part of the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    Login(LoginViewInfo),
    Users(UsersViewInfo),
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding hints for the current mode.
    pub keybindings: String,
}

/// One labelled input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub label: String,
    /// Value as displayed. Secret fields are masked.
    pub value: String,
    pub is_focused: bool,
    pub error: Option<String>,
}

/// The login screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginViewInfo {
    pub email: FieldInfo,
    pub password: FieldInfo,
    /// "Sign In", or "Signing in..." while the request is outstanding.
    pub button: String,
}

/// The user list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersViewInfo {
    pub search_bar: Option<SearchBarInfo>,
    pub rows: Vec<DisplayItem>,
    pub empty_state: Option<EmptyState>,
    pub pagination: PaginationInfo,
    pub dialog: Option<DialogInfo>,
}

/// One row of the users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_selected: bool,

    /// Char ranges of the search match within `name`.
    pub name_highlight: Vec<(usize, usize)>,

    /// Char ranges of the search match within `email`.
    pub email_highlight: Vec<(usize, usize)>,
}

/// Message shown in place of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub is_typing: bool,
}

/// Pagination footer, e.g. "Page 1 of 2".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationInfo {
    pub text: String,
    /// "12 users", when the server reported a total.
    pub total_text: Option<String>,
    pub has_previous: bool,
    pub has_next: bool,
}

/// A dialog drawn over the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogInfo {
    Edit {
        title: String,
        /// Avatar file name, or "No avatar".
        avatar: String,
        fields: Vec<FieldInfo>,
        button: String,
        can_submit: bool,
    },
    ConfirmDelete {
        title: String,
        avatar: String,
        message: String,
        button: String,
    },
}

/// The transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationInfo {
    pub message: String,
    pub is_error: bool,
}
