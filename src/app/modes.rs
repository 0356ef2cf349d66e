//! Input modes, form focus and dialog state.
//!
//! The list view has two input modes:
//! - **Normal**: command keys (navigate, page, edit, delete, logout)
//! - **Search**: typing into the filter, or navigating its results
//!
//! At most one [`Dialog`] is open over the list at a time. While a dialog is
//! open it receives all input.

use crate::api::Ticket;
use crate::domain::{User, UserChanges};
use crate::forms::{validate_user_form, LoginErrors, UserFormErrors};

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Characters edit the query.
    Typing,
    /// Keys move through the filtered rows; `/` returns to typing.
    Navigating,
}

/// Current input handling mode of the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search(SearchFocus),
}

/// Focused field of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

impl LoginField {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Email,
        }
    }
}

/// Contents of the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,

    /// Field errors from the last validation. Only populated after the
    /// first submit attempt.
    pub errors: LoginErrors,

    /// Set after the first submit; from then on every keystroke revalidates.
    pub attempted: bool,

    /// Ticket of the outstanding login request. Submit is ignored while set.
    pub submitting: Option<Ticket>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            errors: LoginErrors::default(),
            attempted: false,
            submitting: None,
        }
    }
}

impl LoginForm {
    /// Returns the focused field's value for editing.
    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password_len", &self.password.len())
            .field("focus", &self.focus)
            .field("errors", &self.errors)
            .field("submitting", &self.submitting)
            .finish()
    }
}

/// Focused field of the edit dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    FirstName,
    LastName,
    Email,
}

impl EditField {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::FirstName => Self::LastName,
            Self::LastName => Self::Email,
            Self::Email => Self::FirstName,
        }
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        match self {
            Self::FirstName => Self::Email,
            Self::LastName => Self::FirstName,
            Self::Email => Self::LastName,
        }
    }
}

/// The edit dialog, pre-filled from the record being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDialog {
    pub user_id: u64,
    pub avatar: Option<String>,
    pub form: UserChanges,
    pub focus: EditField,
    pub errors: UserFormErrors,
    pub submitting: Option<Ticket>,
}

impl EditDialog {
    /// Opens the dialog for `user`.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        let form = UserChanges::from(user);
        let errors = validate_user_form(&form);
        Self {
            user_id: user.id,
            avatar: user.avatar_file().map(str::to_string),
            form,
            focus: EditField::FirstName,
            errors,
            submitting: None,
        }
    }

    /// Returns the focused field's value for editing.
    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            EditField::FirstName => &mut self.form.first_name,
            EditField::LastName => &mut self.form.last_name,
            EditField::Email => &mut self.form.email,
        }
    }

    /// Recomputes field errors after a change.
    pub fn revalidate(&mut self) {
        self.errors = validate_user_form(&self.form);
    }
}

/// The delete confirmation for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDialog {
    pub user_id: u64,
    pub full_name: String,
    pub avatar: Option<String>,
    pub submitting: Option<Ticket>,
}

impl DeleteDialog {
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            full_name: user.full_name(),
            avatar: user.avatar_file().map(str::to_string),
            submitting: None,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        format!("Are you sure you want to delete {}?", self.full_name)
    }
}

/// A dialog shown over the user list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Edit(EditDialog),
    ConfirmDelete(DeleteDialog),
}

impl Dialog {
    /// Ticket of the request this dialog is waiting on.
    #[must_use]
    pub const fn submitting(&self) -> Option<Ticket> {
        match self {
            Self::Edit(edit) => edit.submitting,
            Self::ConfirmDelete(confirm) => confirm.submitting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// The single transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}
