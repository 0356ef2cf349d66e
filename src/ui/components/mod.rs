//! Composable UI component renderers.
//!
//! Each component prints its part of the frame at an explicit row and
//! returns the next free row. Two layout functions put them together:
//!
//! - [`render_login_screen`]: Notification + Header + Login form + Footer
//! - [`render_users_screen`]: Notification + Header + [SearchBar] + Table +
//!   Pagination + Footer, with an optional dialog on top

mod dialog;
mod empty;
mod field;
mod footer;
mod header;
mod login;
mod notification;
mod pagination;
mod search;
mod table;

pub use table::{ID_WIDTH, NAME_WIDTH};

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{LoginViewInfo, UIViewModel, UsersViewInfo};

use dialog::render_dialog;
use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use login::render_login;
use notification::render_notification;
use pagination::render_pagination;
use search::render_search_bar;
use table::{render_table_headers, render_table_rows};

/// Renders a horizontal border line at `row`.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Notification, header and border. Returns the first body row.
fn render_top(vm: &UIViewModel, theme: &Theme, cols: usize) -> usize {
    let mut current_row = render_notification(1, vm.notification.as_ref(), theme, cols);
    current_row = render_header(current_row, &vm.header, theme, cols);
    render_border(current_row, &theme.colors.border, cols)
}

/// Renders the login screen.
pub fn render_login_screen(vm: &UIViewModel, login: &LoginViewInfo, theme: &Theme, cols: usize, rows: usize) {
    let current_row = render_top(vm, theme, cols);
    render_login(current_row, login, theme, cols);

    let footer_row = rows;
    render_border(footer_row.saturating_sub(1), &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}

/// Renders the users screen.
///
/// ```text
/// [Notification]
/// [Header]
/// [Border]
/// [Search Bar - 3 lines, search mode only]
/// [Table Headers]
/// [Table Rows or Empty State]
/// [Pagination]
/// [Border]
/// [Footer]
/// ```
pub fn render_users_screen(vm: &UIViewModel, users: &UsersViewInfo, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = render_top(vm, theme, cols);

    if let Some(search) = &users.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }
    current_row = render_table_headers(current_row, theme);

    if let Some(empty) = &users.empty_state {
        render_empty_state(current_row, empty, theme, cols);
    } else {
        render_table_rows(current_row, &users.rows, theme, cols);
    }

    let footer_row = rows;
    render_pagination(footer_row.saturating_sub(2), &users.pagination, theme, cols);
    render_border(footer_row.saturating_sub(1), &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);

    if let Some(dialog) = &users.dialog {
        render_dialog(dialog, theme, rows, cols);
    }
}
