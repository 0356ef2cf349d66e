//! Login screen renderer.

use super::field::{render_button, render_field};
use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::LoginViewInfo;

const FORM_WIDTH: usize = 44;

/// Renders the email and password fields and the sign-in button, centered
/// horizontally, starting one row below `row`.
pub fn render_login(row: usize, login: &LoginViewInfo, theme: &Theme, cols: usize) -> usize {
    let width = FORM_WIDTH.min(cols.saturating_sub(2));
    let col = cols.saturating_sub(width) / 2 + 1;

    position_cursor(row, 1);
    print!("{}", " ".repeat(cols));

    let mut current_row = row + 1;
    current_row = render_field(current_row, col, width, &login.email, theme);
    current_row = render_field(current_row, col, width, &login.password, theme);
    render_button(current_row + 1, col, width, &login.button, true, theme)
}
