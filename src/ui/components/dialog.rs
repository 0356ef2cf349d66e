//! Modal dialogs drawn over the users table.

use super::field::{render_button, render_field};
use crate::ui::helpers::{display_len, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DialogInfo;

const DIALOG_WIDTH: usize = 56;

/// Renders `dialog` as a framed box centered in the pane.
pub fn render_dialog(dialog: &DialogInfo, theme: &Theme, rows: usize, cols: usize) {
    let width = DIALOG_WIDTH.min(cols.saturating_sub(4));
    let inner = width.saturating_sub(4);
    let height = match dialog {
        DialogInfo::Edit { fields, .. } => fields.len() * 3 + 6,
        DialogInfo::ConfirmDelete { .. } => 8,
    };
    let top = rows.saturating_sub(height) / 2 + 1;
    let left = cols.saturating_sub(width) / 2 + 1;

    render_frame(top, left, width, height, theme);

    let (title, avatar, button) = match dialog {
        DialogInfo::Edit { title, avatar, button, .. } | DialogInfo::ConfirmDelete { title, avatar, button, .. } => {
            (title, avatar, button)
        }
    };
    let title = truncate(title, inner);
    position_cursor(top + 1, left + 2 + inner.saturating_sub(display_len(&title)) / 2);
    print!("{}{}{title}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg), Theme::reset());

    let avatar = truncate(avatar, inner);
    position_cursor(top + 2, left + 2 + inner.saturating_sub(display_len(&avatar)) / 2);
    print!("{}{avatar}{}", Theme::fg(&theme.colors.text_dim), Theme::reset());

    let mut row = top + 3;
    match dialog {
        DialogInfo::Edit { fields, can_submit, .. } => {
            for field in fields {
                row = render_field(row, left + 2, inner, field, theme);
            }
            render_button(row + 1, left + 2, inner, button, *can_submit, theme);
        }
        DialogInfo::ConfirmDelete { message, .. } => {
            let message = truncate(message, inner);
            position_cursor(row + 1, left + 2 + inner.saturating_sub(display_len(&message)) / 2);
            print!("{}{message}{}", Theme::fg(&theme.colors.text_normal), Theme::reset());
            render_button(row + 3, left + 2, inner, button, true, theme);
        }
    }
}

/// Draws the border and blanks the inside so the table does not show through.
fn render_frame(top: usize, left: usize, width: usize, height: usize, theme: &Theme) {
    let inner = width.saturating_sub(2);
    let border = Theme::fg(&theme.colors.search_bar_border);

    position_cursor(top, left);
    print!("{border}┌{}┐{}", "─".repeat(inner), Theme::reset());
    for row in top + 1..top + height.saturating_sub(1) {
        position_cursor(row, left);
        print!("{border}│{}{border}│{}", " ".repeat(inner), Theme::reset());
    }
    position_cursor(top + height.saturating_sub(1), left);
    print!("{border}└{}┘{}", "─".repeat(inner), Theme::reset());
}
