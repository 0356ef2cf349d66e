//! Notification line renderer.

use crate::ui::helpers::{position_cursor, print_centered};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::NotificationInfo;

/// Renders the notification, or a blank line, at `row`.
pub fn render_notification(row: usize, notification: Option<&NotificationInfo>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    match notification {
        Some(info) => {
            let (icon, color) = if info.is_error {
                ("✗", &theme.colors.error_fg)
            } else {
                ("✓", &theme.colors.success_fg)
            };
            print!("{}", Theme::bold());
            print!("{}", Theme::fg(color));
            print_centered(&format!("{icon} {}", info.message), cols);
            print!("{}", Theme::reset());
        }
        None => print!("{}", " ".repeat(cols)),
    }
    row + 1
}
