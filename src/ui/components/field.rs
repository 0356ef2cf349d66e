//! Labelled input fields and buttons shared by the login screen and dialogs.

use crate::ui::helpers::{display_len, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FieldInfo;

/// Renders a field as three lines at (`row`, `col`), `width` chars wide:
///
/// ```text
/// Email
/// [ eve.holt@reqres.in▏        ]
/// Invalid email
/// ```
///
/// Returns the next free row.
pub fn render_field(row: usize, col: usize, width: usize, field: &FieldInfo, theme: &Theme) -> usize {
    let inner = width.saturating_sub(4);

    position_cursor(row, col);
    if field.is_focused {
        print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    print!("{}", truncate(&field.label, width));
    print!("{}", Theme::reset());

    let frame = if field.is_focused {
        &theme.colors.search_bar_border
    } else {
        &theme.colors.border
    };
    let caret = if field.is_focused { "▏" } else { "" };
    let value = tail(&format!("{}{caret}", field.value), inner);

    position_cursor(row + 1, col);
    print!("{}[ ", Theme::fg(frame));
    print!("{}{value}", Theme::fg(&theme.colors.text_normal));
    print!("{}", " ".repeat(inner.saturating_sub(display_len(&value))));
    print!("{} ]", Theme::fg(frame));
    print!("{}", Theme::reset());

    position_cursor(row + 2, col);
    match &field.error {
        Some(error) => {
            print!("{}", Theme::fg(&theme.colors.error_fg));
            print!("{}", truncate(error, width));
            print!("{}", " ".repeat(width.saturating_sub(display_len(error))));
            print!("{}", Theme::reset());
        }
        None => print!("{}", " ".repeat(width)),
    }

    row + 3
}

/// Renders a button label centered within `width`.
///
/// Enabled buttons use the selection colors; disabled ones are dimmed.
pub fn render_button(row: usize, col: usize, width: usize, label: &str, enabled: bool, theme: &Theme) -> usize {
    let text = format!("  {label}  ");
    let len = display_len(&text);
    let padding = width.saturating_sub(len) / 2;

    position_cursor(row, col);
    print!("{}", " ".repeat(padding));
    if enabled {
        print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}{}", Theme::dim(), Theme::fg(&theme.colors.text_dim));
    }
    print!("{text}");
    print!("{}", Theme::reset());
    print!("{}", " ".repeat(width.saturating_sub(padding + len)));
    row + 1
}

/// Keeps the end of `text`, where the caret is, when it is too long.
fn tail(text: &str, max: usize) -> String {
    let len = display_len(text);
    if len <= max {
        return text.to_string();
    }
    text.chars().skip(len - max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_caret_end() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("abc", 5), "abc");
    }
}
