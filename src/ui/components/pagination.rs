//! Pagination line renderer.

use crate::ui::helpers::{display_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PaginationInfo;

/// Renders `‹ Page N of M ›  K users` centered at `row`.
///
/// An arrow is dimmed when there is no page in that direction.
pub fn render_pagination(row: usize, info: &PaginationInfo, theme: &Theme, cols: usize) -> usize {
    let total = info.total_text.as_deref().map(|t| format!("  {t}")).unwrap_or_default();

    let arrow_color = |enabled: bool| {
        if enabled {
            &theme.colors.header_fg
        } else {
            &theme.colors.border
        }
    };

    let len = display_len(&info.text) + 4 + display_len(&total);
    let padding = cols.saturating_sub(len) / 2;

    position_cursor(row, 1);
    print!("{}", " ".repeat(padding));
    print!("{}‹ ", Theme::fg(arrow_color(info.has_previous)));
    print!("{}{}", Theme::fg(&theme.colors.text_normal), info.text);
    print!("{} ›", Theme::fg(arrow_color(info.has_next)));
    print!("{}{}", Theme::fg(&theme.colors.text_dim), total);
    print!("{}", Theme::reset());
    print!("{}", " ".repeat(cols.saturating_sub(padding + len)));
    row + 1
}
