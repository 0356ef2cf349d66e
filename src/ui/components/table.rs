//! Users table renderer: ID, NAME and EMAIL columns with selection and
//! search-match highlighting.

use crate::ui::helpers::{self, display_len, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;

/// Width of the ID column including its gap.
pub const ID_WIDTH: usize = 6;
/// Width of the NAME column including its gap.
pub const NAME_WIDTH: usize = 28;

/// Renders the bold column headers at `row`.
pub fn render_table_headers(row: usize, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{:<ID_WIDTH$}{:<NAME_WIDTH$}{}", " ID", "NAME", "EMAIL");
    print!("{}", Theme::reset());
    row + 1
}

/// Renders `items` one per row starting at `row`.
pub fn render_table_rows(row: usize, items: &[DisplayItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(current_row, item, theme, cols);
    }
    current_row
}

/// Selected rows are drawn with the selection colors across the full width;
/// search highlights apply only to unselected rows.
fn render_table_row(row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    if item.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }

    let id = format!(" {}", item.id);
    print!("{id}");
    print!("{}", " ".repeat(ID_WIDTH.saturating_sub(display_len(&id))));

    helpers::render_highlighted_text(&item.name, &item.name_highlight, theme, item.is_selected);
    print!("{}", " ".repeat(NAME_WIDTH.saturating_sub(display_len(&item.name))));

    helpers::render_highlighted_text(&item.email, &item.email_highlight, theme, item.is_selected);

    let line_len = ID_WIDTH.max(display_len(&id)) + NAME_WIDTH.max(display_len(&item.name)) + display_len(&item.email);
    print!("{}", " ".repeat(cols.saturating_sub(line_len)));

    print!("{}", Theme::reset());
    row + 1
}
