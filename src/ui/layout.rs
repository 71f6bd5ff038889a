//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the category pane, borders included.
pub const TREE_WIDTH: u16 = 28;
/// Width of the `[ Help ]` button in the top bar.
const HELP_BUTTON_WIDTH: u16 = 10;

/// Primary screen layout: top bar, category tree beside the thumbnail grid,
/// and a bottom status bar.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub help_button_area: Rect,
    pub path_area: Rect,
    pub tree_area: Rect,
    pub grid_area: Rect,
    pub status_area: Rect,
    pub count_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // help button + folder path
                Constraint::Min(3),    // tree + grid
                Constraint::Length(1), // status / model count
            ])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(HELP_BUTTON_WIDTH), Constraint::Min(1)])
            .split(rows[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(TREE_WIDTH), Constraint::Min(10)])
            .split(rows[1]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(18)])
            .split(rows[2]);

        Self {
            help_button_area: top[0],
            path_area: top[1],
            tree_area: body[0],
            grid_area: body[1],
            status_area: bottom[0],
            count_area: bottom[1],
        }
    }
}

/// Is the cell `(column, row)` inside `rect`?
pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_tile_the_screen() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.tree_area, Rect::new(0, 1, TREE_WIDTH, 28));
        assert_eq!(layout.grid_area, Rect::new(TREE_WIDTH, 1, 100 - TREE_WIDTH, 28));
        assert_eq!(layout.path_area.y, 0);
        assert_eq!(layout.status_area.y, 29);
        assert_eq!(layout.count_area.width, 18);
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 2, 3, 3);
        assert!(contains(r, 2, 2));
        assert!(contains(r, 4, 4));
        assert!(!contains(r, 5, 4));
        assert!(!contains(r, 1, 2));
    }
}
