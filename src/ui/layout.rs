//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: the image list fills the screen above a one-row
/// status bar.
pub struct AppLayout {
    pub list_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // image list (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            list_area: chunks[0],
            status_area: chunks[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_takes_last_row() {
        let l = AppLayout::from_area(Rect::new(0, 0, 80, 24));
        assert_eq!(l.list_area, Rect::new(0, 0, 80, 23));
        assert_eq!(l.status_area, Rect::new(0, 23, 80, 1));
    }
}
