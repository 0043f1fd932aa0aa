//! Bottom status bar: which image is on top, where the card is headed, and
//! a key hint (or a transient message).

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::theme::Theme;

pub struct StatusBar<'a> {
    /// `(index, label)` of the topmost visible image.
    pub current: Option<(usize, &'a str)>,
    pub total: usize,
    pub at_bottom: bool,
    /// Shown instead of `hint` when set.
    pub message: Option<&'a str>,
    pub hint: &'a str,
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let position = match self.current {
            Some((index, label)) => format!(" {label} {}/{} ", index + 1, self.total),
            None => " no images ".to_string(),
        };
        let marker = if self.at_bottom { "▼ bottom " } else { "▲ top " };
        let tail = self.message.unwrap_or(self.hint);

        let line = Line::from(vec![
            Span::styled(position, Theme::status_accent_style()),
            Span::styled(marker, Theme::status_bar_style()),
            Span::styled(format!("| {tail}"), Theme::status_bar_style()),
        ]);
        Paragraph::new(line)
            .style(Theme::status_bar_style())
            .render(area, buf);
    }
}
