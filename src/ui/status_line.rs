//! Status line at the bottom of the screen

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::{Panel, StatusState};
use crate::theme::Theme;

/// Key hints for the focused panel
fn key_hints(focused: Panel) -> &'static str {
    match focused {
        Panel::Sections => "j/k move  g/G top/bottom  Enter explain  Tab focus  J/K scroll  q quit",
        Panel::Explanation => "j/k scroll  Ctrl-d/u page  g/G top/bottom  Enter explain  Tab focus  q quit",
    }
}

/// Draw the status line
pub fn draw(frame: &mut Frame, area: Rect, status: &StatusState, focused: Panel, theme: &Theme) {
    let (text, style) = match &status.message {
        Some(msg) => {
            let color = if status.is_error { theme.error } else { theme.info };
            (msg.as_str(), Style::default().fg(color))
        }
        None => (key_hints(focused), Style::default().fg(theme.fg_muted)),
    };

    let paragraph =
        Paragraph::new(Line::from(Span::styled(text, style))).style(Style::default().bg(theme.bg_secondary));
    frame.render_widget(paragraph, area);
}
