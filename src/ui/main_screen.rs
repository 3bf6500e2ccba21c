//! Main screen: section panes on the left, explanation on the right

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{explanation, sections, status_line};
use crate::app::state::{AppState, Panel};
use crate::theme::Theme;

/// Minimum width for the section column
const SECTIONS_MIN_WIDTH: u16 = 28;

/// Screen regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenLayout {
    header: Rect,
    section_list: Rect,
    section_content: Rect,
    explanation: Rect,
    status: Rect,
}

/// Draw the main screen
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let layout = create_layout(frame.area());
    let focused = state.focused_panel;

    draw_header(frame, layout.header, state, theme);
    sections::draw_list(frame, layout.section_list, state, theme, focused == Panel::Sections);
    sections::draw_content(frame, layout.section_content, state, theme);
    explanation::draw(frame, layout.explanation, state, theme, focused == Panel::Explanation);
    status_line::draw(frame, layout.status, &state.status, focused, theme);
}

/// Split the screen into its panes
fn create_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    // Section column (left): a third of the width, min 28 cols
    let sections_width = (area.width / 3).max(SECTIONS_MIN_WIDTH).min(area.width);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sections_width), Constraint::Min(20)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(columns[0]);

    ScreenLayout {
        header: rows[0],
        section_list: left[0],
        section_content: left[1],
        explanation: columns[1],
        status: rows[2],
    }
}

fn draw_header(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(
            " Blueprint Explainer ",
            Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", state.document_name), Style::default().fg(theme.fg_secondary)),
        Span::styled(format!("  ·  {}", state.model_name), Style::default().fg(theme.fg_muted)),
    ]);

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg_secondary)), area);
}
