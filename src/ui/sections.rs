//! Blueprint section list and section content panes

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::controller::DocumentState;
use crate::app::state::AppState;
use crate::theme::Theme;

/// Shown in place of the list while the document loads
pub const LOADING_MESSAGE: &str = "Loading blueprint…";

/// Shown in the content pane before anything is selected
pub const CONTENT_HINT: &str = "Select a section to view its content here.";

/// Marker in front of the selected section
const SELECTED_MARKER: &str = "▸";

/// Draw the section list, or the load status in its place
pub fn draw_list(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme, focused: bool) {
    let border_color = if focused { theme.border_focused } else { theme.border };

    let block = Block::default()
        .title(" Blueprint Sections ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Update visible height for scroll calculations
    state.section_list.visible_height = inner.height as usize;

    let sections = match state.controller.document() {
        DocumentState::Loading => {
            draw_message(frame, inner, LOADING_MESSAGE, Style::default().fg(theme.fg_muted));
            return;
        }
        DocumentState::Failed(error) => {
            let text = format!("Error Loading Blueprint\n\n{}", error);
            draw_message(frame, inner, &text, Style::default().fg(theme.error));
            return;
        }
        DocumentState::Loaded(sections) => sections,
    };

    if sections.is_empty() {
        draw_message(frame, inner, "The blueprint has no sections", Style::default().fg(theme.fg_muted));
        return;
    }

    let selected = state.controller.selected_index();
    let cursor = state.section_list.cursor;

    let lines: Vec<Line> = sections
        .iter()
        .enumerate()
        .skip(state.section_list.scroll_offset)
        .take(inner.height as usize)
        .map(|(index, section)| {
            let is_selected = selected == Some(index);
            let text = row_text(&section.title, is_selected);

            let style = if index == cursor && focused {
                Style::default()
                    .fg(theme.bg_primary)
                    .bg(theme.accent_primary)
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default().fg(theme.accent_secondary).bg(theme.selection)
            } else if index == cursor {
                Style::default().fg(theme.fg_secondary).add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(theme.fg_primary)
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Draw the raw content of the selected section
pub fn draw_content(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .title(" Section Content ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_secondary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match state.controller.selected_section() {
        Some(section) if !section.content.is_empty() => {
            let content = Paragraph::new(section.content.as_str())
                .style(Style::default().fg(theme.fg_secondary))
                .wrap(Wrap { trim: false });
            frame.render_widget(content, inner);
        }
        _ => draw_message(frame, inner, CONTENT_HINT, Style::default().fg(theme.fg_muted)),
    }
}

/// One row of the section list
fn row_text(title: &str, selected: bool) -> String {
    if selected { format!("{} {}", SELECTED_MARKER, title) } else { format!("  {}", title) }
}

fn draw_message(frame: &mut Frame, area: Rect, msg: &str, style: Style) {
    let msg_widget = Paragraph::new(msg).style(style).wrap(Wrap { trim: true });
    frame.render_widget(msg_widget, area);
}
