//! AI explanation pane

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use textwrap::core::display_width;

use crate::app::controller::ExplanationPane;
use crate::app::state::AppState;
use crate::theme::Theme;

const WELCOME_TITLE: &str = "Welcome to the Blueprint Explainer";
const WELCOME_BODY: &str = "Select a section from the blueprint on the left. Claude will provide a \
                            detailed, easy-to-understand explanation for you here.";
const THINKING: &str = "Claude is thinking…";

/// Appended to streaming text
const STREAM_MARKER: &str = "▌";

/// Draw the explanation pane for the current selection
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme, focused: bool) {
    let controller = &state.controller;
    let pane = controller.explanation_pane();
    let title = pane_title(
        controller.selected_section().map(|s| s.title.as_str()),
        matches!(pane, ExplanationPane::Loading(_)),
    );
    let border_color = if focused { theme.border_focused } else { theme.border };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Leave a column for the scroll indicator
    let width = inner.width.saturating_sub(2) as usize;

    let lines = match pane {
        ExplanationPane::Initial => welcome_lines(theme),
        ExplanationPane::Error(message) => {
            let error = Paragraph::new(message)
                .style(Style::default().fg(theme.error))
                .wrap(Wrap { trim: true });
            frame.render_widget(error, inner);
            return;
        }
        ExplanationPane::Loading("") => {
            vec![Line::from(Span::styled(THINKING, Style::default().fg(theme.fg_muted)))]
        }
        ExplanationPane::Loading(partial) => {
            let mut lines = render_markdown(partial, width, theme);
            let marker = Span::styled(STREAM_MARKER, Style::default().fg(theme.accent_primary));
            match lines.last_mut() {
                Some(last) => last.spans.push(marker),
                None => lines.push(Line::from(marker)),
            }
            lines
        }
        ExplanationPane::Text(text) => render_markdown(text, width, theme),
    };

    // Calculate max scroll
    let visible_lines = inner.height as usize;
    let total_lines = lines.len();
    let max_scroll = total_lines.saturating_sub(visible_lines);

    // Clamp scroll position
    let view = &mut state.explanation_view;
    let scroll = (view.scroll as usize).min(max_scroll);
    view.scroll = scroll as u16;
    view.visible_height = inner.height;

    let para = Paragraph::new(lines)
        .style(Style::default().fg(theme.fg_primary))
        .scroll((scroll as u16, 0));
    frame.render_widget(para, inner);

    if total_lines > visible_lines {
        draw_scroll_indicator(frame, inner, scroll, max_scroll, theme);
    }
}

/// Pane title, naming the selected section when there is one
fn pane_title(section_title: Option<&str>, streaming: bool) -> String {
    let mut title = match section_title {
        Some(t) => format!(" AI Explanation – {}", t),
        None => " AI Explanation".to_string(),
    };
    if streaming {
        title.push_str(" (streaming…)");
    }
    title.push(' ');
    title
}

fn welcome_lines(theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            WELCOME_TITLE,
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(WELCOME_BODY, Style::default().fg(theme.fg_muted))),
    ]
}

/// A block of explanation text waiting to be wrapped
#[derive(Debug, Default)]
struct TextBlock {
    /// Columns before the marker
    pad: usize,
    /// List marker such as `- ` or `2. `, empty outside lists
    marker: String,
    spans: Vec<(String, Style)>,
}

/// Builds wrapped, styled lines from markdown events
struct MarkdownRenderer<'t> {
    theme: &'t Theme,
    width: usize,
    lines: Vec<Line<'static>>,
    block: Option<TextBlock>,
    /// Next number per open list; `None` for bullet lists
    lists: Vec<Option<u64>>,
    heading: bool,
    strong: usize,
    emphasis: usize,
    in_code_block: bool,
}

/// Turn explanation markdown into wrapped, styled lines
pub fn render_markdown(text: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut renderer = MarkdownRenderer {
        theme,
        width,
        lines: Vec::new(),
        block: None,
        lists: Vec::new(),
        heading: false,
        strong: 0,
        emphasis: 0,
        in_code_block: false,
    };

    for event in Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH) {
        renderer.handle(event);
    }
    renderer.finish()
}

impl MarkdownRenderer<'_> {
    fn handle(&mut self, event: Event) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                self.blank();
                self.heading = true;
                self.start_block(0, String::new());
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush();
                self.heading = false;
                self.blank();
            }
            Event::Start(Tag::Paragraph) => {
                // Tight item text goes on the marker line
                let fresh_item =
                    matches!(&self.block, Some(b) if b.spans.is_empty() && !b.marker.is_empty());
                if !fresh_item {
                    self.start_block(self.content_indent(), String::new());
                }
            }
            Event::End(TagEnd::Paragraph) => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Event::Start(Tag::List(first)) => {
                self.flush();
                self.lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Event::Start(Tag::Item) => {
                let pad = self.lists.len().saturating_sub(1) * 2;
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        *n += 1;
                        format!("{}. ", *n - 1)
                    }
                    _ => "- ".to_string(),
                };
                self.start_block(pad, marker);
            }
            Event::End(TagEnd::Item) => self.flush(),
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.in_code_block = false;
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Event::Text(text) if self.in_code_block => {
                for line in text.lines() {
                    self.code_line(line);
                }
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.push(&text, self.text_style());
            }
            Event::Code(code) => {
                let style = Style::default().fg(self.theme.inline_code).bg(self.theme.bg_secondary);
                self.push(&code, style);
            }
            Event::SoftBreak => self.push(" ", self.text_style()),
            Event::HardBreak => {
                let indent = self.block.as_ref().map_or(0, |b| b.pad + display_width(&b.marker));
                self.flush();
                self.start_block(indent, String::new());
            }
            Event::Rule => {
                self.flush();
                let rule = "─".repeat(self.width.clamp(3, 40));
                self.lines.push(Line::from(Span::styled(rule, Style::default().fg(self.theme.border))));
                self.blank();
            }
            Event::Start(Tag::Strong) => self.strong += 1,
            Event::End(TagEnd::Strong) => self.strong = self.strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => self.emphasis += 1,
            Event::End(TagEnd::Emphasis) => self.emphasis = self.emphasis.saturating_sub(1),
            _ => {}
        }
    }

    fn text_style(&self) -> Style {
        let mut style = if self.heading {
            Style::default().fg(self.theme.heading).add_modifier(Modifier::BOLD)
        } else if self.strong > 0 {
            Style::default().fg(self.theme.fg_secondary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.fg_primary)
        };
        if self.emphasis > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }

    /// Indent of text belonging to the innermost list item
    fn content_indent(&self) -> usize {
        self.lists.len() * 2
    }

    fn start_block(&mut self, pad: usize, marker: String) {
        self.flush();
        self.block = Some(TextBlock { pad, marker, spans: Vec::new() });
    }

    fn push(&mut self, text: &str, style: Style) {
        if self.block.is_none() {
            self.start_block(self.content_indent(), String::new());
        }
        if let Some(block) = self.block.as_mut() {
            block.spans.push((text.to_string(), style));
        }
    }

    fn code_line(&mut self, line: &str) {
        let indent = " ".repeat(self.content_indent() + 2);
        let style = Style::default().fg(self.theme.inline_code);
        self.lines.push(Line::from(vec![Span::raw(indent), Span::styled(line.to_string(), style)]));
    }

    /// Separate top-level blocks with one empty line
    fn blank(&mut self) {
        if self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::from(""));
        }
    }

    /// Wrap the open block into lines
    fn flush(&mut self) {
        let Some(block) = self.block.take() else { return };
        if block.spans.iter().all(|(text, _)| text.trim().is_empty()) {
            return;
        }

        let continuation = block.pad + display_width(&block.marker);
        let mut line: Vec<(String, Style)> = Vec::new();
        if block.pad > 0 {
            line.push((" ".repeat(block.pad), Style::default()));
        }
        if !block.marker.is_empty() {
            line.push((block.marker.clone(), Style::default().fg(self.theme.bullet)));
        }
        let mut line_width = continuation;
        let mut has_words = false;

        for (text, style) in &block.spans {
            for token in split_words(text) {
                if token.starts_with(char::is_whitespace) {
                    if has_words {
                        push_token(&mut line, " ", *style);
                        line_width += 1;
                    }
                    continue;
                }

                let token_width = display_width(token);
                if has_words && self.width > 0 && line_width + token_width > self.width {
                    trim_trailing_space(&mut line);
                    self.lines.push(to_line(std::mem::take(&mut line)));
                    if continuation > 0 {
                        line.push((" ".repeat(continuation), Style::default()));
                    }
                    line_width = continuation;
                }
                push_token(&mut line, token, *style);
                line_width += token_width;
                has_words = true;
            }
        }

        trim_trailing_space(&mut line);
        self.lines.push(to_line(line));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Split text into alternating runs of whitespace and non-whitespace
fn split_words(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (i, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            tokens.push(&text[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Append to the last span when the style matches
fn push_token(line: &mut Vec<(String, Style)>, token: &str, style: Style) {
    match line.last_mut() {
        Some((text, last)) if *last == style => text.push_str(token),
        _ => line.push((token.to_string(), style)),
    }
}

/// Drop the space left after the last word of a line
fn trim_trailing_space(line: &mut Vec<(String, Style)>) {
    let Some((text, _)) = line.last_mut() else { return };
    if text.trim().is_empty() {
        line.pop();
    } else {
        text.truncate(text.trim_end().len());
    }
}

fn to_line(spans: Vec<(String, Style)>) -> Line<'static> {
    Line::from(spans.into_iter().map(|(text, style)| Span::styled(text, style)).collect::<Vec<_>>())
}

/// Draw scroll indicator on the right side
fn draw_scroll_indicator(
    frame: &mut Frame,
    area: Rect,
    scroll: usize,
    max_scroll: usize,
    theme: &Theme,
) {
    if area.height < 3 || max_scroll == 0 {
        return;
    }

    let track_height = area.height.saturating_sub(2) as usize;
    let thumb_pos = (scroll * track_height) / max_scroll;

    let thumb_y = area.y + 1 + thumb_pos as u16;
    let thumb_x = area.x + area.width - 1;

    if thumb_y < area.y + area.height - 1 {
        let thumb = Paragraph::new("█").style(Style::default().fg(theme.fg_muted));
        frame.render_widget(thumb, Rect::new(thumb_x, thumb_y, 1, 1));
    }
}
