//! Application state definitions

use super::controller::ViewController;

/// Which panel is currently focused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Sections,
    Explanation,
}

impl Panel {
    /// The other panel
    pub fn toggled(self) -> Self {
        match self {
            Panel::Sections => Panel::Explanation,
            Panel::Explanation => Panel::Sections,
        }
    }
}

/// State for the section list browser
#[derive(Debug, Clone, Default)]
pub struct SectionListState {
    /// Highlighted row (not yet selected until Enter)
    pub cursor: usize,
    /// Scroll offset for long lists
    pub scroll_offset: usize,
    /// Visible height in rows (updated on render)
    pub visible_height: usize,
}

impl SectionListState {
    /// Move the cursor up one row
    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.ensure_selection_visible();
    }

    /// Move the cursor down one row, staying within `count` rows
    pub fn move_down(&mut self, count: usize) {
        if self.cursor + 1 < count {
            self.cursor += 1;
        }
        self.ensure_selection_visible();
    }

    /// Jump to the first row
    pub fn move_top(&mut self) {
        self.cursor = 0;
        self.ensure_selection_visible();
    }

    /// Jump to the last row
    pub fn move_bottom(&mut self, count: usize) {
        self.cursor = count.saturating_sub(1);
        self.ensure_selection_visible();
    }

    /// Ensure the cursor row is visible by adjusting scroll offset
    pub fn ensure_selection_visible(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        }
        let visible = self.visible_height;
        if visible > 0 && self.cursor >= self.scroll_offset + visible {
            self.scroll_offset = self.cursor + 1 - visible;
        }
    }
}

/// Scroll state for the explanation pane
#[derive(Debug, Clone, Default)]
pub struct ExplanationViewState {
    /// Lines scrolled from the top (clamped on render)
    pub scroll: u16,
    /// Visible height in lines (updated on render)
    pub visible_height: u16,
}

impl ExplanationViewState {
    /// Scroll up by `lines`
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll down by `lines`
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    /// Half of the visible height, at least one line
    pub fn half_page(&self) -> u16 {
        (self.visible_height / 2).max(1)
    }
}

/// Status line contents
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    /// Message to display instead of the key hints
    pub message: Option<String>,
    /// Whether message is an error
    pub is_error: bool,
}

impl StatusState {
    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Document, selection and explanation state
    pub controller: ViewController,

    /// Short name of the loaded document for the header
    pub document_name: String,

    /// Name of the model explanations come from
    pub model_name: String,

    /// Currently focused panel
    pub focused_panel: Panel,

    /// Section list browser state
    pub section_list: SectionListState,

    /// Explanation pane scroll state
    pub explanation_view: ExplanationViewState,

    /// Status line state
    pub status: StatusState,
}
