//! UI rendering components

pub mod explanation;
pub mod main_screen;
pub mod sections;
pub mod status_line;

use ratatui::Frame;

use crate::app::state::AppState;
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    main_screen::draw(frame, state, theme);
}
