//! Tokyo Night palette

use ratatui::style::Color;

use super::Theme;

/// Tokyo Night colors, with an empty name until [`Theme::tokyo_night`] fills it
pub const TOKYO_NIGHT: Theme = Theme {
    name: String::new(),

    bg_primary: Color::Rgb(26, 27, 38),   // #1a1b26
    bg_secondary: Color::Rgb(36, 40, 59), // #24283b

    fg_primary: Color::Rgb(169, 177, 214),   // #a9b1d6
    fg_secondary: Color::Rgb(192, 202, 245), // #c0caf5
    fg_muted: Color::Rgb(86, 95, 137),       // #565f89

    accent_primary: Color::Rgb(122, 162, 247),   // #7aa2f7
    accent_secondary: Color::Rgb(187, 154, 247), // #bb9af7

    success: Color::Rgb(158, 206, 106), // #9ece6a
    warning: Color::Rgb(224, 175, 104), // #e0af68
    error: Color::Rgb(247, 118, 142),   // #f7768e
    info: Color::Rgb(125, 207, 255),    // #7dcfff

    heading: Color::Rgb(187, 154, 247),     // #bb9af7
    inline_code: Color::Rgb(255, 158, 100), // #ff9e64
    bullet: Color::Rgb(42, 195, 222),       // #2ac3de

    border: Color::Rgb(65, 72, 104),           // #414868
    border_focused: Color::Rgb(122, 162, 247), // #7aa2f7
    selection: Color::Rgb(40, 52, 87),         // #283457
};

impl Theme {
    pub fn tokyo_night() -> Self {
        Theme { name: "Tokyo Night".to_string(), ..TOKYO_NIGHT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokyo_night_has_correct_name() {
        assert_eq!(Theme::tokyo_night().name, "Tokyo Night");
        assert!(TOKYO_NIGHT.name.is_empty());
    }

    #[test]
    fn tokyo_night_colors_are_rgb() {
        let theme = Theme::tokyo_night();
        assert!(matches!(theme.bg_primary, Color::Rgb(_, _, _)));
        assert!(matches!(theme.accent_primary, Color::Rgb(_, _, _)));
        assert!(matches!(theme.heading, Color::Rgb(_, _, _)));
    }
}
