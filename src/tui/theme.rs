//! TUI theming and colors.

use ratatui::style::{Color, Modifier, Style};

use crate::flows::StatusKind;

/// Application theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Name of the theme.
    pub name: String,
    /// Foreground color.
    pub foreground: Color,
    /// Primary accent color (centre cards, headers).
    pub primary: Color,
    /// Secondary accent color (grid ids, breadcrumb).
    pub secondary: Color,
    /// Border color (unfocused).
    pub border: Color,
    /// Border color (focused).
    pub border_focused: Color,
    /// Selection highlight.
    pub selection: Color,
    /// Dimmed text (meta lines, empty slots).
    pub muted: Color,
    /// Freshly submitted content.
    pub fresh: Color,
    /// Content awaiting review.
    pub review: Color,
    /// Error color.
    pub error: Color,
    /// Success color.
    pub success: Color,
    /// Overlay background.
    pub overlay: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create the default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            foreground: Color::White,
            primary: Color::Cyan,
            secondary: Color::Magenta,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            selection: Color::DarkGray,
            muted: Color::Gray,
            fresh: Color::Green,
            review: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            overlay: Color::Black,
        }
    }

    /// Create a light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            foreground: Color::Black,
            primary: Color::Blue,
            secondary: Color::Magenta,
            border: Color::Gray,
            border_focused: Color::Blue,
            selection: Color::LightBlue,
            muted: Color::DarkGray,
            fresh: Color::Green,
            review: Color::Rgb(184, 134, 11),
            error: Color::Red,
            success: Color::Green,
            overlay: Color::White,
        }
    }

    /// Create a high contrast theme.
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".to_string(),
            foreground: Color::White,
            primary: Color::Yellow,
            secondary: Color::Cyan,
            border: Color::White,
            border_focused: Color::Yellow,
            selection: Color::White,
            muted: Color::White,
            fresh: Color::LightGreen,
            review: Color::LightYellow,
            error: Color::LightRed,
            success: Color::LightGreen,
            overlay: Color::Black,
        }
    }

    /// Get theme by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "high-contrast" | "highcontrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// The next theme in [`available_themes`] order.
    #[must_use]
    pub fn next(&self) -> Self {
        match self.name.as_str() {
            "dark" => Self::light(),
            "light" => Self::high_contrast(),
            _ => Self::dark(),
        }
    }

    /// Get style for borders.
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Get style for selected items.
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for headers and titles.
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for `#id` labels.
    pub fn label_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    /// Style for secondary text.
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for fresh markers.
    pub fn fresh_style(&self) -> Style {
        Style::default()
            .fg(self.fresh)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for needs-review markers.
    pub fn review_style(&self) -> Style {
        Style::default().fg(self.review)
    }

    /// Style for a status or toast of the given kind.
    pub fn status_style(&self, kind: StatusKind) -> Style {
        match kind {
            StatusKind::Info => Style::default().fg(self.primary),
            StatusKind::Success => Style::default().fg(self.success),
            StatusKind::Error => Style::default()
                .fg(self.error)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Available themes list.
pub fn available_themes() -> Vec<&'static str> {
    vec!["dark", "light", "high-contrast"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_and_cycle() {
        assert_eq!(Theme::from_name("LIGHT").unwrap().name, "light");
        assert_eq!(Theme::from_name("highcontrast").unwrap().name, "high-contrast");
        assert!(Theme::from_name("solarized").is_none());

        let mut theme = Theme::default();
        for expected in ["light", "high-contrast", "dark"] {
            theme = theme.next();
            assert_eq!(theme.name, expected);
        }
    }
}
