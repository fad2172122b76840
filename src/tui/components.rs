//! Reusable TUI components.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;

/// A scrollable text panel with a focus-aware border.
pub struct ScrollableText<'a> {
    title: String,
    content: Vec<Line<'a>>,
    scroll: usize,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ScrollableText<'a> {
    /// Create a new scrollable text view.
    pub fn new(title: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
            scroll: 0,
            focused: false,
            theme,
        }
    }

    /// Set content.
    pub fn content(mut self, content: Vec<Line<'a>>) -> Self {
        self.content = content;
        self
    }

    /// Set scroll position.
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Set focused state.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Render the component.
    pub fn render(self, f: &mut Frame, area: Rect) {
        let max_scroll = self.content.len().saturating_sub(1);
        let scroll = u16::try_from(self.scroll.min(max_scroll)).unwrap_or(u16::MAX);

        let paragraph = Paragraph::new(self.content)
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style(self.focused)),
            )
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));

        f.render_widget(paragraph, area);
    }
}

/// A one-line status bar with left and right aligned content.
pub struct StatusBar<'a> {
    left: Vec<Span<'a>>,
    right: Vec<Span<'a>>,
    style: Style,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new(style: Style) -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            style,
        }
    }

    /// Add left-aligned content.
    pub fn left(mut self, spans: Vec<Span<'a>>) -> Self {
        self.left = spans;
        self
    }

    /// Add right-aligned content.
    pub fn right(mut self, spans: Vec<Span<'a>>) -> Self {
        self.right = spans;
        self
    }

    /// Render the status bar.
    pub fn render(self, f: &mut Frame, area: Rect) {
        let width = |spans: &[Span<'_>]| spans.iter().map(Span::width).sum::<usize>();
        let padding = usize::from(area.width)
            .saturating_sub(width(&self.left) + width(&self.right))
            .max(1);

        let mut spans = self.left;
        spans.push(Span::raw(" ".repeat(padding)));
        spans.extend(self.right);

        f.render_widget(Paragraph::new(Line::from(spans)).style(self.style), area);
    }
}

/// Draw a bordered popup over the centre of `area`, clearing what is below.
pub fn popup<'a>(
    f: &mut Frame,
    area: Rect,
    title: impl Into<Line<'a>>,
    lines: Vec<Line<'a>>,
    theme: &Theme,
) -> Rect {
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(theme.border_style(true))
                .style(Style::default().bg(theme.overlay)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
    area
}

/// A bold span.
pub fn bold<'a>(text: impl Into<std::borrow::Cow<'a, str>>, style: Style) -> Span<'a> {
    Span::styled(text, style.add_modifier(Modifier::BOLD))
}

/// Create a centered rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Split an area into a 3×3 grid of cells in slot order (row-major).
pub fn nine_cells(area: Rect) -> Vec<Rect> {
    let thirds = [
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ];
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(thirds)
        .split(area)
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(thirds)
                .split(*row)
                .to_vec()
        })
        .collect()
}
