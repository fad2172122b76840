//! TUI application main loop.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::api::BoardApi;
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::model::GridId;
use crate::render::ingest::INGEST_HEADERS;
use crate::render::{self, BoardCard, CardKind, EntryLine, OverviewCell};
use crate::store::ViewMode;

use super::components::{bold, centered_rect, nine_cells, popup, ScrollableText, StatusBar};
use super::events::{Event, EventHandler, KeyBindings};
use super::state::{AppState, Focus, IngestField};
use super::theme::Theme;

/// Startup options for the board.
#[derive(Debug, Clone, Default)]
pub struct TuiOptions {
    /// Grid to open instead of the root.
    pub start_grid: Option<GridId>,
    /// Initial view mode.
    pub view: Option<ViewMode>,
    /// Theme name overriding the config.
    pub theme: Option<String>,
    /// Force ASCII markers.
    pub ascii: bool,
}

/// Markers for fresh and needs-review content.
struct Markers {
    fresh: &'static str,
    review: &'static str,
    selected: &'static str,
}

impl Markers {
    const fn new(unicode: bool) -> Self {
        if unicode {
            Self {
                fresh: "●",
                review: "⚑",
                selected: "▶ ",
            }
        } else {
            Self {
                fresh: "*",
                review: "!",
                selected: "> ",
            }
        }
    }
}

/// Run the board against an API, blocking until the user quits.
pub fn run(api: Box<dyn BoardApi>, runtime: Runtime, config: &Config, options: TuiOptions) -> Result<()> {
    let theme_name = options.theme.as_deref().unwrap_or(&config.theme.name);
    let theme = Theme::from_name(theme_name).unwrap_or_else(|| {
        warn!(theme = theme_name, "unknown theme, using dark");
        Theme::default()
    });

    let mut app = AppState::new(api, runtime, config, theme);
    app.unicode = config.theme.unicode && !options.ascii;

    let source = app.load()?;
    info!(%source, "board loaded");
    if let Some(grid_id) = options.start_grid {
        if app.store.get_grid(grid_id).is_none() {
            return Err(BoardError::GridNotFound { grid_id });
        }
        app.jump_to(grid_id);
    }
    if let Some(view) = options.view {
        app.store.set_view_mode(view);
    }

    // Setup terminal
    enable_raw_mode().map_err(|e| {
        BoardError::io(
            "Cannot launch TUI - no interactive terminal available. \
             Use `mandala grids` or `mandala show` for non-interactive output",
            e,
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| BoardError::io("Failed to enter alternate screen", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| BoardError::io("Failed to create terminal", e))?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().map_err(|e| BoardError::io("Failed to disable raw mode", e))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| BoardError::io("Failed to leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| BoardError::io("Failed to show cursor", e))?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let events = EventHandler::new(Duration::from_millis(100));
    let bindings = KeyBindings::default();

    loop {
        terminal
            .draw(|f| draw_ui(f, app))
            .map_err(|e| BoardError::io("Failed to draw TUI", e))?;

        // The in-flight status is on screen now; post and redraw.
        if app.submission_pending() {
            app.run_pending_submission();
            continue;
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                handle_key(app, &bindings, key, Instant::now())?;
                if app.should_quit {
                    return Ok(());
                }
            }
            Ok(Event::Tick) => app.tick(Instant::now()),
            Ok(Event::Resize(..)) => {}
            Err(_) => {
                return Err(BoardError::TuiError {
                    message: "event channel closed".to_string(),
                })
            }
        }
    }
}

fn handle_key(app: &mut AppState, bindings: &KeyBindings, key: KeyEvent, now: Instant) -> Result<()> {
    // Ingest editor captures all input
    if app.ingest.open {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Esc) => app.close_ingest(),
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => app.begin_submit(),
            (KeyModifiers::NONE, KeyCode::Tab) => app.ingest_switch_field(),
            (KeyModifiers::NONE, KeyCode::Enter) => app.ingest_newline(),
            (KeyModifiers::NONE, KeyCode::Backspace) => app.ingest_backspace(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => app.ingest_input(c),
            _ => {}
        }
        return Ok(());
    }

    if app.log.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.close_log();
        }
        return Ok(());
    }

    if app.search.editing {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Esc | KeyCode::Enter) => app.finish_search(),
            (KeyModifiers::NONE, KeyCode::Backspace) => app.search_backspace(),
            (KeyModifiers::NONE, KeyCode::Down) => app.move_list(1),
            (KeyModifiers::NONE, KeyCode::Up) => app.move_list(-1),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => app.search_input(c),
            _ => {}
        }
        return Ok(());
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q')) {
            app.toggle_help();
        }
        return Ok(());
    }

    if bindings.is_quit(&key) {
        app.should_quit = true;
    } else if bindings.is_up(&key) {
        navigate(app, 0, -1);
    } else if bindings.is_down(&key) {
        navigate(app, 0, 1);
    } else if bindings.is_left(&key) {
        navigate(app, -1, 0);
    } else if bindings.is_right(&key) {
        navigate(app, 1, 0);
    } else if bindings.is_select(&key) {
        app.activate();
    } else if bindings.is_back(&key) {
        app.back();
    } else if bindings.is_toggle_view(&key) {
        app.toggle_view();
    } else if bindings.is_search(&key) {
        app.start_search();
    } else if bindings.is_grid_filter(&key) {
        app.cycle_grid_filter();
    } else if bindings.is_status_filter(&key) {
        app.cycle_status_filter();
    } else if bindings.is_ingest(&key) {
        app.open_ingest();
    } else if bindings.is_reload(&key) {
        app.reload(now)?;
    } else if bindings.is_focus(&key) {
        app.cycle_focus();
    } else if bindings.is_theme(&key) {
        app.cycle_theme();
    } else if bindings.is_help(&key) {
        app.toggle_help();
    }
    Ok(())
}

fn navigate(app: &mut AppState, dx: i8, dy: i8) {
    match app.focus {
        Focus::Board => app.move_selection(dx, dy),
        Focus::Detail | Focus::Search => app.move_list(isize::from(dy)),
    }
}

/// Draw the main UI.
fn draw_ui(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(f.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main[1]);

    let markers = Markers::new(app.unicode);
    match app.store.state().view_mode {
        ViewMode::Single => draw_board(f, app, &markers, main[0]),
        ViewMode::Overview => draw_overview(f, app, &markers, main[0]),
    }
    draw_detail(f, app, &markers, side[0]);
    draw_search(f, app, &markers, side[1]);
    draw_status_bar(f, app, chunks[1]);

    if app.ingest.open {
        draw_ingest(f, app);
    }
    if app.log.is_some() {
        draw_log(f, app);
    }
    if app.show_help {
        draw_help(f, app);
    }
    draw_toasts(f, app);
}

fn draw_board(f: &mut Frame, app: &AppState, markers: &Markers, area: Rect) {
    let theme = &app.theme;
    let Some(view) = render::board_view(app.store.state()) else {
        let empty = Paragraph::new(render::board::EMPTY_BOARD_MESSAGE)
            .style(theme.muted_style())
            .block(Block::default().title(" Board ").borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };

    let back_hint = if view.can_go_back { "  [Esc] back" } else { "" };
    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(format!(" #{} {} ", view.grid_id, view.title), theme.title_style()),
            Span::styled(format!("{}{back_hint} ", view.breadcrumb), theme.muted_style()),
        ]))
        .borders(Borders::ALL)
        .border_style(theme.border_style(app.focus == Focus::Board));
    let inner = block.inner(area);
    f.render_widget(block, area);

    for (card, cell) in view.cards.iter().zip(nine_cells(inner)) {
        let selected = app.focus == Focus::Board && card.slot == app.selected_slot;
        draw_card(f, theme, markers, card, selected, cell);
    }
}

fn draw_card(f: &mut Frame, theme: &Theme, markers: &Markers, card: &BoardCard, selected: bool, area: Rect) {
    let mut title = vec![Span::styled(format!(" {} ", card.label), theme.label_style())];
    if card.fresh {
        title.push(Span::styled(format!("{} ", markers.fresh), theme.fresh_style()));
    }
    if card.needs_review > 0 {
        title.push(Span::styled(
            format!("{}{} ", markers.review, card.needs_review),
            theme.review_style(),
        ));
    }

    let title_style = match card.kind {
        CardKind::Center => theme.title_style(),
        CardKind::Item => Style::default()
            .fg(theme.foreground)
            .add_modifier(Modifier::BOLD),
        CardKind::Empty => theme.muted_style(),
    };
    let mut lines = vec![Line::from(Span::styled(card.title.clone(), title_style))];
    if !card.detail.is_empty() {
        lines.push(Line::from(card.detail.clone()));
    }
    if !card.note.is_empty() {
        lines.push(Line::from(Span::styled(card.note.clone(), theme.muted_style())));
    }

    let mut block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(theme.border_style(selected));
    if selected {
        block = block.style(theme.selection_style());
    }
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_overview(f: &mut Frame, app: &AppState, markers: &Markers, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(Span::styled(" Overview ", theme.title_style()))
        .borders(Borders::ALL)
        .border_style(theme.border_style(app.focus == Focus::Board));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(view) = render::overview_view(app.store.state()) else {
        let message = Paragraph::new(render::board::OVERVIEW_UNAVAILABLE).style(theme.muted_style());
        f.render_widget(message, inner);
        return;
    };

    for (cell, rect) in view.cells.iter().zip(nine_cells(inner)) {
        let selected = app.focus == Focus::Board && cell.slot == app.selected_slot;
        draw_overview_cell(f, theme, markers, cell, selected, rect);
    }
}

fn draw_overview_cell(
    f: &mut Frame,
    theme: &Theme,
    markers: &Markers,
    cell: &OverviewCell,
    selected: bool,
    area: Rect,
) {
    let mut title = vec![Span::styled(format!(" {} ", cell.header), theme.label_style())];
    if cell.fresh {
        title.push(Span::styled(format!("{} ", markers.fresh), theme.fresh_style()));
    }
    if cell.has_review {
        title.push(Span::styled(format!("{} ", markers.review), theme.review_style()));
    }

    let lines: Vec<Line> = if cell.minis.is_empty() {
        vec![Line::from(Span::styled(cell.content.clone(), theme.title_style()))]
    } else {
        cell.minis
            .chunks(3)
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .enumerate()
                    .flat_map(|(i, mini)| {
                        let style = if mini.is_center {
                            theme.title_style()
                        } else {
                            Style::default().fg(theme.foreground)
                        };
                        let sep = if i == 0 { "" } else { " │ " };
                        [
                            Span::styled(sep, theme.muted_style()),
                            Span::styled(mini.text.clone(), style),
                        ]
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    };

    let mut block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(theme.border_style(selected));
    if selected {
        block = block.style(theme.selection_style());
    }
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn entry_lines<'a>(
    app: &AppState,
    markers: &Markers,
    entries: &[EntryLine],
    offset: usize,
    selected_line: &mut Option<usize>,
    lines: &mut Vec<Line<'a>>,
) {
    let theme = &app.theme;
    for (i, entry) in entries.iter().enumerate() {
        let is_selected = app.focus == Focus::Detail && offset + i == app.detail_selected;
        if is_selected {
            *selected_line = Some(lines.len());
        }
        let mut head = vec![Span::raw(if is_selected { markers.selected } else { "  " })];
        if entry.fresh {
            head.push(Span::styled(format!("{} ", markers.fresh), theme.fresh_style()));
        }
        let snippet_style = if entry.needs_review {
            theme.review_style()
        } else {
            Style::default().fg(theme.foreground)
        };
        head.push(Span::styled(entry.snippet.clone(), snippet_style));

        let mut line = Line::from(head);
        if is_selected {
            line = line.style(theme.selection_style());
        }
        lines.push(line);
        lines.push(Line::from(Span::styled(
            format!("    {} · {}", entry.segment_id, entry.meta),
            theme.muted_style(),
        )));
    }
}

fn draw_detail(f: &mut Frame, app: &AppState, markers: &Markers, area: Rect) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Detail;
    let Some(view) = render::detail_view(app.store.state()) else {
        ScrollableText::new(format!(" {} ", render::detail::NO_DATA_TITLE), theme)
            .content(vec![Line::from(render::detail::NO_DATA_HINT)])
            .focused(focused)
            .render(f, area);
        return;
    };

    let mut header = vec![Span::styled(view.persona.clone(), theme.muted_style())];
    if let Some(badge) = view.review_badge() {
        header.push(Span::raw("  "));
        header.push(Span::styled(badge, theme.review_style()));
    }
    let mut lines = vec![Line::from(header), Line::from("")];

    for point in &view.summary {
        lines.push(Line::from(format!("• {point}")));
    }
    if !view.summary.is_empty() {
        lines.push(Line::from(""));
    }

    let mut selected_line = None;
    lines.push(Line::from(bold("Entries", theme.title_style())));
    entry_lines(app, markers, &view.entries, 0, &mut selected_line, &mut lines);

    lines.push(Line::from(""));
    lines.push(Line::from(bold("Needs review", theme.review_style())));
    if view.needs_review.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", render::detail::NO_REVIEW_PLACEHOLDER),
            theme.muted_style(),
        )));
    } else {
        entry_lines(
            app,
            markers,
            &view.needs_review,
            view.entries.len(),
            &mut selected_line,
            &mut lines,
        );
    }

    if let Some(mandala) = &view.mandala {
        lines.push(Line::from(""));
        lines.push(Line::from(bold(mandala.center_title.clone(), theme.title_style())));
        if !mandala.center.is_empty() {
            lines.push(Line::from(mandala.center.clone()));
        }
        for item in &mandala.items {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", item.title), theme.label_style()),
                Span::styled(format!("  {}", item.detail), theme.muted_style()),
            ]));
        }
    }

    // Keep the highlighted entry in view
    let visible = usize::from(area.height.saturating_sub(2));
    let scroll = selected_line.map_or(0, |line| (line + 2).saturating_sub(visible));

    ScrollableText::new(format!(" #{} {} ", view.grid_id, view.title), theme)
        .content(lines)
        .scroll(scroll)
        .focused(focused)
        .render(f, area);
}

fn draw_search(f: &mut Frame, app: &AppState, markers: &Markers, area: Rect) {
    let theme = &app.theme;
    let results = render::results_view(app.store.state());
    let cursor = if app.search.editing { "█" } else { "" };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let input = Paragraph::new(Line::from(vec![
        Span::styled(format!("/{}{cursor}", app.search.keyword), theme.title_style()),
        Span::styled(format!("  {}", app.search.summary()), theme.muted_style()),
    ]))
    .block(
        Block::default()
            .title(format!(" Search [{}] ", results.count_label))
            .borders(Borders::ALL)
            .border_style(theme.border_style(app.search.editing)),
    );
    f.render_widget(input, chunks[0]);

    let visible = usize::from(chunks[1].height.saturating_sub(2)) / 2;
    let skip = (app.search.selected + 1).saturating_sub(visible.max(1));
    let items: Vec<ListItem> = results
        .items
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, item)| {
            let is_selected = app.focus == Focus::Search && i == app.search.selected;
            let prefix = if is_selected { markers.selected } else { "  " };
            let lines = vec![
                Line::from(vec![
                    Span::raw(prefix),
                    Span::styled(item.heading.clone(), theme.label_style()),
                ]),
                Line::from(format!("    {}", item.snippet)),
            ];
            let style = if is_selected {
                theme.selection_style()
            } else {
                Style::default()
            };
            ListItem::new(lines).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Results ")
            .borders(Borders::ALL)
            .border_style(theme.border_style(app.focus == Focus::Search)),
    );
    f.render_widget(list, chunks[1]);
}

fn draw_status_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let theme = &app.theme;
    let mode = if app.ingest.open {
        "INGEST"
    } else if app.search.editing {
        "SEARCH"
    } else if app.show_help {
        "HELP"
    } else {
        app.focus.label()
    };

    let mut left = vec![
        bold(" mandala ", theme.title_style()),
        Span::raw("│ "),
        Span::styled(mode, theme.label_style()),
        Span::raw(" │ "),
        Span::raw(app.store.get_stack_path()),
    ];
    if let Some(status) = &app.segment_status {
        left.push(Span::raw(" │ "));
        left.push(Span::styled(status.message.clone(), theme.status_style(status.kind)));
    }

    let source = app
        .grid_source
        .map_or_else(String::new, |source| source.to_string());
    let right = vec![
        Span::styled(source, theme.muted_style()),
        Span::raw(format!(" │ {} │ {} │ ? help ", app.store.state().view_mode, theme.name)),
    ];

    StatusBar::new(Style::default().fg(theme.foreground))
        .left(left)
        .right(right)
        .render(f, area);
}

fn draw_ingest(f: &mut Frame, app: &AppState) {
    let theme = &app.theme;
    let area = centered_rect(70, 70, f.area());
    let cursor = |field: IngestField| if app.ingest.field == field { "█" } else { "" };

    let mut lines = vec![Line::from(vec![
        Span::styled("Source: ", theme.label_style()),
        Span::raw(app.ingest.source.clone()),
        Span::raw(cursor(IngestField::Source)),
    ])];
    lines.push(Line::from(Span::styled("Transcript:", theme.label_style())));
    let mut text_lines: Vec<Line> = app.ingest.text.split('\n').map(|l| Line::from(l.to_string())).collect();
    if let Some(last) = text_lines.last_mut() {
        last.push_span(Span::raw(cursor(IngestField::Text)));
    }
    lines.extend(text_lines);
    lines.push(Line::from(""));

    if let Some(status) = &app.segment_status {
        lines.push(Line::from(Span::styled(
            status.message.clone(),
            theme.status_style(status.kind),
        )));
    }

    let rows = render::ingest_rows(&app.ingest.results);
    if !rows.is_empty() {
        lines.push(Line::from(bold(INGEST_HEADERS.join(" | "), theme.title_style())));
        for row in rows {
            lines.push(Line::from(row.cells().join(" | ")));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: newline  |  Tab: switch field  |  Ctrl+S: submit  |  Esc: close",
        theme.muted_style(),
    )));

    popup(f, area, " Ingest transcript ", lines, theme);
}

fn draw_log(f: &mut Frame, app: &AppState) {
    let Some(log) = &app.log else {
        return;
    };
    let theme = &app.theme;
    let area = centered_rect(50, 40, f.area());

    let mut lines = Vec::new();
    for line in &log.lines {
        lines.push(Line::from(vec![
            bold(line.action.clone(), theme.label_style()),
            Span::styled(format!("  {}", line.similarity), theme.muted_style()),
        ]));
        if !line.comment.is_empty() {
            lines.push(Line::from(format!("  {}", line.comment)));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Esc: close", theme.muted_style())));

    popup(f, area, format!(" Log {} ", log.segment_id), lines, theme);
}

fn draw_help(f: &mut Frame, app: &AppState) {
    let theme = &app.theme;
    let area = centered_rect(60, 70, f.area());
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<14}"), theme.label_style()),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(bold("Navigation", theme.title_style())),
        key("←↑↓→ / hjkl", "Move selection"),
        key("Enter", "Drill in / jump / open log"),
        key("Esc / Bksp", "Back"),
        key("v", "Toggle board / overview"),
        key("Tab", "Cycle focus"),
        Line::from(""),
        Line::from(bold("Search", theme.title_style())),
        key("/", "Edit keyword"),
        key("g", "Cycle grid filter"),
        key("s", "Cycle status filter"),
        Line::from(""),
        Line::from(bold("Other", theme.title_style())),
        key("i", "Ingest transcript"),
        key("r", "Reload grids"),
        key("T", "Cycle theme"),
        key("?", "Toggle help"),
        key("q / Ctrl+C", "Quit"),
    ];
    popup(f, area, " Help ", lines, theme);
}

fn draw_toasts(f: &mut Frame, app: &AppState) {
    let screen = f.area();
    let width = (screen.width / 3).max(20).min(screen.width);
    let mut y = screen.y + 1;

    for toast in &app.toasts {
        if y + 3 > screen.bottom() {
            break;
        }
        let area = Rect::new(screen.right().saturating_sub(width + 1), y, width, 3);
        let style = app.theme.status_style(toast.status.kind);
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(Span::styled(toast.status.message.clone(), style)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .style(Style::default().bg(app.theme.overlay)),
            ),
            area,
        );
        y += 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OfflineApi;
    use ratatui::backend::TestBackend;

    fn app() -> AppState {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let mut app = AppState::new(Box::new(OfflineApi), runtime, &Config::default(), Theme::default());
        app.load().unwrap();
        app
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_text(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|f| draw_ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_keys_drive_navigation() {
        let mut app = app();
        let bindings = KeyBindings::default();
        let now = Instant::now();

        handle_key(&mut app, &bindings, press(KeyCode::Char('k')), now).unwrap();
        handle_key(&mut app, &bindings, press(KeyCode::Enter), now).unwrap();
        assert_eq!(app.store.state().current_grid_id, 2);

        handle_key(&mut app, &bindings, press(KeyCode::Esc), now).unwrap();
        assert_eq!(app.store.state().current_grid_id, 5);

        handle_key(&mut app, &bindings, press(KeyCode::Char('q')), now).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_modal_input_is_captured() {
        let mut app = app();
        let bindings = KeyBindings::default();
        let now = Instant::now();

        handle_key(&mut app, &bindings, press(KeyCode::Char('i')), now).unwrap();
        handle_key(&mut app, &bindings, press(KeyCode::Char('q')), now).unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.ingest.text, "q");

        handle_key(&mut app, &bindings, press(KeyCode::Esc), now).unwrap();
        handle_key(&mut app, &bindings, press(KeyCode::Char('/')), now).unwrap();
        handle_key(&mut app, &bindings, press(KeyCode::Char('v')), now).unwrap();
        assert_eq!(app.search.keyword, "v");
        assert_eq!(app.store.state().view_mode, ViewMode::Single);
    }

    #[test]
    fn test_classifying_status_is_drawn_before_post() {
        let mut app = app();
        let bindings = KeyBindings::default();
        let now = Instant::now();

        handle_key(&mut app, &bindings, press(KeyCode::Char('i')), now).unwrap();
        for c in "hello".chars() {
            handle_key(&mut app, &bindings, press(KeyCode::Char(c)), now).unwrap();
        }
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        handle_key(&mut app, &bindings, ctrl_s, now).unwrap();

        assert!(app.submission_pending());
        assert!(screen_text(&app).contains("Classifying..."));

        app.run_pending_submission();
        assert!(!app.submission_pending());
        let text = screen_text(&app);
        assert!(!text.contains("Classifying..."));
        assert!(text.contains("Submission failed"));
    }

    #[test]
    fn test_draw_board_and_overview() {
        let mut app = app();
        let text = screen_text(&app);
        assert!(text.contains("mandala"));
        assert!(text.contains("#5"));

        app.toggle_view();
        let text = screen_text(&app);
        assert!(text.contains("Overview"));

        app.open_ingest();
        assert!(screen_text(&app).contains("Ingest transcript"));

        app.close_ingest();
        app.toggle_help();
        assert!(screen_text(&app).contains("Cycle status filter"));
    }
}
