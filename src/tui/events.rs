//! TUI event handling.
//!
//! Terminal input is read on a dedicated thread and forwarded over a
//! channel together with a periodic tick. The tick drives time-based state
//! (fresh markers, toasts) on the UI thread, so every mutation stays
//! sequential.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Application events.
#[derive(Debug, Clone)]
pub enum Event {
    /// Periodic tick.
    Tick,
    /// Key press event.
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
}

/// Event handler using channels.
pub struct EventHandler {
    /// Event receiver.
    rx: mpsc::Receiver<Event>,
    /// Sender (kept so the channel outlives the reader thread).
    _tx: mpsc::Sender<Event>,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();

        thread::spawn(move || loop {
            if event::poll(tick_rate).unwrap_or(false) {
                let forwarded = match event::read() {
                    // Windows reports releases too
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        event_tx.send(Event::Key(key))
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => event_tx.send(Event::Resize(w, h)),
                    _ => Ok(()),
                };
                if forwarded.is_err() {
                    break;
                }
            }

            if event_tx.send(Event::Tick).is_err() {
                break;
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

/// Key binding configuration for the board.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Quit keys.
    pub quit: Vec<KeyEvent>,
    /// Selection up.
    pub up: Vec<KeyEvent>,
    /// Selection down.
    pub down: Vec<KeyEvent>,
    /// Selection left.
    pub left: Vec<KeyEvent>,
    /// Selection right.
    pub right: Vec<KeyEvent>,
    /// Drill in, jump or open log.
    pub select: Vec<KeyEvent>,
    /// Back navigation.
    pub back: Vec<KeyEvent>,
    /// Toggle single/overview.
    pub toggle_view: Vec<KeyEvent>,
    /// Edit the search keyword.
    pub search: Vec<KeyEvent>,
    /// Cycle the grid filter.
    pub grid_filter: Vec<KeyEvent>,
    /// Cycle the status filter.
    pub status_filter: Vec<KeyEvent>,
    /// Open the ingest editor.
    pub ingest: Vec<KeyEvent>,
    /// Reload grids.
    pub reload: Vec<KeyEvent>,
    /// Cycle panel focus.
    pub focus: Vec<KeyEvent>,
    /// Cycle theme.
    pub theme: Vec<KeyEvent>,
    /// Toggle help.
    pub help: Vec<KeyEvent>,
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: vec![
                key(KeyCode::Char('q')),
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            ],
            up: vec![key(KeyCode::Up), key(KeyCode::Char('k'))],
            down: vec![key(KeyCode::Down), key(KeyCode::Char('j'))],
            left: vec![key(KeyCode::Left), key(KeyCode::Char('h'))],
            right: vec![key(KeyCode::Right), key(KeyCode::Char('l'))],
            select: vec![key(KeyCode::Enter)],
            back: vec![key(KeyCode::Backspace), key(KeyCode::Esc)],
            toggle_view: vec![key(KeyCode::Char('v'))],
            search: vec![key(KeyCode::Char('/'))],
            grid_filter: vec![key(KeyCode::Char('g'))],
            status_filter: vec![key(KeyCode::Char('s'))],
            ingest: vec![key(KeyCode::Char('i'))],
            reload: vec![key(KeyCode::Char('r'))],
            focus: vec![key(KeyCode::Tab)],
            theme: vec![KeyEvent::new(KeyCode::Char('T'), KeyModifiers::SHIFT)],
            help: vec![key(KeyCode::Char('?')), KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT)],
        }
    }
}

fn matches(bindings: &[KeyEvent], key: &KeyEvent) -> bool {
    bindings
        .iter()
        .any(|k| k.code == key.code && k.modifiers == key.modifiers)
}

impl KeyBindings {
    /// Check if a key matches quit binding.
    pub fn is_quit(&self, key: &KeyEvent) -> bool {
        matches(&self.quit, key)
    }

    /// Check if a key matches up binding.
    pub fn is_up(&self, key: &KeyEvent) -> bool {
        matches(&self.up, key)
    }

    /// Check if a key matches down binding.
    pub fn is_down(&self, key: &KeyEvent) -> bool {
        matches(&self.down, key)
    }

    /// Check if a key matches left binding.
    pub fn is_left(&self, key: &KeyEvent) -> bool {
        matches(&self.left, key)
    }

    /// Check if a key matches right binding.
    pub fn is_right(&self, key: &KeyEvent) -> bool {
        matches(&self.right, key)
    }

    /// Check if a key matches select binding.
    pub fn is_select(&self, key: &KeyEvent) -> bool {
        matches(&self.select, key)
    }

    /// Check if a key matches back binding.
    pub fn is_back(&self, key: &KeyEvent) -> bool {
        matches(&self.back, key)
    }

    /// Check if a key toggles the view mode.
    pub fn is_toggle_view(&self, key: &KeyEvent) -> bool {
        matches(&self.toggle_view, key)
    }

    /// Check if a key starts search input.
    pub fn is_search(&self, key: &KeyEvent) -> bool {
        matches(&self.search, key)
    }

    /// Check if a key cycles the grid filter.
    pub fn is_grid_filter(&self, key: &KeyEvent) -> bool {
        matches(&self.grid_filter, key)
    }

    /// Check if a key cycles the status filter.
    pub fn is_status_filter(&self, key: &KeyEvent) -> bool {
        matches(&self.status_filter, key)
    }

    /// Check if a key opens the ingest editor.
    pub fn is_ingest(&self, key: &KeyEvent) -> bool {
        matches(&self.ingest, key)
    }

    /// Check if a key reloads grids.
    pub fn is_reload(&self, key: &KeyEvent) -> bool {
        matches(&self.reload, key)
    }

    /// Check if a key cycles focus.
    pub fn is_focus(&self, key: &KeyEvent) -> bool {
        matches(&self.focus, key)
    }

    /// Check if a key cycles the theme.
    pub fn is_theme(&self, key: &KeyEvent) -> bool {
        matches(&self.theme, key)
    }

    /// Check if a key toggles help.
    pub fn is_help(&self, key: &KeyEvent) -> bool {
        matches(&self.help, key)
    }
}
