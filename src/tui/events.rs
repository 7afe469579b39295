//! Event polling and key routing for the TUI.
//!
//! Keys travel through the layers from top to bottom and stop at the first
//! one that claims them:
//!
//! 1. the filter panel
//! 2. modal overlays (help, product info, config)
//! 3. the paint dropdown
//! 4. the grid, with an open edit session taking every key
//! 5. global shortcuts
//!
//! The grid sees every key first in layers 1-3 as well, so the clipboard
//! shortcuts work with a panel or modal open.

use super::App;
use super::viewmodel::OverlayKind;
use crate::grid::{EventResult, GridState};
use crate::model::ColorTag;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use std::time::Duration;

/// Application event
#[derive(Debug)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal tick; worker results are applied here
    Tick,
    /// Resize event
    Resize(u16, u16),
}

/// Event handler
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub const fn new(tick_rate: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event, std::io::Error> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) => Ok(Event::Key(key)),
                CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(super::constants::TICK_RATE_MS)
    }
}

/// Handle key events and update app state
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.filter_panel.is_open() {
        handle_filter_panel_key(app, key);
    } else if app.overlays.has_overlay() {
        handle_overlay_key(app, key);
    } else if app.color_picker.is_open() {
        handle_color_picker_key(app, key);
    } else {
        handle_grid_key(app, key);
    }
    app.dispatch();
}

fn handle_filter_panel_key(app: &mut App, key: KeyEvent) {
    let ctx = app.grid_context();
    if app.grid.handle_key(key, ctx) == EventResult::Consumed {
        return;
    }

    let text_input = app.filter_panel.text_input_focused();
    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => app.dismiss(),
        KeyCode::Enter => app.apply_filter_panel(),
        KeyCode::Tab => app.filter_panel.cycle_focus(false),
        KeyCode::BackTab => app.filter_panel.cycle_focus(true),
        KeyCode::Backspace => app.filter_panel.backspace(),
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right if !text_input => {
            app.filter_panel.cycle_value();
        }
        KeyCode::Char(c) if text_input && plain => app.filter_panel.push_char(c),
        _ => {}
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) {
    let ctx = app.grid_context();
    if app.grid.handle_key(key, ctx) == EventResult::Consumed {
        return;
    }

    let current = app.overlays.current();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_overlays(),
        KeyCode::Char('?') => app.toggle_overlay(OverlayKind::Help),
        KeyCode::Char('i') => app.toggle_overlay(OverlayKind::Info),
        KeyCode::Char('c') => app.toggle_overlay(OverlayKind::Config),
        KeyCode::Char('a') if current == Some(OverlayKind::Config) => {
            app.toggle_auto_recalculate();
        }
        KeyCode::Char('t') if current == Some(OverlayKind::Config) => app.toggle_theme(),
        _ => {}
    }
}

fn handle_color_picker_key(app: &mut App, key: KeyEvent) {
    let ctx = app.grid_context();
    if app.grid.handle_key(key, ctx) == EventResult::Consumed {
        return;
    }

    match key.code {
        KeyCode::Esc => app.dismiss(),
        KeyCode::Up | KeyCode::Char('k') => app.color_picker.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.color_picker.select_next(),
        KeyCode::Enter => {
            let color = app.color_picker.pick();
            app.paint_selection(color);
        }
        KeyCode::Char(c) => {
            if let Some(color) = ColorTag::from_digit(c) {
                app.paint_selection(color);
            }
        }
        _ => {}
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    let editing = app.grid.state() == GridState::Editing;
    let ctx = app.grid_context();
    match app.grid.handle_key(key, ctx) {
        EventResult::Consumed => return,
        EventResult::Dismissed => {
            app.close_panels();
            return;
        }
        EventResult::Ignored if editing => return,
        EventResult::Ignored => {}
    }

    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.toggle_overlay(OverlayKind::Help),
        KeyCode::Char('i') => app.toggle_overlay(OverlayKind::Info),
        KeyCode::Char('c') => app.toggle_overlay(OverlayKind::Config),
        KeyCode::Char('/') => app.open_filter_panel(),
        KeyCode::Char('p') => app.open_color_picker(),
        KeyCode::Char(']') => app.next_page(),
        KeyCode::Char('[') => app.prev_page(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('S') => app.flip_sort(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('a') => app.toggle_auto_recalculate(),
        _ => {}
    }
}
