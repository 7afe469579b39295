//! Application state for the TUI.
//!
//! [`App`] wraps the [`GridController`] with everything that sits around the
//! grid: overlays, the filter panel, the paint dropdown, preferences, and
//! the worker threads that run API calls.

use super::theme;
use super::viewmodel::{ColorPicker, FilterPanel, OverlayKind, OverlayState};
use crate::api::{Outcome, PricingApi, Request, execute};
use crate::config::{AppConfig, TuiPreferences};
use crate::grid::{GridContext, GridController};
use crate::model::ColorTag;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// The dashboard.
pub struct App {
    pub grid: GridController,
    pub(crate) overlays: OverlayState,
    pub(crate) filter_panel: FilterPanel,
    pub(crate) color_picker: ColorPicker,
    pub(crate) config: AppConfig,
    pub(crate) preferences: TuiPreferences,
    preferences_path: Option<PathBuf>,
    api: Arc<dyn PricingApi>,
    outcome_tx: Sender<Outcome>,
    outcome_rx: Receiver<Outcome>,
    in_flight: usize,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Animation tick counter
    pub tick: u64,
}

impl App {
    /// Build the app. Preferences are saved to the default location unless
    /// [`App::with_preferences_path`] says otherwise.
    pub fn new(
        grid: GridController,
        api: Arc<dyn PricingApi>,
        config: AppConfig,
        preferences: TuiPreferences,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Self {
            grid,
            overlays: OverlayState::new(),
            filter_panel: FilterPanel::new(),
            color_picker: ColorPicker::new(),
            config,
            preferences,
            preferences_path: TuiPreferences::config_path(),
            api,
            outcome_tx,
            outcome_rx,
            in_flight: 0,
            should_quit: false,
            tick: 0,
        }
    }

    /// Save preferences to `path` instead of the user config dir.
    #[must_use]
    pub fn with_preferences_path(mut self, path: Option<PathBuf>) -> Self {
        self.preferences_path = path;
        self
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.api.name()
    }

    #[must_use]
    pub const fn preferences(&self) -> &TuiPreferences {
        &self.preferences
    }

    /// Number of API calls still running.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    // ========================================================================
    // Worker plumbing
    // ========================================================================

    /// Hand every queued request to its own worker thread.
    pub fn dispatch(&mut self) {
        for request in self.grid.take_requests() {
            self.spawn_worker(request);
        }
    }

    fn spawn_worker(&mut self, request: Request) {
        let api = Arc::clone(&self.api);
        let tx = self.outcome_tx.clone();
        let spawned = thread::Builder::new()
            .name("pricedesk-api".to_string())
            .spawn(move || {
                let outcome = execute(api.as_ref(), request);
                // The receiver is gone once the app has quit.
                let _ = tx.send(outcome);
            });

        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(e) => {
                tracing::error!("failed to spawn API worker: {e}");
                self.grid.toast_mut().error("Could not start the request");
            }
        }
    }

    /// Apply every finished call, then dispatch whatever the grid queued in
    /// response.
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply(outcome);
        }
        self.dispatch();
    }

    fn apply(&mut self, outcome: Outcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.grid.apply_outcome(outcome);
    }

    /// Block until no call is in flight or `timeout` elapses. Returns true
    /// when everything settled.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.dispatch();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.outcome_rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.apply(outcome);
                    self.dispatch();
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    /// Called on every event-loop tick.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.drain_outcomes();
    }

    // ========================================================================
    // Focus
    // ========================================================================

    /// Focus facts the grid needs to decide whether a key is its own.
    #[must_use]
    pub const fn grid_context(&self) -> GridContext {
        GridContext {
            modal_open: self.overlays.has_overlay()
                || self.color_picker.is_open()
                || self.filter_panel.is_open(),
            text_input_focused: self.filter_panel.text_input_focused(),
        }
    }

    /// Close the filter panel and the paint dropdown.
    pub const fn close_panels(&mut self) {
        self.filter_panel.close();
        self.color_picker.close();
    }

    /// Escape outside an edit: close the panels and clear the active cell.
    pub const fn dismiss(&mut self) {
        self.close_panels();
        self.grid.clear_cursor();
    }

    pub fn toggle_overlay(&mut self, kind: OverlayKind) {
        self.overlays.toggle(kind);
    }

    pub const fn close_overlays(&mut self) {
        self.overlays.close();
    }

    // ========================================================================
    // Filter and paging
    // ========================================================================

    pub fn open_filter_panel(&mut self) {
        self.color_picker.close();
        self.filter_panel.open(self.grid.filter());
    }

    /// Apply the filter panel draft and reload.
    pub fn apply_filter_panel(&mut self) {
        let panel = self.filter_panel.clone();
        self.filter_panel.close();
        self.grid.update_filter(|filter| panel.apply_to(filter));
        tracing::info!(filter = %self.grid.filter(), "filter applied");
        self.dispatch();
    }

    pub fn next_page(&mut self) {
        let filter = self.grid.filter();
        let shown = u64::from(filter.page) * u64::from(filter.page_size);
        if shown >= self.grid.total() {
            self.grid.toast_mut().info("Already on the last page");
            return;
        }
        self.grid.update_filter(crate::model::FilterState::next_page);
        self.dispatch();
    }

    pub fn prev_page(&mut self) {
        if self.grid.filter().page <= 1 {
            self.grid.toast_mut().info("Already on the first page");
            return;
        }
        self.grid.update_filter(|filter| {
            filter.prev_page();
        });
        self.dispatch();
    }

    pub fn cycle_sort(&mut self) {
        self.grid.update_filter(crate::model::FilterState::cycle_sort);
        self.dispatch();
    }

    pub fn flip_sort(&mut self) {
        self.grid
            .update_filter(crate::model::FilterState::flip_sort_direction);
        self.dispatch();
    }

    // ========================================================================
    // Batch paint
    // ========================================================================

    /// Open the paint dropdown. Needs a non-empty selection.
    pub fn open_color_picker(&mut self) {
        if self.grid.selection().is_empty() {
            self.grid
                .toast_mut()
                .warning("Select products with x first");
            return;
        }
        self.filter_panel.close();
        self.color_picker.open();
    }

    pub fn paint_selection(&mut self, color: ColorTag) {
        self.color_picker.close();
        self.grid.paint_selection(color);
        self.dispatch();
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    pub fn toggle_theme(&mut self) {
        let name = theme::toggle_theme();
        self.preferences.theme = name.to_string();
        self.save_preferences();
        self.grid.toast_mut().info(format!("Theme: {name}"));
    }

    pub fn toggle_auto_recalculate(&mut self) {
        let enabled = !self.preferences.auto_recalculate_installments;
        self.preferences.auto_recalculate_installments = enabled;
        self.grid.set_auto_recalculate(enabled);
        self.save_preferences();
        self.grid.toast_mut().info(if enabled {
            "Installments are recalculated after price changes"
        } else {
            "Installments are kept after price changes"
        });
    }

    fn save_preferences(&self) {
        let Some(ref path) = self.preferences_path else {
            return;
        };
        if let Err(e) = self.preferences.save_to(path) {
            tracing::warn!("failed to save preferences to {}: {e}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryPricingApi;
    use crate::grid::{ClipboardSink, GridSettings, PageVariant};
    use crate::model::Product;
    use tempfile::TempDir;

    struct NoClipboard;

    impl ClipboardSink for NoClipboard {
        fn write_text(&mut self, _text: &str) -> bool {
            false
        }
    }

    fn app(products: Vec<Product>) -> App {
        let grid = GridController::new(
            PageVariant::Catalog,
            GridSettings::default(),
            Box::new(NoClipboard),
        );
        App::new(
            grid,
            Arc::new(MemoryPricingApi::new(products)),
            AppConfig::default(),
            TuiPreferences::default(),
        )
        .with_preferences_path(None)
    }

    #[test]
    fn test_reload_through_workers() {
        let mut app = app(vec![Product::new(1, "A1"), Product::new(2, "B2")]);
        app.grid.reload();
        assert!(app.wait_idle(Duration::from_secs(5)));
        assert_eq!(app.grid.products().len(), 2);
        assert!(app.grid.stats().is_some());
        assert_eq!(app.in_flight(), 0);
    }

    #[test]
    fn test_color_picker_needs_selection() {
        let mut app = app(vec![Product::new(1, "A1")]);
        app.open_color_picker();
        assert!(!app.color_picker.is_open());
        assert!(app.grid.toast().peek().is_some());
    }

    #[test]
    fn test_auto_recalculate_is_persisted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("preferences.json");
        let mut app = app(Vec::new()).with_preferences_path(Some(path.clone()));

        app.toggle_auto_recalculate();
        assert!(!app.grid.settings().auto_recalculate_installments);
        assert!(!TuiPreferences::load_from(&path).auto_recalculate_installments);
    }

    #[test]
    fn test_grid_context_tracks_panels() {
        let mut app = app(Vec::new());
        assert_eq!(app.grid_context(), GridContext::default());

        app.open_filter_panel();
        assert!(app.grid_context().text_input_focused);
        app.filter_panel.cycle_focus(false);
        app.filter_panel.cycle_focus(false);
        assert!(!app.grid_context().text_input_focused);
        assert!(app.grid_context().modal_open);

        app.close_panels();
        app.toggle_overlay(OverlayKind::Help);
        assert!(app.grid_context().modal_open);
    }
}
