//! Terminal dashboard built on ratatui.
//!
//! The grid itself lives in [`crate::grid`] and knows nothing about the
//! terminal. This module adds everything around it: the [`App`] that owns
//! the grid and the API worker threads, key routing through the panels and
//! overlays, the theme, and rendering.
//!
//! # Architecture
//!
//! ```text
//! crossterm event ─► events::handle_key_event ─► App / GridController
//!                                                    │ queued requests
//!                                                    ▼
//!                     worker thread ─► PricingApi ─► Outcome ─► App::drain_outcomes
//! ```

mod app;
pub(crate) mod clipboard;
pub(crate) mod constants;
mod events;
pub mod theme;
pub mod traits;
mod ui;
pub mod viewmodel;

pub use theme::{ColorScheme, Styles, Theme, colors, current_theme_name, set_theme, toggle_theme};

pub use traits::{EventResult, Shortcut, ShortcutGroup, footer_shortcuts, shortcut_groups};

pub use viewmodel::{ColorPicker, FilterField, FilterPanel, OverlayKind, OverlayState};

pub use app::App;
pub use clipboard::SystemClipboard;
pub use events::{Event, EventHandler, handle_key_event};
pub use ui::run_tui;
