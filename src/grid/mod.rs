//! Spreadsheet-style keyboard grid over the product list.
//!
//! [`GridController`] owns the active cell, the edit session, the selection
//! and the toast. It never talks to the backend: every change it wants is
//! queued as a [`Request`](crate::api::Request), and finished calls are fed
//! back through [`GridController::apply_outcome`].
//!
//! ```ignore
//! let mut grid = GridController::new(PageVariant::Catalog, settings, clipboard);
//! grid.reload();
//! for request in grid.take_requests() {
//!     grid.apply_outcome(execute(&api, request));
//! }
//! grid.handle_key(key, GridContext::default());
//! ```

mod columns;
mod controller;
mod cursor;
mod edit;
mod focus;
mod input;
mod keys;
mod scroll;
mod selection;
mod toast;

pub use columns::{ColumnKind, ColumnSet, EditField, PageVariant, ViewMode};
pub use controller::{GridController, GridSettings, GridState};
pub use cursor::{ActiveCell, Direction, PAGE_SIZE};
pub use edit::{Commit, EditSession, PricingDefaults};
pub use focus::{Focusable, cycle as cycle_focus};
pub use input::{format_decimal, parse_decimal, parse_price};
pub use keys::{ClipboardTarget, GridKey, MoveMode, clipboard_shortcut, grid_key};
pub use scroll::Viewport;
pub use selection::SelectionSet;
pub use toast::{TOAST_DURATION, Toast, ToastLevel};

/// How a key event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The grid handled the key
    Consumed,
    /// Not a grid key; let the caller handle it
    Ignored,
    /// Escape outside an edit: the caller should close panels too
    Dismissed,
}

/// Focus facts owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridContext {
    /// A config, info or help modal is open
    pub modal_open: bool,
    /// Keyboard focus is in a text input outside the grid
    pub text_input_focused: bool,
}

/// Write-only clipboard.
pub trait ClipboardSink {
    /// Returns `false` when the text could not be copied.
    fn write_text(&mut self, text: &str) -> bool;
}
