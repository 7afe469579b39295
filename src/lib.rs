//! **A keyboard-driven pricing dashboard for the terminal.**
//!
//! `pricedesk` shows a retailer's product catalog as a spreadsheet-style grid
//! and lets operators change prices, installment values, rebate and
//! web-transfer participation, and row color tags without leaving the
//! keyboard. Every change goes to the pricing API; the grid only replaces a
//! row once the backend has accepted the change.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: Products, price ladders, color tags, and the catalog
//!   [`FilterState`].
//! - **[`api`]**: The [`PricingApi`] trait with an HTTP client and an
//!   in-memory backend for demos and tests.
//! - **[`grid`]**: The [`GridController`], a terminal-independent state
//!   machine for the active cell, inline edits, and multi-row selection.
//! - **[`tui`]**: The ratatui front end.
//! - **[`config`]**: `.pricedesk.yaml` loading, validation and preferences.
//!
//! ## Driving the grid without a terminal
//!
//! The controller never calls the backend itself. It queues requests that
//! the caller runs and feeds back:
//!
//! ```no_run
//! use pricedesk::api::{MemoryPricingApi, execute};
//! use pricedesk::grid::{ClipboardSink, GridController, GridSettings, PageVariant};
//!
//! struct NoClipboard;
//! impl ClipboardSink for NoClipboard {
//!     fn write_text(&mut self, _text: &str) -> bool {
//!         false
//!     }
//! }
//!
//! let api = MemoryPricingApi::demo();
//! let mut grid = GridController::new(
//!     PageVariant::Catalog,
//!     GridSettings::default(),
//!     Box::new(NoClipboard),
//! );
//! grid.reload();
//! for request in grid.take_requests() {
//!     grid.apply_outcome(execute(&api, request));
//! }
//! println!("{} products loaded", grid.products().len());
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Layout math casts between usize, u16 and u64 on bounded values
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // TUI render functions are inherently long
    clippy::too_many_lines,
    // Permission and filter structs are sets of flags
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::similar_names
)]

pub mod api;
pub mod config;
pub mod error;
pub mod grid;
pub mod model;
pub mod tui;

// Re-export main types for convenience
pub use api::{HttpPricingApi, MemoryPricingApi, PricingApi};
pub use config::{AppConfig, AppConfigBuilder, TuiConfig, TuiPreferences};
pub use config::{ConfigError, Validatable};
pub use error::{ErrorContext, PriceDeskError, Result};
pub use grid::{GridController, GridSettings, PageVariant, ViewMode};
pub use model::{ColorTag, FilterState, Permissions, Product, ProductId};
