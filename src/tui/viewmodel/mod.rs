//! State for the panels and overlays that sit on top of the grid.
//!
//! - [`OverlayState`] - modal overlays (help, product info, config)
//! - [`FilterPanel`] - the filter draft edited in the side panel
//! - [`ColorPicker`] - the batch paint dropdown

mod color_picker;
mod filter_panel;
mod overlay;

pub use color_picker::ColorPicker;
pub use filter_panel::{FilterField, FilterPanel};
pub use overlay::{OverlayKind, OverlayState};
