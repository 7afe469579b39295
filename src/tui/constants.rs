//! Named constants for TUI layout and event polling.

/// Event poll interval in milliseconds. Worker results are drained on
/// every tick.
pub(crate) const TICK_RATE_MS: u64 = 100;

/// Smallest terminal the dashboard renders in.
pub(crate) const MIN_WIDTH: u16 = 80;
pub(crate) const MIN_HEIGHT: u16 = 20;

/// Width of the description column in the grid.
pub(crate) const DESCRIPTION_WIDTH: u16 = 28;

/// Width of each price column.
pub(crate) const PRICE_WIDTH: u16 = 14;

/// Rows taken by the table border and header.
pub(crate) const TABLE_CHROME_ROWS: u16 = 3;
