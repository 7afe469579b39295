//! The active cell and its clamped movement.

/// Rows jumped by Page Up / Page Down.
pub const PAGE_SIZE: usize = 10;

/// Row and column of the focused cell.
///
/// `col` indexes the current view's editable columns, not the rendered
/// table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveCell {
    pub row: usize,
    pub col: usize,
}

/// A single cursor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

impl ActiveCell {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Clamp into a `rows` x `cols` grid. Returns `None` for an empty grid.
    #[must_use]
    pub fn clamped(self, rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(Self {
            row: self.row.min(rows - 1),
            col: self.col.min(cols - 1),
        })
    }

    /// One step in `dir`, stopping at the edges.
    #[must_use]
    pub fn step(self, dir: Direction, rows: usize, cols: usize) -> Self {
        let mut next = self;
        match dir {
            Direction::Up => next.row = self.row.saturating_sub(1),
            Direction::Down => next.row = (self.row + 1).min(rows.saturating_sub(1)),
            Direction::Left => next.col = self.col.saturating_sub(1),
            Direction::Right => next.col = (self.col + 1).min(cols.saturating_sub(1)),
        }
        next
    }

    #[must_use]
    pub const fn page_up(self) -> Self {
        Self {
            row: self.row.saturating_sub(PAGE_SIZE),
            col: self.col,
        }
    }

    #[must_use]
    pub fn page_down(self, rows: usize) -> Self {
        Self {
            row: (self.row + PAGE_SIZE).min(rows.saturating_sub(1)),
            col: self.col,
        }
    }

    /// First column of the current row.
    #[must_use]
    pub const fn row_start(self) -> Self {
        Self {
            row: self.row,
            col: 0,
        }
    }

    /// Last column of the current row.
    #[must_use]
    pub const fn row_end(self, cols: usize) -> Self {
        Self {
            row: self.row,
            col: cols.saturating_sub(1),
        }
    }
}
