//! Keeps the active row inside the visible window.

/// Visible slice of the table body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// First visible row
    pub offset: usize,
    /// Number of visible rows; zero until the first draw
    pub height: usize,
}

impl Viewport {
    /// Scroll the minimum amount needed to show `row`, aligning to the
    /// nearest edge.
    pub const fn follow(&mut self, row: usize) {
        if self.height == 0 {
            self.offset = row;
            return;
        }
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + self.height {
            self.offset = row + 1 - self.height;
        }
    }

    /// Record a new height after a resize, keeping `row` visible.
    pub const fn resize(&mut self, height: usize, row: Option<usize>) {
        self.height = height;
        if let Some(row) = row {
            self.follow(row);
        }
    }

    /// Pull the window back when the list shrinks below it.
    pub fn clamp(&mut self, rows: usize) {
        let max_offset = rows.saturating_sub(self.height.max(1));
        self.offset = self.offset.min(max_offset);
    }

    /// Whether `row` is inside the window.
    #[must_use]
    pub const fn contains(&self, row: usize) -> bool {
        row >= self.offset && row < self.offset + self.height
    }
}
