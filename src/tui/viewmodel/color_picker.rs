//! Color dropdown used for batch painting the selection.

use crate::model::ColorTag;

/// Dropdown listing the palette.
#[derive(Debug, Clone, Default)]
pub struct ColorPicker {
    open: bool,
    highlighted: usize,
}

impl ColorPicker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            open: false,
            highlighted: 0,
        }
    }

    pub const fn open(&mut self) {
        self.open = true;
        self.highlighted = 0;
    }

    pub const fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn highlighted(&self) -> ColorTag {
        ColorTag::PALETTE[self.highlighted]
    }

    pub const fn select_next(&mut self) {
        if self.highlighted + 1 < ColorTag::PALETTE.len() {
            self.highlighted += 1;
        }
    }

    pub const fn select_prev(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    /// Close the dropdown and return the chosen entry.
    pub const fn pick(&mut self) -> ColorTag {
        self.open = false;
        self.highlighted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_clamps() {
        let mut picker = ColorPicker::new();
        picker.open();
        picker.select_prev();
        assert_eq!(picker.highlighted(), ColorTag::None);

        for _ in 0..20 {
            picker.select_next();
        }
        assert_eq!(picker.highlighted(), ColorTag::Gray);
    }

    #[test]
    fn test_pick_closes() {
        let mut picker = ColorPicker::new();
        picker.open();
        picker.select_next();
        assert_eq!(picker.pick(), ColorTag::Red);
        assert!(!picker.is_open());
    }
}
