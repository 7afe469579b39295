//! Focus trap for the inline edit controls.

/// A control inside an open edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focusable {
    /// The numeric input
    Value,
    /// The "keep stored percentage" checkbox (web transfer only)
    Preserve,
    Save,
    Cancel,
}

impl Focusable {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Value => "Value",
            Self::Preserve => "Keep %",
            Self::Save => "Save",
            Self::Cancel => "Cancel",
        }
    }
}

/// Next focus index among `len` controls, wrapping at both ends.
#[must_use]
pub const fn cycle(current: usize, len: usize, backwards: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if backwards {
        if current == 0 { len - 1 } else { current - 1 }
    } else {
        (current + 1) % len
    }
}
