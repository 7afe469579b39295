//! Modal overlay state.

/// Available modal overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// Keyboard shortcuts
    Help,
    /// Details of the active product
    Info,
    /// Settings and preferences
    Config,
}

impl OverlayKind {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Help => " Shortcuts ",
            Self::Info => " Product ",
            Self::Config => " Settings ",
        }
    }
}

/// Manages overlay visibility with mutual exclusion.
///
/// Only one overlay can be visible at a time; showing a new overlay closes
/// the previous one.
///
/// # Example
///
/// ```ignore
/// let mut overlay = OverlayState::new();
///
/// overlay.toggle(OverlayKind::Help);
/// assert!(overlay.is_showing(OverlayKind::Help));
///
/// overlay.toggle(OverlayKind::Info);
/// assert!(!overlay.is_showing(OverlayKind::Help));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    current: Option<OverlayKind>,
}

impl OverlayState {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Check if any overlay is currently visible.
    #[must_use]
    pub const fn has_overlay(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn is_showing(&self, kind: OverlayKind) -> bool {
        self.current == Some(kind)
    }

    #[must_use]
    pub const fn current(&self) -> Option<OverlayKind> {
        self.current
    }

    pub const fn show(&mut self, kind: OverlayKind) {
        self.current = Some(kind);
    }

    pub const fn close(&mut self) {
        self.current = None;
    }

    /// Toggle a specific overlay.
    ///
    /// If the overlay is showing, close it. Otherwise, show it.
    pub fn toggle(&mut self, kind: OverlayKind) {
        if self.current == Some(kind) {
            self.current = None;
        } else {
            self.current = Some(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_state_new() {
        let state = OverlayState::new();
        assert!(!state.has_overlay());
        assert!(state.current().is_none());
    }

    #[test]
    fn test_overlay_state_mutual_exclusion() {
        let mut state = OverlayState::new();

        state.show(OverlayKind::Help);
        assert!(state.is_showing(OverlayKind::Help));

        state.show(OverlayKind::Config);
        assert!(state.is_showing(OverlayKind::Config));
        assert!(!state.is_showing(OverlayKind::Help));
    }

    #[test]
    fn test_overlay_state_toggle() {
        let mut state = OverlayState::new();

        state.toggle(OverlayKind::Info);
        assert!(state.is_showing(OverlayKind::Info));

        state.toggle(OverlayKind::Info);
        assert!(!state.has_overlay());
    }
}
