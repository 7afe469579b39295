//! Shared TUI types.

pub use crate::grid::EventResult;

/// Keyboard shortcut for display in help and footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    /// Key sequence (e.g., "j/k", "Tab", "Enter")
    pub key: String,
    /// Brief description (e.g., "Navigate", "Edit cell")
    pub description: String,
    /// Whether this is a primary shortcut (shown in footer)
    pub primary: bool,
}

impl Shortcut {
    /// Create a new shortcut
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            primary: false,
        }
    }

    /// Create a primary shortcut (shown in footer)
    pub fn primary(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            primary: true,
        }
    }
}

/// A titled group of shortcuts in the help overlay.
#[derive(Debug, Clone)]
pub struct ShortcutGroup {
    pub title: &'static str,
    pub shortcuts: Vec<Shortcut>,
}

/// Every shortcut the dashboard understands, grouped for the help overlay.
#[must_use]
pub fn shortcut_groups() -> Vec<ShortcutGroup> {
    vec![
        ShortcutGroup {
            title: "Grid",
            shortcuts: vec![
                Shortcut::primary("Enter", "activate / edit"),
                Shortcut::primary("←↑↓→", "move"),
                Shortcut::new("Home/End", "first / last column"),
                Shortcut::new("PgUp/PgDn", "move 10 rows"),
                Shortcut::new("Ctrl+←↑↓→", "move, keep selection"),
                Shortcut::new("Shift+↑↓", "extend selection"),
                Shortcut::new("Esc", "leave the grid"),
                Shortcut::primary("v", "view: normal / installments / PVP"),
            ],
        },
        ShortcutGroup {
            title: "Product",
            shortcuts: vec![
                Shortcut::new("0-7", "paint row"),
                Shortcut::primary("r", "rebate"),
                Shortcut::primary("w", "web transfer"),
                Shortcut::new("o", "out of cards"),
                Shortcut::new("Ctrl+F1 / Ctrl+Shift+1", "copy code"),
                Shortcut::new("Ctrl+F2 / Ctrl+Shift+2", "copy listing link"),
                Shortcut::new("Ctrl+F3 / Ctrl+Shift+3", "copy search link"),
            ],
        },
        ShortcutGroup {
            title: "Selection",
            shortcuts: vec![
                Shortcut::new("x / X", "mark row / mark range"),
                Shortcut::new("Ctrl+A", "mark all / none"),
                Shortcut::new("Ctrl+X", "clear selection"),
                Shortcut::primary("p", "paint selection"),
            ],
        },
        ShortcutGroup {
            title: "Editing",
            shortcuts: vec![
                Shortcut::new("Tab / Shift+Tab", "next / previous control"),
                Shortcut::new("Enter", "save"),
                Shortcut::new("Space", "press control"),
                Shortcut::new("Esc", "discard"),
            ],
        },
        ShortcutGroup {
            title: "General",
            shortcuts: vec![
                Shortcut::primary("/", "filters"),
                Shortcut::new("[ / ]", "previous / next page"),
                Shortcut::new("s / S", "sort column / direction"),
                Shortcut::new("i", "product details"),
                Shortcut::new("c", "settings"),
                Shortcut::new("a", "auto-recalculate installments"),
                Shortcut::new("t", "theme"),
                Shortcut::primary("?", "help"),
                Shortcut::primary("q", "quit"),
            ],
        },
    ]
}

/// Shortcuts shown in the footer.
#[must_use]
pub fn footer_shortcuts() -> Vec<Shortcut> {
    shortcut_groups()
        .into_iter()
        .flat_map(|g| g.shortcuts)
        .filter(|s| s.primary)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_only_lists_primary() {
        let footer = footer_shortcuts();
        assert!(!footer.is_empty());
        assert!(footer.iter().all(|s| s.primary));
        assert!(footer.iter().any(|s| s.key == "q"));
    }
}
