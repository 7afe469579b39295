//! Filter panel: a draft of the catalog filter edited field by field.
//!
//! The panel works on a copy of the filter and only hands it back on apply,
//! so closing it with Escape leaves the loaded list untouched.

use crate::model::{ColorTag, FilterState};

/// Fields of the filter panel, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    Brands,
    Stock,
    Rebate,
    OutOfCards,
    Color,
}

impl FilterField {
    pub const ALL: [Self; 6] = [
        Self::Search,
        Self::Brands,
        Self::Stock,
        Self::Rebate,
        Self::OutOfCards,
        Self::Color,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Brands => "Brands",
            Self::Stock => "Stock",
            Self::Rebate => "Rebate",
            Self::OutOfCards => "Out of cards",
            Self::Color => "Color",
        }
    }

    /// Text fields take typed characters.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::Search | Self::Brands)
    }
}

/// State of the filter panel.
#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    open: bool,
    focus: usize,
    search: String,
    brands: String,
    with_stock: Option<bool>,
    rebate: Option<bool>,
    out_of_cards: Option<bool>,
    color: Option<ColorTag>,
}

impl FilterPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the panel seeded from the current filter, search box focused.
    pub fn open(&mut self, filter: &FilterState) {
        self.open = true;
        self.focus = 0;
        self.search = filter.search.clone().unwrap_or_default();
        self.brands = filter.brands.join(", ");
        self.with_stock = filter.with_stock;
        self.rebate = filter.rebate;
        self.out_of_cards = filter.out_of_cards;
        self.color = filter.color;
    }

    pub const fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn focused(&self) -> FilterField {
        FilterField::ALL[self.focus]
    }

    /// Whether keystrokes currently go to a text box.
    #[must_use]
    pub const fn text_input_focused(&self) -> bool {
        self.open && self.focused().is_text()
    }

    pub fn cycle_focus(&mut self, backwards: bool) {
        self.focus = crate::grid::cycle_focus(self.focus, FilterField::ALL.len(), backwards);
    }

    pub fn push_char(&mut self, c: char) {
        match self.focused() {
            FilterField::Search => self.search.push(c),
            FilterField::Brands => self.brands.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focused() {
            FilterField::Search => {
                self.search.pop();
            }
            FilterField::Brands => {
                self.brands.pop();
            }
            _ => {}
        }
    }

    /// Step the focused choice field to its next value.
    pub fn cycle_value(&mut self) {
        match self.focused() {
            FilterField::Stock => self.with_stock = next_tristate(self.with_stock),
            FilterField::Rebate => self.rebate = next_tristate(self.rebate),
            FilterField::OutOfCards => self.out_of_cards = next_tristate(self.out_of_cards),
            FilterField::Color => {
                self.color = match self.color {
                    None => Some(ColorTag::PALETTE[0]),
                    Some(current) => ColorTag::PALETTE
                        .iter()
                        .position(|c| *c == current)
                        .and_then(|idx| ColorTag::PALETTE.get(idx + 1).copied()),
                };
            }
            FilterField::Search | FilterField::Brands => {}
        }
    }

    /// Display text for a field's current value.
    #[must_use]
    pub fn value_text(&self, field: FilterField) -> String {
        match field {
            FilterField::Search => self.search.clone(),
            FilterField::Brands => self.brands.clone(),
            FilterField::Stock => tristate_text(self.with_stock, "in stock", "out of stock"),
            FilterField::Rebate => tristate_text(self.rebate, "yes", "no"),
            FilterField::OutOfCards => tristate_text(self.out_of_cards, "yes", "no"),
            FilterField::Color => self
                .color
                .map_or_else(|| "any".to_string(), |c| c.label().to_string()),
        }
    }

    /// Write the draft into `filter`, resetting to the first page.
    pub fn apply_to(&self, filter: &mut FilterState) {
        filter.set_search(&self.search);
        filter.brands = self
            .brands
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect();
        filter.with_stock = self.with_stock;
        filter.rebate = self.rebate;
        filter.out_of_cards = self.out_of_cards;
        filter.color = self.color;
        filter.page = 1;
    }
}

const fn next_tristate(value: Option<bool>) -> Option<bool> {
    match value {
        None => Some(true),
        Some(true) => Some(false),
        Some(false) => None,
    }
}

fn tristate_text(value: Option<bool>, yes: &str, no: &str) -> String {
    match value {
        None => "any".to_string(),
        Some(true) => yes.to_string(),
        Some(false) => no.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_seeds_from_filter() {
        let mut filter = FilterState::default();
        filter.set_search("monitor");
        filter.brands = vec!["LG".into(), "Samsung".into()];

        let mut panel = FilterPanel::new();
        panel.open(&filter);
        assert!(panel.text_input_focused());
        assert_eq!(panel.value_text(FilterField::Search), "monitor");
        assert_eq!(panel.value_text(FilterField::Brands), "LG, Samsung");
    }

    #[test]
    fn test_apply_resets_page_and_splits_brands() {
        let mut filter = FilterState {
            page: 4,
            ..FilterState::default()
        };
        let mut panel = FilterPanel::new();
        panel.open(&filter);
        for c in "aire".chars() {
            panel.push_char(c);
        }
        panel.cycle_focus(false);
        for c in "BGH, ,Philco".chars() {
            panel.push_char(c);
        }
        panel.apply_to(&mut filter);

        assert_eq!(filter.search.as_deref(), Some("aire"));
        assert_eq!(filter.brands, vec!["BGH".to_string(), "Philco".to_string()]);
        assert_eq!(filter.page, 1);
    }

    #[test]
    fn test_choice_fields_cycle() {
        let mut panel = FilterPanel::new();
        panel.open(&FilterState::default());
        panel.cycle_focus(false);
        panel.cycle_focus(false);
        assert_eq!(panel.focused(), FilterField::Stock);
        assert!(!panel.text_input_focused());

        panel.cycle_value();
        assert_eq!(panel.value_text(FilterField::Stock), "in stock");
        panel.cycle_value();
        panel.cycle_value();
        assert_eq!(panel.value_text(FilterField::Stock), "any");
    }

    #[test]
    fn test_color_cycle_wraps_to_any() {
        let mut panel = FilterPanel::new();
        panel.open(&FilterState::default());
        panel.cycle_focus(true);
        assert_eq!(panel.focused(), FilterField::Color);

        for _ in 0..ColorTag::PALETTE.len() {
            panel.cycle_value();
        }
        assert_eq!(panel.value_text(FilterField::Color), "Gray");
        panel.cycle_value();
        assert_eq!(panel.value_text(FilterField::Color), "any");
    }
}
