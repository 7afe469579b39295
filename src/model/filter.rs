//! Catalog filter state and its query-string form.
//!
//! The filter is owned by the app and handed to the API client explicitly.
//! `to_query_string` / `from_query_string` let a filter be passed on the
//! command line (`--query`) and shown in the filter panel.

use super::ColorTag;
use crate::error::{PriceDeskError, Result};
use reqwest::Url;
use std::fmt;

/// Default page size for list requests.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Code,
    Brand,
    Stock,
    ClassicPrice,
    UpdatedAt,
}

impl SortColumn {
    const ALL: [Self; 5] = [
        Self::Code,
        Self::Brand,
        Self::Stock,
        Self::ClassicPrice,
        Self::UpdatedAt,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "codigo",
            Self::Brand => "marca",
            Self::Stock => "stock",
            Self::ClassicPrice => "precio_clasica",
            Self::UpdatedAt => "actualizado",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Next column in the cycle order.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Sort column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub column: SortColumn,
    pub descending: bool,
}

/// Everything that narrows the product list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: Option<String>,
    pub brands: Vec<String>,
    pub with_stock: Option<bool>,
    pub color: Option<ColorTag>,
    pub rebate: Option<bool>,
    pub out_of_cards: Option<bool>,
    pub sort: SortSpec,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: None,
            brands: Vec::new(),
            with_stock: None,
            color: None,
            rebate: None,
            out_of_cards: None,
            sort: SortSpec::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the search text, resetting to the first page.
    pub fn set_search(&mut self, text: &str) {
        let trimmed = text.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.page = 1;
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Go back one page; returns false when already on the first.
    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort.column = self.sort.column.next();
        self.page = 1;
    }

    pub fn flip_sort_direction(&mut self) {
        self.sort.descending = !self.sort.descending;
        self.page = 1;
    }

    /// Key/value pairs in a stable order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        for brand in &self.brands {
            pairs.push(("marca", brand.clone()));
        }
        if let Some(v) = self.with_stock {
            pairs.push(("con_stock", v.to_string()));
        }
        if let Some(color) = self.color {
            pairs.push(("color", color.wire_name().unwrap_or("sin_color").to_string()));
        }
        if let Some(v) = self.rebate {
            pairs.push(("rebate", v.to_string()));
        }
        if let Some(v) = self.out_of_cards {
            pairs.push(("out_of_cards", v.to_string()));
        }
        pairs.push(("orden", self.sort.column.as_str().to_string()));
        pairs.push((
            "direccion",
            if self.sort.descending { "desc" } else { "asc" }.to_string(),
        ));
        pairs.push(("page", self.page.to_string()));
        pairs.push(("page_size", self.page_size.to_string()));
        pairs
    }

    /// Percent-encoded query string, without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let Ok(mut url) = placeholder_url() else {
            return String::new();
        };
        url.query_pairs_mut().extend_pairs(self.to_pairs());
        url.query().unwrap_or_default().to_string()
    }

    /// Parse a query string produced by [`Self::to_query_string`] or typed
    /// by hand. Unknown keys are ignored; malformed values are errors.
    pub fn from_query_string(query: &str) -> Result<Self> {
        let query = query.trim_start_matches('?');
        let mut url = placeholder_url()?;
        url.set_query(Some(query));

        let mut filter = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "search" => {
                    let text = value.trim();
                    filter.search = (!text.is_empty()).then(|| text.to_string());
                }
                "marca" => filter.brands.push(value.into_owned()),
                "con_stock" => filter.with_stock = Some(parse_bool(&key, &value)?),
                "rebate" => filter.rebate = Some(parse_bool(&key, &value)?),
                "out_of_cards" => filter.out_of_cards = Some(parse_bool(&key, &value)?),
                "color" => {
                    filter.color = Some(if value == "sin_color" {
                        ColorTag::None
                    } else {
                        ColorTag::from_wire_name(&value).ok_or_else(|| {
                            PriceDeskError::validation(format!("unknown color '{value}'"))
                        })?
                    });
                }
                "orden" => {
                    filter.sort.column = SortColumn::parse(&value).ok_or_else(|| {
                        PriceDeskError::validation(format!("unknown sort column '{value}'"))
                    })?;
                }
                "direccion" => filter.sort.descending = value == "desc",
                "page" => filter.page = parse_number(&key, &value)?.max(1),
                "page_size" => filter.page_size = parse_number(&key, &value)?.max(1),
                _ => {}
            }
        }
        Ok(filter)
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref search) = self.search {
            parts.push(format!("\"{search}\""));
        }
        if !self.brands.is_empty() {
            parts.push(self.brands.join("|"));
        }
        if self.with_stock == Some(true) {
            parts.push("stock".to_string());
        }
        if let Some(color) = self.color {
            parts.push(color.label().to_lowercase());
        }
        if let Some(rebate) = self.rebate {
            parts.push(if rebate { "rebate" } else { "no rebate" }.to_string());
        }
        parts.push(format!(
            "by {} {}",
            self.sort.column.as_str(),
            if self.sort.descending { "↓" } else { "↑" }
        ));
        parts.push(format!("page {}", self.page));
        f.write_str(&parts.join(" · "))
    }
}

/// Host for borrowing `Url`'s query encoder.
fn placeholder_url() -> Result<Url> {
    Url::parse("http://filter.invalid/")
        .map_err(|e| PriceDeskError::validation(format!("query parser: {e}")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "1" | "si" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(PriceDeskError::validation(format!(
            "'{key}' expects true/false, got '{other}'"
        ))),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| PriceDeskError::validation(format!("'{key}' expects a number, got '{value}'")))
}
