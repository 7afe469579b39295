//! Inline edit sessions.

use super::columns::EditField;
use super::focus::{self, Focusable};
use super::input::{self, accepts_char};
use crate::api::Mutation;
use crate::config::{DEFAULT_REBATE_PERCENTAGE, DEFAULT_WEB_TRANSFER_PERCENTAGE};
use crate::error::InputError;
use crate::model::{Product, ProductId};

/// Percentages used when a product has none stored yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingDefaults {
    pub rebate_percentage: f64,
    pub web_transfer_percentage: f64,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            rebate_percentage: DEFAULT_REBATE_PERCENTAGE,
            web_transfer_percentage: DEFAULT_WEB_TRANSFER_PERCENTAGE,
        }
    }
}

/// What committing a session produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Send(Mutation),
    Rejected(InputError),
}

/// An open edit on one cell.
#[derive(Debug, Clone)]
pub struct EditSession {
    product: ProductId,
    field: EditField,
    buffer: String,
    preserve: bool,
    focusables: Vec<Focusable>,
    focus: usize,
}

impl EditSession {
    /// Open a session seeded from the product's stored value.
    #[must_use]
    pub fn open(product: &Product, field: EditField, defaults: &PricingDefaults) -> Self {
        let seed = match field {
            EditField::Price(list) => product.price(list),
            EditField::Installment(list, tier) => product.installment(list, tier),
            EditField::Rebate => product
                .rebate
                .percentage
                .or(Some(defaults.rebate_percentage)),
            EditField::WebTransfer => product
                .web_transfer
                .percentage
                .or(Some(defaults.web_transfer_percentage)),
        };
        let focusables = match field {
            EditField::WebTransfer => vec![
                Focusable::Value,
                Focusable::Preserve,
                Focusable::Save,
                Focusable::Cancel,
            ],
            _ => vec![Focusable::Value, Focusable::Save, Focusable::Cancel],
        };

        Self {
            product: product.id,
            field,
            buffer: seed.map(input::format_decimal).unwrap_or_default(),
            preserve: false,
            focusables,
            focus: 0,
        }
    }

    #[must_use]
    pub const fn product(&self) -> ProductId {
        self.product
    }

    #[must_use]
    pub const fn field(&self) -> EditField {
        self.field
    }

    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[must_use]
    pub const fn preserve(&self) -> bool {
        self.preserve
    }

    #[must_use]
    pub fn focusables(&self) -> &[Focusable] {
        &self.focusables
    }

    #[must_use]
    pub fn focused(&self) -> Focusable {
        self.focusables[self.focus]
    }

    /// Tab / Shift+Tab inside the session.
    pub fn cycle_focus(&mut self, backwards: bool) {
        self.focus = focus::cycle(self.focus, self.focusables.len(), backwards);
    }

    /// Type into the value field. Ignored unless the value field has focus.
    pub fn push_char(&mut self, c: char) -> bool {
        if self.focused() != Focusable::Value || !accepts_char(c) {
            return false;
        }
        self.buffer.push(c);
        true
    }

    pub fn backspace(&mut self) {
        if self.focused() == Focusable::Value {
            self.buffer.pop();
        }
    }

    pub fn toggle_preserve(&mut self) {
        if self.field == EditField::WebTransfer {
            self.preserve = !self.preserve;
        }
    }

    /// Turn the typed value into a mutation.
    ///
    /// An empty installment field asks the backend to recalculate it.
    #[must_use]
    pub fn commit(&self, recalculate_installments: bool) -> Commit {
        let result = match self.field {
            EditField::Price(list) => input::parse_price(&self.buffer).map(|value| Mutation::SetPrice {
                list,
                value,
                recalculate_installments,
            }),
            EditField::Installment(list, tier) if self.buffer.trim().is_empty() => {
                Ok(Mutation::SetInstallment {
                    list,
                    tier,
                    value: None,
                })
            }
            EditField::Installment(list, tier) => {
                input::parse_price(&self.buffer).map(|v| Mutation::SetInstallment {
                    list,
                    tier,
                    value: Some(v),
                })
            }
            EditField::Rebate => input::parse_decimal(&self.buffer).map(|percentage| {
                Mutation::SetRebate {
                    enabled: true,
                    percentage,
                }
            }),
            EditField::WebTransfer => input::parse_decimal(&self.buffer).map(|percentage| {
                Mutation::SetWebTransfer {
                    enabled: true,
                    percentage,
                    preserve: self.preserve,
                }
            }),
        };

        match result {
            Ok(mutation) => Commit::Send(mutation),
            Err(e) => Commit::Rejected(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InstallmentTier, PriceList};

    fn product() -> Product {
        let mut p = Product::new(7, "SKU7");
        p.classic_price = Some(1500.5);
        p.web_transfer.percentage = Some(7.0);
        p
    }

    #[test]
    fn test_seeds_from_product() {
        let defaults = PricingDefaults::default();
        let s = EditSession::open(&product(), EditField::Price(PriceList::Web), &defaults);
        assert_eq!(s.buffer(), "1500.5");
        assert_eq!(s.focused(), Focusable::Value);

        let s = EditSession::open(&product(), EditField::Rebate, &defaults);
        assert_eq!(s.buffer(), "3.8");

        let s = EditSession::open(&product(), EditField::WebTransfer, &defaults);
        assert_eq!(s.buffer(), "7");
        assert_eq!(s.focusables().len(), 4);
    }

    #[test]
    fn test_focus_wraps_within_session() {
        let mut s = EditSession::open(
            &product(),
            EditField::Price(PriceList::Web),
            &PricingDefaults::default(),
        );
        s.cycle_focus(false);
        s.cycle_focus(false);
        assert_eq!(s.focused(), Focusable::Cancel);
        s.cycle_focus(false);
        assert_eq!(s.focused(), Focusable::Value);
        s.cycle_focus(true);
        assert_eq!(s.focused(), Focusable::Cancel);
    }

    #[test]
    fn test_typing_only_reaches_value_field() {
        let mut s = EditSession::open(
            &Product::new(1, "A"),
            EditField::Price(PriceList::Web),
            &PricingDefaults::default(),
        );
        assert!(s.push_char('1'));
        assert!(!s.push_char('x'));
        s.cycle_focus(false);
        assert!(!s.push_char('2'));
        s.backspace();
        assert_eq!(s.buffer(), "1");
    }

    #[test]
    fn test_commit_price() {
        let mut s = EditSession::open(
            &Product::new(1, "A"),
            EditField::Price(PriceList::Web),
            &PricingDefaults::default(),
        );
        for c in "1.234,5".chars() {
            s.push_char(c);
        }
        assert_eq!(
            s.commit(true),
            Commit::Send(Mutation::SetPrice {
                list: PriceList::Web,
                value: 1234.5,
                recalculate_installments: true,
            })
        );
    }

    #[test]
    fn test_commit_rejects_invalid_price() {
        let mut s = EditSession::open(
            &Product::new(1, "A"),
            EditField::Price(PriceList::Pvp),
            &PricingDefaults::default(),
        );
        s.push_char('-');
        s.push_char('3');
        assert_eq!(s.commit(false), Commit::Rejected(InputError::Negative(-3.0)));
    }

    #[test]
    fn test_empty_installment_recalculates() {
        let field = EditField::Installment(PriceList::Web, InstallmentTier::Six);
        let s = EditSession::open(&Product::new(1, "A"), field, &PricingDefaults::default());
        assert_eq!(
            s.commit(false),
            Commit::Send(Mutation::SetInstallment {
                list: PriceList::Web,
                tier: InstallmentTier::Six,
                value: None,
            })
        );
    }

    #[test]
    fn test_web_transfer_preserve_flag() {
        let mut s = EditSession::open(&product(), EditField::WebTransfer, &PricingDefaults::default());
        s.toggle_preserve();
        assert_eq!(
            s.commit(false),
            Commit::Send(Mutation::SetWebTransfer {
                enabled: true,
                percentage: 7.0,
                preserve: true,
            })
        );
    }
}
