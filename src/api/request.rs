//! Queued work and its results.

use super::PricingApi;
use crate::error::{ErrorContext, Result};
use crate::model::{
    CatalogStats, ColorTag, FilterState, InstallmentTier, PriceList, Product, ProductId,
    ProductPage,
};

/// Monotonic request number. Later tickets supersede earlier ones for the
/// same product field.
pub type Ticket = u64;

/// A change to one product.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetPrice {
        list: PriceList,
        value: f64,
        recalculate_installments: bool,
    },
    SetRebate {
        enabled: bool,
        percentage: f64,
    },
    SetWebTransfer {
        enabled: bool,
        percentage: f64,
        preserve: bool,
    },
    /// `value: None` asks the backend to recalculate the tier.
    SetInstallment {
        list: PriceList,
        tier: InstallmentTier,
        value: Option<f64>,
    },
    SetColor(ColorTag),
    SetOutOfCards(bool),
}

/// The product field a mutation writes, used to order competing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Price(PriceList),
    Rebate,
    WebTransfer,
    Installment(PriceList, InstallmentTier),
    Color,
    OutOfCards,
}

impl Mutation {
    #[must_use]
    pub const fn field(&self) -> FieldKey {
        match self {
            Self::SetPrice { list, .. } => FieldKey::Price(*list),
            Self::SetRebate { .. } => FieldKey::Rebate,
            Self::SetWebTransfer { .. } => FieldKey::WebTransfer,
            Self::SetInstallment { list, tier, .. } => FieldKey::Installment(*list, *tier),
            Self::SetColor(_) => FieldKey::Color,
            Self::SetOutOfCards(_) => FieldKey::OutOfCards,
        }
    }

    /// Toast text for a successful mutation.
    #[must_use]
    pub fn success_message(&self, code: &str) -> String {
        match self {
            Self::SetPrice { list, value, .. } => {
                format!("{code}: {} price set to {value:.2}", list.label())
            }
            Self::SetRebate { enabled: true, percentage } => {
                format!("{code}: rebate on ({percentage}%)")
            }
            Self::SetRebate { enabled: false, .. } => format!("{code}: rebate off"),
            Self::SetWebTransfer { enabled: true, .. } => format!("{code}: web transfer on"),
            Self::SetWebTransfer { enabled: false, .. } => format!("{code}: web transfer off"),
            Self::SetInstallment {
                tier, value: None, ..
            } => format!("{code}: {tier} recalculated"),
            Self::SetInstallment {
                tier,
                value: Some(v),
                ..
            } => format!("{code}: {tier} set to {v:.2}"),
            Self::SetColor(color) => format!("{code}: color {color}"),
            Self::SetOutOfCards(true) => format!("{code}: out of cards"),
            Self::SetOutOfCards(false) => format!("{code}: back in card promotions"),
        }
    }

    /// Return a copy of `product` with this mutation applied.
    ///
    /// Disabling rebate also clears out-of-cards: a product cannot be out of
    /// card promotions without participating in rebate.
    #[must_use]
    pub fn apply_to(&self, product: &Product) -> Product {
        let mut next = product.clone();
        match *self {
            Self::SetPrice { list, value, .. } => next.set_price(list, Some(value)),
            Self::SetRebate {
                enabled,
                percentage,
            } => {
                next.rebate.enabled = enabled;
                next.rebate.percentage = Some(percentage);
                if !enabled {
                    next.out_of_cards = false;
                }
            }
            Self::SetWebTransfer {
                enabled,
                percentage,
                preserve,
            } => {
                next.web_transfer.enabled = enabled;
                if !preserve || next.web_transfer.percentage.is_none() {
                    next.web_transfer.percentage = Some(percentage);
                }
            }
            Self::SetInstallment {
                list,
                tier,
                value: Some(v),
            } => next.set_installment(list, tier, Some(v)),
            Self::SetInstallment { value: None, .. } => {}
            Self::SetColor(color) => next.color = color,
            Self::SetOutOfCards(enabled) => next.out_of_cards = enabled,
        }
        next
    }

    /// Send this mutation through the API.
    pub fn send(&self, api: &dyn PricingApi, id: ProductId) -> Result<Option<Product>> {
        match *self {
            Self::SetPrice {
                list,
                value,
                recalculate_installments,
            } => api.set_price(id, list, value, recalculate_installments),
            Self::SetRebate {
                enabled,
                percentage,
            } => api.set_rebate(id, enabled, percentage),
            Self::SetWebTransfer {
                enabled,
                percentage,
                preserve,
            } => api.set_web_transfer(id, enabled, percentage, preserve),
            Self::SetInstallment { list, tier, value } => {
                api.set_installment(id, list, tier, value)
            }
            Self::SetColor(color) => api.set_color(id, color),
            Self::SetOutOfCards(enabled) => api.set_out_of_cards(id, enabled),
        }
    }
}

/// Work queued by the grid for the caller to run.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Mutate {
        ticket: Ticket,
        product: ProductId,
        mutation: Mutation,
    },
    PaintBatch {
        ticket: Ticket,
        ids: Vec<ProductId>,
        color: ColorTag,
    },
    Reload {
        ticket: Ticket,
        filter: FilterState,
    },
    RefreshStats {
        filter: FilterState,
    },
}

/// Result of running a [`Request`].
#[derive(Debug)]
pub enum Outcome {
    Mutated {
        ticket: Ticket,
        product: ProductId,
        mutation: Mutation,
        result: Result<Option<Product>>,
    },
    Painted {
        ticket: Ticket,
        ids: Vec<ProductId>,
        color: ColorTag,
        result: Result<()>,
    },
    Reloaded {
        ticket: Ticket,
        result: Result<ProductPage>,
    },
    Stats(Result<CatalogStats>),
}

/// Run a request to completion against `api`.
pub fn execute(api: &dyn PricingApi, request: Request) -> Outcome {
    match request {
        Request::Mutate {
            ticket,
            product,
            mutation,
        } => {
            tracing::debug!(ticket, %product, ?mutation, "sending mutation");
            let result = mutation
                .send(api, product)
                .with_context(|| format!("updating product {product}"));
            Outcome::Mutated {
                ticket,
                product,
                mutation,
                result,
            }
        }
        Request::PaintBatch { ticket, ids, color } => {
            tracing::debug!(ticket, count = ids.len(), %color, "sending batch paint");
            let result = api
                .set_color_batch(&ids, color)
                .with_context(|| format!("painting {} products", ids.len()));
            Outcome::Painted {
                ticket,
                ids,
                color,
                result,
            }
        }
        Request::Reload { ticket, filter } => {
            tracing::debug!(ticket, query = %filter.to_query_string(), "reloading products");
            Outcome::Reloaded {
                ticket,
                result: api.list_products(&filter).context("reloading products"),
            }
        }
        Request::RefreshStats { filter } => {
            Outcome::Stats(api.stats(&filter).context("refreshing stats"))
        }
    }
}
