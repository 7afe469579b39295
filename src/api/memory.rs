//! In-process pricing backend.
//!
//! Holds the catalog in memory and applies mutations the same way the grid
//! patches its local rows. Used by `pricedesk browse --demo` and by tests,
//! which can also make it fail on purpose.

use super::{Mutation, PricingApi};
use crate::error::{ApiErrorKind, PriceDeskError, Result};
use crate::model::{
    CatalogStats, ColorTag, FilterState, InstallmentTier, Permissions, PriceList, Product,
    ProductId, ProductPage, SortColumn,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory catalog implementing [`PricingApi`].
#[derive(Debug, Default)]
pub struct MemoryPricingApi {
    products: Mutex<Vec<Product>>,
    permissions: Permissions,
    failure: Mutex<Option<ApiErrorKind>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryPricingApi {
    /// Backend over the given rows with every permission granted.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            permissions: Permissions::all(),
            failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// A small generated catalog for trying the dashboard without a backend.
    #[must_use]
    pub fn demo() -> Self {
        const BRANDS: [&str; 6] = ["Samsung", "LG", "BGH", "Philco", "Noblex", "Motorola"];
        const KINDS: [&str; 6] = [
            "Smart TV 50\"",
            "Heladera no frost",
            "Aire split 3000fg",
            "Lavarropas 8kg",
            "Notebook 15.6\"",
            "Celular 128GB",
        ];

        let products = (1..=64u64)
            .map(|n| {
                let brand = BRANDS[(n as usize) % BRANDS.len()];
                let kind = KINDS[(n as usize / 2) % KINDS.len()];
                let mut p = Product::new(n, format!("{}{n:05}", &brand[..3].to_uppercase()));
                p.brand = Some(brand.to_string());
                p.description = format!("{kind} {brand}");
                p.stock = ((n * 7) % 23) as i64 - 3;
                if n % 9 != 0 {
                    let base = 85_000.0 + (n as f64) * 3_250.0;
                    p.classic_price = Some(base);
                    p.best_offer = Some(base * 0.95);
                    p.gremio_price = Some(base * 0.88);
                    p.web_card_price = Some(base * 1.04);
                    p.pvp.classic = Some(base * 1.15);
                    for tier in InstallmentTier::ALL {
                        let factor = 1.0 + f64::from(tier.payments()) * 0.02;
                        p.set_installment(PriceList::Web, tier, Some(base * factor));
                        p.set_installment(PriceList::Pvp, tier, Some(base * 1.15 * factor));
                    }
                }
                p.rebate.enabled = n % 4 == 0;
                p.rebate.percentage = p.rebate.enabled.then_some(3.8);
                p.rebate_price = p.classic_price.filter(|_| p.rebate.enabled);
                p.web_transfer.enabled = n % 3 == 0;
                p.web_transfer.percentage = Some(6.0);
                p.web_transfer_price = p.classic_price.filter(|_| p.web_transfer.enabled);
                p.out_of_cards = p.rebate.enabled && n % 8 == 0;
                p.color = ColorTag::PALETTE[(n as usize * 5) % 11 % ColorTag::PALETTE.len()];
                p
            })
            .collect();
        Self::new(products)
    }

    /// Make every following call fail with `kind` until cleared.
    pub fn fail_with(&self, kind: Option<ApiErrorKind>) {
        *lock(&self.failure) = kind;
    }

    /// Names of the calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Current backend copy of a product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        lock(&self.products).iter().find(|p| p.id == id).cloned()
    }

    fn record(&self, call: impl Into<String>) -> Result<()> {
        lock(&self.calls).push(call.into());
        match lock(&self.failure).clone() {
            Some(kind) => Err(PriceDeskError::api("memory backend", kind)),
            None => Ok(()),
        }
    }

    fn mutate(&self, id: ProductId, mutation: &Mutation) -> Result<Option<Product>> {
        let mut products = lock(&self.products);
        let slot = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| {
                PriceDeskError::api("memory backend", ApiErrorKind::NotFound(id.to_string()))
            })?;
        *slot = mutation.apply_to(slot);
        slot.updated_at = Some(chrono::Utc::now());
        // Echo nothing back so callers exercise their local patching.
        Ok(None)
    }

    fn matching(&self, filter: &FilterState) -> Vec<Product> {
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let mut rows: Vec<Product> = lock(&self.products)
            .iter()
            .filter(|p| {
                needle.as_deref().is_none_or(|n| {
                    p.code.to_lowercase().contains(n) || p.description.to_lowercase().contains(n)
                })
            })
            .filter(|p| {
                filter.brands.is_empty()
                    || p.brand
                        .as_deref()
                        .is_some_and(|b| filter.brands.iter().any(|f| f.eq_ignore_ascii_case(b)))
            })
            .filter(|p| filter.with_stock.is_none_or(|w| (p.stock > 0) == w))
            .filter(|p| filter.color.is_none_or(|c| p.color == c))
            .filter(|p| filter.rebate.is_none_or(|r| p.rebate.enabled == r))
            .filter(|p| filter.out_of_cards.is_none_or(|o| p.out_of_cards == o))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ord = match filter.sort.column {
                SortColumn::Code => a.code.cmp(&b.code),
                SortColumn::Brand => a.brand.cmp(&b.brand),
                SortColumn::Stock => a.stock.cmp(&b.stock),
                SortColumn::ClassicPrice => a
                    .classic_price
                    .unwrap_or(0.0)
                    .total_cmp(&b.classic_price.unwrap_or(0.0)),
                SortColumn::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            if filter.sort.descending {
                ord.reverse()
            } else {
                ord
            }
        });
        rows
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PricingApi for MemoryPricingApi {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn list_products(&self, filter: &FilterState) -> Result<ProductPage> {
        self.record("list_products")?;
        let rows = self.matching(filter);
        let total = rows.len() as u64;
        let size = filter.page_size.max(1) as usize;
        let start = (filter.page.max(1) as usize - 1) * size;
        let items = rows.into_iter().skip(start).take(size).collect();
        Ok(ProductPage { items, total })
    }

    fn stats(&self, filter: &FilterState) -> Result<CatalogStats> {
        self.record("stats")?;
        let rows = self.matching(filter);
        let count = |pred: fn(&Product) -> bool| rows.iter().filter(|p| pred(p)).count() as u64;
        Ok(CatalogStats {
            total: rows.len() as u64,
            with_stock: count(|p| p.stock > 0),
            without_price: count(|p| p.classic_price.is_none()),
            with_rebate: count(|p| p.rebate.enabled),
            out_of_cards: count(|p| p.out_of_cards),
        })
    }

    fn permissions(&self) -> Result<Permissions> {
        self.record("permissions")?;
        Ok(self.permissions)
    }

    fn set_price(
        &self,
        id: ProductId,
        list: PriceList,
        value: f64,
        recalculate_installments: bool,
    ) -> Result<Option<Product>> {
        self.record(format!("set_price {id}"))?;
        self.mutate(
            id,
            &Mutation::SetPrice {
                list,
                value,
                recalculate_installments,
            },
        )
    }

    fn set_rebate(
        &self,
        id: ProductId,
        enabled: bool,
        percentage: f64,
    ) -> Result<Option<Product>> {
        self.record(format!("set_rebate {id}"))?;
        self.mutate(
            id,
            &Mutation::SetRebate {
                enabled,
                percentage,
            },
        )
    }

    fn set_web_transfer(
        &self,
        id: ProductId,
        enabled: bool,
        percentage: f64,
        preserve: bool,
    ) -> Result<Option<Product>> {
        self.record(format!("set_web_transfer {id}"))?;
        self.mutate(
            id,
            &Mutation::SetWebTransfer {
                enabled,
                percentage,
                preserve,
            },
        )
    }

    fn set_installment(
        &self,
        id: ProductId,
        list: PriceList,
        tier: InstallmentTier,
        value: Option<f64>,
    ) -> Result<Option<Product>> {
        self.record(format!("set_installment {id}"))?;
        self.mutate(id, &Mutation::SetInstallment { list, tier, value })
    }

    fn set_color(&self, id: ProductId, color: ColorTag) -> Result<Option<Product>> {
        self.record(format!("set_color {id}"))?;
        self.mutate(id, &Mutation::SetColor(color))
    }

    fn set_color_batch(&self, ids: &[ProductId], color: ColorTag) -> Result<()> {
        self.record(format!("set_color_batch {}", ids.len()))?;
        let mut products = lock(&self.products);
        for product in products.iter_mut().filter(|p| ids.contains(&p.id)) {
            product.color = color;
        }
        Ok(())
    }

    fn set_out_of_cards(&self, id: ProductId, enabled: bool) -> Result<Option<Product>> {
        self.record(format!("set_out_of_cards {id}"))?;
        if enabled && self.product(id).is_some_and(|p| !p.rebate.enabled) {
            return Err(PriceDeskError::api(
                "memory backend",
                ApiErrorKind::Status {
                    status: 422,
                    message: "out-of-cards requires rebate".to_string(),
                },
            ));
        }
        self.mutate(id, &Mutation::SetOutOfCards(enabled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_pages() {
        let api = MemoryPricingApi::demo();
        let mut filter = FilterState::default();
        filter.page_size = 20;

        let first = api.list_products(&filter).unwrap();
        assert_eq!(first.total, 64);
        assert_eq!(first.items.len(), 20);

        filter.page = 4;
        let last = api.list_products(&filter).unwrap();
        assert_eq!(last.items.len(), 4);
    }

    #[test]
    fn test_search_filters_by_code_and_description() {
        let api = MemoryPricingApi::new(vec![
            {
                let mut p = Product::new(1, "AAA1");
                p.description = "Heladera".into();
                p
            },
            Product::new(2, "BBB2"),
        ]);
        let mut filter = FilterState::default();
        filter.set_search("helad");
        assert_eq!(api.list_products(&filter).unwrap().items.len(), 1);
        filter.set_search("bbb");
        assert_eq!(api.list_products(&filter).unwrap().items[0].code, "BBB2");
    }

    #[test]
    fn test_failure_injection() {
        let api = MemoryPricingApi::new(vec![Product::new(1, "A")]);
        api.fail_with(Some(ApiErrorKind::Network("down".into())));
        assert!(api.set_color(ProductId(1), ColorTag::Red).is_err());
        assert_eq!(api.product(ProductId(1)).unwrap().color, ColorTag::None);

        api.fail_with(None);
        api.set_color(ProductId(1), ColorTag::Red).unwrap();
        assert_eq!(api.product(ProductId(1)).unwrap().color, ColorTag::Red);
        assert_eq!(api.calls(), vec!["set_color 1", "set_color 1"]);
    }

    #[test]
    fn test_out_of_cards_requires_rebate() {
        let api = MemoryPricingApi::new(vec![Product::new(1, "A")]);
        let err = api.set_out_of_cards(ProductId(1), true).unwrap_err();
        assert_eq!(
            err.toast_text(),
            "Server returned 422: out-of-cards requires rebate"
        );
        assert!(!api.product(ProductId(1)).unwrap().out_of_cards);

        api.set_rebate(ProductId(1), true, 3.8).unwrap();
        api.set_out_of_cards(ProductId(1), true).unwrap();
        assert!(api.product(ProductId(1)).unwrap().out_of_cards);
    }

    #[test]
    fn test_unknown_product_is_not_found() {
        let api = MemoryPricingApi::new(vec![]);
        let err = api.set_out_of_cards(ProductId(9), true).unwrap_err();
        assert!(err.to_string().contains("memory backend"));
    }
}
