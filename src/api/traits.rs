//! The pricing API trait.

use crate::error::Result;
use crate::model::{
    CatalogStats, ColorTag, FilterState, InstallmentTier, Permissions, PriceList, Product,
    ProductId, ProductPage,
};

/// Operations the dashboard performs against the pricing backend.
///
/// Mutations return the refreshed product row when the backend sends one
/// back; `None` means the caller should patch its local copy itself.
///
/// # Example
///
/// ```ignore
/// use pricedesk::api::{PricingApi, MemoryPricingApi};
///
/// let api: Box<dyn PricingApi> = if demo {
///     Box::new(MemoryPricingApi::demo())
/// } else {
///     Box::new(HttpPricingApi::new(config)?)
/// };
/// let page = api.list_products(&FilterState::default())?;
/// ```
pub trait PricingApi: Send + Sync {
    /// Name of the backend, shown in the header.
    fn name(&self) -> &'static str;

    /// Fetch one page of products matching the filter.
    fn list_products(&self, filter: &FilterState) -> Result<ProductPage>;

    /// Fetch catalog counters for the filter.
    fn stats(&self, filter: &FilterState) -> Result<CatalogStats>;

    /// Permissions of the signed-in user.
    fn permissions(&self) -> Result<Permissions>;

    /// Set the base price of a ladder.
    fn set_price(
        &self,
        id: ProductId,
        list: PriceList,
        value: f64,
        recalculate_installments: bool,
    ) -> Result<Option<Product>>;

    /// Enable or disable rebate with a percentage.
    fn set_rebate(&self, id: ProductId, enabled: bool, percentage: f64)
    -> Result<Option<Product>>;

    /// Enable or disable the web-transfer channel.
    ///
    /// With `preserve` set the backend keeps the stored percentage and
    /// ignores `percentage`.
    fn set_web_transfer(
        &self,
        id: ProductId,
        enabled: bool,
        percentage: f64,
        preserve: bool,
    ) -> Result<Option<Product>>;

    /// Set an installment price, or recalculate it when `value` is `None`.
    fn set_installment(
        &self,
        id: ProductId,
        list: PriceList,
        tier: InstallmentTier,
        value: Option<f64>,
    ) -> Result<Option<Product>>;

    /// Paint a single product.
    fn set_color(&self, id: ProductId, color: ColorTag) -> Result<Option<Product>>;

    /// Paint many products in one call.
    fn set_color_batch(&self, ids: &[ProductId], color: ColorTag) -> Result<()>;

    /// Flag or unflag the product as excluded from card promotions.
    fn set_out_of_cards(&self, id: ProductId, enabled: bool) -> Result<Option<Product>>;
}
