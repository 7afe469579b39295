//! Editable column layouts per page and view mode.

use crate::model::{InstallmentTier, PriceList, Product};
use std::fmt;

/// Which dashboard page the grid is driving.
///
/// The catalog page edits the web ladder with rebate; the store page shows
/// the gremio channel instead and adds the PVP view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageVariant {
    #[default]
    Catalog,
    Store,
}

impl PageVariant {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Catalog => "Productos",
            Self::Store => "Tienda",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "catalog" | "productos" => Some(Self::Catalog),
            "store" | "tienda" => Some(Self::Store),
            _ => None,
        }
    }
}

/// A grid column holding a price or percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    ClassicPrice,
    RebatePrice,
    GremioPrice,
    BestOffer,
    WebTransfer,
    WebCard,
    Installment(InstallmentTier),
    PvpClassic,
    PvpInstallment(InstallmentTier),
}

/// The product value an edit session writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    Price(PriceList),
    Rebate,
    WebTransfer,
    Installment(PriceList, InstallmentTier),
}

impl EditField {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Price(list) => format!("{} price", list.label()),
            Self::Rebate => "Rebate %".to_string(),
            Self::WebTransfer => "Web transfer %".to_string(),
            Self::Installment(PriceList::Web, tier) => tier.to_string(),
            Self::Installment(PriceList::Pvp, tier) => format!("PVP {tier}"),
        }
    }
}

impl ColumnKind {
    #[must_use]
    pub fn header(self) -> String {
        match self {
            Self::ClassicPrice => "Clásica".to_string(),
            Self::RebatePrice => "Rebate".to_string(),
            Self::GremioPrice => "Gremio".to_string(),
            Self::BestOffer => "Mejor oferta".to_string(),
            Self::WebTransfer => "Web transf.".to_string(),
            Self::WebCard => "Web tarjeta".to_string(),
            Self::Installment(tier) => format!("{} cuotas", tier.payments()),
            Self::PvpClassic => "PVP".to_string(),
            Self::PvpInstallment(tier) => format!("PVP {}c", tier.payments()),
        }
    }

    /// Price shown in the cell.
    #[must_use]
    pub const fn value(self, product: &Product) -> Option<f64> {
        match self {
            Self::ClassicPrice => product.classic_price,
            Self::RebatePrice => product.rebate_price,
            Self::GremioPrice => product.gremio_price,
            Self::BestOffer => product.best_offer,
            Self::WebTransfer => product.web_transfer_price,
            Self::WebCard => product.web_card_price,
            Self::Installment(tier) => product.installment(PriceList::Web, tier),
            Self::PvpClassic => product.price(PriceList::Pvp),
            Self::PvpInstallment(tier) => product.installment(PriceList::Pvp, tier),
        }
    }

    /// Field opened by Enter on this column; `None` for computed columns.
    #[must_use]
    pub const fn edit_field(self) -> Option<EditField> {
        match self {
            Self::ClassicPrice => Some(EditField::Price(PriceList::Web)),
            Self::RebatePrice => Some(EditField::Rebate),
            Self::WebTransfer => Some(EditField::WebTransfer),
            Self::Installment(tier) => Some(EditField::Installment(PriceList::Web, tier)),
            Self::PvpClassic => Some(EditField::Price(PriceList::Pvp)),
            Self::PvpInstallment(tier) => Some(EditField::Installment(PriceList::Pvp, tier)),
            Self::GremioPrice | Self::BestOffer | Self::WebCard => None,
        }
    }
}

/// Ordered editable columns of one view.
pub type ColumnSet = &'static [ColumnKind];

use ColumnKind as C;
use InstallmentTier as T;

const CATALOG_NORMAL: [ColumnKind; 4] = [C::ClassicPrice, C::RebatePrice, C::BestOffer, C::WebTransfer];
const STORE_NORMAL: [ColumnKind; 4] = [C::ClassicPrice, C::GremioPrice, C::WebTransfer, C::WebCard];
const INSTALLMENTS: [ColumnKind; 5] = [
    C::ClassicPrice,
    C::Installment(T::Three),
    C::Installment(T::Six),
    C::Installment(T::Nine),
    C::Installment(T::Twelve),
];
const PVP: [ColumnKind; 5] = [
    C::PvpClassic,
    C::PvpInstallment(T::Three),
    C::PvpInstallment(T::Six),
    C::PvpInstallment(T::Nine),
    C::PvpInstallment(T::Twelve),
];

/// Which column set the grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Normal,
    Installments,
    Pvp,
}

impl ViewMode {
    /// Editable columns for this view on `page`.
    ///
    /// The PVP view only exists on the store page; asking for it on the
    /// catalog page yields the normal set.
    #[must_use]
    pub const fn columns(self, page: PageVariant) -> ColumnSet {
        match (self, page) {
            (Self::Normal | Self::Pvp, PageVariant::Catalog) => &CATALOG_NORMAL,
            (Self::Normal, PageVariant::Store) => &STORE_NORMAL,
            (Self::Installments, _) => &INSTALLMENTS,
            (Self::Pvp, PageVariant::Store) => &PVP,
        }
    }

    /// Views offered on `page`, in cycle order.
    #[must_use]
    pub const fn available(page: PageVariant) -> &'static [Self] {
        match page {
            PageVariant::Catalog => &[Self::Normal, Self::Installments],
            PageVariant::Store => &[Self::Normal, Self::Installments, Self::Pvp],
        }
    }

    /// Next view on `page`, wrapping around.
    #[must_use]
    pub fn next(self, page: PageVariant) -> Self {
        let views = Self::available(page);
        let idx = views.iter().position(|v| *v == self).unwrap_or(0);
        views[(idx + 1) % views.len()]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Installments => "Cuotas",
            Self::Pvp => "PVP",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_columns_differ_by_page() {
        assert_eq!(
            ViewMode::Normal.columns(PageVariant::Catalog)[1],
            ColumnKind::RebatePrice
        );
        assert_eq!(
            ViewMode::Normal.columns(PageVariant::Store)[1],
            ColumnKind::GremioPrice
        );
        assert_eq!(ViewMode::Installments.columns(PageVariant::Store).len(), 5);
    }

    #[test]
    fn test_view_cycle_skips_pvp_on_catalog() {
        let page = PageVariant::Catalog;
        assert_eq!(ViewMode::Normal.next(page), ViewMode::Installments);
        assert_eq!(ViewMode::Installments.next(page), ViewMode::Normal);

        let page = PageVariant::Store;
        assert_eq!(ViewMode::Installments.next(page), ViewMode::Pvp);
        assert_eq!(ViewMode::Pvp.next(page), ViewMode::Normal);
    }

    #[test]
    fn test_edit_field_resolution() {
        assert_eq!(
            ColumnKind::ClassicPrice.edit_field(),
            Some(EditField::Price(PriceList::Web))
        );
        assert_eq!(
            ColumnKind::PvpInstallment(InstallmentTier::Nine).edit_field(),
            Some(EditField::Installment(PriceList::Pvp, InstallmentTier::Nine))
        );
        assert_eq!(ColumnKind::BestOffer.edit_field(), None);
        assert_eq!(ColumnKind::GremioPrice.edit_field(), None);
    }

    #[test]
    fn test_page_variant_parse() {
        assert_eq!(PageVariant::parse("Tienda"), Some(PageVariant::Store));
        assert_eq!(PageVariant::parse("catalog"), Some(PageVariant::Catalog));
        assert_eq!(PageVariant::parse("otro"), None);
    }
}
