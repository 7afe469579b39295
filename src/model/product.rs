//! Product rows, price ladders, permissions and catalog stats.

use super::ColorTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque product identifier assigned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Installment plan length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstallmentTier {
    Three,
    Six,
    Nine,
    Twelve,
}

impl InstallmentTier {
    pub const ALL: [Self; 4] = [Self::Three, Self::Six, Self::Nine, Self::Twelve];

    /// Number of payments.
    #[must_use]
    pub const fn payments(self) -> u8 {
        match self {
            Self::Three => 3,
            Self::Six => 6,
            Self::Nine => 9,
            Self::Twelve => 12,
        }
    }
}

impl fmt::Display for InstallmentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cuotas", self.payments())
    }
}

/// Which price ladder a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceList {
    /// Web channel prices
    #[default]
    Web,
    /// Suggested retail prices
    Pvp,
}

impl PriceList {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Web => "Web",
            Self::Pvp => "PVP",
        }
    }
}

/// Prices for the four installment tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallmentPrices {
    #[serde(rename = "cuotas_3")]
    pub three: Option<f64>,
    #[serde(rename = "cuotas_6")]
    pub six: Option<f64>,
    #[serde(rename = "cuotas_9")]
    pub nine: Option<f64>,
    #[serde(rename = "cuotas_12")]
    pub twelve: Option<f64>,
}

impl InstallmentPrices {
    #[must_use]
    pub const fn get(&self, tier: InstallmentTier) -> Option<f64> {
        match tier {
            InstallmentTier::Three => self.three,
            InstallmentTier::Six => self.six,
            InstallmentTier::Nine => self.nine,
            InstallmentTier::Twelve => self.twelve,
        }
    }

    pub const fn set(&mut self, tier: InstallmentTier, value: Option<f64>) {
        match tier {
            InstallmentTier::Three => self.three = value,
            InstallmentTier::Six => self.six = value,
            InstallmentTier::Nine => self.nine = value,
            InstallmentTier::Twelve => self.twelve = value,
        }
    }
}

/// Suggested-retail ladder, parallel to the web ladder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PvpPrices {
    #[serde(rename = "precio_clasica")]
    pub classic: Option<f64>,
    #[serde(rename = "cuotas")]
    pub installments: InstallmentPrices,
}

/// Participation in a markup/discount scheme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participation {
    #[serde(rename = "participa")]
    pub enabled: bool,
    #[serde(rename = "porcentaje")]
    pub percentage: Option<f64>,
}

/// A catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "codigo", default)]
    pub code: String,
    #[serde(rename = "marca", default)]
    pub brand: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(rename = "precio_clasica", default)]
    pub classic_price: Option<f64>,
    #[serde(rename = "precio_rebate", default)]
    pub rebate_price: Option<f64>,
    #[serde(rename = "precio_gremio", default)]
    pub gremio_price: Option<f64>,
    #[serde(rename = "mejor_oferta", default)]
    pub best_offer: Option<f64>,
    #[serde(rename = "precio_web_transferencia", default)]
    pub web_transfer_price: Option<f64>,
    #[serde(rename = "precio_web_tarjeta", default)]
    pub web_card_price: Option<f64>,
    #[serde(rename = "cuotas", default)]
    pub installments: InstallmentPrices,
    #[serde(default)]
    pub pvp: PvpPrices,
    #[serde(default)]
    pub rebate: Participation,
    #[serde(rename = "web_transferencia", default)]
    pub web_transfer: Participation,
    #[serde(default)]
    pub out_of_cards: bool,
    #[serde(default)]
    pub color: ColorTag,
    #[serde(rename = "actualizado", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Minimal row, mostly useful for tests and the demo catalog.
    #[must_use]
    pub fn new(id: u64, code: impl Into<String>) -> Self {
        Self {
            id: ProductId(id),
            code: code.into(),
            brand: None,
            description: String::new(),
            stock: 0,
            classic_price: None,
            rebate_price: None,
            gremio_price: None,
            best_offer: None,
            web_transfer_price: None,
            web_card_price: None,
            installments: InstallmentPrices::default(),
            pvp: PvpPrices::default(),
            rebate: Participation::default(),
            web_transfer: Participation::default(),
            out_of_cards: false,
            color: ColorTag::None,
            updated_at: None,
        }
    }

    /// Base price of a ladder.
    #[must_use]
    pub const fn price(&self, list: PriceList) -> Option<f64> {
        match list {
            PriceList::Web => self.classic_price,
            PriceList::Pvp => self.pvp.classic,
        }
    }

    pub const fn set_price(&mut self, list: PriceList, value: Option<f64>) {
        match list {
            PriceList::Web => self.classic_price = value,
            PriceList::Pvp => self.pvp.classic = value,
        }
    }

    #[must_use]
    pub const fn installment(&self, list: PriceList, tier: InstallmentTier) -> Option<f64> {
        match list {
            PriceList::Web => self.installments.get(tier),
            PriceList::Pvp => self.pvp.installments.get(tier),
        }
    }

    pub const fn set_installment(
        &mut self,
        list: PriceList,
        tier: InstallmentTier,
        value: Option<f64>,
    ) {
        match list {
            PriceList::Web => self.installments.set(tier, value),
            PriceList::Pvp => self.pvp.installments.set(tier, value),
        }
    }

    /// Whether the code can be used for clipboard shortcuts.
    #[must_use]
    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }
}

/// A page of products as returned by the list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPage {
    #[serde(rename = "productos")]
    pub items: Vec<Product>,
    pub total: u64,
}

/// Catalog counters shown in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogStats {
    pub total: u64,
    #[serde(rename = "con_stock")]
    pub with_stock: u64,
    #[serde(rename = "sin_precio")]
    pub without_price: u64,
    #[serde(rename = "con_rebate")]
    pub with_rebate: u64,
    pub out_of_cards: u64,
}

// ============================================================================
// Permissions
// ============================================================================

/// What the signed-in user may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub edit_prices: bool,
    pub edit_rebate: bool,
    pub edit_web_transfer: bool,
    pub edit_colors: bool,
    pub edit_out_of_cards: bool,
}

impl Permissions {
    pub const PRICES: &'static str = "productos.editar_precios";
    pub const REBATE: &'static str = "productos.toggle_rebate";
    pub const WEB_TRANSFER: &'static str = "productos.toggle_web_transferencia";
    pub const COLORS: &'static str = "productos.editar_color";
    pub const OUT_OF_CARDS: &'static str = "productos.toggle_out_of_cards";

    #[must_use]
    pub const fn all() -> Self {
        Self {
            edit_prices: true,
            edit_rebate: true,
            edit_web_transfer: true,
            edit_colors: true,
            edit_out_of_cards: true,
        }
    }

    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            edit_prices: false,
            edit_rebate: false,
            edit_web_transfer: false,
            edit_colors: false,
            edit_out_of_cards: false,
        }
    }

    /// Build from the permission names returned by `/auth/me`.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut perms = Self::read_only();
        for name in names {
            match name {
                Self::PRICES => perms.edit_prices = true,
                Self::REBATE => perms.edit_rebate = true,
                Self::WEB_TRANSFER => perms.edit_web_transfer = true,
                Self::COLORS => perms.edit_colors = true,
                Self::OUT_OF_CARDS => perms.edit_out_of_cards = true,
                "admin" => return Self::all(),
                _ => {}
            }
        }
        perms
    }
}
