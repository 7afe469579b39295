//! Default values for pricedesk configuration.

/// Pricing API base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8002/api";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Retries for read-only requests.
pub const DEFAULT_MAX_RETRIES: u8 = 2;

/// Rebate percentage offered when a product has none stored.
pub const DEFAULT_REBATE_PERCENTAGE: f64 = 3.8;

/// Web-transfer percentage offered when a product has none stored.
pub const DEFAULT_WEB_TRANSFER_PERCENTAGE: f64 = 6.0;

/// Marketplace listing link copied by Ctrl+Shift+2.
pub const DEFAULT_LISTING_URL: &str = "https://listado.mercadolibre.com.ar/{code}";

/// Marketplace search link copied by Ctrl+Shift+3.
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search?q={code}";

/// Placeholder replaced with the product code in URL templates.
pub const CODE_PLACEHOLDER: &str = "{code}";

/// Rows fetched per page.
pub const DEFAULT_PAGE_SIZE: u32 = crate::model::DEFAULT_PAGE_SIZE;

/// Largest page the backend accepts.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Theme names understood by the TUI.
pub const THEMES: [&str; 3] = ["dark", "light", "high-contrast"];
