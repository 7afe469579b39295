//! Configuration types for pricedesk.

use super::defaults::{
    DEFAULT_API_URL, DEFAULT_LISTING_URL, DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE,
    DEFAULT_REBATE_PERCENTAGE, DEFAULT_SEARCH_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_WEB_TRANSFER_PERCENTAGE,
};
use crate::api::ApiClientConfig;
use crate::error::{PriceDeskError, Result};
use crate::grid::{GridSettings, PageVariant, PricingDefaults};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Top-level configuration, loaded from `.pricedesk.yaml` and overridden by
/// CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Pricing API connection
    pub api: ApiConfig,
    /// Percentages used when a product has none stored
    pub defaults: PricingConfig,
    /// URL templates for the clipboard shortcuts
    pub marketplace: MarketplaceConfig,
    /// Dashboard settings
    pub tui: TuiConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Settings handed to the grid controller.
    #[must_use]
    pub fn grid_settings(&self, preferences: &TuiPreferences) -> GridSettings {
        GridSettings {
            defaults: PricingDefaults {
                rebate_percentage: self.defaults.rebate_percentage,
                web_transfer_percentage: self.defaults.web_transfer_percentage,
            },
            listing_url: self.marketplace.listing_url.clone(),
            search_url: self.marketplace.search_url.clone(),
            auto_recalculate_installments: preferences.auto_recalculate_installments,
        }
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Fluent construction of an [`AppConfig`], used for CLI overrides.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    pub fn token(mut self, token: Option<String>) -> Self {
        self.config.api.token = token;
        self
    }

    pub fn token_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.api.token_file = path;
        self
    }

    pub const fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.api.timeout_secs = secs;
        self
    }

    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.config.tui.page = page.into();
        self
    }

    pub const fn page_size(mut self, size: u32) -> Self {
        self.config.tui.page_size = size;
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.config.tui.theme = theme.into();
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// API Configuration
// ============================================================================

/// Pricing API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the pricing API
    pub base_url: String,
    /// Request timeout in seconds
    #[schemars(range(min = 1, max = 600))]
    pub timeout_secs: u64,
    /// Retries for read-only requests
    pub max_retries: u8,
    /// Bearer token. Prefer `token_file` or `PRICEDESK_TOKEN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// File holding the bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            token: None,
            token_file: None,
        }
    }
}

impl ApiConfig {
    /// Resolve the token: inline value first, then the token file.
    pub fn resolve_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            return Ok(Some(token.to_string()));
        }
        match self.token_file {
            Some(ref path) => read_token_file(path).map(Some),
            None => Ok(None),
        }
    }

    /// Build the HTTP client configuration.
    pub fn to_client_config(&self) -> Result<ApiClientConfig> {
        Ok(ApiClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            token: self.resolve_token()?,
            max_retries: self.max_retries,
        })
    }
}

fn read_token_file(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PriceDeskError::io(path, e))?;
    let token = content.trim();
    if token.is_empty() {
        return Err(PriceDeskError::config(format!(
            "token file {} is empty",
            path.display()
        )));
    }
    Ok(token.to_string())
}

// ============================================================================
// Pricing and Marketplace
// ============================================================================

/// Default percentages for rebate and web transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PricingConfig {
    /// Rebate percentage offered when a product has none stored
    #[schemars(range(min = 0.0, max = 100.0))]
    pub rebate_percentage: f64,
    /// Web-transfer percentage offered when a product has none stored
    #[schemars(range(min = 0.0, max = 100.0))]
    pub web_transfer_percentage: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rebate_percentage: DEFAULT_REBATE_PERCENTAGE,
            web_transfer_percentage: DEFAULT_WEB_TRANSFER_PERCENTAGE,
        }
    }
}

/// URL templates copied by the clipboard shortcuts. `{code}` is replaced
/// with the product code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub listing_url: String,
    pub search_url: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

// ============================================================================
// TUI Configuration
// ============================================================================

/// Dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TuiConfig {
    /// Theme name: "dark", "light", or "high-contrast"
    pub theme: String,
    /// Page to open: "catalog" (productos) or "store" (tienda)
    pub page: String,
    /// Rows fetched per page
    #[schemars(range(min = 1, max = 500))]
    pub page_size: u32,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            page: "catalog".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TuiConfig {
    /// Page variant named by `page`, falling back to the catalog.
    #[must_use]
    pub fn page_variant(&self) -> PageVariant {
        PageVariant::parse(&self.page).unwrap_or_default()
    }
}

// ============================================================================
// TUI Preferences (persisted)
// ============================================================================

/// Preferences changed from inside the dashboard and remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiPreferences {
    /// Theme name: "dark", "light", or "high-contrast"
    pub theme: String,
    /// Recompute installments after a price change
    pub auto_recalculate_installments: bool,
}

impl Default for TuiPreferences {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            auto_recalculate_installments: true,
        }
    }
}

impl TuiPreferences {
    /// Get the path to the preferences file.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pricedesk").join("preferences.json"))
    }

    /// Load preferences from disk, or return defaults if not found.
    #[must_use]
    pub fn load() -> Self {
        Self::config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load from a specific file; unreadable or malformed files give defaults.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save preferences to disk.
    pub fn save(&self) -> std::io::Result<()> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::builder()
            .api_url("https://precios.example.com/api")
            .page("tienda")
            .page_size(100)
            .build();
        assert_eq!(config.api.base_url, "https://precios.example.com/api");
        assert_eq!(config.tui.page_variant(), PageVariant::Store);
        assert_eq!(config.tui.page_size, 100);
    }

    #[test]
    fn test_token_resolution_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("token");
        std::fs::write(&path, "  from-file\n").unwrap();

        let mut api = ApiConfig {
            token_file: Some(path),
            ..ApiConfig::default()
        };
        assert_eq!(api.resolve_token().unwrap().as_deref(), Some("from-file"));

        api.token = Some("inline".to_string());
        assert_eq!(api.resolve_token().unwrap().as_deref(), Some("inline"));
    }

    #[test]
    fn test_empty_token_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("token");
        std::fs::write(&path, "\n").unwrap();
        let api = ApiConfig {
            token_file: Some(path),
            ..ApiConfig::default()
        };
        assert!(api.resolve_token().is_err());
    }

    #[test]
    fn test_preferences_round_trip_on_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("preferences.json");

        let prefs = TuiPreferences {
            theme: "light".to_string(),
            auto_recalculate_installments: false,
        };
        prefs.save_to(&path).unwrap();
        assert_eq!(TuiPreferences::load_from(&path), prefs);
    }

    #[test]
    fn test_malformed_preferences_fall_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("preferences.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(TuiPreferences::load_from(&path), TuiPreferences::default());
    }

    #[test]
    fn test_grid_settings_follow_config() {
        let mut config = AppConfig::default();
        config.defaults.rebate_percentage = 4.5;
        let prefs = TuiPreferences {
            auto_recalculate_installments: false,
            ..TuiPreferences::default()
        };
        let settings = config.grid_settings(&prefs);
        assert!((settings.defaults.rebate_percentage - 4.5).abs() < f64::EPSILON);
        assert!(!settings.auto_recalculate_installments);
    }
}
