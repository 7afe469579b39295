//! Configuration validation for pricedesk.

use super::defaults::{CODE_PLACEHOLDER, MAX_PAGE_SIZE, THEMES};
use super::types::{ApiConfig, AppConfig, MarketplaceConfig, PricingConfig, TuiConfig};
use crate::grid::PageVariant;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.api.validate());
        errors.extend(self.defaults.validate());
        errors.extend(self.marketplace.validate());
        errors.extend(self.tui.validate());
        errors
    }
}

impl Validatable for ApiConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        match reqwest::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ConfigError::new(
                "api.base_url",
                format!("Unsupported scheme '{}', expected http or https", url.scheme()),
            )),
            Err(e) => errors.push(ConfigError::new(
                "api.base_url",
                format!("Invalid URL '{}': {e}", self.base_url),
            )),
        }

        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "api.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }

        if let Some(ref path) = self.token_file
            && !path.exists()
        {
            errors.push(ConfigError::new(
                "api.token_file",
                format!("Token file does not exist: {}", path.display()),
            ));
        }

        errors
    }
}

impl Validatable for PricingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("defaults.rebate_percentage", self.rebate_percentage),
            ("defaults.web_transfer_percentage", self.web_transfer_percentage),
        ] {
            if !(0.0..=100.0).contains(&value) {
                errors.push(ConfigError::new(
                    field,
                    format!("Percentage must be between 0 and 100, got {value}"),
                ));
            }
        }
        errors
    }
}

impl Validatable for MarketplaceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (field, template) in [
            ("marketplace.listing_url", &self.listing_url),
            ("marketplace.search_url", &self.search_url),
        ] {
            if !template.contains(CODE_PLACEHOLDER) {
                errors.push(ConfigError::new(
                    field,
                    format!("Template must contain {CODE_PLACEHOLDER}"),
                ));
            } else if reqwest::Url::parse(&template.replace(CODE_PLACEHOLDER, "X")).is_err() {
                errors.push(ConfigError::new(
                    field,
                    format!("Template is not a valid URL: {template}"),
                ));
            }
        }
        errors
    }
}

impl Validatable for TuiConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !THEMES.contains(&self.theme.as_str()) {
            errors.push(ConfigError::new(
                "tui.theme",
                format!(
                    "Invalid theme '{}'. Valid options: {}",
                    self.theme,
                    THEMES.join(", ")
                ),
            ));
        }

        if PageVariant::parse(&self.page).is_none() {
            errors.push(ConfigError::new(
                "tui.page",
                format!(
                    "Invalid page '{}'. Valid options: catalog, store",
                    self.page
                ),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            errors.push(ConfigError::new(
                "tui.page_size",
                format!(
                    "Page size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                    self.page_size
                ),
            ));
        }

        errors
    }
}
