//! Configuration for pricedesk.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//! - Persisted dashboard preferences
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pricedesk::config::{AppConfig, load_or_default};
//!
//! let (mut config, loaded_from) = load_or_default(None);
//! config.merge(&AppConfig::builder().api_url("https://precios.example.com/api").build());
//! ```
//!
//! # Configuration File
//!
//! Place a `.pricedesk.yaml` file in your project root or `~/.config/pricedesk/`:
//!
//! ```yaml
//! api:
//!   base_url: https://precios.example.com/api
//! defaults:
//!   rebate_percentage: 3.8
//! tui:
//!   page: store
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_API_URL, DEFAULT_LISTING_URL, DEFAULT_REBATE_PERCENTAGE, DEFAULT_SEARCH_URL,
    DEFAULT_WEB_TRANSFER_PERCENTAGE, THEMES,
};
pub use types::{
    ApiConfig, AppConfig, AppConfigBuilder, MarketplaceConfig, PricingConfig, TuiConfig,
    TuiPreferences,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    ConfigFileError, discover_config_file, generate_example_config, generate_full_example_config,
    load_config_file, load_or_default,
};

/// Generate a JSON Schema for the `.pricedesk.yaml` format.
///
/// Editors can use it for validation and autocompletion.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_sections() {
        let schema = generate_json_schema();
        for section in ["api", "defaults", "marketplace", "tui"] {
            assert!(schema.contains(section), "missing {section}");
        }
    }
}
