//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::DEFAULT_API_URL;
use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".pricedesk.yaml",
    ".pricedesk.yml",
    "pricedesk.yaml",
    "pricedesk.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/pricedesk/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path
        && path.exists()
    {
        return Some(path.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir()
        && let Some(path) = find_config_in_dir(&cwd)
    {
        return Some(path);
    }

    if let Some(git_root) = find_git_root()
        && let Some(path) = find_config_in_dir(&git_root)
    {
        return Some(path);
    }

    if let Some(config_dir) = dirs::config_dir()
        && let Some(path) = find_config_in_dir(&config_dir.join("pricedesk"))
    {
        return Some(path);
    }

    if let Some(home) = dirs::home_dir()
        && let Some(path) = find_config_in_dir(&home)
    {
        return Some(path);
    }

    None
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    ///
    /// Used to layer CLI flags over the file config.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        if other.api.base_url != DEFAULT_API_URL {
            self.api.base_url.clone_from(&other.api.base_url);
        }
        if other.api.timeout_secs != defaults.api.timeout_secs {
            self.api.timeout_secs = other.api.timeout_secs;
        }
        if other.api.max_retries != defaults.api.max_retries {
            self.api.max_retries = other.api.max_retries;
        }
        if other.api.token.is_some() {
            self.api.token.clone_from(&other.api.token);
        }
        if other.api.token_file.is_some() {
            self.api.token_file.clone_from(&other.api.token_file);
        }

        if other.defaults != defaults.defaults {
            self.defaults = other.defaults.clone();
        }
        if other.marketplace.listing_url != defaults.marketplace.listing_url {
            self.marketplace
                .listing_url
                .clone_from(&other.marketplace.listing_url);
        }
        if other.marketplace.search_url != defaults.marketplace.search_url {
            self.marketplace
                .search_url
                .clone_from(&other.marketplace.search_url);
        }

        if other.tui.theme != defaults.tui.theme {
            self.tui.theme.clone_from(&other.tui.theme);
        }
        if other.tui.page != defaults.tui.page {
            self.tui.page.clone_from(&other.tui.page);
        }
        if other.tui.page_size != defaults.tui.page_size {
            self.tui.page_size = other.tui.page_size;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# pricedesk configuration
# Place this file at .pricedesk.yaml in your project root or ~/.config/pricedesk/

{}
",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# pricedesk configuration file
# =============================
#
# Place it at:
#   - .pricedesk.yaml in the current directory or git root
#   - ~/.config/pricedesk/pricedesk.yaml for a per-user config
#
# CLI flags always override file settings.

# Pricing API
api:
  base_url: http://localhost:8002/api
  # Request timeout in seconds
  timeout_secs: 30
  # Retries for read-only requests (mutations are never retried)
  max_retries: 2
  # Bearer token file; PRICEDESK_TOKEN or --token also work
  # token_file: ~/.config/pricedesk/token

# Percentages offered when a product has none stored
defaults:
  rebate_percentage: 3.8
  web_transfer_percentage: 6.0

# Clipboard link templates; {code} is replaced with the product code
marketplace:
  listing_url: https://listado.mercadolibre.com.ar/{code}
  search_url: https://www.google.com/search?q={code}

# Dashboard
tui:
  # Theme: dark, light, high-contrast
  theme: dark
  # Page: catalog (productos) or store (tienda)
  page: catalog
  page_size: 50
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".pricedesk.yaml");
        std::fs::write(&config_path, "tui:\n  theme: light\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
api:
  base_url: https://precios.example.com/api
  timeout_secs: 10
defaults:
  rebate_percentage: 4.2
tui:
  page: tienda
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.api.base_url, "https://precios.example.com/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert!((config.defaults.rebate_percentage - 4.2).abs() < f64::EPSILON);
        // Unset fields keep their defaults
        assert!((config.defaults.web_transfer_percentage - 6.0).abs() < f64::EPSILON);
        assert_eq!(config.tui.page_variant(), crate::grid::PageVariant::Store);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "api: [unclosed").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::builder()
            .api_url("https://file.example.com/api")
            .theme("light")
            .build();
        let overrides = AppConfig::builder()
            .api_url("https://cli.example.com/api")
            .token(Some("secret".to_string()))
            .build();

        base.merge(&overrides);

        assert_eq!(base.api.base_url, "https://cli.example.com/api");
        assert_eq!(base.api.token.as_deref(), Some("secret"));
        // Defaults in the override do not clobber file values
        assert_eq!(base.tui.theme, "light");
    }

    #[test]
    fn test_generate_example_config() {
        let example = generate_example_config();
        assert!(example.contains("api:"));
        assert!(example.contains("listing_url"));

        let parsed: AppConfig =
            serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "tui:\n  theme: dark").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}
