//! Config file loading, CLI overrides and validation, end to end.

use pricedesk::config::{AppConfig, TuiPreferences, Validatable, generate_json_schema};
use pricedesk::grid::PageVariant;
use tempfile::TempDir;

fn write_config(dir: &TempDir, yaml: &str) -> std::path::PathBuf {
    let path = dir.path().join(".pricedesk.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn test_file_then_cli_overrides() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        &tmp,
        r"
api:
  base_url: https://file.example.com/api
  timeout_secs: 5
tui:
  page: store
  theme: light
",
    );

    let overrides = AppConfig::builder()
        .api_url("https://cli.example.com/api")
        .build();
    let (config, loaded_from) = AppConfig::from_file_with_overrides(Some(&path), &overrides);

    assert_eq!(loaded_from.as_deref(), Some(path.as_path()));
    assert_eq!(config.api.base_url, "https://cli.example.com/api");
    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(config.tui.page_variant(), PageVariant::Store);
    assert_eq!(config.tui.theme, "light");
    assert!(config.is_valid());
}

#[test]
fn test_invalid_file_reports_every_field() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        &tmp,
        r"
api:
  base_url: ftp://prices.example.com
defaults:
  rebate_percentage: 140
marketplace:
  search_url: https://example.com/search
tui:
  theme: neon
",
    );

    let (config, _) = AppConfig::from_file_with_overrides(Some(&path), &AppConfig::default());
    let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
    assert_eq!(
        fields,
        vec![
            "api.base_url",
            "defaults.rebate_percentage",
            "marketplace.search_url",
            "tui.theme",
        ]
    );
}

#[test]
fn test_token_file_feeds_client_config() {
    let tmp = TempDir::new().unwrap();
    let token_path = tmp.path().join("token");
    std::fs::write(&token_path, "  abc.def.ghi\n").unwrap();

    let config = AppConfig::builder()
        .token_file(Some(token_path))
        .build();
    let client = config.api.to_client_config().unwrap();
    assert_eq!(client.token.as_deref(), Some("abc.def.ghi"));
}

#[test]
fn test_preferences_persist_between_runs() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("preferences.json");

    let prefs = TuiPreferences {
        theme: "high-contrast".to_string(),
        auto_recalculate_installments: false,
    };
    prefs.save_to(&path).unwrap();

    let loaded = TuiPreferences::load_from(&path);
    assert_eq!(loaded, prefs);

    let config = AppConfig::default();
    assert!(!config.grid_settings(&loaded).auto_recalculate_installments);
}

#[test]
fn test_schema_is_json() {
    let schema: serde_json::Value = serde_json::from_str(&generate_json_schema()).unwrap();
    let properties = schema["properties"].as_object().unwrap();
    for section in ["api", "defaults", "marketplace", "tui"] {
        assert!(properties.contains_key(section), "missing {section}");
    }
}
