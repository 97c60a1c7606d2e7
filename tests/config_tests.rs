mod common;

use std::fs;

use common::setup_config_manager;
use demonstrativo_core::config::{Config, ConfigManager};
use demonstrativo_core::currency::format_currency_value;

#[test]
fn missing_file_yields_defaults() {
    let (manager, _) = setup_config_manager();
    let config = manager.load().unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.locale, "pt-BR");
    assert!(config.render_on_change);
}

#[test]
fn saved_settings_survive_a_new_manager() {
    let (manager, base) = setup_config_manager();
    let mut config = manager.load().unwrap();
    config.set("currency", "usd").unwrap();
    config.set("revenue_marker", "Entradas").unwrap();
    config.set("data_file", "/tmp/forest.json").unwrap();
    manager.save(&config).unwrap();

    let reloaded = ConfigManager::with_base_dir(base).unwrap().load().unwrap();
    assert_eq!(reloaded.currency, "USD");
    assert_eq!(reloaded.markers().revenue, "Entradas");
    assert_eq!(reloaded.get("data_file").as_deref(), Some("/tmp/forest.json"));
}

#[test]
fn partial_files_fill_in_defaults() {
    let (manager, _) = setup_config_manager();
    fs::write(manager.path(), r#"{"plain_output": true}"#).unwrap();
    let config = manager.load().unwrap();
    assert!(config.plain_output);
    assert_eq!(config.currency, "BRL");
}

#[test]
fn invalid_values_are_rejected() {
    let mut config = Config::default();
    assert!(config.set("render_on_change", "talvez").is_err());
    assert!(config.set("locale", "  ").is_err());
    let err = config.set("theme", "dark").unwrap_err();
    assert!(err.to_string().contains("unknown setting `theme`"));
    assert_eq!(config, Config::default());
}

#[test]
fn locale_drives_currency_formatting() {
    let config = Config::default();
    assert_eq!(
        format_currency_value(1234.5, &config.currency_code(), &config.locale_config()),
        "R$ 1.234,50"
    );
}
