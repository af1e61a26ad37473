use alu_config::{BackendKind, Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_targets_local_backend_in_dirhams() {
    let cfg = Config::default();

    assert_eq!(cfg.currency, "MAD");
    assert_eq!(cfg.precision(), 2);
    assert_eq!(cfg.backend.kind, BackendKind::Local);
    assert_eq!(cfg.backend.request_timeout_secs, 30);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.set_value("backend.kind", "remote").expect("kind");
    cfg.set_value("backend.base_url", "https://devis.example.ma/")
        .expect("url");
    cfg.set_value("currency", "eur").expect("currency");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.currency, "EUR");
    assert_eq!(
        loaded.backend.base_url.as_deref(),
        Some("https://devis.example.ma")
    );
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("home")).expect("manager");
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"locale":"en-US","currency":"USD","backend":{"kind":"bogus"}}"#,
    )
    .expect("write");
    let loaded = ConfigManager::new(path).load().expect("load");
    assert!(loaded.ui_color_enabled);
    assert_eq!(loaded.backend.kind, BackendKind::Local);
}

#[test]
fn invalid_values_are_rejected() {
    let mut cfg = Config::default();
    assert!(matches!(
        cfg.set_value("currency_precision", "12"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set_value("backend.kind", "cloud"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set_value("theme", "dark"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert_eq!(cfg, Config::default());
}

#[test]
fn secrets_are_masked_when_shown() {
    let mut cfg = Config::default();
    cfg.set_value("backend.session_cookie", "session=abc")
        .expect("cookie");
    assert_eq!(
        cfg.value_of("backend.session_cookie").expect("value"),
        "********"
    );
    for key in Config::KEYS {
        assert!(cfg.value_of(key).is_ok(), "{key}");
    }
}
