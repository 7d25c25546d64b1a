use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_without_file_or_env() {
    let settings = settings_from_sources(None, env_from(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    settings.validate().expect("defaults are valid");
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
        base_url = "http://localhost:9000"
        page_size = 25
        search_debounce_ms = "250"
        retry_max_attempts = 5
    "#;
    let settings = settings_from_sources(Some(raw), env_from(&[])).expect("settings");

    assert_eq!(settings.base_url, "http://localhost:9000");
    assert_eq!(settings.page_size, 25);
    assert_eq!(settings.search_debounce_ms, 250);
    assert_eq!(settings.retry_max_attempts, 5);
    assert_eq!(settings.request_timeout_secs, 15);
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let raw = r#"base_url = "http://file.example""#;
    let settings = settings_from_sources(
        Some(raw),
        env_from(&[
            ("CATALOG_BASE_URL", "http://plain.example"),
            ("APP__BASE_URL", "http://app.example"),
            ("APP__PAGE_SIZE", "20"),
            ("APP__REQUEST_TIMEOUT_SECS", "3"),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.base_url, "http://app.example");
    assert_eq!(settings.page_size, 20);
    assert_eq!(settings.request_timeout_secs, 3);
}

#[test]
fn unparseable_numbers_keep_previous_value() {
    let settings = settings_from_sources(
        Some("page_size = \"lots\""),
        env_from(&[("APP__SEARCH_DEBOUNCE_MS", "-1")]),
    )
    .expect("settings");
    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.search_debounce_ms, 500);
}

#[test]
fn malformed_file_is_an_error() {
    let err = settings_from_sources(Some("page_size = ["), env_from(&[])).expect_err("bad toml");
    assert!(err.to_string().contains("failed to parse settings file"));
}

#[test]
fn validation_rejects_bad_urls_and_zero_page_size() {
    let mut settings = Settings {
        base_url: "not a url".into(),
        ..Settings::default()
    };
    assert!(settings.validate().is_err());

    settings.base_url = "ftp://catalog.example".into();
    assert!(settings.validate().is_err());

    settings.base_url = "https://catalog.example".into();
    settings.page_size = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn converts_into_client_and_list_configs() {
    let settings = Settings {
        page_size: 12,
        search_debounce_ms: 300,
        request_timeout_secs: 4,
        retry_max_attempts: 2,
        retry_initial_backoff_ms: 50,
        retry_max_backoff_ms: 400,
        ..Settings::default()
    };

    let client = settings.client_config();
    assert_eq!(client.request_timeout, Duration::from_secs(4));
    assert_eq!(client.retry.max_attempts, 2);
    assert_eq!(client.retry.initial_backoff, Duration::from_millis(50));
    assert_eq!(client.retry.max_backoff, Duration::from_millis(400));

    let list = settings.list_config();
    assert_eq!(list.page_size, 12);
    assert_eq!(list.search_debounce, Duration::from_millis(300));
}

#[test]
fn missing_settings_file_falls_back_to_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("catalog_browser_missing_{suffix}.toml"));

    let settings = load_settings(Some(&path)).expect("settings");
    assert_eq!(settings.page_size, Settings::default().page_size);
}

#[test]
fn reads_settings_file_from_disk() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("catalog_browser_settings_{suffix}.toml"));
    fs::write(&path, "page_size = 7\n").expect("write settings");

    let settings = load_settings(Some(&path)).expect("settings");
    assert_eq!(settings.page_size, 7);

    fs::remove_file(path).expect("cleanup");
}
