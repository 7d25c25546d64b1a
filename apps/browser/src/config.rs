use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::{CatalogClientConfig, ListConfig, RetryPolicy, DEFAULT_BASE_URL};
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
    pub retry_max_attempts: u32,
    pub retry_initial_backoff_ms: u64,
    pub retry_max_backoff_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            page_size: 10,
            search_debounce_ms: 500,
            request_timeout_secs: 15,
            retry_max_attempts: 3,
            retry_initial_backoff_ms: 200,
            retry_max_backoff_ms: 2_000,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid catalog base url '{}'", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("catalog base url must use http or https, got '{}'", url.scheme());
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        Ok(())
    }

    pub fn client_config(&self) -> CatalogClientConfig {
        CatalogClientConfig {
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            retry: RetryPolicy {
                max_attempts: self.retry_max_attempts,
                initial_backoff: Duration::from_millis(self.retry_initial_backoff_ms),
                max_backoff: Duration::from_millis(self.retry_max_backoff_ms),
            },
        }
    }

    pub fn list_config(&self) -> ListConfig {
        ListConfig {
            page_size: self.page_size,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }
}

/// Defaults, then the settings file (if readable), then the environment.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };
    settings_from_sources(raw.as_deref(), |key| std::env::var(key).ok())
}

pub fn settings_from_sources(
    file_raw: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file_raw {
        let file_cfg: toml::Table = toml::from_str(raw).context("failed to parse settings file")?;
        let get = |key: &str| file_cfg.get(key).and_then(scalar_to_string);
        if let Some(v) = get("base_url") {
            settings.base_url = v;
        }
        apply_numeric(&mut settings.page_size, get("page_size"));
        apply_numeric(&mut settings.search_debounce_ms, get("search_debounce_ms"));
        apply_numeric(&mut settings.request_timeout_secs, get("request_timeout_secs"));
        apply_numeric(&mut settings.retry_max_attempts, get("retry_max_attempts"));
        apply_numeric(
            &mut settings.retry_initial_backoff_ms,
            get("retry_initial_backoff_ms"),
        );
        apply_numeric(&mut settings.retry_max_backoff_ms, get("retry_max_backoff_ms"));
    }

    if let Some(v) = env("CATALOG_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }
    apply_numeric(&mut settings.page_size, env("APP__PAGE_SIZE"));
    apply_numeric(&mut settings.search_debounce_ms, env("APP__SEARCH_DEBOUNCE_MS"));
    apply_numeric(
        &mut settings.request_timeout_secs,
        env("APP__REQUEST_TIMEOUT_SECS"),
    );
    apply_numeric(&mut settings.retry_max_attempts, env("APP__RETRY_MAX_ATTEMPTS"));
    apply_numeric(
        &mut settings.retry_initial_backoff_ms,
        env("APP__RETRY_INITIAL_BACKOFF_MS"),
    );
    apply_numeric(
        &mut settings.retry_max_backoff_ms,
        env("APP__RETRY_MAX_BACKOFF_MS"),
    );

    Ok(settings)
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(v) => Some(v.clone()),
        toml::Value::Integer(v) => Some(v.to_string()),
        _ => None,
    }
}

// Unparseable values keep the previous setting.
fn apply_numeric<T: std::str::FromStr>(target: &mut T, raw: Option<String>) {
    if let Some(parsed) = raw.and_then(|v| v.trim().parse::<T>().ok()) {
        *target = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
