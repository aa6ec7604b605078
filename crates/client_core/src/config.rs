use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE: &str = "patent_client.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Origin of the staged `/api/v1/...` workflow endpoints.
    pub api_base_url: String,
    /// Origin of the one-shot dashboard endpoints under `/api/...`.
    pub dashboard_base_url: String,
    pub transition_delay_ms: u64,
    pub summary_delay_ms: u64,
    pub certificate_delay_ms: u64,
    pub particle_count: usize,
    pub connection_threshold_px: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".into(),
            dashboard_base_url: "http://localhost:8080".into(),
            transition_delay_ms: 500,
            summary_delay_ms: 2_000,
            certificate_delay_ms: 3_000,
            particle_count: 120,
            connection_threshold_px: 150.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{key} is not a valid url ('{value}'): {source}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("{key} must use http or https, got '{scheme}'")]
    UnsupportedScheme { key: &'static str, scheme: String },
    #[error("connection_threshold_px must be a positive finite distance, got {0}")]
    InvalidThreshold(f32),
}

impl Settings {
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    pub fn summary_delay(&self) -> Duration {
        Duration::from_millis(self.summary_delay_ms)
    }

    pub fn certificate_delay(&self) -> Duration {
        Duration::from_millis(self.certificate_delay_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_base_url("api_base_url", &self.api_base_url)?;
        validate_base_url("dashboard_base_url", &self.dashboard_base_url)?;
        if !is_usable_threshold(&self.connection_threshold_px) {
            return Err(SettingsError::InvalidThreshold(self.connection_threshold_px));
        }
        Ok(())
    }
}

pub fn validate_base_url(key: &'static str, value: &str) -> Result<Url, SettingsError> {
    let url = Url::parse(value.trim()).map_err(|source| SettingsError::InvalidUrl {
        key,
        value: value.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(SettingsError::UnsupportedScheme {
            key,
            scheme: scheme.to_string(),
        }),
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> Settings {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with<F>(path: &Path, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<Settings>(&raw) {
            Ok(file_cfg) => settings = file_cfg,
            Err(err) => warn!("ignoring unreadable settings file {}: {err}", path.display()),
        }
    }

    apply_overrides(&mut settings, lookup);
    settings
}

/// Applies environment-style overrides; later keys in each list win.
pub fn apply_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for key in ["PATENT_API_URL", "APP__API_BASE_URL"] {
        if let Some(v) = lookup(key) {
            settings.api_base_url = v;
        }
    }
    for key in ["PATENT_DASHBOARD_URL", "APP__DASHBOARD_BASE_URL"] {
        if let Some(v) = lookup(key) {
            settings.dashboard_base_url = v;
        }
    }

    override_parsed(&lookup, "APP__TRANSITION_DELAY_MS", &mut settings.transition_delay_ms);
    override_parsed(&lookup, "APP__SUMMARY_DELAY_MS", &mut settings.summary_delay_ms);
    override_parsed(&lookup, "APP__CERTIFICATE_DELAY_MS", &mut settings.certificate_delay_ms);
    override_parsed(&lookup, "APP__PARTICLE_COUNT", &mut settings.particle_count);
    override_checked(
        &lookup,
        "APP__CONNECTION_THRESHOLD_PX",
        &mut settings.connection_threshold_px,
        is_usable_threshold,
    );
}

fn is_usable_threshold(threshold: &f32) -> bool {
    threshold.is_finite() && *threshold > 0.0
}

fn override_parsed<F, T>(lookup: &F, key: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    override_checked(lookup, key, slot, |_| true);
}

fn override_checked<F, T>(lookup: &F, key: &str, slot: &mut T, accept: fn(&T) -> bool)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(parsed) if accept(&parsed) => *slot = parsed,
        _ => warn!("ignoring {key}={raw}: not a valid value"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
