// ABOUTME: Configuration module for the cardpost application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::export::{ImageFormat, RasterOptions};
use crate::settings::JsonSettingsStore;
use std::env;
use std::path::PathBuf;

const DEFAULT_TIMEOUT_MS: u64 = 30000;
pub(crate) const DEFAULT_SCALE: f64 = 4.0;
pub(crate) const DEFAULT_WIDTH: u32 = 480;
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub browser_path: Option<String>,
    pub default_timeout_ms: u64,
    pub default_scale: f64,
    pub default_width: u32,
    pub debounce_ms: u64,
    pub settings_path: PathBuf,
    pub embed_resources: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_path: None,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            default_scale: DEFAULT_SCALE,
            default_width: DEFAULT_WIDTH,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            settings_path: default_settings_path(),
            embed_resources: true,
        }
    }
}

fn default_settings_path() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config/cardpost/settings.json"),
        None => PathBuf::from("cardpost-settings.json"),
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            browser_path: env::var("BROWSER_PATH").ok().filter(|p| !p.is_empty()),
            default_timeout_ms: env_parse("CARDPOST_TIMEOUT_MS").unwrap_or(defaults.default_timeout_ms),
            default_scale: env_parse::<f64>("CARDPOST_SCALE")
                .filter(|s| *s > 0.0)
                .unwrap_or(defaults.default_scale),
            default_width: env_parse::<u32>("CARDPOST_WIDTH")
                .filter(|w| *w > 0)
                .unwrap_or(defaults.default_width),
            debounce_ms: env_parse("CARDPOST_DEBOUNCE_MS").unwrap_or(defaults.debounce_ms),
            settings_path: env::var_os("CARDPOST_SETTINGS")
                .map(PathBuf::from)
                .unwrap_or(defaults.settings_path),
            embed_resources: env::var("CARDPOST_EMBED_RESOURCES")
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(defaults.embed_resources),
        }
    }

    /// Get rasterizer options with defaults from this config
    pub fn get_raster_options(
        &self,
        width: Option<u32>,
        scale: Option<f64>,
        format: Option<ImageFormat>,
        timeout_ms: Option<u64>,
    ) -> RasterOptions {
        RasterOptions {
            width: width.unwrap_or(self.default_width),
            scale: scale.unwrap_or(self.default_scale),
            format: format.unwrap_or_default(),
            timeout_ms: timeout_ms.unwrap_or(self.default_timeout_ms),
            browser_path: self.browser_path.clone(),
            ..RasterOptions::default()
        }
    }

    /// Settings store at the given path, or the configured one
    pub fn settings_store(&self, path: Option<PathBuf>) -> JsonSettingsStore {
        JsonSettingsStore::new(path.unwrap_or_else(|| self.settings_path.clone()))
    }
}
