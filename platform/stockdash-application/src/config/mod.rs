use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use stockdash_domain::value_objects::chart_type::ChartType;
use stockdash_domain::value_objects::stock::Stock;
use stockdash_domain::value_objects::theme::Theme;

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5000;
/// Largest delay a browser timer honours (i32::MAX milliseconds).
pub const MAX_REFRESH_INTERVAL_MS: u64 = i32::MAX as u64;
pub const DEFAULT_BIND: &str = "127.0.0.1:8050";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ui: UiConfig,
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub default_stock: Stock,
    pub default_chart_type: ChartType,
    pub default_theme: Theme,
    pub refresh_interval_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_stock: Stock::Apple,
            default_chart_type: ChartType::Bar,
            default_theme: Theme::Light,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        self.bind
            .trim()
            .parse()
            .map_err(|err| format!("invalid server.bind {:?} (expected host:port): {err}", self.bind))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.ui.refresh_interval_ms == 0 {
            return Err("ui.refresh_interval_ms must be > 0".to_string());
        }
        if self.ui.refresh_interval_ms > MAX_REFRESH_INTERVAL_MS {
            return Err(format!(
                "ui.refresh_interval_ms must be <= {MAX_REFRESH_INTERVAL_MS}, got {}",
                self.ui.refresh_interval_ms
            ));
        }
        self.server.bind_addr()?;
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    config
        .validate()
        .map_err(|err| format!("invalid config {}: {err}", path.display()))?;
    Ok(config)
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
