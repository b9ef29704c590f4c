use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const BASE_URL_ENV: &str = "ALGOSIM_API_BASE_URL";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub service: ServiceConfig,
    pub request: RequestConfig,
    pub parameters: Option<BTreeMap<String, f64>>,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RequestConfig {
    pub run_id: Option<String>,
    pub ticker: String,
    pub start_date: String,
    pub end_date: String,
    pub initial_capital: f64,
    pub strategy: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub out_dir: String,
    pub html: Option<bool>,
}

impl ServiceConfig {
    /// `ALGOSIM_API_BASE_URL` wins over the config value; both fall back to
    /// the local default.
    pub fn resolve_base_url(&self) -> String {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        resolve_base_url_with(self.base_url.as_deref(), env_value.as_deref())
    }
}

fn resolve_base_url_with(configured: Option<&str>, env_value: Option<&str>) -> String {
    env_value
        .filter(|v| !v.trim().is_empty())
        .or(configured.filter(|v| !v.trim().is_empty()))
        .unwrap_or(DEFAULT_BASE_URL)
        .trim()
        .trim_end_matches('/')
        .to_string()
}

impl OutputConfig {
    pub fn html_enabled(&self) -> bool {
        self.html.unwrap_or(true)
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config = load_config_from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    Ok((config, contents))
}

pub fn load_config_from_str(contents: &str) -> Result<Config, String> {
    toml::from_str(contents).map_err(|err| err.to_string())
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
