use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants;
use crate::error::Result;

/// Runtime settings for a single run. Every field falls back to the
/// built-in constants, so the config file is optional; a partial
/// `config.toml` overrides only the fields it names.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub cdc_url: String,
    pub counties_url: String,
    pub cdc_cache_file: String,
    pub counties_cache_file: String,
    pub risk_json_file: String,
    pub risk_csv_file: String,
    pub timeout_seconds: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cdc_url: constants::CDC_URL.to_string(),
            counties_url: constants::COUNTIES_URL.to_string(),
            cdc_cache_file: constants::CDC_CACHE_FILE.to_string(),
            counties_cache_file: constants::COUNTIES_CACHE_FILE.to_string(),
            risk_json_file: constants::RISK_JSON_FILE.to_string(),
            risk_csv_file: constants::RISK_CSV_FILE.to_string(),
            timeout_seconds: constants::HTTP_TIMEOUT_SECONDS,
        }
    }
}

impl RunConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: RunConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
