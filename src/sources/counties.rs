use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Result, RiskError};

pub const SOURCE_NAME: &str = "counties";

/// The demographic feed is a map from an opaque display-name key to a
/// record. The key is never used for joining — only the embedded FIPS
/// string is. A `BTreeMap` keeps iteration (and therefore output)
/// order deterministic across runs.
pub type DemoFeed = BTreeMap<String, DemoCounty>;

/// One county as published by the demographic source. FIPS is a string
/// here (zero-padded, e.g. "06037") and must be converted before use;
/// the source's own density value is unreliable and recomputed
/// downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoCounty {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub fips: String,
    #[serde(default)]
    pub population: i64,
    #[serde(default)]
    pub area: i64,
    #[serde(default)]
    pub density: i64,
}

pub fn parse(body: &[u8]) -> Result<DemoFeed> {
    serde_json::from_slice(body).map_err(|e| RiskError::Source {
        source_name: SOURCE_NAME,
        message: format!("failed to decode feed: {e}"),
    })
}
