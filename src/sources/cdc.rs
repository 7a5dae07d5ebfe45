use serde::Deserialize;

use crate::error::{Result, RiskError};

pub const SOURCE_NAME: &str = "cdc";

/// The CDC county-map feed: a top-level object wrapping a `data` array.
#[derive(Debug, Deserialize)]
pub struct CdcFeed {
    pub data: Vec<CdcCounty>,
}

/// One county as published by the CDC. Everything except the FIPS code
/// is text; counts may carry the `"<20"` suppression sentinel and the
/// percent field may read `"Not Calculated"`. Unknown fields are
/// ignored so upstream schema drift doesn't break decoding.
#[derive(Debug, Clone, Deserialize)]
pub struct CdcCounty {
    #[serde(default)]
    pub county_name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub fips: i64,
    #[serde(default)]
    pub cases: String,
    #[serde(default)]
    pub deaths: String,
    #[serde(default)]
    pub cases_percent: String,
    // Published by the feed but unused downstream
    #[serde(default)]
    pub rate_per_100k: String,
}

pub fn parse(body: &[u8]) -> Result<CdcFeed> {
    serde_json::from_slice(body).map_err(|e| RiskError::Source {
        source_name: SOURCE_NAME,
        message: format!("failed to decode feed: {e}"),
    })
}
