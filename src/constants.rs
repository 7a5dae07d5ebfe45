/// Source endpoints and fixed file paths. A `config.toml` next to the
/// binary may override any of these at runtime (see `config::RunConfig`).

// Upstream feeds
pub const CDC_URL: &str = "https://www.cdc.gov/coronavirus/2019-ncov/json/county-map-data.json";
pub const COUNTIES_URL: &str =
    "https://raw.githubusercontent.com/balsama/us_counties_data/master/data/counties.json";

// Local cache of the last successfully-used payload, one file per feed
pub const CDC_CACHE_FILE: &str = "data/cdc.json";
pub const COUNTIES_CACHE_FILE: &str = "data/counties.json";

// Outputs
pub const RISK_JSON_FILE: &str = "data/risk.json";
pub const RISK_CSV_FILE: &str = "data/risk.csv";

pub const HTTP_TIMEOUT_SECONDS: u64 = 30;

// The CDC feed masks counts under 20 with a literal "<20"; the
// conventional substitute is 10.
pub const SUPPRESSED_COUNT: &str = "<20";
pub const SUPPRESSED_COUNT_SUBSTITUTE: i64 = 10;
pub const PERCENT_NOT_CALCULATED: &str = "Not Calculated";

// Demographic areas arrive in square miles
pub const SQ_MILES_TO_SQ_KM: f64 = 2.59;
