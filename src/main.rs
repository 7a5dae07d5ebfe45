use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use county_risk::config::RunConfig;
use county_risk::{export, fetch, join, logging, sources};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = RunConfig::load().context("loading config.toml")?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .context("building HTTP client")?;

    info!("fetching source feeds");
    let (cdc_body, counties_body) = tokio::join!(
        fetch::fetch_with_cache(
            &client,
            sources::cdc::SOURCE_NAME,
            &config.cdc_url,
            Path::new(&config.cdc_cache_file),
        ),
        fetch::fetch_with_cache(
            &client,
            sources::counties::SOURCE_NAME,
            &config.counties_url,
            Path::new(&config.counties_cache_file),
        ),
    );
    let cdc_body = cdc_body.context("fetching the CDC feed")?;
    let counties_body = counties_body.context("fetching the demographic feed")?;

    let cdc_feed = sources::cdc::parse(&cdc_body).context("decoding the CDC feed")?;
    let demo_feed =
        sources::counties::parse(&counties_body).context("decoding the demographic feed")?;
    info!(
        cdc = cdc_feed.data.len(),
        demographic = demo_feed.len(),
        "decoded source feeds"
    );

    let (counties, report) = join::join_counties(&demo_feed, &cdc_feed.data);

    export::write_json(&counties, Path::new(&config.risk_json_file))
        .context("writing the JSON output")?;
    export::write_csv(&counties, Path::new(&config.risk_csv_file))
        .context("writing the CSV output")?;

    if report.has_anomalies() {
        warn!(
            unmatched = report.unmatched,
            bad_fips = report.bad_fips,
            zero_denominator = report.zero_denominator,
            numeric_fallbacks = report.numeric_fallbacks,
            "some upstream records could not be fully joined"
        );
    }

    println!("\n📊 Run results:");
    println!("   Counties joined: {}", report.joined);
    println!("   Unmatched demographic records: {}", report.unmatched);
    println!("   Unparseable FIPS codes: {}", report.bad_fips);
    println!("   Zero population/area skips: {}", report.zero_denominator);
    println!("   Numeric fields coerced to zero: {}", report.numeric_fallbacks);
    println!("   Output files: {}, {}", config.risk_json_file, config.risk_csv_file);

    Ok(())
}
