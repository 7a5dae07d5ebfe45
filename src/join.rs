use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    PERCENT_NOT_CALCULATED, SQ_MILES_TO_SQ_KM, SUPPRESSED_COUNT, SUPPRESSED_COUNT_SUBSTITUTE,
};
use crate::sources::cdc::CdcCounty;
use crate::sources::counties::{DemoCounty, DemoFeed};

/// One fully joined and derived output row. Declaration order here is
/// the JSON field order and must stay in sync with `export::COLUMNS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyRisk {
    pub name: String,
    pub state: String,
    pub state_code: String,
    pub fips: i64,
    pub population: i64,
    pub area: i64,
    pub density: i64,
    pub cases: i64,
    pub deaths: i64,
    pub percent_of_state: f64,
    pub cases_by_population: i64,
    pub cases_by_area: i64,
    pub deaths_by_population: i64,
    pub deaths_by_area: i64,
    pub risk_index: f64,
}

/// Counts of everything the join pass could not (or chose not to) turn
/// into an output row. Surfaced in the run summary so malformed or
/// unmatched upstream records are visible instead of silently dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JoinReport {
    /// Rows produced.
    pub joined: usize,
    /// Demographic records with no CDC record of the same FIPS.
    pub unmatched: usize,
    /// Demographic records whose FIPS string failed integer conversion.
    pub bad_fips: usize,
    /// Records skipped because population or converted area was zero
    /// (or negative), which would otherwise divide by zero.
    pub zero_denominator: usize,
    /// Individual case/death/percent fields that fell back to zero on
    /// a failed numeric parse.
    pub numeric_fallbacks: usize,
}

impl JoinReport {
    pub fn has_anomalies(&self) -> bool {
        self.unmatched > 0
            || self.bad_fips > 0
            || self.zero_denominator > 0
            || self.numeric_fallbacks > 0
    }
}

/// Joins the two feeds on integer FIPS equality and derives the risk
/// metrics for every matched pair. A county present in only one source
/// produces no row; that is expected, not an error.
pub fn join_counties(demo: &DemoFeed, cdc: &[CdcCounty]) -> (Vec<CountyRisk>, JoinReport) {
    let mut result = Vec::new();
    let mut report = JoinReport::default();

    for (key, record) in demo {
        let fips: i64 = match record.fips.trim().parse() {
            Ok(f) => f,
            Err(_) => {
                debug!(key, fips = %record.fips, "unparseable fips, skipping record");
                report.bad_fips += 1;
                continue;
            }
        };

        let Some(matched) = cdc.iter().find(|c| c.fips == fips) else {
            report.unmatched += 1;
            continue;
        };

        match derive_county(record, matched, fips, &mut report) {
            Some(county) => {
                report.joined += 1;
                result.push(county);
            }
            None => {
                debug!(key, fips, "zero population or area, skipping record");
                report.zero_denominator += 1;
            }
        }
    }

    (result, report)
}

/// Pure function of one matched pair. Returns `None` when a zero
/// denominator makes the rates undefined.
fn derive_county(
    demo: &DemoCounty,
    cdc: &CdcCounty,
    fips: i64,
    report: &mut JoinReport,
) -> Option<CountyRisk> {
    // Square miles to square kilometers, truncated as published
    let area = (demo.area as f64 * SQ_MILES_TO_SQ_KM) as i64;
    if demo.population <= 0 || area <= 0 {
        return None;
    }

    let cases = parse_count(&cdc.cases, report);
    let deaths = parse_count(&cdc.deaths, report);
    let percent_of_state = parse_percent(&cdc.cases_percent, report);

    let population = demo.population;
    let cases_by_population = cases * 100_000 / population;
    let cases_by_area = cases * 1_000 / area;
    let deaths_by_population = deaths * 100_000 / population;
    let deaths_by_area = deaths * 1_000 / area;

    // Both terms are offset by one so a zero rate never wipes out the
    // product; the scale-then-divide keeps two decimal places.
    let risk_index =
        (((deaths_by_area + 1) * (cases_by_population + 1)) as f64 * 100.0).round() / 10_000.0;

    Some(CountyRisk {
        // All occurrences, faithful to the upstream convention
        name: cdc.county_name.replace(" County", ""),
        state: demo.state.clone(),
        state_code: cdc.state.clone(),
        fips,
        population,
        area,
        // Recomputed; the source's own density value is unreliable
        density: population / area,
        cases,
        deaths,
        percent_of_state,
        cases_by_population,
        cases_by_area,
        deaths_by_population,
        deaths_by_area,
        risk_index,
    })
}

/// A count field is either the suppression sentinel, a plain integer,
/// or garbage (counted, coerced to zero).
fn parse_count(raw: &str, report: &mut JoinReport) -> i64 {
    if raw == SUPPRESSED_COUNT {
        return SUPPRESSED_COUNT_SUBSTITUTE;
    }
    match raw.parse() {
        Ok(n) => n,
        Err(_) => {
            report.numeric_fallbacks += 1;
            0
        }
    }
}

fn parse_percent(raw: &str, report: &mut JoinReport) -> f64 {
    if raw == PERCENT_NOT_CALCULATED {
        return 0.0;
    }
    match raw.replace(" %", "").parse() {
        Ok(v) => v,
        Err(_) => {
            report.numeric_fallbacks += 1;
            0.0
        }
    }
}
