use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::error::{Result, RiskError};
use crate::join::CountyRisk;

/// Ordered (label, extractor) table for the CSV sink. This is the
/// column-order contract: it must enumerate `CountyRisk`'s fields in
/// declaration order so both sinks agree.
pub const COLUMNS: [(&str, fn(&CountyRisk) -> String); 15] = [
    ("Name", |c| c.name.clone()),
    ("State", |c| c.state.clone()),
    ("State Code", |c| c.state_code.clone()),
    ("Fips", |c| c.fips.to_string()),
    ("Population", |c| c.population.to_string()),
    ("Area", |c| c.area.to_string()),
    ("Density", |c| c.density.to_string()),
    ("Cases", |c| c.cases.to_string()),
    ("Deaths", |c| c.deaths.to_string()),
    ("Percent Of State", |c| format!("{:.2}", c.percent_of_state)),
    ("Cases By Population", |c| c.cases_by_population.to_string()),
    ("Cases By Area", |c| c.cases_by_area.to_string()),
    ("Deaths By Population", |c| c.deaths_by_population.to_string()),
    ("Deaths By Area", |c| c.deaths_by_area.to_string()),
    ("Risk Index", |c| format!("{:.2}", c.risk_index)),
];

/// Writes the joined collection as a tab-indented JSON document.
pub fn write_json(counties: &[CountyRisk], path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    counties.serialize(&mut serializer)?;
    buf.push(b'\n');

    write_atomic(path, &buf)?;
    info!(counties = counties.len(), path = %path.display(), "wrote JSON output");
    Ok(())
}

/// Writes the joined collection as CSV: one header row from `COLUMNS`,
/// then one row per county in collection order.
pub fn write_csv(counties: &[CountyRisk], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS.iter().map(|(label, _)| *label))?;
    for county in counties {
        writer.write_record(COLUMNS.iter().map(|(_, extract)| extract(county)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| RiskError::Io(e.into_error()))?;

    write_atomic(path, &bytes)?;
    info!(counties = counties.len(), path = %path.display(), "wrote CSV output");
    Ok(())
}

// Temp file next to the target, then rename, so readers never observe
// a half-written output.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_county() -> CountyRisk {
        CountyRisk {
            name: "Jefferson".to_string(),
            state: "Alabama".to_string(),
            state_code: "AL".to_string(),
            fips: 1073,
            population: 658_573,
            area: 2877,
            density: 228,
            cases: 1500,
            deaths: 30,
            percent_of_state: 1.25,
            cases_by_population: 227,
            cases_by_area: 521,
            deaths_by_population: 4,
            deaths_by_area: 10,
            risk_index: 25.08,
        }
    }

    #[test]
    fn json_round_trips_field_for_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("risk.json");
        let counties = vec![sample_county()];

        write_json(&counties, &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        let decoded: Vec<CountyRisk> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, counties);
    }

    #[test]
    fn json_is_tab_indented() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("risk.json");
        write_json(&[sample_county()], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n\t{"));
        assert!(text.contains("\n\t\t\"name\": \"Jefferson\""));
    }

    #[test]
    fn csv_header_matches_the_column_contract() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("risk.csv");
        write_csv(&[], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.trim_end(),
            "Name,State,State Code,Fips,Population,Area,Density,Cases,Deaths,\
             Percent Of State,Cases By Population,Cases By Area,Deaths By Population,\
             Deaths By Area,Risk Index"
        );
    }

    #[test]
    fn every_csv_row_has_the_header_width() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("risk.csv");
        let mut second = sample_county();
        second.name = "Mobile".to_string();
        write_csv(&[sample_county(), second], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let width = reader.headers().unwrap().len();
        assert_eq!(width, COLUMNS.len());
        let mut rows = 0;
        for record in reader.records() {
            assert_eq!(record.unwrap().len(), width);
            rows += 1;
        }
        assert_eq!(rows, 2);
    }

    #[test]
    fn floats_are_formatted_to_two_decimals() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("risk.csv");
        let mut county = sample_county();
        county.percent_of_state = 1.2;
        county.risk_index = 0.01;
        write_csv(&[county], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let data_row = text.lines().nth(1).unwrap();
        assert!(data_row.contains(",1.20,"));
        assert!(data_row.ends_with(",0.01"));
    }

    #[test]
    fn rewriting_output_replaces_it_atomically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("risk.json");
        write_json(&[sample_county()], &path).unwrap();
        write_json(&[], &path).unwrap();

        let decoded: Vec<CountyRisk> =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert!(decoded.is_empty());
        assert!(!path.with_extension("tmp").exists());
    }
}
