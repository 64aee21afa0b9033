//! CSV loading for the incident dashboard.
//!
//! Reads the published incident snapshot, lower-cases its header row,
//! parses the date and time columns and derives the calendar fields every
//! view groups by. Any unparseable date or time aborts the whole load.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use dashboard_core::calendar;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{AgeGroup, Incident, IncidentTable};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Columns the views depend on. Matched after lower-casing.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "incident_key",
    "occur_date",
    "occur_time",
    "boro",
    "latitude",
    "longitude",
    "perp_age_group",
    "perp_sex",
    "vic_age_group",
    "vic_sex",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the incident table from the CSV file at `path`.
pub fn load_incidents(path: &Path) -> Result<IncidentTable> {
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_incidents(std::io::BufReader::new(file), path)
}

/// Parse incident CSV content from any reader.
///
/// `source` is recorded on the returned table; nothing is read from it.
pub fn parse_incidents<R: Read>(input: R, source: &Path) -> Result<IncidentTable> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(input);

    let headers = lowercase_headers(reader.headers()?);
    check_required_columns(&headers)?;

    let mut incidents = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let raw: RawIncident = record.deserialize(Some(&headers))?;
        incidents.push(raw.into_incident(index + 1)?);
    }

    log_load_summary(source, &incidents);

    Ok(IncidentTable::new(
        source,
        headers.iter().map(str::to_string).collect(),
        incidents,
    ))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One CSV row before date/time parsing. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawIncident {
    incident_key: String,
    occur_date: String,
    occur_time: String,
    boro: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    longitude: Option<f64>,
    perp_age_group: Option<String>,
    perp_sex: Option<String>,
    vic_age_group: Option<String>,
    vic_sex: Option<String>,
}

impl RawIncident {
    /// Parse the date/time columns and derive the calendar fields.
    ///
    /// `row` is the 1-based data row number used in error messages.
    fn into_incident(self, row: usize) -> Result<Incident> {
        let occur_date =
            calendar::parse_date(&self.occur_date).ok_or_else(|| DashboardError::DateParse {
                row,
                value: self.occur_date.clone(),
            })?;
        let occur_time =
            calendar::parse_time(&self.occur_time).ok_or_else(|| DashboardError::TimeParse {
                row,
                value: self.occur_time.clone(),
            })?;

        Ok(Incident {
            incident_key: self.incident_key,
            year: calendar::year_of(occur_date),
            hour: calendar::hour_of(occur_time),
            yearmonth: calendar::yearmonth_of(occur_date),
            occur_date,
            occur_time,
            boro: self.boro,
            latitude: self.latitude.filter(|v| v.is_finite()),
            longitude: self.longitude.filter(|v| v.is_finite()),
            perp_age_group: self.perp_age_group,
            vic_age_group: self.vic_age_group,
            perp_sex: self.perp_sex,
            vic_sex: self.vic_sex,
        })
    }
}

/// Lower-case every header name (and drop a UTF-8 byte-order mark).
fn lowercase_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect()
}

fn check_required_columns(headers: &StringRecord) -> Result<()> {
    let present: HashSet<&str> = headers.iter().collect();
    match REQUIRED_COLUMNS.iter().find(|c| !present.contains(**c)) {
        Some(missing) => Err(DashboardError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

/// Rows whose perpetrator or victim age is a malformed code.
fn malformed_age_rows(incidents: &[Incident]) -> usize {
    incidents
        .iter()
        .filter(|i| {
            AgeGroup::is_malformed_code(i.perp_age_group.as_deref())
                || AgeGroup::is_malformed_code(i.vic_age_group.as_deref())
        })
        .count()
}

fn log_load_summary(source: &Path, incidents: &[Incident]) {
    let without_coordinates = incidents
        .iter()
        .filter(|i| i.coordinates().is_none())
        .count();

    let mut seen: HashSet<&str> = HashSet::with_capacity(incidents.len());
    let duplicate_keys = incidents
        .iter()
        .filter(|i| !seen.insert(i.incident_key.as_str()))
        .count();

    info!(
        rows = incidents.len(),
        without_coordinates,
        "loaded incident table from {}",
        source.display()
    );
    if duplicate_keys > 0 {
        debug!(
            duplicate_keys,
            "incident keys repeat across rows; counts are per row"
        );
    }

    let malformed_age_codes = malformed_age_rows(incidents);
    if malformed_age_codes > 0 {
        warn!(
            malformed_age_codes,
            "rows carry malformed age codes; counted as {}",
            dashboard_core::models::UNKNOWN_LABEL
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};
    use std::io::Write;

    const HEADER: &str = "INCIDENT_KEY,OCCUR_DATE,OCCUR_TIME,BORO,PRECINCT,PERP_AGE_GROUP,PERP_SEX,VIC_AGE_GROUP,VIC_SEX,Latitude,Longitude";

    fn parse(body: &str) -> Result<IncidentTable> {
        let content = format!("{HEADER}\n{body}");
        parse_incidents(content.as_bytes(), Path::new("memory.csv"))
    }

    fn scenario_csv() -> String {
        [
            "1,01/05/2020,23:10:00,BRONX,40,<18,M,18-24,M,40.85,-73.89",
            "2,02/10/2020,09:30:00,BRONX,44,940,F,25-44,F,40.83,-73.92",
            "3,12/31/2019,00:05:00,BRONX,46,,,65+,U,,",
        ]
        .join("\n")
    }

    // ── parse_incidents ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_derives_calendar_fields() {
        let table = parse(&scenario_csv()).unwrap();
        assert_eq!(table.len(), 3);

        let yearmonths: Vec<&str> = table
            .incidents
            .iter()
            .map(|i| i.yearmonth.as_str())
            .collect();
        assert_eq!(yearmonths, vec!["2001", "2002", "1912"]);

        for incident in &table.incidents {
            assert_eq!(incident.year, incident.occur_date.year());
            assert_eq!(incident.hour, incident.occur_time.hour());
        }
        assert_eq!(
            table.incidents[2].occur_date,
            NaiveDate::from_ymd_opt(2019, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_lowercases_headers() {
        let table = parse(&scenario_csv()).unwrap();
        assert_eq!(table.columns[0], "incident_key");
        assert!(table.columns.contains(&"latitude".to_string()));
        assert!(table.columns.iter().all(|c| c == &c.to_lowercase()));
    }

    #[test]
    fn test_parse_missing_values_become_none() {
        let table = parse(&scenario_csv()).unwrap();
        let third = &table.incidents[2];
        assert_eq!(third.latitude, None);
        assert_eq!(third.longitude, None);
        assert_eq!(third.perp_age_group, None);
        assert_eq!(third.perp_sex, None);
        assert_eq!(third.vic_sex.as_deref(), Some("U"));
    }

    #[test]
    fn test_parse_unparseable_coordinate_becomes_none() {
        let table = parse("1,01/05/2020,10:00:00,QUEENS,101,,,,,not-a-number,-73.8").unwrap();
        assert_eq!(table.incidents[0].latitude, None);
        assert_eq!(table.incidents[0].longitude, Some(-73.8));
    }

    #[test]
    fn test_parse_non_finite_coordinates_become_none() {
        let body = "1,01/05/2020,10:00:00,QUEENS,101,,,,,NaN,-73.8\n2,01/06/2020,11:00:00,QUEENS,101,,,,,40.7,inf";
        let table = parse(body).unwrap();
        assert_eq!(table.incidents[0].latitude, None);
        assert_eq!(table.incidents[0].longitude, Some(-73.8));
        assert_eq!(table.incidents[0].coordinates(), None);
        assert_eq!(table.incidents[1].longitude, None);
        assert_eq!(table.incidents[1].coordinates(), None);
    }

    #[test]
    fn test_malformed_age_rows_counts_each_row_once() {
        let body = [
            "1,01/05/2020,10:00:00,QUEENS,101,940,M,1020,M,,",
            "2,01/06/2020,11:00:00,QUEENS,101,<18,M,224,F,,",
            "3,01/07/2020,12:00:00,QUEENS,101,UNKNOWN,M,25-44,F,,",
        ]
        .join("\n");
        let table = parse(&body).unwrap();
        assert_eq!(malformed_age_rows(&table.incidents), 2);
        assert_eq!(malformed_age_rows(&parse(&scenario_csv()).unwrap().incidents), 1);
    }

    #[test]
    fn test_parse_keeps_raw_age_codes() {
        let table = parse(&scenario_csv()).unwrap();
        assert_eq!(table.incidents[1].perp_age_group.as_deref(), Some("940"));
    }

    #[test]
    fn test_parse_bad_date_is_fatal() {
        let body = "1,01/05/2020,10:00:00,QUEENS,101,,,,,,\n2,2020-31-31,10:00:00,QUEENS,101,,,,,,";
        match parse(body) {
            Err(DashboardError::DateParse { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "2020-31-31");
            }
            other => panic!("expected DateParse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_bad_time_is_fatal() {
        match parse("1,01/05/2020,10:00,QUEENS,101,,,,,,") {
            Err(DashboardError::TimeParse { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "10:00");
            }
            other => panic!("expected TimeParse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_column() {
        let content = "incident_key,occur_date,occur_time\n1,01/05/2020,10:00:00";
        match parse_incidents(content.as_bytes(), Path::new("memory.csv")) {
            Err(DashboardError::MissingColumn(col)) => assert_eq!(col, "boro"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_header_only_yields_empty_table() {
        let table = parse("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let content = format!("\u{feff}{HEADER}\n{}", scenario_csv());
        let table = parse_incidents(content.as_bytes(), Path::new("bom.csv")).unwrap();
        assert_eq!(table.len(), 3);
    }

    // ── load_incidents ────────────────────────────────────────────────────────

    #[test]
    fn test_load_incidents_from_file_is_idempotent() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "{HEADER}").unwrap();
        write!(file, "{}", scenario_csv()).unwrap();
        file.flush().unwrap();

        let first = load_incidents(file.path()).unwrap();
        let second = load_incidents(file.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.source, file.path());
    }

    #[test]
    fn test_load_incidents_missing_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.csv");
        match load_incidents(&path) {
            Err(DashboardError::FileRead { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected FileRead, got {other:?}"),
        }
    }
}
