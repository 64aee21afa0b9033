//! Presentation tables for each dashboard visualization.
//!
//! Every function here is a pure aggregation over the canonical
//! [`IncidentTable`]: optional row filter, group by one or two keys, count
//! rows per group, sort. Nothing is cached between calls.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use dashboard_core::models::{AgeGroup, Incident, IncidentTable, Role, Sex};
use dashboard_core::settings::{MAX_YEAR, MIN_YEAR};
use serde::Serialize;

/// Years offered by the year slider.
pub const YEAR_RANGE: RangeInclusive<i32> = MIN_YEAR..=MAX_YEAR;

/// Zoom level of both maps.
pub const MAP_ZOOM: f64 = 9.5;

/// Camera pitch (degrees) of the density map.
pub const MAP_PITCH: f64 = 50.0;

/// Hour pair compared when the data cannot suggest one.
pub const DEFAULT_COMPARE_HOURS: (u32, u32) = (23, 9);

// ── Row filter ────────────────────────────────────────────────────────────────

/// Row predicate applied before grouping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowFilter {
    #[default]
    All,
    Year(i32),
    Hour(u32),
    /// Keep rows whose hour is any of the listed hours.
    Hours(Vec<u32>),
}

impl RowFilter {
    pub fn matches(&self, incident: &Incident) -> bool {
        match self {
            RowFilter::All => true,
            RowFilter::Year(year) => incident.year == *year,
            RowFilter::Hour(hour) => incident.hour == *hour,
            RowFilter::Hours(hours) => hours.contains(&incident.hour),
        }
    }
}

// ── Presentation rows ─────────────────────────────────────────────────────────

/// One dot on the incident map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One incident fed to the density map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityPoint {
    pub incident_key: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Camera settings shared by both maps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapViewState {
    /// Mean latitude of every geolocated incident.
    pub latitude: f64,
    /// Mean longitude of every geolocated incident.
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
}

/// Incidents in one borough during one `"YYMM"` month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoroughMonthCount {
    pub yearmonth: String,
    pub boro: String,
    pub incidents: u64,
}

/// Incidents in one age bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeGroupCount {
    pub age_group: AgeGroup,
    /// Display label (`N/A` for the unknown bracket).
    pub label: String,
    pub incidents: u64,
}

/// Incidents for one recorded sex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SexCount {
    pub sex: Sex,
    pub label: String,
    pub incidents: u64,
}

/// Incidents at one hour of day during one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearHourCount {
    pub year: i32,
    pub hour: u32,
    pub incidents: u64,
}

/// Incidents in one borough on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateBoroughCount {
    pub date: NaiveDate,
    pub boro: String,
    pub incidents: u64,
}

// ── Generic grouping ──────────────────────────────────────────────────────────

/// Count rows passing `filter`, grouped by `key_fn`.
///
/// The map iterates in ascending key order.
pub fn group_counts<K, F>(table: &IncidentTable, filter: &RowFilter, key_fn: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&Incident) -> K,
{
    let mut counts: BTreeMap<K, u64> = BTreeMap::new();
    for incident in table.incidents.iter().filter(|i| filter.matches(i)) {
        *counts.entry(key_fn(incident)).or_default() += 1;
    }
    counts
}

// ── Map views ─────────────────────────────────────────────────────────────────

/// Geolocated incidents of `year`. Rows without coordinates are dropped.
pub fn incident_points(table: &IncidentTable, year: i32) -> Vec<MapPoint> {
    let filter = RowFilter::Year(year);
    table
        .incidents
        .iter()
        .filter(|i| filter.matches(i))
        .filter_map(|i| i.coordinates())
        .map(|(latitude, longitude)| MapPoint {
            latitude,
            longitude,
        })
        .collect()
}

/// Geolocated incidents at `hour`, keyed for the density map.
pub fn density_points(table: &IncidentTable, hour: u32) -> Vec<DensityPoint> {
    let filter = RowFilter::Hour(hour);
    table
        .incidents
        .iter()
        .filter(|i| filter.matches(i))
        .filter_map(|i| {
            i.coordinates().map(|(latitude, longitude)| DensityPoint {
                incident_key: i.incident_key.clone(),
                latitude,
                longitude,
            })
        })
        .collect()
}

/// Map camera centred on the mean position of the whole dataset.
///
/// Returns `None` when no row has coordinates.
pub fn map_view_state(table: &IncidentTable) -> Option<MapViewState> {
    let (mut lat_sum, mut lon_sum, mut n) = (0.0_f64, 0.0_f64, 0_u64);
    for (lat, lon) in table.incidents.iter().filter_map(|i| i.coordinates()) {
        lat_sum += lat;
        lon_sum += lon;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(MapViewState {
        latitude: lat_sum / n as f64,
        longitude: lon_sum / n as f64,
        zoom: MAP_ZOOM,
        pitch: MAP_PITCH,
    })
}

// ── Chart views ───────────────────────────────────────────────────────────────

/// Monthly incidents per borough, ascending by `(yearmonth, boro)`.
pub fn borough_timeline(table: &IncidentTable) -> Vec<BoroughMonthCount> {
    group_counts(table, &RowFilter::All, |i| (i.yearmonth.clone(), i.boro.clone()))
        .into_iter()
        .map(|((yearmonth, boro), incidents)| BoroughMonthCount {
            yearmonth,
            boro,
            incidents,
        })
        .collect()
}

/// Incidents per age bracket of `role`.
///
/// Malformed codes are folded into the unknown bracket before counting.
/// Rows are sorted by descending rank, so unknown comes first and `<18`
/// last; the chart draws top to bottom.
pub fn age_breakdown(table: &IncidentTable, role: Role) -> Vec<AgeGroupCount> {
    group_counts(table, &RowFilter::All, |i| i.age_group(role))
        .into_iter()
        .rev()
        .map(|(age_group, incidents)| AgeGroupCount {
            age_group,
            label: age_group.label().to_string(),
            incidents,
        })
        .collect()
}

/// Incidents per sex of `role`, most frequent first.
pub fn sex_breakdown(table: &IncidentTable, role: Role) -> Vec<SexCount> {
    let mut rows: Vec<SexCount> = group_counts(table, &RowFilter::All, |i| i.sex(role))
        .into_iter()
        .map(|(sex, incidents)| SexCount {
            sex,
            label: sex.label().to_string(),
            incidents,
        })
        .collect();
    rows.sort_by(|a, b| b.incidents.cmp(&a.incidents).then_with(|| a.label.cmp(&b.label)));
    rows
}

/// Yearly incidents at each of `hours`, most incidents first.
///
/// Ties are broken by ascending `(year, hour)` so the output is stable.
pub fn peak_hour_comparison(table: &IncidentTable, hours: &[u32]) -> Vec<YearHourCount> {
    let filter = RowFilter::Hours(hours.to_vec());
    // BTreeMap yields ascending keys; the stable sort keeps that order on ties.
    let mut rows: Vec<YearHourCount> = group_counts(table, &filter, |i| (i.year, i.hour))
        .into_iter()
        .map(|((year, hour), incidents)| YearHourCount {
            year,
            hour,
            incidents,
        })
        .collect();
    rows.sort_by(|a, b| b.incidents.cmp(&a.incidents));
    rows
}

/// Daily incidents per borough, ascending by `(date, boro)`.
pub fn date_borough_table(table: &IncidentTable) -> Vec<DateBoroughCount> {
    group_counts(table, &RowFilter::All, |i| (i.occur_date, i.boro.clone()))
        .into_iter()
        .map(|((date, boro), incidents)| DateBoroughCount {
            date,
            boro,
            incidents,
        })
        .collect()
}

// ── Slider bounds and defaults ────────────────────────────────────────────────

/// Smallest and largest hour present in the data.
pub fn hour_bounds(table: &IncidentTable) -> Option<(u32, u32)> {
    let min = table.incidents.iter().map(|i| i.hour).min()?;
    let max = table.incidents.iter().map(|i| i.hour).max()?;
    Some((min, max))
}

/// The hours with the most and the fewest incidents, as `(busiest, quietest)`.
///
/// Only hours that occur in the data are considered; ties go to the earlier
/// hour. Returns `None` for an empty table or one with a single distinct hour.
pub fn busiest_and_quietest_hours(table: &IncidentTable) -> Option<(u32, u32)> {
    let counts = group_counts(table, &RowFilter::All, |i| i.hour);
    if counts.len() < 2 {
        return None;
    }
    // Ascending iteration plus strict comparisons keep the earliest hour on ties.
    let mut busiest: Option<(u32, u64)> = None;
    let mut quietest: Option<(u32, u64)> = None;
    for (&hour, &n) in &counts {
        if busiest.map_or(true, |(_, best)| n > best) {
            busiest = Some((hour, n));
        }
        if quietest.map_or(true, |(_, least)| n < least) {
            quietest = Some((hour, n));
        }
    }
    match (busiest, quietest) {
        (Some((b, _)), Some((q, _))) if b != q => Some((b, q)),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
