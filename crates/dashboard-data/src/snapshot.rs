//! One interaction cycle's worth of presentation tables.

use dashboard_core::models::{IncidentTable, Role};
use serde::Serialize;
use tracing::debug;

use crate::views::{
    self, AgeGroupCount, BoroughMonthCount, DateBoroughCount, DensityPoint, MapPoint,
    MapViewState, SexCount, YearHourCount,
};

/// Widget values a snapshot is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewParams {
    /// Year shown on the incident map.
    pub year: i32,
    /// Hour shown on the density map.
    pub hour: u32,
    /// The two hours compared year by year.
    pub compare_hours: (u32, u32),
    /// Whether the date x borough table is requested.
    pub show_date_table: bool,
}

/// Every presentation table the dashboard draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub filters: ViewParams,
    /// Total rows in the canonical table.
    pub total_incidents: u64,
    pub incident_points: Vec<MapPoint>,
    pub density_points: Vec<DensityPoint>,
    pub map_view: Option<MapViewState>,
    pub borough_timeline: Vec<BoroughMonthCount>,
    pub perp_ages: Vec<AgeGroupCount>,
    pub vic_ages: Vec<AgeGroupCount>,
    pub perp_sex: Vec<SexCount>,
    pub vic_sex: Vec<SexCount>,
    pub peak_hours: Vec<YearHourCount>,
    /// Present only while the table checkbox is ticked.
    pub date_borough: Option<Vec<DateBoroughCount>>,
}

impl DashboardSnapshot {
    /// Number of incidents currently plotted on the year map.
    pub fn mapped_incidents(&self) -> usize {
        self.incident_points.len()
    }
}

/// Recompute every view from scratch for `params`.
pub fn build_snapshot(table: &IncidentTable, params: ViewParams) -> DashboardSnapshot {
    let (first, second) = params.compare_hours;
    let snapshot = DashboardSnapshot {
        filters: params,
        total_incidents: table.len() as u64,
        incident_points: views::incident_points(table, params.year),
        density_points: views::density_points(table, params.hour),
        map_view: views::map_view_state(table),
        borough_timeline: views::borough_timeline(table),
        perp_ages: views::age_breakdown(table, Role::Perpetrator),
        vic_ages: views::age_breakdown(table, Role::Victim),
        perp_sex: views::sex_breakdown(table, Role::Perpetrator),
        vic_sex: views::sex_breakdown(table, Role::Victim),
        peak_hours: views::peak_hour_comparison(table, &[first, second]),
        date_borough: params
            .show_date_table
            .then(|| views::date_borough_table(table)),
    };

    debug!(
        year = params.year,
        hour = params.hour,
        incident_points = snapshot.incident_points.len(),
        density_points = snapshot.density_points.len(),
        "recomputed dashboard snapshot"
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_incidents;
    use std::path::Path;

    fn table() -> IncidentTable {
        let csv = "\
INCIDENT_KEY,OCCUR_DATE,OCCUR_TIME,BORO,PERP_AGE_GROUP,PERP_SEX,VIC_AGE_GROUP,VIC_SEX,Latitude,Longitude
1,01/05/2020,23:10:00,BRONX,<18,M,18-24,M,40.85,-73.89
2,02/10/2020,09:30:00,BRONX,940,F,25-44,F,40.83,-73.92
3,12/31/2019,23:05:00,BRONX,,,65+,U,,
4,06/15/2019,09:45:00,QUEENS,25-44,M,25-44,M,40.70,-73.80";
        parse_incidents(csv.as_bytes(), Path::new("snapshot.csv")).unwrap()
    }

    fn params(show_date_table: bool) -> ViewParams {
        ViewParams {
            year: 2020,
            hour: 9,
            compare_hours: (23, 9),
            show_date_table,
        }
    }

    #[test]
    fn test_build_snapshot_filters_maps() {
        let snapshot = build_snapshot(&table(), params(false));
        assert_eq!(snapshot.total_incidents, 4);
        assert_eq!(snapshot.mapped_incidents(), 2);
        let keys: Vec<&str> = snapshot
            .density_points
            .iter()
            .map(|p| p.incident_key.as_str())
            .collect();
        assert_eq!(keys, vec!["2", "4"]);
        assert!(snapshot.map_view.is_some());
    }

    #[test]
    fn test_build_snapshot_date_table_follows_checkbox() {
        let hidden = build_snapshot(&table(), params(false));
        assert!(hidden.date_borough.is_none());

        let shown = build_snapshot(&table(), params(true));
        let rows = shown.date_borough.unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_build_snapshot_peak_hours_cover_both_hours() {
        let snapshot = build_snapshot(&table(), params(false));
        let total: u64 = snapshot.peak_hours.iter().map(|r| r.incidents).sum();
        assert_eq!(total, 4);
        assert!(snapshot.peak_hours.iter().all(|r| r.hour == 23 || r.hour == 9));
    }

    #[test]
    fn test_build_snapshot_breakdowns_cover_every_row() {
        let snapshot = build_snapshot(&table(), params(false));
        for rows in [&snapshot.perp_ages, &snapshot.vic_ages] {
            assert_eq!(rows.iter().map(|r| r.incidents).sum::<u64>(), 4);
        }
        for rows in [&snapshot.perp_sex, &snapshot.vic_sex] {
            assert_eq!(rows.iter().map(|r| r.incidents).sum::<u64>(), 4);
        }
    }

    #[test]
    fn test_build_snapshot_empty_hour_is_empty_state() {
        let mut p = params(false);
        p.hour = 3;
        let snapshot = build_snapshot(&table(), p);
        assert!(snapshot.density_points.is_empty());
        assert!(!snapshot.borough_timeline.is_empty());
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snapshot = build_snapshot(&table(), params(true));
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["filters"]["year"], 2020);
        assert_eq!(value["filters"]["compare_hours"][0], 23);
        assert_eq!(value["perp_ages"][0]["label"], "N/A");
        assert_eq!(value["date_borough"][0]["date"], "2019-06-15");
        assert_eq!(value["map_view"]["zoom"], 9.5);
    }
}
