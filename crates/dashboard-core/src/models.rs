use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Display label for every bucket that stands for missing or unusable data.
pub const UNKNOWN_LABEL: &str = "N/A";

/// One shooting incident from the source file, with derived calendar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Identifier of the incident; the count measure of every aggregation.
    pub incident_key: String,
    /// Calendar date of the incident.
    pub occur_date: NaiveDate,
    /// Time of day of the incident.
    pub occur_time: NaiveTime,
    /// Year of `occur_date`.
    pub year: i32,
    /// Hour (0–23) of `occur_time`.
    pub hour: u32,
    /// `"YYMM"` key of `occur_date`.
    pub yearmonth: String,
    /// Borough name as it appears in the source.
    pub boro: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Raw perpetrator age-group label.
    pub perp_age_group: Option<String>,
    /// Raw victim age-group label.
    pub vic_age_group: Option<String>,
    /// Raw perpetrator sex code.
    pub perp_sex: Option<String>,
    /// Raw victim sex code.
    pub vic_sex: Option<String>,
}

impl Incident {
    /// Both coordinates, or `None` when either is missing.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Normalised age group of the perpetrator or victim.
    pub fn age_group(&self, role: Role) -> AgeGroup {
        let raw = match role {
            Role::Perpetrator => self.perp_age_group.as_deref(),
            Role::Victim => self.vic_age_group.as_deref(),
        };
        AgeGroup::from_label(raw)
    }

    /// Normalised sex of the perpetrator or victim.
    pub fn sex(&self, role: Role) -> Sex {
        let raw = match role {
            Role::Perpetrator => self.perp_sex.as_deref(),
            Role::Victim => self.vic_sex.as_deref(),
        };
        Sex::from_code(raw)
    }
}

/// The canonical in-memory table produced by the loader.
///
/// Immutable once built; views read it through shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentTable {
    /// File the table was loaded from.
    pub source: PathBuf,
    /// Header names, lower-cased, in file order.
    pub columns: Vec<String>,
    /// One entry per data row, in file order.
    pub incidents: Vec<Incident>,
}

impl IncidentTable {
    pub fn new(source: impl Into<PathBuf>, columns: Vec<String>, incidents: Vec<Incident>) -> Self {
        Self {
            source: source.into(),
            columns,
            incidents,
        }
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

/// Which side of an incident a demographic breakdown describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Perpetrator,
    Victim,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Perpetrator => write!(f, "perpetrator"),
            Role::Victim => write!(f, "victim"),
        }
    }
}

/// Age bracket of a perpetrator or victim.
///
/// Variants are declared in rank order (`<18` = 1 … unknown = 6), so the
/// derived `Ord` is the ordering the age charts are sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Under18,
    From18To24,
    From25To44,
    From45To64,
    Over65,
    Unknown,
}

/// Age labels that are data-entry errors rather than brackets.
pub const MALFORMED_AGE_CODES: [&str; 3] = ["940", "224", "1020"];

impl AgeGroup {
    /// Whether `raw` is one of the [`MALFORMED_AGE_CODES`].
    pub fn is_malformed_code(raw: Option<&str>) -> bool {
        raw.map(str::trim)
            .is_some_and(|label| MALFORMED_AGE_CODES.contains(&label))
    }

    /// All variants in ascending rank order.
    pub const ALL: [AgeGroup; 6] = [
        AgeGroup::Under18,
        AgeGroup::From18To24,
        AgeGroup::From25To44,
        AgeGroup::From45To64,
        AgeGroup::Over65,
        AgeGroup::Unknown,
    ];

    /// Parse a raw age-group label.
    ///
    /// `UNKNOWN`, the data-entry errors `940`, `224` and `1020`, blanks,
    /// missing values and any other unrecognised label all map to
    /// [`AgeGroup::Unknown`].
    pub fn from_label(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("<18") => AgeGroup::Under18,
            Some("18-24") => AgeGroup::From18To24,
            Some("25-44") => AgeGroup::From25To44,
            Some("45-64") => AgeGroup::From45To64,
            Some("65+") => AgeGroup::Over65,
            _ => AgeGroup::Unknown,
        }
    }

    /// Sort rank, 1 for the youngest bracket through 6 for unknown.
    pub fn rank(self) -> u8 {
        match self {
            AgeGroup::Under18 => 1,
            AgeGroup::From18To24 => 2,
            AgeGroup::From25To44 => 3,
            AgeGroup::From45To64 => 4,
            AgeGroup::Over65 => 5,
            AgeGroup::Unknown => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Under18 => "<18",
            AgeGroup::From18To24 => "18-24",
            AgeGroup::From25To44 => "25-44",
            AgeGroup::From45To64 => "45-64",
            AgeGroup::Over65 => "65+",
            AgeGroup::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Recorded sex of a perpetrator or victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
    Unknown,
}

impl Sex {
    /// Parse a raw sex code. Only `M` and `F` are meaningful; `U`, blanks and
    /// anything else are [`Sex::Unknown`].
    pub fn from_code(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(code) if code.eq_ignore_ascii_case("m") => Sex::Male,
            Some(code) if code.eq_ignore_ascii_case("f") => Sex::Female,
            _ => Sex::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident() -> Incident {
        let date = NaiveDate::from_ymd_opt(2020, 1, 5).unwrap();
        let time = NaiveTime::from_hms_opt(23, 10, 0).unwrap();
        Incident {
            incident_key: "1".to_string(),
            occur_date: date,
            occur_time: time,
            year: 2020,
            hour: 23,
            yearmonth: "2001".to_string(),
            boro: "BRONX".to_string(),
            latitude: Some(40.8),
            longitude: None,
            perp_age_group: Some("940".to_string()),
            vic_age_group: Some("18-24".to_string()),
            perp_sex: None,
            vic_sex: Some("F".to_string()),
        }
    }

    // ── AgeGroup ──────────────────────────────────────────────────────────────

    #[test]
    fn test_age_group_known_labels() {
        assert_eq!(AgeGroup::from_label(Some("<18")), AgeGroup::Under18);
        assert_eq!(AgeGroup::from_label(Some("18-24")), AgeGroup::From18To24);
        assert_eq!(AgeGroup::from_label(Some("25-44")), AgeGroup::From25To44);
        assert_eq!(AgeGroup::from_label(Some("45-64")), AgeGroup::From45To64);
        assert_eq!(AgeGroup::from_label(Some("65+")), AgeGroup::Over65);
    }

    #[test]
    fn test_age_group_malformed_codes_are_unknown() {
        for code in ["940", "224", "1020", "UNKNOWN", "", "25.44"] {
            assert_eq!(AgeGroup::from_label(Some(code)), AgeGroup::Unknown, "{code}");
        }
        assert_eq!(AgeGroup::from_label(None), AgeGroup::Unknown);
    }

    #[test]
    fn test_is_malformed_code() {
        for code in MALFORMED_AGE_CODES {
            assert!(AgeGroup::is_malformed_code(Some(code)), "{code}");
        }
        assert!(AgeGroup::is_malformed_code(Some(" 940 ")));
        for other in ["UNKNOWN", "25.44", "<18", ""] {
            assert!(!AgeGroup::is_malformed_code(Some(other)), "{other}");
        }
        assert!(!AgeGroup::is_malformed_code(None));
    }

    #[test]
    fn test_age_group_order_follows_rank() {
        let mut sorted = AgeGroup::ALL;
        sorted.sort();
        let ranks: Vec<u8> = sorted.iter().map(|g| g.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
        assert!(AgeGroup::Unknown > AgeGroup::Under18);
    }

    #[test]
    fn test_age_group_unknown_label() {
        assert_eq!(AgeGroup::Unknown.label(), "N/A");
        assert_eq!(AgeGroup::Over65.to_string(), "65+");
    }

    // ── Sex ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_sex_from_code() {
        assert_eq!(Sex::from_code(Some("M")), Sex::Male);
        assert_eq!(Sex::from_code(Some("f")), Sex::Female);
        assert_eq!(Sex::from_code(Some("U")), Sex::Unknown);
        assert_eq!(Sex::from_code(Some("")), Sex::Unknown);
        assert_eq!(Sex::from_code(None), Sex::Unknown);
    }

    // ── Incident ──────────────────────────────────────────────────────────────

    #[test]
    fn test_incident_coordinates_require_both() {
        let mut i = incident();
        assert_eq!(i.coordinates(), None);
        i.longitude = Some(-73.9);
        assert_eq!(i.coordinates(), Some((40.8, -73.9)));
    }

    #[test]
    fn test_incident_role_accessors() {
        let i = incident();
        assert_eq!(i.age_group(Role::Perpetrator), AgeGroup::Unknown);
        assert_eq!(i.age_group(Role::Victim), AgeGroup::From18To24);
        assert_eq!(i.sex(Role::Perpetrator), Sex::Unknown);
        assert_eq!(i.sex(Role::Victim), Sex::Female);
    }

    #[test]
    fn test_table_len() {
        let table = IncidentTable::new("x.csv", vec![], vec![incident(), incident()]);
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }
}
