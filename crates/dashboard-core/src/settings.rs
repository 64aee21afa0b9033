use clap::Parser;
use std::path::PathBuf;

/// Default name of the published incident snapshot.
pub const DEFAULT_DATA_FILE: &str = "NYPD_Shooting_Incident_Data__Historic_.csv";

/// First year offered by the year slider.
pub const MIN_YEAR: i32 = 2006;

/// Last year offered by the year slider.
pub const MAX_YEAR: i32 = 2020;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive dashboard over the NYC historic shooting incident dataset
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shooting-dashboard",
    about = "Interactive dashboard over the NYC historic shooting incident dataset",
    version
)]
pub struct Settings {
    /// Incident CSV file
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    pub data_path: PathBuf,

    /// Initial year for the incident map (2006-2020)
    #[arg(long, default_value = "2006", value_parser = clap::value_parser!(i32).range(MIN_YEAR as i64..=MAX_YEAR as i64))]
    pub year: i32,

    /// Initial hour for the density map (defaults to the earliest hour in the data)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    pub hour: Option<u32>,

    /// Two hours to compare by year, e.g. `23,9` (defaults to `23,9`)
    #[arg(long, value_parser = parse_hour_pair)]
    pub compare_hours: Option<(u32, u32)>,

    /// Compare the busiest and quietest hours in the data instead of `23,9`
    #[arg(long, conflicts_with = "compare_hours")]
    pub auto_compare_hours: bool,

    /// Show the date x borough table on start
    #[arg(long)]
    pub show_date_table: bool,

    /// Display theme
    #[arg(long, default_value = "simple", value_parser = ["simple", "light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Write a single JSON snapshot to stdout instead of starting the TUI
    #[arg(long)]
    pub export: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`load`](Self::load) but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// Apply the `--debug` flag.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Value parsers ──────────────────────────────────────────────────────────────

/// Parse `"A,B"` into two distinct hours of the day.
fn parse_hour_pair(raw: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [first, second] = parts.as_slice() else {
        return Err(format!("expected two comma-separated hours, got {raw:?}"));
    };
    let parse = |s: &str| -> Result<u32, String> {
        let hour: u32 = s.parse().map_err(|_| format!("{s:?} is not an hour"))?;
        if hour > 23 {
            return Err(format!("hour {hour} is outside 0-23"));
        }
        Ok(hour)
    };
    let pair = (parse(first)?, parse(second)?);
    if pair.0 == pair.1 {
        return Err("compare hours must differ".to_string());
    }
    Ok(pair)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
