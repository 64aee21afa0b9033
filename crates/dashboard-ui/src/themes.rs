use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Unknown` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Unknown
}

/// Number of steps in the density colour ramp.
pub const DENSITY_STEPS: usize = 5;

/// Every style the dashboard widgets draw with.
///
/// All charts on screen share one theme instance.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Whole-screen fill. `None` leaves the terminal background untouched.
    pub background: Option<Color>,

    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub warning: Style,

    // ── Widgets ──────────────────────────────────────────────────────────────
    pub slider_filled: Style,
    pub slider_empty: Style,
    pub slider_knob: Style,
    pub checkbox: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub axis: Style,
    /// Colours assigned to series in order (boroughs, hours, shares).
    pub series: Vec<Color>,
    pub map_point: Style,
    /// Density map ramp from sparse to dense.
    pub density: [Color; DENSITY_STEPS],

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_selected: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Minimal theme with no background fill and muted axes (default).
    pub fn simple() -> Self {
        Self {
            background: None,

            header: Style::default().add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Blue),
            separator: Style::default().fg(Color::Gray),

            text: Style::default(),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default().add_modifier(Modifier::BOLD),

            warning: Style::default().fg(Color::Yellow),

            slider_filled: Style::default().fg(Color::Blue),
            slider_empty: Style::default().fg(Color::Gray),
            slider_knob: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            checkbox: Style::default().fg(Color::Blue),
            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::DarkGray),

            axis: Style::default().fg(Color::Gray),
            series: vec![
                Color::Blue,
                Color::Red,
                Color::Green,
                Color::Magenta,
                Color::Yellow,
                Color::Cyan,
            ],
            map_point: Style::default().fg(Color::Red),
            density: [
                Color::Rgb(1, 152, 189),
                Color::Rgb(73, 227, 206),
                Color::Rgb(216, 254, 181),
                Color::Rgb(254, 173, 84),
                Color::Rgb(209, 55, 78),
            ],

            table_header: Style::default().add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default(),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_selected: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    /// Dark-background terminal theme.
    pub fn dark() -> Self {
        Self {
            background: Some(Color::Black),

            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            warning: Style::default().fg(Color::Yellow),

            slider_filled: Style::default().fg(Color::Cyan),
            slider_empty: Style::default().fg(Color::DarkGray),
            slider_knob: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            checkbox: Style::default().fg(Color::Cyan),
            tab_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::Gray),

            axis: Style::default().fg(Color::DarkGray),
            series: vec![
                Color::Cyan,
                Color::LightRed,
                Color::LightGreen,
                Color::LightMagenta,
                Color::Yellow,
                Color::LightBlue,
            ],
            map_point: Style::default().fg(Color::LightRed),
            density: [
                Color::Rgb(1, 152, 189),
                Color::Rgb(73, 227, 206),
                Color::Rgb(216, 254, 181),
                Color::Rgb(254, 173, 84),
                Color::Rgb(209, 55, 78),
            ],

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text and saturated accents so that content
    /// remains legible against a white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            background: Some(Color::White),

            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            warning: Style::default().fg(Color::Red),

            slider_filled: Style::default().fg(Color::Blue),
            slider_empty: Style::default().fg(Color::Gray),
            slider_knob: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            checkbox: Style::default().fg(Color::Blue),
            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::DarkGray),

            axis: Style::default().fg(Color::DarkGray),
            series: vec![
                Color::Blue,
                Color::Red,
                Color::Green,
                Color::Magenta,
                Color::Rgb(204, 120, 0),
                Color::Cyan,
            ],
            map_point: Style::default().fg(Color::Red),
            density: [
                Color::Rgb(1, 152, 189),
                Color::Rgb(40, 170, 150),
                Color::Rgb(120, 180, 60),
                Color::Rgb(230, 140, 40),
                Color::Rgb(209, 55, 78),
            ],

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_selected: Style::default()
                .fg(Color::White)
                .bg(Color::Blue),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// Avoids bold modifiers to maintain a retro aesthetic and maximise
    /// compatibility with minimal terminal emulators.
    pub fn classic() -> Self {
        Self {
            background: None,

            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            warning: Style::default().fg(Color::Yellow),

            slider_filled: Style::default().fg(Color::Green),
            slider_empty: Style::default().fg(Color::DarkGray),
            slider_knob: Style::default().fg(Color::White),
            checkbox: Style::default().fg(Color::Green),
            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),
            tab_inactive: Style::default().fg(Color::Gray),

            axis: Style::default().fg(Color::DarkGray),
            series: vec![
                Color::Cyan,
                Color::Red,
                Color::Green,
                Color::Magenta,
                Color::Yellow,
                Color::Blue,
            ],
            map_point: Style::default().fg(Color::Red),
            density: [
                Color::Blue,
                Color::Cyan,
                Color::Green,
                Color::Yellow,
                Color::Red,
            ],

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::White),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    ///
    /// An undetectable background gets the unfilled [`simple`](Self::simple)
    /// theme.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
            BackgroundType::Unknown => Self::simple(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "simple" => Self::simple(),
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Colour of the `index`-th series, cycling through the palette.
    pub fn series_color(&self, index: usize) -> Color {
        if self.series.is_empty() {
            return Color::Reset;
        }
        self.series[index % self.series.len()]
    }

    /// Ramp colour for a density cell holding `count` of at most `max`
    /// incidents.
    ///
    /// Counts are split into [`DENSITY_STEPS`] equal-width bands; any
    /// non-empty cell gets at least the first band.
    pub fn density_color(&self, count: u64, max: u64) -> Color {
        if max == 0 || count == 0 {
            return self.density[0];
        }
        let step = ((count.min(max) * DENSITY_STEPS as u64).div_ceil(max)) as usize;
        self.density[step.clamp(1, DENSITY_STEPS) - 1]
    }

    /// Base style for the whole screen.
    pub fn base(&self) -> Style {
        match self.background {
            Some(bg) => self.text.bg(bg),
            None => self.text,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
