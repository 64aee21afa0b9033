use crate::themes::Theme;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Width of the label column, so stacked sliders line up.
const LABEL_WIDTH: usize = 6;

/// Configuration controlling the visual appearance of a slider track.
pub struct SliderConfig {
    /// Track width in terminal columns, knob included.
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
    pub knob_char: char,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            width: 30,
            filled_char: '━',
            empty_char: '─',
            knob_char: '●',
        }
    }
}

// ── Slider ───────────────────────────────────────────────────────────────────

/// A bounded integer slider drawn on one line:
///
/// `Year   2006 ━━━━━━●─────── 2020  [2012]`
pub struct Slider<'a> {
    pub label: &'a str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
    pub theme: &'a Theme,
    pub config: SliderConfig,
}

impl<'a> Slider<'a> {
    pub fn new(label: &'a str, value: i64, min: i64, max: i64, theme: &'a Theme) -> Self {
        Self {
            label,
            value,
            min,
            max,
            theme,
            config: SliderConfig::default(),
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.config.width = width.max(1);
        self
    }

    /// Column of the knob within the track, `0..width`.
    pub fn knob_position(&self) -> usize {
        let last = self.config.width.saturating_sub(1) as i64;
        if self.max <= self.min {
            return 0;
        }
        let value = self.value.clamp(self.min, self.max);
        (((value - self.min) * last) as f64 / (self.max - self.min) as f64).round() as usize
    }

    pub fn to_line(&self) -> Line<'a> {
        let knob = self.knob_position();
        let width = self.config.width as usize;
        let filled: String = std::iter::repeat_n(self.config.filled_char, knob).collect();
        let empty: String =
            std::iter::repeat_n(self.config.empty_char, width.saturating_sub(knob + 1)).collect();

        let pad = LABEL_WIDTH.saturating_sub(self.label.width());
        Line::from(vec![
            Span::styled(format!("{}{} ", self.label, " ".repeat(pad)), self.theme.label),
            Span::styled(format!("{} ", self.min), self.theme.dim),
            Span::styled(filled, self.theme.slider_filled),
            Span::styled(self.config.knob_char.to_string(), self.theme.slider_knob),
            Span::styled(empty, self.theme.slider_empty),
            Span::styled(format!(" {}", self.max), self.theme.dim),
            Span::styled(format!("  [{}]", self.value), self.theme.value),
        ])
    }
}

// ── Checkbox ─────────────────────────────────────────────────────────────────

/// `[x] label` or `[ ] label`.
pub fn checkbox_line<'a>(label: &'a str, checked: bool, theme: &Theme) -> Line<'a> {
    let mark = if checked { "[x]" } else { "[ ]" };
    Line::from(vec![
        Span::styled(mark, theme.checkbox),
        Span::styled(" ", theme.text),
        Span::styled(label, theme.text),
    ])
}

// ── Tests ─────────────────────────────────────────────────────────────────────
