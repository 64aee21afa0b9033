//! Stacked share bar with a legend underneath, the terminal stand-in for a
//! pie chart.

use crate::themes::Theme;
use dashboard_core::formatting::format_share;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

const FILL: char = '█';
const LEGEND_MARK: &str = "■";

/// One slice of the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareSegment {
    pub label: String,
    pub value: u64,
}

pub struct ShareBar<'a> {
    pub segments: &'a [ShareSegment],
    pub width: u16,
    pub theme: &'a Theme,
}

impl<'a> ShareBar<'a> {
    pub fn new(segments: &'a [ShareSegment], width: u16, theme: &'a Theme) -> Self {
        Self {
            segments,
            width,
            theme,
        }
    }

    pub fn total(&self) -> u64 {
        self.segments.iter().map(|s| s.value).sum()
    }

    /// Column width of each segment.
    ///
    /// Boundaries are rounded from cumulative shares, so the widths always
    /// add up to the bar width when the total is non-zero.
    pub fn segment_widths(&self) -> Vec<usize> {
        let total = self.total();
        let width = self.width as u64;
        if total == 0 {
            return vec![0; self.segments.len()];
        }
        let mut widths = Vec::with_capacity(self.segments.len());
        let mut cumulative = 0;
        let mut previous_edge = 0;
        for segment in self.segments {
            cumulative += segment.value;
            let edge = ((cumulative * width) as f64 / total as f64).round() as usize;
            widths.push(edge - previous_edge);
            previous_edge = edge;
        }
        widths
    }

    /// The bar line, a blank line, then one legend line per segment.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let total = self.total();
        let mut lines = Vec::with_capacity(self.segments.len() + 2);

        if total == 0 {
            lines.push(Line::from(Span::styled("No incidents", self.theme.dim)));
            return lines;
        }

        let bar: Vec<Span<'a>> = self
            .segment_widths()
            .into_iter()
            .enumerate()
            .map(|(i, w)| {
                Span::styled(
                    std::iter::repeat_n(FILL, w).collect::<String>(),
                    Style::default().fg(self.theme.series_color(i)),
                )
            })
            .collect();
        lines.push(Line::from(bar));
        lines.push(Line::from(""));

        let label_width = self
            .segments
            .iter()
            .map(|s| s.label.width())
            .max()
            .unwrap_or(0);
        for (i, segment) in self.segments.iter().enumerate() {
            let pad = label_width - segment.label.width();
            lines.push(Line::from(vec![
                Span::styled(LEGEND_MARK, Style::default().fg(self.theme.series_color(i))),
                Span::styled(
                    format!(" {}{}  ", segment.label, " ".repeat(pad)),
                    self.theme.label,
                ),
                Span::styled(format_share(segment.value, total), self.theme.value),
            ]));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(values: &[(&str, u64)]) -> Vec<ShareSegment> {
        values
            .iter()
            .map(|(label, value)| ShareSegment {
                label: label.to_string(),
                value: *value,
            })
            .collect()
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_segment_widths_fill_bar() {
        let theme = Theme::simple();
        let segs = segments(&[("M", 1), ("F", 1), ("N/A", 1)]);
        let bar = ShareBar::new(&segs, 40, &theme);
        let widths = bar.segment_widths();
        assert_eq!(widths.iter().sum::<usize>(), 40);
        assert_eq!(widths, vec![13, 14, 13]);
    }

    #[test]
    fn test_segment_widths_proportional() {
        let theme = Theme::simple();
        let segs = segments(&[("M", 3), ("F", 1)]);
        assert_eq!(ShareBar::new(&segs, 20, &theme).segment_widths(), vec![15, 5]);
    }

    #[test]
    fn test_legend_lines() {
        let theme = Theme::simple();
        let segs = segments(&[("M", 1_500), ("N/A", 500)]);
        let lines = ShareBar::new(&segs, 20, &theme).to_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(text(&lines[2]), "■ M    1,500 (75.0%)");
        assert_eq!(text(&lines[3]), "■ N/A  500 (25.0%)");
    }

    #[test]
    fn test_empty_shares() {
        let theme = Theme::simple();
        let segs: Vec<ShareSegment> = vec![];
        let lines = ShareBar::new(&segs, 20, &theme).to_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(text(&lines[0]), "No incidents");
    }
}
