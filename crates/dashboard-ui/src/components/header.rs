use crate::themes::Theme;
use dashboard_core::formatting::format_count;
use ratatui::text::{Line, Span};

/// Marker placed either side of the dashboard title.
pub const TITLE_MARK: &str = "◆";

/// Width of the separator under the title.
const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Dashboard title between two markers (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Dataset information in `[ N incidents | source ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Rows in the loaded table.
    pub total_incidents: u64,
    /// Display name of the source file.
    pub source: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(total_incidents: u64, source: &'a str, theme: &'a Theme) -> Self {
        Self {
            total_incidents,
            source,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(TITLE_MARK, self.theme.header_accent),
                Span::styled(" NYC SHOOTING INCIDENTS ", self.theme.header),
                Span::styled(TITLE_MARK, self.theme.header_accent),
            ]),
            Line::from(Span::styled(
                "=".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(
                    format!("{} incidents", format_count(self.total_incidents)),
                    self.theme.value,
                ),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
