//! The boundary between computed snapshots and whatever displays them.

use std::io::Write;

use dashboard_core::error::Result;
use dashboard_data::snapshot::DashboardSnapshot;

/// A presentation surface for dashboard snapshots.
pub trait Renderer {
    fn render(&mut self, snapshot: &DashboardSnapshot) -> Result<()>;
}

/// Writes each snapshot as one JSON document.
pub struct JsonRenderer<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Indent the output.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, snapshot: &DashboardSnapshot) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, snapshot)?;
        } else {
            serde_json::to_writer(&mut self.writer, snapshot)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::models::IncidentTable;
    use dashboard_data::snapshot::{build_snapshot, ViewParams};

    fn snapshot() -> DashboardSnapshot {
        let table = IncidentTable::new("empty.csv", vec![], vec![]);
        build_snapshot(
            &table,
            ViewParams {
                year: 2006,
                hour: 0,
                compare_hours: (23, 9),
                show_date_table: false,
            },
        )
    }

    #[test]
    fn test_json_renderer_writes_one_line_per_snapshot() {
        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&snapshot()).unwrap();
        renderer.render(&snapshot()).unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["total_incidents"], 0);
        assert!(value["map_view"].is_null());
        assert!(value["date_borough"].is_null());
    }

    #[test]
    fn test_json_renderer_pretty() {
        let mut renderer = JsonRenderer::new(Vec::new()).pretty();
        renderer.render(&snapshot()).unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(output.contains("\n  \"filters\""));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["filters"]["year"], 2006);
    }
}
