//! Incident maps: a point map for the selected year and a binned density
//! map for the selected hour.
//!
//! Both share one viewport derived from [`MapViewState`]: centred on the mean
//! position of the dataset, with a span that halves for every zoom level.
//! The terminal draws top-down, so pitch only appears in the title.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Paragraph,
    },
    Frame,
};

use dashboard_core::formatting::{format_coordinates, format_count};
use dashboard_data::views::{DensityPoint, MapPoint, MapViewState};

use crate::themes::{Theme, DENSITY_STEPS};

/// Map tiles visible across the viewport at zoom 0.
const VIEW_TILES: f64 = 2.5;

const CELL: &str = "█";

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Longitude/latitude bounds of a map drawn into `cols` × `rows` cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Viewport {
    /// Bounds for `view` in an area of `cols` × `rows` terminal cells.
    ///
    /// Terminal cells are about twice as tall as wide; the latitude span is
    /// scaled by that and by the cosine of the centre latitude so the map is
    /// not stretched.
    pub fn new(view: &MapViewState, cols: u16, rows: u16) -> Self {
        let half_lon = 180.0 * VIEW_TILES / 2_f64.powf(view.zoom);
        let aspect = if cols == 0 {
            1.0
        } else {
            (rows as f64 * 2.0) / cols as f64
        };
        let half_lat = half_lon * view.latitude.to_radians().cos() * aspect;
        Self {
            x_bounds: [view.longitude - half_lon, view.longitude + half_lon],
            y_bounds: [view.latitude - half_lat, view.latitude + half_lat],
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.x_bounds[0]..=self.x_bounds[1]).contains(&longitude)
            && (self.y_bounds[0]..=self.y_bounds[1]).contains(&latitude)
    }
}

// ── Density grid ──────────────────────────────────────────────────────────────

/// Incident counts per cell, row 0 being the northern edge.
pub fn density_grid(
    points: &[DensityPoint],
    viewport: &Viewport,
    cols: usize,
    rows: usize,
) -> Vec<Vec<u64>> {
    let mut grid = vec![vec![0_u64; cols]; rows];
    if cols == 0 || rows == 0 {
        return grid;
    }
    let [west, east] = viewport.x_bounds;
    let [south, north] = viewport.y_bounds;
    for p in points {
        if !viewport.contains(p.latitude, p.longitude) {
            continue;
        }
        let x = ((p.longitude - west) / (east - west) * cols as f64) as usize;
        let y = ((north - p.latitude) / (north - south) * rows as f64) as usize;
        grid[y.min(rows - 1)][x.min(cols - 1)] += 1;
    }
    grid
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Point map of the selected year's incidents.
pub fn render_incident_map(
    frame: &mut Frame,
    area: Rect,
    year: i32,
    points: &[MapPoint],
    view: Option<&MapViewState>,
    theme: &Theme,
) {
    let title = format!(
        " Incidents in {year}: {} ",
        format_count(points.len() as u64)
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(title);

    let Some(view) = view else {
        render_no_coordinates(frame, area, block, theme);
        return;
    };

    let inner = block.inner(area);
    let viewport = Viewport::new(view, inner.width, inner.height);
    let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.longitude, p.latitude)).collect();
    let color = theme.map_point.fg.unwrap_or(theme.series_color(0));

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds)
        .y_bounds(viewport.y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &coords,
                color,
            });
        });
    frame.render_widget(canvas, area);
}

/// Density map of the selected hour's incidents, one grid cell per
/// terminal cell, coloured by count.
pub fn render_density_map(
    frame: &mut Frame,
    area: Rect,
    hour: u32,
    points: &[DensityPoint],
    view: Option<&MapViewState>,
    theme: &Theme,
) {
    let pitch = view.map(|v| v.pitch).unwrap_or_default();
    let title = format!(
        " Incidents at {hour:02}:00: {} (pitch {pitch:.0}°) ",
        format_count(points.len() as u64)
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(title);

    let Some(view) = view else {
        render_no_coordinates(frame, area, block, theme);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [grid_area, legend_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let viewport = Viewport::new(view, grid_area.width, grid_area.height);
    let grid = density_grid(
        points,
        &viewport,
        grid_area.width as usize,
        grid_area.height as usize,
    );
    let max = grid.iter().flatten().copied().max().unwrap_or(0);

    let lines: Vec<Line> = grid
        .iter()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|&count| {
                        if count == 0 {
                            Span::raw(" ")
                        } else {
                            Span::styled(
                                CELL,
                                Style::default().fg(theme.density_color(count, max)),
                            )
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), grid_area);
    frame.render_widget(
        Paragraph::new(density_legend(max, view, theme)),
        legend_area,
    );
}

fn density_legend<'a>(max: u64, view: &MapViewState, theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::styled("sparse ", theme.dim)];
    for color in theme.density.iter().take(DENSITY_STEPS) {
        spans.push(Span::styled(CELL, Style::default().fg(*color)));
    }
    spans.push(Span::styled(
        format!(" dense (max {} per cell)", format_count(max)),
        theme.dim,
    ));
    spans.push(Span::styled(
        format!("  centre {}", format_coordinates(view.latitude, view.longitude)),
        theme.label,
    ));
    Line::from(spans)
}

fn render_no_coordinates(frame: &mut Frame, area: Rect, block: Block, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "No geolocated incidents",
            theme.warning,
        )))
        .block(block),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn view() -> MapViewState {
        MapViewState {
            latitude: 40.7,
            longitude: -73.9,
            zoom: 9.5,
            pitch: 50.0,
        }
    }

    fn density(lat: f64, lon: f64) -> DensityPoint {
        DensityPoint {
            incident_key: "1".to_string(),
            latitude: lat,
            longitude: lon,
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── Viewport ──────────────────────────────────────────────────────────────

    #[test]
    fn test_viewport_centred_on_view() {
        let vp = Viewport::new(&view(), 80, 20);
        let mid_x = (vp.x_bounds[0] + vp.x_bounds[1]) / 2.0;
        let mid_y = (vp.y_bounds[0] + vp.y_bounds[1]) / 2.0;
        assert!((mid_x + 73.9).abs() < 1e-9);
        assert!((mid_y - 40.7).abs() < 1e-9);
        assert!(vp.contains(40.7, -73.9));
        assert!(!vp.contains(40.7, -80.0));
    }

    #[test]
    fn test_viewport_narrows_with_zoom() {
        let wide = Viewport::new(&view(), 80, 20);
        let zoomed = Viewport::new(
            &MapViewState {
                zoom: 10.5,
                ..view()
            },
            80,
            20,
        );
        let span = |vp: &Viewport| vp.x_bounds[1] - vp.x_bounds[0];
        assert!((span(&wide) / span(&zoomed) - 2.0).abs() < 1e-9);
    }

    // ── density_grid ──────────────────────────────────────────────────────────

    #[test]
    fn test_density_grid_counts_points() {
        let vp = Viewport::new(&view(), 10, 10);
        let points = vec![
            density(40.68, -73.88),
            density(40.68, -73.88),
            density(40.681, -73.881),
            density(10.0, 10.0),
        ];
        let grid = density_grid(&points, &vp, 10, 10);
        let total: u64 = grid.iter().flatten().sum();
        // The far-away point is outside the viewport.
        assert_eq!(total, 3);
        assert_eq!(grid.iter().flatten().copied().max(), Some(3));
    }

    #[test]
    fn test_density_grid_north_is_top_row() {
        let vp = Viewport::new(&view(), 4, 4);
        let north = density(vp.y_bounds[1], -73.9);
        let south = density(vp.y_bounds[0], -73.9);
        let grid = density_grid(&[north, south], &vp, 4, 4);
        assert_eq!(grid[0].iter().sum::<u64>(), 1);
        assert_eq!(grid[3].iter().sum::<u64>(), 1);
    }

    #[test]
    fn test_density_grid_zero_size() {
        let vp = Viewport::new(&view(), 0, 0);
        assert!(density_grid(&[density(40.7, -73.9)], &vp, 0, 0).is_empty());
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_incident_map_title() {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::simple();
        let points = vec![MapPoint {
            latitude: 40.7,
            longitude: -73.9,
        }];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_incident_map(frame, area, 2012, &points, Some(&view()), &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("Incidents in 2012: 1"));
    }

    #[test]
    fn test_render_density_map_draws_cells() {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let points = vec![density(40.7, -73.9), density(40.75, -73.95)];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_density_map(frame, area, 9, &points, Some(&view()), &theme);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Incidents at 09:00: 2"));
        assert!(text.contains("sparse"));
        assert!(text.contains(CELL));
    }

    #[test]
    fn test_render_maps_without_coordinates() {
        let backend = TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::simple();

        terminal
            .draw(|frame| {
                let [left, right] =
                    Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .areas(frame.area());
                render_incident_map(frame, left, 2006, &[], None, &theme);
                render_density_map(frame, right, 0, &[], None, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("No geolocated"));
    }
}
