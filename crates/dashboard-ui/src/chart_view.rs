//! Chart widgets: borough timeline, age breakdowns, sex shares and the
//! peak-hour comparison.

use std::collections::BTreeMap;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType,
        LegendPosition, Paragraph,
    },
    Frame,
};

use dashboard_core::formatting::format_count;
use dashboard_data::views::{AgeGroupCount, BoroughMonthCount, SexCount, YearHourCount};

use crate::components::share_bar::{ShareBar, ShareSegment};
use crate::themes::Theme;

// ── Data shaping ──────────────────────────────────────────────────────────────

/// Line-chart input derived from the borough timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSeries {
    /// Distinct `"YYMM"` keys in ascending order; x = index into this list.
    pub months: Vec<String>,
    /// One `(borough, points)` pair per borough, boroughs in name order.
    pub series: Vec<(String, Vec<(f64, f64)>)>,
    pub max_count: u64,
}

pub fn timeline_series(rows: &[BoroughMonthCount]) -> TimelineSeries {
    let mut months: Vec<String> = rows.iter().map(|r| r.yearmonth.clone()).collect();
    months.sort();
    months.dedup();

    let mut by_boro: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for row in rows {
        // `months` is sorted and contains every key.
        let x = months.binary_search(&row.yearmonth).unwrap_or_default();
        by_boro
            .entry(row.boro.as_str())
            .or_default()
            .push((x as f64, row.incidents as f64));
    }

    TimelineSeries {
        max_count: rows.iter().map(|r| r.incidents).max().unwrap_or(0),
        series: by_boro
            .into_iter()
            .map(|(boro, points)| (boro.to_string(), points))
            .collect(),
        months,
    }
}

/// Peak-hour rows regrouped by year for a grouped bar chart.
///
/// Years ascend; each carries the counts for `hours.0` and `hours.1`, zero
/// when the year has no incident at that hour.
pub fn peak_hour_groups(rows: &[YearHourCount], hours: (u32, u32)) -> Vec<(i32, [u64; 2])> {
    let mut groups: BTreeMap<i32, [u64; 2]> = BTreeMap::new();
    for row in rows {
        let slot = if row.hour == hours.0 {
            0
        } else if row.hour == hours.1 {
            1
        } else {
            continue;
        };
        groups.entry(row.year).or_default()[slot] += row.incidents;
    }
    groups.into_iter().collect()
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn chart_block<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.separator)
        .title(Span::styled(title, theme.header))
}

fn render_empty(frame: &mut Frame, area: Rect, block: Block, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled("No incidents", theme.dim))).block(block),
        area,
    );
}

/// Monthly incidents per borough as one line per borough, legend at the
/// top right.
pub fn render_borough_timeline(
    frame: &mut Frame,
    area: Rect,
    rows: &[BoroughMonthCount],
    theme: &Theme,
) {
    let block = chart_block(" Incidents per month by borough ".to_string(), theme);
    if rows.is_empty() {
        render_empty(frame, area, block, theme);
        return;
    }

    let timeline = timeline_series(rows);
    let datasets: Vec<Dataset> = timeline
        .series
        .iter()
        .enumerate()
        .map(|(i, (boro, points))| {
            Dataset::default()
                .name(boro.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.series_color(i)))
                .data(points)
        })
        .collect();

    let last_x = timeline.months.len().saturating_sub(1);
    let x_labels: Vec<Span> = [0, last_x / 2, last_x]
        .iter()
        .map(|&i| Span::styled(timeline.months[i].clone(), theme.axis))
        .collect();
    let max_y = timeline.max_count.max(1);
    let y_labels: Vec<Span> = [0, max_y / 2, max_y]
        .iter()
        .map(|&v| Span::styled(format_count(v), theme.axis))
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Year-month (YYMM)", theme.label))
                .style(theme.axis)
                .bounds([0.0, last_x.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Incidents", theme.label))
                .style(theme.axis)
                .bounds([0.0, max_y as f64])
                .labels(y_labels),
        )
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Percentage(50), Constraint::Percentage(50)));
    frame.render_widget(chart, area);
}

/// Horizontal bars, one per age group, in the order given.
pub fn render_age_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[AgeGroupCount],
    theme: &Theme,
) {
    let block = chart_block(format!(" {title} "), theme);
    if rows.is_empty() {
        render_empty(frame, area, block, theme);
        return;
    }

    let bars: Vec<Bar> = rows
        .iter()
        .map(|r| {
            Bar::default()
                .value(r.incidents)
                .label(Line::from(format!("{:>5}", r.label)))
                .text_value(format_count(r.incidents))
                .style(Style::default().fg(theme.series_color(0)))
                .value_style(theme.value)
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .label_style(theme.label)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

/// Share of each sex as a stacked bar with a legend below.
pub fn render_sex_shares(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[SexCount],
    theme: &Theme,
) {
    let block = chart_block(format!(" {title} "), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let segments: Vec<ShareSegment> = rows
        .iter()
        .map(|r| ShareSegment {
            label: r.label.clone(),
            value: r.incidents,
        })
        .collect();
    let lines = ShareBar::new(&segments, inner.width, theme).to_lines();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Yearly incidents at the two compared hours, grouped by year.
pub fn render_peak_hours(
    frame: &mut Frame,
    area: Rect,
    rows: &[YearHourCount],
    hours: (u32, u32),
    theme: &Theme,
) {
    let block = chart_block(
        format!(" Incidents at {}:00 vs {}:00 by year ", hours.0, hours.1),
        theme,
    );
    if rows.is_empty() {
        render_empty(frame, area, block, theme);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [legend_area, chart_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Hour  ", theme.label),
            Span::styled("■", Style::default().fg(theme.series_color(0))),
            Span::styled(format!(" {:02}  ", hours.0), theme.text),
            Span::styled("■", Style::default().fg(theme.series_color(1))),
            Span::styled(format!(" {:02}", hours.1), theme.text),
        ])),
        legend_area,
    );

    let groups = peak_hour_groups(rows, hours);
    let group_bars: Vec<(String, Vec<Bar>)> = groups
        .iter()
        .map(|(year, counts)| {
            let bars = counts
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    Bar::default()
                        .value(n)
                        .text_value(format_count(n))
                        .style(Style::default().fg(theme.series_color(i)))
                        .value_style(theme.value)
                })
                .collect();
            (year.to_string(), bars)
        })
        .collect();

    // Each group is two bars plus a one-column gap.
    let per_group = chart_area.width / (group_bars.len().max(1) as u16);
    let bar_width = (per_group.saturating_sub(1) / 2).max(1);

    let mut chart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(1)
        .label_style(theme.label);
    for (year, bars) in &group_bars {
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(year.clone()))
                .bars(bars),
        );
    }
    frame.render_widget(chart, chart_area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
