//! Terminal rendering: formatted values, status badges, progress bars, and
//! the ASCII trend chart. Scaling from the core's [0,1] fractions to rows
//! and columns happens here, not in the computations.

use chrono::{DateTime, Utc};
use pulse_core::{KpiStatus, TrendSeries};

/// One decimal, with a unit suffix when the metric has one. Percent signs
/// attach directly; word units get a space.
pub fn format_value(value: f64, unit: &str) -> String {
    match unit {
        "" => format!("{value:.1}"),
        "%" => format!("{value:.1}%"),
        unit => format!("{value:.1} {unit}"),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

pub fn format_datetime(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

pub fn status_badge(status: KpiStatus) -> &'static str {
    match status {
        KpiStatus::Good => "GOOD",
        KpiStatus::Warning => "WARNING",
        KpiStatus::Critical => "CRITICAL",
        KpiStatus::Unknown => "UNKNOWN",
    }
}

/// A fixed-width bar like `[########------------] 41.0%`
pub fn progress_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "[{}{}] {}",
        "#".repeat(filled),
        "-".repeat(width - filled),
        format_percent(percent)
    )
}

const AXIS_LABEL_WIDTH: usize = 8;

/// Plot a trend series on a width x height character grid.
///
/// The top and bottom rows carry the max/min axis labels; a date line with
/// first, middle, and last measurement dates sits under the grid.
pub fn trend_chart(series: &TrendSeries, width: usize, height: usize) -> String {
    let width = width.max(16);
    let height = height.max(2);

    let mut grid = vec![vec![' '; width]; height];
    for p in &series.points {
        let col = (p.fraction_x * (width - 1) as f64).round() as usize;
        let row = ((1.0 - p.fraction_y) * (height - 1) as f64).round() as usize;
        grid[row][col] = '*';
    }

    let mut out = String::new();
    for (i, row) in grid.iter().enumerate() {
        let label = if i == 0 {
            format!("{:>w$.1}", series.max_value, w = AXIS_LABEL_WIDTH)
        } else if i == height - 1 {
            format!("{:>w$.1}", series.min_value, w = AXIS_LABEL_WIDTH)
        } else {
            " ".repeat(AXIS_LABEL_WIDTH)
        };
        out.push_str(&label);
        out.push_str(" |");
        out.extend(row.iter());
        out.push('\n');
    }

    out.push_str(&" ".repeat(AXIS_LABEL_WIDTH + 2));
    out.push_str(&date_axis(series, width));
    out.push('\n');
    out
}

/// First, middle, and last dates spread across the chart width
fn date_axis(series: &TrendSeries, width: usize) -> String {
    let mut line = vec![' '; width];

    let mut place = |col: usize, text: &str| {
        let start = col.min(width.saturating_sub(text.len()));
        for (i, ch) in text.chars().enumerate() {
            if start + i < width {
                line[start + i] = ch;
            }
        }
    };

    if let Some(first) = series.first() {
        place(0, &format_date(&first.measured_at));
    }
    if series.len() > 2 {
        let mid = &series.points[series.len() / 2];
        let text = format_date(&mid.measured_at);
        place(width.saturating_sub(text.len()) / 2, &text);
    }
    if series.len() > 1 {
        if let Some(last) = series.last() {
            let text = format_date(&last.measured_at);
            place(width.saturating_sub(text.len()), &text);
        }
    }

    line.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pulse_core::{Measurement, build_trend};

    fn series_of(values: &[f64]) -> TrendSeries {
        let history: Vec<Measurement> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let ts = Utc.with_ymd_and_hms(2024, 5, 1 + i as u32, 0, 0, 0).unwrap();
                Measurement::new("COMPLETION_RATE", 1, v, ts)
            })
            .collect();
        build_trend(&history).unwrap()
    }

    #[test]
    fn test_format_value_units() {
        assert_eq!(format_value(65.7, "%"), "65.7%");
        assert_eq!(format_value(15.0, "days"), "15.0 days");
        assert_eq!(format_value(35.52, ""), "35.5");
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0, 10), "[----------] 0.0%");
        assert_eq!(progress_bar(100.0, 10), "[##########] 100.0%");
        assert_eq!(progress_bar(50.0, 10), "[#####-----] 50.0%");
        // Out-of-range input fills but still prints the raw value
        assert!(progress_bar(120.0, 10).starts_with("[##########]"));
    }

    #[test]
    fn test_trend_chart_extremes() {
        let chart = trend_chart(&series_of(&[10.0, 20.0, 30.0]), 30, 5);
        let lines: Vec<&str> = chart.lines().collect();

        // Grid rows plus the date axis
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("30.0"));
        assert!(lines[4].contains("10.0"));
        // Lowest value plotted on the bottom row, highest on the top
        assert!(lines[0].contains('*'));
        assert!(lines[4].contains('*'));
        assert!(lines[5].contains("2024-05-01"));
        assert!(lines[5].contains("2024-05-03"));
    }

    #[test]
    fn test_trend_chart_single_point_at_midline() {
        let chart = trend_chart(&series_of(&[42.0]), 20, 5);
        let lines: Vec<&str> = chart.lines().collect();
        // Midpoint row for the degenerate series
        assert!(lines[2].contains('*'));
        assert!(!lines[0].contains('*'));
        assert!(!lines[4].contains('*'));
    }
}
