//! KPI report export: local CSV rendering, backend pass-through otherwise.

use anyhow::{Context, Result, bail};
use pulse_core::{Measurement, MetricCatalog, classify};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "pdf" => Ok(ExportFormat::Pdf),
            other => bail!("unsupported export format: {other} (expected csv, excel, or pdf)"),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
        };
        write!(f, "{name}")
    }
}

/// Render the latest KPI values as CSV bytes.
///
/// Columns match the backend report: code, display name, value, unit,
/// derived status, measurement date, comment. Metrics missing from the
/// catalog still export, with a blank name/unit and unknown status.
pub fn render_csv(measurements: &[Measurement], catalog: &MetricCatalog) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "metric_code",
            "metric_name",
            "value",
            "unit",
            "status",
            "measurement_date",
            "comment",
        ])
        .context("writing csv header")?;

    for m in measurements {
        let definition = catalog.get(&m.metric_code);
        let name = definition.map(|d| d.name.as_str()).unwrap_or("");
        let unit = catalog.unit(&m.metric_code);
        let status = definition
            .map(|d| classify(m.value, d).label())
            .unwrap_or("unknown");

        writer
            .write_record([
                m.metric_code.as_str(),
                name,
                &format!("{:.1}", m.value),
                unit,
                status,
                &m.measured_at.to_rfc3339(),
                m.comment.as_deref().unwrap_or(""),
            ])
            .with_context(|| format!("writing csv row for {}", m.metric_code))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing csv output: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pulse_core::MetricDefinition;

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("docx".parse::<ExportFormat>().is_err());

        assert_eq!(ExportFormat::Excel.to_string(), "excel");
        assert_eq!(ExportFormat::Excel.file_extension(), "xlsx");
    }

    #[test]
    fn test_render_csv_rows() {
        let catalog = MetricCatalog::new(vec![
            MetricDefinition::new("BUDGET_UTILIZATION", "Budget utilization", false)
                .with_unit("%")
                .with_thresholds(85.0, 95.0),
        ]);
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let measurements = vec![
            Measurement::new("BUDGET_UTILIZATION", 1, 90.0, ts),
            Measurement::new("UNLISTED", 1, 3.0, ts),
        ];

        let bytes = render_csv(&measurements, &catalog).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("metric_code,metric_name"));
        assert!(lines[1].contains("BUDGET_UTILIZATION,Budget utilization,90.0,%,warning"));
        assert!(lines[2].contains("UNLISTED,,3.0,,unknown"));
    }
}
