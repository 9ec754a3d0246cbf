//! REST client for the project-management backend.
//!
//! Wire DTOs are camelCase and convert into the core types at the edge;
//! nothing downstream sees a framework or transport type.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDateTime, Utc};
use pulse_core::{Measurement, MetricDefinition, PhasePlan};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// HTTP client bound to one backend base URL, e.g. "http://host/api/v1"
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricDto {
    code: String,
    name: String,
    description: Option<String>,
    unit: Option<String>,
    threshold_warning: Option<f64>,
    threshold_critical: Option<f64>,
    #[serde(default)]
    higher_is_better: bool,
    #[serde(default)]
    enable_notifications: bool,
}

impl From<MetricDto> for MetricDefinition {
    fn from(dto: MetricDto) -> Self {
        MetricDefinition {
            code: dto.code,
            name: dto.name,
            description: dto.description,
            unit: dto.unit,
            threshold_warning: dto.threshold_warning,
            threshold_critical: dto.threshold_critical,
            higher_is_better: dto.higher_is_better,
            enable_notifications: dto.enable_notifications,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KpiValueDto {
    metric_code: String,
    project_id: i64,
    value: f64,
    measurement_date: String,
    comment: Option<String>,
}

impl KpiValueDto {
    fn into_measurement(self) -> Result<Measurement> {
        let measured_at = parse_measurement_date(&self.measurement_date)?;
        Ok(Measurement {
            metric_code: self.metric_code,
            project_id: self.project_id,
            value: self.value,
            measured_at,
            comment: self.comment,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanningDto {
    phase_id: i64,
    phase: Option<PhaseDto>,
}

#[derive(Debug, Deserialize)]
struct PhaseDto {
    name: String,
    percentage: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhaseProgressDto {
    phase_id: i64,
    progress: f64,
}

/// Parse a backend timestamp: RFC 3339, or the naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` form the backend emits, taken as UTC.
fn parse_measurement_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .with_context(|| format!("invalid measurement date '{raw}'"))?;
    Ok(naive.and_utc())
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("backend error: {status} {body}");
        }

        resp.json().await.with_context(|| format!("parsing {url}"))
    }

    /// All configured metric definitions
    pub async fn fetch_metric_definitions(&self) -> Result<Vec<MetricDefinition>> {
        let dtos: Vec<MetricDto> = self.get_json("/kpis/metrics").await?;
        Ok(dtos.into_iter().map(MetricDefinition::from).collect())
    }

    /// Latest measurement per metric for one project
    pub async fn fetch_project_kpis(&self, project_id: i64) -> Result<Vec<Measurement>> {
        let dtos: Vec<KpiValueDto> = self
            .get_json(&format!("/kpis/projects/{project_id}"))
            .await?;
        dtos.into_iter().map(KpiValueDto::into_measurement).collect()
    }

    /// Full measurement history for one project/metric pair
    pub async fn fetch_kpi_history(
        &self,
        project_id: i64,
        metric_code: &str,
    ) -> Result<Vec<Measurement>> {
        let dtos: Vec<KpiValueDto> = self
            .get_json(&format!(
                "/kpis/projects/{project_id}/metrics/{metric_code}/history"
            ))
            .await?;
        dtos.into_iter().map(KpiValueDto::into_measurement).collect()
    }

    /// Weighted phase plan for one project. Plannings without an attached
    /// phase carry no weight and are skipped.
    pub async fn fetch_phase_plans(&self, project_id: i64) -> Result<Vec<PhasePlan>> {
        let dtos: Vec<PlanningDto> = self
            .get_json(&format!("/plannings/projects/{project_id}"))
            .await?;
        Ok(dtos
            .into_iter()
            .filter_map(|dto| {
                dto.phase.map(|phase| PhasePlan {
                    phase_id: dto.phase_id,
                    name: phase.name,
                    weight_percent: phase.percentage,
                })
            })
            .collect())
    }

    /// Per-phase completion percentages for one project
    pub async fn fetch_phase_progress(&self, project_id: i64) -> Result<HashMap<i64, f64>> {
        let dtos: Vec<PhaseProgressDto> = self
            .get_json(&format!("/projects/{project_id}/phase-progress"))
            .await?;
        Ok(dtos.into_iter().map(|d| (d.phase_id, d.progress)).collect())
    }

    /// Backend-rendered KPI report, returned as opaque bytes
    pub async fn export_report(&self, project_id: i64, format: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/kpis/projects/{project_id}/export?format={format}",
            self.base_url
        );
        debug!(%url, "GET (export)");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("backend error: {status} {body}");
        }

        Ok(resp.bytes().await.context("reading export body")?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_date() {
        let dt = parse_measurement_date("2024-05-01T00:00:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_backend_naive_date() {
        let dt = parse_measurement_date("2024-05-01T08:30:15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T08:30:15+00:00");

        let with_millis = parse_measurement_date("2024-05-01T08:30:15.250").unwrap();
        assert_eq!(with_millis.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        assert!(parse_measurement_date("05/01/2024").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8080/api/v1/");
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_kpi_value_dto_deserializes_camel_case() {
        let json = r#"{
            "metricCode": "COMPLETION_RATE",
            "projectId": 7,
            "value": 65.7,
            "measurementDate": "2024-05-01T00:00:00",
            "comment": "automatic calculation"
        }"#;
        let dto: KpiValueDto = serde_json::from_str(json).unwrap();
        let m = dto.into_measurement().unwrap();
        assert_eq!(m.metric_code, "COMPLETION_RATE");
        assert_eq!(m.project_id, 7);
        assert_eq!(m.value, 65.7);
    }

    #[test]
    fn test_planning_dto_without_phase_is_skipped() {
        let json = r#"[
            {"phaseId": 1, "phase": {"name": "Execution", "percentage": 50}},
            {"phaseId": 2, "phase": null}
        ]"#;
        let dtos: Vec<PlanningDto> = serde_json::from_str(json).unwrap();
        let plans: Vec<PhasePlan> = dtos
            .into_iter()
            .filter_map(|dto| {
                dto.phase.map(|phase| PhasePlan {
                    phase_id: dto.phase_id,
                    name: phase.name,
                    weight_percent: phase.percentage,
                })
            })
            .collect();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].weight_percent, 50.0);
    }
}
