//! The injected data source: real backend or offline fixtures.
//!
//! Callers receive one of these explicitly instead of consulting a global
//! mock toggle, so the computations downstream never know which side they
//! are running against.

use crate::client::ApiClient;
use crate::mock::MockData;
use crate::report::{self, ExportFormat};
use anyhow::{Result, bail};
use pulse_core::{Measurement, MetricCatalog, MetricDefinition, PhasePlan};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum DataSource {
    Rest(ApiClient),
    Mock(MockData),
}

impl DataSource {
    pub fn rest(base_url: impl Into<String>) -> Self {
        DataSource::Rest(ApiClient::new(base_url))
    }

    pub fn mock() -> Self {
        DataSource::Mock(MockData)
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, DataSource::Mock(_))
    }

    pub async fn metric_definitions(&self) -> Result<Vec<MetricDefinition>> {
        match self {
            DataSource::Rest(client) => client.fetch_metric_definitions().await,
            DataSource::Mock(mock) => Ok(mock.metric_definitions()),
        }
    }

    /// Convenience: fetch definitions and build the lookup catalog
    pub async fn metric_catalog(&self) -> Result<MetricCatalog> {
        let definitions = self.metric_definitions().await?;
        debug!(count = definitions.len(), "loaded metric definitions");
        Ok(MetricCatalog::new(definitions))
    }

    pub async fn project_kpis(&self, project_id: i64) -> Result<Vec<Measurement>> {
        match self {
            DataSource::Rest(client) => client.fetch_project_kpis(project_id).await,
            DataSource::Mock(mock) => Ok(mock.project_kpis(project_id)),
        }
    }

    pub async fn kpi_history(
        &self,
        project_id: i64,
        metric_code: &str,
    ) -> Result<Vec<Measurement>> {
        match self {
            DataSource::Rest(client) => client.fetch_kpi_history(project_id, metric_code).await,
            DataSource::Mock(mock) => Ok(mock.kpi_history(project_id, metric_code)),
        }
    }

    pub async fn phase_plans(&self, project_id: i64) -> Result<Vec<PhasePlan>> {
        match self {
            DataSource::Rest(client) => client.fetch_phase_plans(project_id).await,
            DataSource::Mock(mock) => Ok(mock.phase_plans(project_id)),
        }
    }

    pub async fn phase_progress(&self, project_id: i64) -> Result<HashMap<i64, f64>> {
        match self {
            DataSource::Rest(client) => client.fetch_phase_progress(project_id).await,
            DataSource::Mock(mock) => Ok(mock.phase_progress(project_id)),
        }
    }

    /// Export the KPI report. CSV renders locally when offline; binary
    /// formats need the backend.
    pub async fn export_report(&self, project_id: i64, format: ExportFormat) -> Result<Vec<u8>> {
        match self {
            DataSource::Rest(client) => {
                client.export_report(project_id, &format.to_string()).await
            }
            DataSource::Mock(mock) => match format {
                ExportFormat::Csv => {
                    let catalog = MetricCatalog::new(mock.metric_definitions());
                    report::render_csv(&mock.project_kpis(project_id), &catalog)
                }
                other => bail!("{other} export is not available offline; point at a backend"),
            },
        }
    }
}
