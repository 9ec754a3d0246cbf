//! Metric definitions and the code -> definition catalog

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status of a measured KPI relative to its thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum KpiStatus {
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "critical")]
    Critical,
    #[serde(rename = "unknown")]
    Unknown,
}

impl KpiStatus {
    /// Human-readable label for tables and badges
    pub fn label(&self) -> &'static str {
        match self {
            KpiStatus::Good => "good",
            KpiStatus::Warning => "warning",
            KpiStatus::Critical => "critical",
            KpiStatus::Unknown => "unknown",
        }
    }
}

/// Static configuration for one measurable indicator.
///
/// Thresholds are optional: an unconfigured metric classifies as Unknown,
/// never as Good by default. `higher_is_better` flips the breach direction:
/// true means low values are bad, false means high values are bad.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricDefinition {
    /// Unique code, e.g. "COMPLETION_RATE"
    pub code: String,
    /// Display label
    pub name: String,
    /// Longer description for the catalog listing
    pub description: Option<String>,
    /// Display suffix, e.g. "%" or "days"
    pub unit: Option<String>,
    pub threshold_warning: Option<f64>,
    pub threshold_critical: Option<f64>,
    pub higher_is_better: bool,
    /// Whether breaches of this metric should surface in the breach sweep
    pub enable_notifications: bool,
}

impl MetricDefinition {
    pub fn new(code: impl Into<String>, name: impl Into<String>, higher_is_better: bool) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            unit: None,
            threshold_warning: None,
            threshold_critical: None,
            higher_is_better,
            enable_notifications: true,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_thresholds(mut self, warning: f64, critical: f64) -> Self {
        self.threshold_warning = Some(warning);
        self.threshold_critical = Some(critical);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when no threshold is configured at all
    pub fn unconfigured(&self) -> bool {
        self.threshold_warning.is_none() && self.threshold_critical.is_none()
    }
}

/// Lookup table from metric code to its definition.
///
/// Built once from the fetched definition list; the evaluator's only
/// collaborator.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    by_code: HashMap<String, MetricDefinition>,
}

impl MetricCatalog {
    pub fn new(definitions: impl IntoIterator<Item = MetricDefinition>) -> Self {
        Self {
            by_code: definitions
                .into_iter()
                .map(|d| (d.code.clone(), d))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&MetricDefinition> {
        self.by_code.get(code)
    }

    /// Display suffix for a code, empty when the metric has no unit
    pub fn unit(&self, code: &str) -> &str {
        self.get(code)
            .and_then(|d| d.unit.as_deref())
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Definitions sorted by code for stable listings
    pub fn sorted(&self) -> Vec<&MetricDefinition> {
        let mut defs: Vec<&MetricDefinition> = self.by_code.values().collect();
        defs.sort_by(|a, b| a.code.cmp(&b.code));
        defs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let catalog = MetricCatalog::new(vec![
            MetricDefinition::new("COMPLETION_RATE", "Completion rate", true)
                .with_unit("%")
                .with_thresholds(50.0, 25.0),
            MetricDefinition::new("RISK_INDEX", "Risk index", false),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.unit("COMPLETION_RATE"), "%");
        assert_eq!(catalog.unit("RISK_INDEX"), "");
        assert!(catalog.get("NO_SUCH_METRIC").is_none());
    }

    #[test]
    fn test_unconfigured_metric() {
        let def = MetricDefinition::new("CUSTOM", "Custom", true);
        assert!(def.unconfigured());

        let configured = def.with_thresholds(40.0, 20.0);
        assert!(!configured.unconfigured());
    }

    #[test]
    fn test_sorted_is_stable_by_code() {
        let catalog = MetricCatalog::new(vec![
            MetricDefinition::new("B_METRIC", "B", true),
            MetricDefinition::new("A_METRIC", "A", true),
        ]);
        let codes: Vec<&str> = catalog.sorted().iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["A_METRIC", "B_METRIC"]);
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&KpiStatus::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
