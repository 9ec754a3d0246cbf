//! KPI measurements and threshold classification

use crate::metric::{KpiStatus, MetricDefinition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded observation of a metric for a project.
///
/// Immutable once created; a project accumulates a time-ordered sequence of
/// these per metric. Status is derived on read, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub metric_code: String,
    pub project_id: i64,
    pub value: f64,
    pub measured_at: DateTime<Utc>,
    pub comment: Option<String>,
}

impl Measurement {
    pub fn new(
        metric_code: impl Into<String>,
        project_id: i64,
        value: f64,
        measured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            metric_code: metric_code.into(),
            project_id,
            value,
            measured_at,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Classify this measurement against its metric's thresholds
    pub fn status(&self, definition: &MetricDefinition) -> KpiStatus {
        classify(self.value, definition)
    }
}

/// Classify a value against a metric's thresholds.
///
/// When `higher_is_better` the metric is bad when low: at or below the
/// critical threshold is Critical, at or below the warning threshold is
/// Warning. Otherwise the directions flip. A metric with no thresholds at
/// all is Unknown; a partially configured metric classifies against
/// whichever thresholds exist.
pub fn classify(value: f64, definition: &MetricDefinition) -> KpiStatus {
    if definition.unconfigured() {
        return KpiStatus::Unknown;
    }

    if critical_breached(value, definition) {
        KpiStatus::Critical
    } else if warning_breached(value, definition) {
        KpiStatus::Warning
    } else {
        KpiStatus::Good
    }
}

/// Whether the warning threshold is configured and breached
pub fn warning_breached(value: f64, definition: &MetricDefinition) -> bool {
    match definition.threshold_warning {
        Some(threshold) if definition.higher_is_better => value <= threshold,
        Some(threshold) => value >= threshold,
        None => false,
    }
}

/// Whether the critical threshold is configured and breached
pub fn critical_breached(value: f64, definition: &MetricDefinition) -> bool {
    match definition.threshold_critical {
        Some(threshold) if definition.higher_is_better => value <= threshold,
        Some(threshold) => value >= threshold,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MetricDefinition;

    fn completion_rate() -> MetricDefinition {
        // Higher is better: low completion is bad
        MetricDefinition::new("COMPLETION_RATE", "Completion rate", true)
            .with_unit("%")
            .with_thresholds(50.0, 25.0)
    }

    fn budget_utilization() -> MetricDefinition {
        // Lower is better: overspend is bad
        MetricDefinition::new("BUDGET_UTILIZATION", "Budget utilization", false)
            .with_unit("%")
            .with_thresholds(85.0, 95.0)
    }

    #[test]
    fn test_higher_is_better_ladder() {
        let def = completion_rate();
        assert_eq!(classify(80.0, &def), KpiStatus::Good);
        assert_eq!(classify(50.0, &def), KpiStatus::Warning);
        assert_eq!(classify(40.0, &def), KpiStatus::Warning);
        assert_eq!(classify(25.0, &def), KpiStatus::Critical);
        assert_eq!(classify(10.0, &def), KpiStatus::Critical);
    }

    #[test]
    fn test_budget_utilization_scenario() {
        let def = budget_utilization();
        assert_eq!(classify(50.0, &def), KpiStatus::Good);
        assert_eq!(classify(90.0, &def), KpiStatus::Warning);
        assert_eq!(classify(96.0, &def), KpiStatus::Critical);
    }

    #[test]
    fn test_unconfigured_is_unknown_for_any_value() {
        let def = MetricDefinition::new("CUSTOM", "Custom", true);
        for v in [-10.0, 0.0, 50.0, 1e9] {
            assert_eq!(classify(v, &def), KpiStatus::Unknown);
        }
    }

    #[test]
    fn test_partial_config_classifies_against_present_threshold() {
        let mut def = MetricDefinition::new("CUSTOM", "Custom", true);
        def.threshold_warning = Some(40.0);

        assert_eq!(classify(60.0, &def), KpiStatus::Good);
        assert_eq!(classify(30.0, &def), KpiStatus::Warning);
        // No critical threshold: never Critical
        assert_eq!(classify(-100.0, &def), KpiStatus::Warning);
    }

    #[test]
    fn test_monotonic_as_value_decreases() {
        // For higher-is-better, walking the value down never moves status
        // back toward a healthier class.
        let def = completion_rate();
        let rank = |s: KpiStatus| match s {
            KpiStatus::Good => 0,
            KpiStatus::Warning => 1,
            KpiStatus::Critical => 2,
            KpiStatus::Unknown => unreachable!("configured metric"),
        };

        let mut value = 100.0;
        let mut prev = rank(classify(value, &def));
        while value >= 0.0 {
            let cur = rank(classify(value, &def));
            assert!(cur >= prev, "status regressed at value {}", value);
            prev = cur;
            value -= 0.5;
        }
    }

    #[test]
    fn test_breach_flags_independent() {
        let def = budget_utilization();
        assert!(warning_breached(90.0, &def));
        assert!(!critical_breached(90.0, &def));
        assert!(warning_breached(96.0, &def));
        assert!(critical_breached(96.0, &def));
    }

    #[test]
    fn test_measurement_status() {
        let def = completion_rate();
        let m = Measurement::new("COMPLETION_RATE", 1, 65.7, Utc::now())
            .with_comment("automatic calculation");
        assert_eq!(m.status(&def), KpiStatus::Good);
        assert_eq!(m.comment.as_deref(), Some("automatic calculation"));
    }
}
