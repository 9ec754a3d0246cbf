//! Deterministic offline fixtures.
//!
//! Mirrors the shapes the backend serves, with fixed values so demos and
//! tests are reproducible. Histories are linear series over the last ten
//! days, one point per day.

use chrono::{Duration, Utc};
use pulse_core::{Measurement, MetricDefinition, PhasePlan};
use std::collections::HashMap;

pub const HISTORY_DAYS: i64 = 10;

/// Offline stand-in for the backend
#[derive(Debug, Clone, Copy, Default)]
pub struct MockData;

impl MockData {
    pub fn metric_definitions(&self) -> Vec<MetricDefinition> {
        vec![
            MetricDefinition::new("COMPLETION_RATE", "Completion rate", true)
                .with_unit("%")
                .with_thresholds(50.0, 25.0)
                .with_description("Overall project completion percentage"),
            MetricDefinition::new("BUDGET_UTILIZATION", "Budget utilization", false)
                .with_unit("%")
                .with_thresholds(85.0, 95.0)
                .with_description("Consumed budget relative to the initial budget"),
            MetricDefinition::new("TASK_COMPLETION", "Task completion", true)
                .with_unit("%")
                .with_thresholds(40.0, 20.0)
                .with_description("Percentage of tasks finished"),
            MetricDefinition::new("DEADLINE_PROXIMITY", "Deadline proximity", true)
                .with_unit("days")
                .with_thresholds(10.0, 5.0)
                .with_description("Days remaining before the project due date"),
            MetricDefinition::new("RISK_INDEX", "Risk index", false)
                .with_thresholds(50.0, 75.0)
                .with_description("Weighted index over identified risks"),
        ]
    }

    /// Latest value per metric for a project
    pub fn project_kpis(&self, project_id: i64) -> Vec<Measurement> {
        let now = Utc::now();
        [
            ("COMPLETION_RATE", 65.7),
            ("BUDGET_UTILIZATION", 78.3),
            ("TASK_COMPLETION", 58.2),
            ("DEADLINE_PROXIMITY", 15.0),
            ("RISK_INDEX", 35.5),
        ]
        .into_iter()
        .map(|(code, value)| {
            Measurement::new(code, project_id, value, now).with_comment("automatic calculation")
        })
        .collect()
    }

    /// Ten-day history for a project/metric pair, oldest first.
    ///
    /// Each metric follows a fixed linear ramp, clamped to 0-100; unknown
    /// codes get a flat series.
    pub fn kpi_history(&self, project_id: i64, metric_code: &str) -> Vec<Measurement> {
        let now = Utc::now();
        (0..HISTORY_DAYS)
            .map(|i| {
                let age_days = HISTORY_DAYS - 1 - i;
                let value = match metric_code {
                    "COMPLETION_RATE" => 30.0 + 4.0 * i as f64,
                    "BUDGET_UTILIZATION" => 20.0 + 7.0 * i as f64,
                    "TASK_COMPLETION" => 25.0 + 4.5 * i as f64,
                    "DEADLINE_PROXIMITY" => 25.0 - i as f64,
                    "RISK_INDEX" => 50.0 - 2.0 * i as f64,
                    _ => 50.0,
                };
                Measurement::new(
                    metric_code,
                    project_id,
                    value.clamp(0.0, 100.0),
                    now - Duration::days(age_days),
                )
                .with_comment("historical measurement")
            })
            .collect()
    }

    /// The stock four-phase plan: weights 10/20/50/20
    pub fn phase_plans(&self, _project_id: i64) -> Vec<PhasePlan> {
        vec![
            PhasePlan::new(1, "Initiation", 10.0),
            PhasePlan::new(2, "Planning", 20.0),
            PhasePlan::new(3, "Execution", 50.0),
            PhasePlan::new(4, "Closure", 20.0),
        ]
    }

    pub fn phase_progress(&self, _project_id: i64) -> HashMap<i64, f64> {
        [(1, 100.0), (2, 80.0), (3, 30.0), (4, 0.0)]
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_deterministic_and_ascending() {
        let mock = MockData;
        let history = mock.kpi_history(1, "COMPLETION_RATE");
        assert_eq!(history.len(), HISTORY_DAYS as usize);

        for w in history.windows(2) {
            assert!(w[0].measured_at < w[1].measured_at);
            assert!(w[0].value <= w[1].value);
        }
        assert_eq!(history[0].value, 30.0);
        assert_eq!(history.last().unwrap().value, 66.0);
    }

    #[test]
    fn test_history_values_clamped() {
        let mock = MockData;
        for m in mock.kpi_history(1, "BUDGET_UTILIZATION") {
            assert!((0.0..=100.0).contains(&m.value));
        }
    }

    #[test]
    fn test_plan_weights_sum_to_hundred() {
        let mock = MockData;
        let total: f64 = mock.phase_plans(1).iter().map(|p| p.weight_percent).sum();
        assert_eq!(total, 100.0);
    }
}
