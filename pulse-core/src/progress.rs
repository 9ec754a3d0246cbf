//! Weighted progress aggregation across project phases

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One weighted phase within a project's plan.
///
/// Weights are relative shares (0-100) that should sum to 100 across a
/// project's active phases; the aggregate renormalizes when they don't.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhasePlan {
    pub phase_id: i64,
    pub name: String,
    pub weight_percent: f64,
}

impl PhasePlan {
    pub fn new(phase_id: i64, name: impl Into<String>, weight_percent: f64) -> Self {
        Self {
            phase_id,
            name: name.into(),
            weight_percent,
        }
    }
}

/// Compute a single project-level completion percentage from per-phase
/// completion and phase weights.
///
/// Phases without a progress entry are excluded from both sums (not yet
/// tracked, not zero). The result divides by the weight actually present,
/// so a plan whose weights don't sum to 100 still yields a 0-100 value.
/// Zero or negative total weight degrades to 0 rather than failing.
pub fn aggregate(plans: &[PhasePlan], progress: &HashMap<i64, f64>) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for plan in plans {
        if let Some(pct) = progress.get(&plan.phase_id) {
            weighted_sum += pct * plan.weight_percent;
            total_weight += plan.weight_percent;
        }
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}

/// A phase's own completion: the unweighted mean of its action progress
/// values, 0 when nothing is tracked yet.
pub fn phase_completion(action_progress: &[f64]) -> f64 {
    if action_progress.is_empty() {
        return 0.0;
    }
    action_progress.iter().sum::<f64>() / action_progress.len() as f64
}
