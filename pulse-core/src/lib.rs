//! pulse-core: pure computations behind the project-health dashboard.
//!
//! Two stateless components: KPI evaluation (threshold classification and
//! trend normalization) and weighted phase-progress aggregation. Both take
//! plain data snapshots and return plain data; fetching and rendering live
//! in the surrounding crates.

pub mod kpi;
pub mod metric;
pub mod progress;
pub mod trend;

pub use kpi::{Measurement, classify, critical_breached, warning_breached};
pub use metric::{KpiStatus, MetricCatalog, MetricDefinition};
pub use progress::{PhasePlan, aggregate, phase_completion};
pub use trend::{TrendError, TrendPoint, TrendSeries, build_trend};
