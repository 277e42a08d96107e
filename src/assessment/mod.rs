mod assessor;
mod thresholds;
mod types;

pub use assessor::{assess, classify_metric, RiskAssessor};
pub use thresholds::{safe_range, MetricThresholds};
pub use types::{AssessmentResult, EscalationPolicy, Metric, MetricStatus, RiskLevel};
