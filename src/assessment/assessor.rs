use crate::metrics::MetricsSnapshot;

use super::thresholds::{safe_range, MetricThresholds};
use super::types::{AssessmentResult, Breach, EscalationPolicy, Metric, MetricStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskAssessor {
    policy: EscalationPolicy,
}

impl RiskAssessor {
    pub const fn new(policy: EscalationPolicy) -> Self {
        RiskAssessor { policy }
    }

    pub fn assess(&self, snapshot: &MetricsSnapshot) -> AssessmentResult {
        let mut result = AssessmentResult::default();

        for metric in Metric::ALL {
            let value = snapshot.value(metric);
            let thresholds = MetricThresholds::for_metric(metric);
            let Some(breach) = thresholds.breach(value) else {
                continue;
            };

            result.issues.push(describe_breach(metric, breach, value));
            result.level = self
                .policy
                .escalate(result.level, thresholds.severity(value));
        }

        result
    }
}

/// Assess a snapshot, escalating to the worst severity seen.
pub fn assess(snapshot: &MetricsSnapshot) -> AssessmentResult {
    RiskAssessor::default().assess(snapshot)
}

/// Card status of a single reading against its displayed safe range.
pub fn classify_metric(metric: Metric, value: f64) -> MetricStatus {
    let (min, max) = safe_range(metric);
    if value.is_nan() {
        MetricStatus::Invalid
    } else if value < min {
        MetricStatus::TooLow
    } else if value > max {
        MetricStatus::TooHigh
    } else {
        MetricStatus::Optimal
    }
}

fn describe_breach(metric: Metric, breach: Breach, value: f64) -> String {
    // -0.0 prints as "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    match (metric, breach) {
        (_, Breach::Invalid) => format!(
            "{} reading is invalid (NaN{})",
            metric.label(),
            metric.unit_suffix()
        ),
        (Metric::Temperature, Breach::Below) => format!("Temperature is too low ({}°C)", value),
        (Metric::Temperature, Breach::Above) => format!("Temperature is too high ({}°C)", value),
        (Metric::Humidity, Breach::Below) => format!("Humidity is too low ({}%)", value),
        (Metric::Humidity, Breach::Above) => format!("Humidity is too high ({}%)", value),
        (Metric::Ammonia, _) => format!("Ammonia levels are high ({} ppm)", value),
        (Metric::Ph, Breach::Below) => format!("pH level is too acidic ({})", value),
        (Metric::Ph, Breach::Above) => format!("pH level is too alkaline ({})", value),
    }
}
