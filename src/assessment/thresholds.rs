use super::types::{Breach, Metric, RiskLevel};

/// Inclusive bounds for one metric. A reading inside `normal` is healthy,
/// inside `medium` (but outside `normal`) is a medium breach, anything
/// further out is high.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricThresholds {
    pub normal_min: f64,
    pub normal_max: f64,
    pub medium_min: f64,
    pub medium_max: f64,
}

pub const TEMPERATURE: MetricThresholds = MetricThresholds {
    normal_min: 20.0,
    normal_max: 25.0,
    medium_min: 18.0,
    medium_max: 27.0,
};

pub const HUMIDITY: MetricThresholds = MetricThresholds {
    normal_min: 50.0,
    normal_max: 70.0,
    medium_min: 40.0,
    medium_max: 80.0,
};

// Ammonia only breaches upwards.
pub const AMMONIA: MetricThresholds = MetricThresholds {
    normal_min: f64::NEG_INFINITY,
    normal_max: 15.0,
    medium_min: f64::NEG_INFINITY,
    medium_max: 20.0,
};

pub const PH: MetricThresholds = MetricThresholds {
    normal_min: 6.5,
    normal_max: 7.5,
    medium_min: 6.0,
    medium_max: 8.0,
};

impl MetricThresholds {
    pub fn for_metric(metric: Metric) -> &'static MetricThresholds {
        match metric {
            Metric::Temperature => &TEMPERATURE,
            Metric::Humidity => &HUMIDITY,
            Metric::Ammonia => &AMMONIA,
            Metric::Ph => &PH,
        }
    }

    pub fn is_normal(&self, value: f64) -> bool {
        value >= self.normal_min && value <= self.normal_max
    }

    pub(crate) fn breach(&self, value: f64) -> Option<Breach> {
        if value.is_nan() {
            Some(Breach::Invalid)
        } else if self.is_normal(value) {
            None
        } else if value < self.normal_min {
            Some(Breach::Below)
        } else {
            Some(Breach::Above)
        }
    }

    /// Severity of a reading already known to be outside the normal range.
    /// NaN stays at medium.
    pub(crate) fn severity(&self, value: f64) -> RiskLevel {
        if value.is_nan() || (value >= self.medium_min && value <= self.medium_max) {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// Range printed on a dashboard card. Same as the normal range except that
/// ammonia shows a floor of zero.
pub fn safe_range(metric: Metric) -> (f64, f64) {
    match metric {
        Metric::Ammonia => (0.0, AMMONIA.normal_max),
        other => {
            let thresholds = MetricThresholds::for_metric(other);
            (thresholds.normal_min, thresholds.normal_max)
        }
    }
}
