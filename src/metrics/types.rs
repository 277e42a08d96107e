use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::{AssessmentResult, Metric};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SampleEnvelope<T> {
    pub value: Option<T>,
    pub collected_at: DateTime<Utc>,
    pub valid_for_ms: u32,
    pub source: String,
    pub latency_ms: u32,
    pub error: Option<String>,
}

impl<T> SampleEnvelope<T> {
    pub fn fresh(
        value: T,
        collected_at: DateTime<Utc>,
        valid_for: Duration,
        latency: Duration,
        source: &str,
    ) -> Self {
        SampleEnvelope {
            value: Some(value),
            collected_at,
            valid_for_ms: clamp_ms(valid_for),
            source: source.to_string(),
            latency_ms: clamp_ms(latency),
            error: None,
        }
    }

    pub fn errored(
        collected_at: DateTime<Utc>,
        valid_for: Duration,
        latency: Duration,
        source: &str,
        error: String,
    ) -> Self {
        SampleEnvelope {
            value: None,
            collected_at,
            valid_for_ms: clamp_ms(valid_for),
            source: source.to_string(),
            latency_ms: clamp_ms(latency),
            error: Some(error),
        }
    }

    pub fn uninitialized(valid_for: Duration) -> Self {
        SampleEnvelope::errored(
            Utc::now(),
            valid_for,
            Duration::ZERO,
            "uninitialized",
            "dashboard sampler not yet initialised".to_string(),
        )
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.collected_at);
        age.num_milliseconds() > i64::from(self.valid_for_ms)
    }
}

fn clamp_ms(duration: Duration) -> u32 {
    duration.as_millis().min(u32::MAX as u128) as u32
}

/// One point-in-time reading of the four house metrics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(rename = "temperature_C")]
    pub temperature: f64,
    #[serde(rename = "humidity_percent")]
    pub humidity: f64,
    #[serde(rename = "ammonia_ppm")]
    pub ammonia: f64,
    pub ph: f64,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        MetricsSnapshot::new(23.0, 65.0, 10.0, 7.0)
    }
}

impl MetricsSnapshot {
    pub const fn new(temperature: f64, humidity: f64, ammonia: f64, ph: f64) -> Self {
        MetricsSnapshot {
            temperature,
            humidity,
            ammonia,
            ph,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Ammonia => self.ammonia,
            Metric::Ph => self.ph,
        }
    }

    pub fn set_value(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Temperature => self.temperature = value,
            Metric::Humidity => self.humidity = value,
            Metric::Ammonia => self.ammonia = value,
            Metric::Ph => self.ph = value,
        }
    }
}

/// Anomaly output from an external detector. Carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDetection {
    pub is_anomaly: bool,
    pub anomaly_score: f64,
    #[serde(default)]
    pub features: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub anomaly: Option<AnomalyDetection>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardState {
    pub reading: SampleEnvelope<MetricsSnapshot>,
    pub assessment: Option<AssessmentResult>,
    pub history: VecDeque<HistoryPoint>,
    pub last_updated: Option<DateTime<Utc>>,
    pub refresh_count: u64,
    pub failure_count: u64,
}

impl DashboardState {
    pub fn stale(valid_for: Duration) -> Self {
        DashboardState {
            reading: SampleEnvelope::uninitialized(valid_for),
            assessment: None,
            history: VecDeque::new(),
            last_updated: None,
            refresh_count: 0,
            failure_count: 0,
        }
    }

    /// Most recent good reading, if any refresh has succeeded.
    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        self.history.back().map(|point| point.metrics)
    }

    pub(crate) fn push_history(&mut self, point: HistoryPoint, limit: usize) {
        while self.history.len() >= limit.max(1) {
            self.history.pop_front();
        }
        self.history.push_back(point);
    }
}
