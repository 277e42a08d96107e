use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{AnomalyDetection, MetricsSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    pub origin: String,
    pub message: String,
}

impl SourceError {
    pub fn new(origin: &str, message: impl Into<String>) -> Self {
        SourceError {
            origin: origin.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.origin, self.message)
    }
}

impl std::error::Error for SourceError {}

/// Anything that can hand the dashboard a fresh reading.
pub trait SnapshotSource: Send + 'static {
    fn name(&self) -> &str;

    fn produce_snapshot(&mut self) -> Result<MetricsSnapshot, SourceError>;

    /// Detector output for the last produced snapshot, when the source has one.
    fn anomaly(&self) -> Option<AnomalyDetection> {
        None
    }
}

impl SnapshotSource for Box<dyn SnapshotSource> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn produce_snapshot(&mut self) -> Result<MetricsSnapshot, SourceError> {
        (**self).produce_snapshot()
    }

    fn anomaly(&self) -> Option<AnomalyDetection> {
        (**self).anomaly()
    }
}

struct Drift {
    scale: f64,
    min: f64,
    max: f64,
}

const TEMPERATURE_DRIFT: Drift = Drift {
    scale: 1.0,
    min: 15.0,
    max: 30.0,
};
const HUMIDITY_DRIFT: Drift = Drift {
    scale: 5.0,
    min: 30.0,
    max: 90.0,
};
const AMMONIA_DRIFT: Drift = Drift {
    scale: 2.0,
    min: 0.0,
    max: 25.0,
};
const PH_DRIFT: Drift = Drift {
    scale: 0.2,
    min: 5.5,
    max: 8.5,
};

/// Random walk around the last reading, clamped to plausible house values.
pub struct SimulatedSource<R = StdRng> {
    current: MetricsSnapshot,
    rng: R,
}

impl SimulatedSource<StdRng> {
    pub fn seeded(baseline: MetricsSnapshot, seed: u64) -> Self {
        SimulatedSource::with_rng(baseline, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(baseline: MetricsSnapshot) -> Self {
        SimulatedSource::with_rng(baseline, StdRng::from_os_rng())
    }
}

impl<R: Rng> SimulatedSource<R> {
    pub fn with_rng(baseline: MetricsSnapshot, rng: R) -> Self {
        SimulatedSource {
            current: baseline,
            rng,
        }
    }

    pub fn current(&self) -> MetricsSnapshot {
        self.current
    }

    fn step(&mut self, value: f64, drift: &Drift) -> f64 {
        let variation = (self.rng.random::<f64>() - 0.5) * 2.0;
        (value + variation * drift.scale).clamp(drift.min, drift.max)
    }
}

impl<R: Rng + Send + 'static> SnapshotSource for SimulatedSource<R> {
    fn name(&self) -> &str {
        "simulator"
    }

    fn produce_snapshot(&mut self) -> Result<MetricsSnapshot, SourceError> {
        let previous = self.current;
        let next = MetricsSnapshot {
            temperature: self.step(previous.temperature, &TEMPERATURE_DRIFT),
            humidity: self.step(previous.humidity, &HUMIDITY_DRIFT),
            ammonia: self.step(previous.ammonia, &AMMONIA_DRIFT),
            ph: self.step(previous.ph, &PH_DRIFT),
        };
        self.current = next;
        Ok(next)
    }
}

/// Replays a fixed script of readings, then keeps repeating the last one.
/// `Err` entries in the script surface as source failures.
pub struct FixedSource {
    script: Vec<Result<MetricsSnapshot, String>>,
    cursor: usize,
}

impl FixedSource {
    pub fn new(snapshots: Vec<MetricsSnapshot>) -> Self {
        FixedSource {
            script: snapshots.into_iter().map(Ok).collect(),
            cursor: 0,
        }
    }

    pub fn scripted(script: Vec<Result<MetricsSnapshot, String>>) -> Self {
        FixedSource { script, cursor: 0 }
    }
}

impl SnapshotSource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    fn produce_snapshot(&mut self) -> Result<MetricsSnapshot, SourceError> {
        if self.script.is_empty() {
            return Err(SourceError::new("fixed", "script is empty"));
        }
        let index = self.cursor.min(self.script.len() - 1);
        self.cursor = self.cursor.saturating_add(1);
        self.script[index]
            .clone()
            .map_err(|message| SourceError::new("fixed", message))
    }
}
