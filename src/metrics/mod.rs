mod sampler;
mod source;
mod types;

pub use sampler::DashboardSampler;
pub use source::{FixedSource, SimulatedSource, SnapshotSource, SourceError};
pub use types::{
    AnomalyDetection, DashboardState, HistoryPoint, MetricsSnapshot, SampleEnvelope,
};
