pub mod alerts;
pub mod assessment;
pub mod config;
pub mod dashboard;
pub mod metrics;

pub use alerts::{Alert, AlertNotifier};
pub use assessment::{assess, AssessmentResult, EscalationPolicy, Metric, RiskAssessor, RiskLevel};
pub use config::{ConfigError, MonitorConfig};
pub use dashboard::DashboardView;
pub use metrics::{
    DashboardSampler, DashboardState, FixedSource, MetricsSnapshot, SimulatedSource,
    SnapshotSource, SourceError,
};
