use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Humidity,
    Ammonia,
    Ph,
}

impl Metric {
    /// Order in which metrics are checked and issues are reported.
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Ammonia,
        Metric::Ph,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Ammonia => "Ammonia",
            Metric::Ph => "pH",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::Ammonia => "ppm",
            Metric::Ph => "",
        }
    }

    /// Heading on the metric's dashboard card.
    pub fn card_label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Ammonia => "Ammonia Level",
            Metric::Ph => "pH Level",
        }
    }

    /// Unit as it trails a number inside an issue string.
    pub(crate) fn unit_suffix(&self) -> &'static str {
        match self {
            Metric::Ammonia => " ppm",
            other => other.unit(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How breaching metrics combine into the overall level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum EscalationPolicy {
    /// Overall level is the worst severity seen.
    #[default]
    Maximum,
    /// Each breach overwrites the level, so a later medium breach can
    /// replace an earlier high one.
    LastBreach,
}

impl EscalationPolicy {
    pub fn escalate(&self, current: RiskLevel, severity: RiskLevel) -> RiskLevel {
        match self {
            EscalationPolicy::Maximum => current.max(severity),
            EscalationPolicy::LastBreach => severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Breach {
    Below,
    Above,
    Invalid,
}

/// Where a single reading sits against its safe range, as shown on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    TooLow,
    Optimal,
    TooHigh,
    Invalid,
}

impl MetricStatus {
    pub fn message(&self) -> &'static str {
        match self {
            MetricStatus::TooLow => "Too Low",
            MetricStatus::Optimal => "Optimal",
            MetricStatus::TooHigh => "Too High",
            MetricStatus::Invalid => "Invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub level: RiskLevel,
    pub issues: Vec<String>,
}

impl AssessmentResult {
    pub fn is_healthy(&self) -> bool {
        self.level == RiskLevel::Low && self.issues.is_empty()
    }
}
