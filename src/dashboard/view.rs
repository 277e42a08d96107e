use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::advice::{recommended_actions, suggestions, StatusBanner};
use crate::alerts::Alert;
use crate::assessment::{classify_metric, safe_range, Metric, MetricStatus, RiskLevel};
use crate::metrics::{DashboardState, MetricsSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub metric: Metric,
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub safe_min: f64,
    pub safe_max: f64,
    pub status: MetricStatus,
}

impl MetricCard {
    pub fn new(metric: Metric, value: f64) -> Self {
        let (safe_min, safe_max) = safe_range(metric);
        MetricCard {
            metric,
            label: metric.card_label(),
            value,
            unit: metric.unit(),
            safe_min,
            safe_max,
            status: classify_metric(metric, value),
        }
    }

    pub fn for_snapshot(snapshot: &MetricsSnapshot) -> Vec<MetricCard> {
        Metric::ALL
            .iter()
            .map(|metric| MetricCard::new(*metric, snapshot.value(*metric)))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub level: Option<RiskLevel>,
    pub banner: StatusBanner,
    pub issues: Vec<String>,
    pub actions: Vec<&'static str>,
    pub suggestions: Vec<&'static str>,
    pub cards: Vec<MetricCard>,
    pub alert: Option<Alert>,
    pub last_updated: Option<DateTime<Utc>>,
    pub source_error: Option<String>,
    pub history_len: usize,
    pub refresh_count: u64,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState, alert: Option<Alert>) -> Self {
        let level = state.assessment.as_ref().map(|assessment| assessment.level);
        DashboardView {
            level,
            banner: level
                .map(StatusBanner::for_level)
                .unwrap_or_else(StatusBanner::unknown),
            issues: state
                .assessment
                .as_ref()
                .map(|assessment| assessment.issues.clone())
                .unwrap_or_default(),
            actions: level
                .map(|level| recommended_actions(level).to_vec())
                .unwrap_or_default(),
            suggestions: level
                .map(|level| suggestions(level).to_vec())
                .unwrap_or_default(),
            cards: state
                .metrics()
                .map(|snapshot| MetricCard::for_snapshot(&snapshot))
                .unwrap_or_default(),
            alert,
            last_updated: state.last_updated,
            source_error: state.reading.error.clone(),
            history_len: state.history.len(),
            refresh_count: state.refresh_count,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Poultry Environment Monitor");

        if let Some(alert) = &self.alert {
            let _ = writeln!(out, "!! {}", alert.title);
            let _ = writeln!(out, "   {}", alert.message);
        }

        let tag = self
            .level
            .map(|level| level.as_str().to_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string());
        let _ = writeln!(
            out,
            "[{}] {} - {}",
            tag, self.banner.title, self.banner.description
        );

        match self.last_updated {
            Some(updated) => {
                let _ = writeln!(
                    out,
                    "Last updated: {} (refresh #{}, {} point(s) of history)",
                    updated.with_timezone(&Local).format("%H:%M:%S"),
                    self.refresh_count,
                    self.history_len
                );
            }
            None => {
                let _ = writeln!(out, "Last updated: never");
            }
        }
        if let Some(err) = &self.source_error {
            let _ = writeln!(out, "Source error: {}", err);
        }

        if !self.cards.is_empty() {
            let _ = writeln!(out);
            for card in &self.cards {
                let reading = format!("{:.1} {}", card.value, card.unit);
                let range = format!("{} - {} {}", card.safe_min, card.safe_max, card.unit);
                let _ = writeln!(
                    out,
                    "  {:<14} {:>10}   safe {:<16} {}",
                    card.label,
                    reading.trim_end(),
                    range.trim_end(),
                    card.status.message()
                );
            }
        }

        write_list(&mut out, "Issues requiring attention:", &self.issues);
        write_list(&mut out, "Recommended actions:", &self.actions);
        out
    }
}

fn write_list<S: AsRef<str>>(out: &mut String, heading: &str, items: &[S]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", heading);
    for item in items {
        let _ = writeln!(out, "  - {}", item.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::assess;
    use crate::metrics::{HistoryPoint, SampleEnvelope};
    use std::time::Duration;

    fn state_for(snapshot: MetricsSnapshot) -> DashboardState {
        let now = Utc::now();
        let mut state = DashboardState::stale(Duration::from_secs(30));
        state.reading = SampleEnvelope::fresh(
            snapshot,
            now,
            Duration::from_secs(30),
            Duration::ZERO,
            "test",
        );
        state.push_history(
            HistoryPoint {
                timestamp: now,
                metrics: snapshot,
                anomaly: None,
            },
            10,
        );
        state.assessment = Some(assess(&snapshot));
        state.last_updated = Some(now);
        state.refresh_count = 1;
        state
    }

    #[test]
    fn unknown_before_first_refresh() {
        let view = DashboardView::from_state(&DashboardState::stale(Duration::from_secs(30)), None);
        assert_eq!(view.level, None);
        assert_eq!(view.banner, StatusBanner::unknown());
        assert!(view.cards.is_empty());
        assert!(view.source_error.is_some());
        assert!(view.render_text().contains("[UNKNOWN] Status Unknown"));
    }

    #[test]
    fn healthy_view_has_no_actions() {
        let view = DashboardView::from_state(&state_for(MetricsSnapshot::default()), None);
        assert_eq!(view.level, Some(RiskLevel::Low));
        assert!(view.issues.is_empty());
        assert!(view.actions.is_empty());
        assert_eq!(view.suggestions.len(), 3);
        assert_eq!(view.cards.len(), 4);
        assert!(view
            .cards
            .iter()
            .all(|card| card.status == MetricStatus::Optimal));
    }

    #[test]
    fn critical_view_renders_alert_and_issues() {
        let snapshot = MetricsSnapshot::new(28.0, 65.0, 22.0, 7.0);
        let alert = Alert {
            title: crate::alerts::ALERT_TITLE,
            message: crate::alerts::ALERT_MESSAGE,
        };
        let view = DashboardView::from_state(&state_for(snapshot), Some(alert));
        assert_eq!(view.cards[0].status, MetricStatus::TooHigh);
        assert_eq!(view.cards[2].safe_min, 0.0);

        let text = view.render_text();
        assert!(text.contains("!! Alert: Critical Conditions Detected"));
        assert!(text.contains("[HIGH] Immediate Action Required"));
        assert!(text.contains("  - Temperature is too high (28°C)"));
        assert!(text.contains("  - Ammonia levels are high (22 ppm)"));
        assert!(text.contains("Check ventilation system immediately"));
        assert!(text.contains("28.0 °C"));
    }

    #[test]
    fn cards_use_dashboard_headings() {
        let labels: Vec<_> = MetricCard::for_snapshot(&MetricsSnapshot::default())
            .iter()
            .map(|card| card.label)
            .collect();
        assert_eq!(labels, ["Temperature", "Humidity", "Ammonia Level", "pH Level"]);
    }

    #[test]
    fn nan_reading_is_not_shown_as_optimal() {
        let snapshot = MetricsSnapshot::new(f64::NAN, 65.0, 10.0, 7.0);
        let view = DashboardView::from_state(&state_for(snapshot), None);
        assert_eq!(view.level, Some(RiskLevel::Medium));
        assert_eq!(view.cards[0].status, MetricStatus::Invalid);
        assert!(view.render_text().contains("Invalid"));
    }

    #[test]
    fn view_serializes_to_json() {
        let view = DashboardView::from_state(&state_for(MetricsSnapshot::default()), None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["level"], "low");
        assert_eq!(json["banner"]["title"], "Healthy Environment");
        assert_eq!(json["cards"][3]["metric"], "ph");
    }
}
