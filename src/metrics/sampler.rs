use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info, warn};
use tokio::select;
use tokio::sync::{watch, Notify, RwLock};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::source::SnapshotSource;
use super::types::{DashboardState, HistoryPoint, SampleEnvelope};
use crate::alerts::AlertNotifier;
use crate::assessment::RiskAssessor;
use crate::config::MonitorConfig;

pub struct DashboardSamplerHandle {
    state: Arc<RwLock<DashboardState>>,
    ready: Arc<AtomicBool>,
    notify_ready: Arc<Notify>,
    manual_refresh: Arc<Notify>,
    updates: watch::Receiver<u64>,
    alerts: AlertNotifier,
    cancel: CancellationToken,
    _runtime: Option<Arc<tokio::runtime::Runtime>>,
}

impl DashboardSamplerHandle {
    /// Start the refresh loop on the ambient tokio runtime, or on a private
    /// one when called from synchronous code.
    pub fn spawn<S: SnapshotSource>(source: S, config: &MonitorConfig) -> io::Result<Self> {
        let period = config.refresh_interval();
        let state = Arc::new(RwLock::new(DashboardState::stale(period)));
        let ready = Arc::new(AtomicBool::new(false));
        let notify_ready = Arc::new(Notify::new());
        let manual_refresh = Arc::new(Notify::new());
        let (updates_tx, updates) = watch::channel(0u64);
        let alerts = AlertNotifier::new(config.notification_timeout());
        let cancel = CancellationToken::new();

        let inner = Arc::new(DashboardSamplerInner {
            state: Arc::clone(&state),
            ready: Arc::clone(&ready),
            notify_ready: Arc::clone(&notify_ready),
            manual_refresh: Arc::clone(&manual_refresh),
            updates: updates_tx,
            alerts: alerts.clone(),
            cancel: cancel.clone(),
            assessor: RiskAssessor::new(config.escalation),
            period,
            history_limit: config.history_limit,
        });

        let fut = DashboardSamplerInner::run(Arc::clone(&inner), source);

        let runtime_guard = match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(fut);
                None
            }
            Err(_) => {
                let runtime = Arc::new(
                    tokio::runtime::Builder::new_multi_thread()
                        .enable_all()
                        .build()?,
                );
                runtime.spawn(fut);
                Some(runtime)
            }
        };

        Ok(DashboardSamplerHandle {
            state,
            ready,
            notify_ready,
            manual_refresh,
            updates,
            alerts,
            cancel,
            _runtime: runtime_guard,
        })
    }

    pub async fn latest(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn wait_until_ready(&self) {
        let notified = self.notify_ready.notified();
        if self.ready.load(Ordering::SeqCst) {
            return;
        }
        notified.await;
    }

    /// Refresh out of band, like pressing the dashboard's refresh button.
    /// The regular schedule is not shifted.
    pub fn refresh_now(&self) {
        self.manual_refresh.notify_one();
    }

    /// Receiver that changes after every refresh attempt, good or failed.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates.clone()
    }

    pub fn alerts(&self) -> &AlertNotifier {
        &self.alerts
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

struct DashboardSamplerInner {
    state: Arc<RwLock<DashboardState>>,
    ready: Arc<AtomicBool>,
    notify_ready: Arc<Notify>,
    manual_refresh: Arc<Notify>,
    updates: watch::Sender<u64>,
    alerts: AlertNotifier,
    cancel: CancellationToken,
    assessor: RiskAssessor,
    period: Duration,
    history_limit: usize,
}

impl DashboardSamplerInner {
    async fn run<S: SnapshotSource>(self: Arc<Self>, mut source: S) {
        self.refresh(&mut source).await;
        self.ready.store(true, Ordering::SeqCst);
        self.notify_ready.notify_waiters();

        let mut refresh_interval = interval(self.period);
        refresh_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        refresh_interval.tick().await;

        loop {
            select! {
                _ = self.cancel.cancelled() => {
                    debug!("dashboard sampler stopped");
                    break;
                }
                _ = refresh_interval.tick() => {
                    self.refresh(&mut source).await;
                }
                _ = self.manual_refresh.notified() => {
                    debug!("manual refresh requested");
                    self.refresh(&mut source).await;
                }
            }
        }
    }

    async fn refresh<S: SnapshotSource>(&self, source: &mut S) {
        let started = Instant::now();
        let produced = source.produce_snapshot();
        let now = Utc::now();
        let latency = started.elapsed();

        let mut state = self.state.write().await;
        let assessed_level = match produced {
            Ok(snapshot) => {
                let assessment = self.assessor.assess(&snapshot);
                let previous = state.assessment.as_ref().map(|a| a.level);
                if previous != Some(assessment.level) {
                    info!(
                        "risk level {} -> {} ({} issue(s))",
                        previous.map(|level| level.as_str()).unwrap_or("unknown"),
                        assessment.level,
                        assessment.issues.len()
                    );
                }
                debug!(
                    "snapshot from {}: {:?} => {}",
                    source.name(),
                    snapshot,
                    assessment.level
                );

                state.reading =
                    SampleEnvelope::fresh(snapshot, now, self.period, latency, source.name());
                state.push_history(
                    HistoryPoint {
                        timestamp: now,
                        metrics: snapshot,
                        anomaly: source.anomaly(),
                    },
                    self.history_limit,
                );
                let level = assessment.level;
                state.assessment = Some(assessment);
                state.last_updated = Some(now);
                state.refresh_count += 1;
                Some(level)
            }
            Err(err) => {
                warn!("snapshot source error: {}", err);
                state.reading = SampleEnvelope::errored(
                    now,
                    self.period,
                    latency,
                    source.name(),
                    err.to_string(),
                );
                state.failure_count += 1;
                None
            }
        };
        let attempts = state.refresh_count + state.failure_count;
        drop(state);

        if let Some(level) = assessed_level {
            self.alerts.notify(level);
        }
        self.updates.send_replace(attempts);
    }
}

pub type DashboardSampler = DashboardSamplerHandle;

impl Drop for DashboardSamplerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
