use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::select;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::assessment::RiskLevel;

pub const ALERT_TITLE: &str = "Alert: Critical Conditions Detected";
pub const ALERT_MESSAGE: &str = "One or more environmental parameters have reached critical levels. Immediate attention is required.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: &'static str,
    pub message: &'static str,
}

/// High-risk banner that hides itself after a timeout.
#[derive(Clone)]
pub struct AlertNotifier {
    inner: Arc<AlertInner>,
}

struct AlertInner {
    visible: AtomicBool,
    // Doubles as the generation of the currently visible alert.
    raised: AtomicU64,
    timeout: Duration,
    pending: Mutex<Option<CancellationToken>>,
    shutdown: CancellationToken,
}

impl AlertNotifier {
    pub fn new(timeout: Duration) -> Self {
        AlertNotifier {
            inner: Arc::new(AlertInner {
                visible: AtomicBool::new(false),
                raised: AtomicU64::new(0),
                timeout,
                pending: Mutex::new(None),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// React to a fresh assessment. Returns `true` when this call raised the
    /// alert. A visible alert is left alone, so repeated high readings do not
    /// extend it.
    pub fn notify(&self, level: RiskLevel) -> bool {
        if level != RiskLevel::High {
            return false;
        }
        if self.inner.visible.swap(true, Ordering::SeqCst) {
            return false;
        }

        let generation = self.inner.raised.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "high risk alert raised; auto-dismiss in {}s",
            self.inner.timeout.as_secs_f32()
        );

        let token = self.inner.shutdown.child_token();
        if let Some(previous) = self.replace_pending(Some(token.clone())) {
            previous.cancel();
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let weak = Arc::downgrade(&self.inner);
                let timeout = self.inner.timeout;
                handle.spawn(auto_dismiss(weak, token, timeout, generation));
            }
            Err(_) => {
                warn!("no tokio runtime available; alert will stay until dismissed");
            }
        }
        true
    }

    pub fn dismiss(&self) {
        if let Some(token) = self.replace_pending(None) {
            token.cancel();
        }
        if self.inner.visible.swap(false, Ordering::SeqCst) {
            debug!("alert dismissed");
        }
    }

    pub fn is_visible(&self) -> bool {
        self.inner.visible.load(Ordering::SeqCst)
    }

    pub fn raised_count(&self) -> u64 {
        self.inner.raised.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Option<Alert> {
        self.is_visible().then_some(Alert {
            title: ALERT_TITLE,
            message: ALERT_MESSAGE,
        })
    }

    fn replace_pending(&self, next: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut guard = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, next)
    }
}

async fn auto_dismiss(
    inner: Weak<AlertInner>,
    token: CancellationToken,
    timeout: Duration,
    generation: u64,
) {
    select! {
        _ = token.cancelled() => {}
        _ = sleep(timeout) => {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            if inner.raised.load(Ordering::SeqCst) == generation
                && inner.visible.swap(false, Ordering::SeqCst)
            {
                debug!("alert auto-dismissed");
            }
        }
    }
}

impl Drop for AlertInner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    // Let spawned timers register and fired ones run.
    async fn settle() {
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn high_risk_raises_and_auto_dismisses() {
        let notifier = AlertNotifier::new(Duration::from_secs(5));
        assert!(notifier.notify(RiskLevel::High));
        settle().await;
        assert!(notifier.is_visible());
        assert_eq!(notifier.current().map(|alert| alert.title), Some(ALERT_TITLE));

        advance(Duration::from_secs(4)).await;
        assert!(notifier.is_visible());

        advance(Duration::from_millis(1_100)).await;
        settle().await;
        assert!(!notifier.is_visible());
        assert_eq!(notifier.raised_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn lower_levels_do_not_alert() {
        let notifier = AlertNotifier::new(Duration::from_secs(5));
        assert!(!notifier.notify(RiskLevel::Low));
        assert!(!notifier.notify(RiskLevel::Medium));
        assert!(!notifier.is_visible());
        assert_eq!(notifier.raised_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn visible_alert_is_not_rearmed() {
        let notifier = AlertNotifier::new(Duration::from_secs(5));
        assert!(notifier.notify(RiskLevel::High));
        settle().await;
        advance(Duration::from_secs(3)).await;
        assert!(!notifier.notify(RiskLevel::High));

        advance(Duration::from_millis(2_100)).await;
        settle().await;
        assert!(!notifier.is_visible());
        assert_eq!(notifier.raised_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_dismiss_cancels_timer() {
        let notifier = AlertNotifier::new(Duration::from_secs(5));
        notifier.notify(RiskLevel::High);
        settle().await;
        notifier.dismiss();
        assert!(!notifier.is_visible());

        // A new alert raised after the dismiss must outlive the old timer.
        advance(Duration::from_secs(3)).await;
        assert!(notifier.notify(RiskLevel::High));
        settle().await;
        advance(Duration::from_secs(3)).await;
        settle().await;
        assert!(notifier.is_visible());
        assert_eq!(notifier.raised_count(), 2);
    }

    #[test]
    fn without_runtime_alert_stays_until_dismissed() {
        let notifier = AlertNotifier::new(Duration::from_secs(5));
        assert!(notifier.notify(RiskLevel::High));
        assert!(notifier.is_visible());
        notifier.dismiss();
        assert!(notifier.current().is_none());
    }
}
