use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lazy_static::lazy_static;
use poultry_monitor_lib::config::CONFIG_ENV;
use poultry_monitor_lib::{
    ConfigError, DashboardSampler, DashboardView, EscalationPolicy, FixedSource, MetricsSnapshot,
    MonitorConfig, RiskLevel,
};
use tempfile::TempDir;

lazy_static! {
    static ref TEST_ENV_GUARD: Mutex<()> = Mutex::new(());
}

struct ConfigTestEnv {
    temp_home: TempDir,
    prev_home: Option<String>,
    prev_xdg: Option<String>,
    prev_config: Option<String>,
}

impl ConfigTestEnv {
    fn new() -> Self {
        let temp_home = TempDir::new().expect("temp home dir");

        let prev_home = std::env::var("HOME").ok();
        std::env::set_var("HOME", temp_home.path());

        let prev_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", temp_home.path().join(".config"));

        let prev_config = std::env::var(CONFIG_ENV).ok();
        std::env::remove_var(CONFIG_ENV);

        ConfigTestEnv {
            temp_home,
            prev_home,
            prev_xdg,
            prev_config,
        }
    }

    fn home(&self) -> &Path {
        self.temp_home.path()
    }

    fn write(&self, path: &Path, contents: &str) -> PathBuf {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, contents).expect("write config");
        path.to_path_buf()
    }
}

impl Drop for ConfigTestEnv {
    fn drop(&mut self) {
        restore("HOME", self.prev_home.take());
        restore("XDG_CONFIG_HOME", self.prev_xdg.take());
        restore(CONFIG_ENV, self.prev_config.take());
    }
}

fn restore(key: &str, previous: Option<String>) {
    match previous {
        Some(value) => std::env::set_var(key, value),
        None => std::env::remove_var(key),
    }
}

fn acquire_env_guard() -> std::sync::MutexGuard<'static, ()> {
    TEST_ENV_GUARD
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn missing_default_file_falls_back_to_defaults() {
    let _guard = acquire_env_guard();
    let _env = ConfigTestEnv::new();

    let config = MonitorConfig::load(None).expect("load defaults");
    assert_eq!(config, MonitorConfig::default());
}

#[test]
fn default_location_is_picked_up() {
    let _guard = acquire_env_guard();
    let env = ConfigTestEnv::new();
    let path = MonitorConfig::default_path().expect("config dir");
    assert!(path.starts_with(env.home()));
    env.write(&path, r#"{ "refresh_interval_secs": 12, "history_limit": 40 }"#);

    let config = MonitorConfig::load(None).expect("load default location");
    assert_eq!(config.refresh_interval_secs, 12);
    assert_eq!(config.history_limit, 40);
    assert_eq!(config.notification_timeout_secs, 5);
}

#[test]
fn env_override_wins_over_default_location() {
    let _guard = acquire_env_guard();
    let env = ConfigTestEnv::new();
    let default_path = MonitorConfig::default_path().expect("config dir");
    env.write(&default_path, r#"{ "refresh_interval_secs": 12 }"#);
    let override_path = env.write(
        &env.home().join("override.json"),
        r#"{ "refresh_interval_secs": 7, "escalation": "last-breach" }"#,
    );
    std::env::set_var(CONFIG_ENV, &override_path);

    let config = MonitorConfig::load(None).expect("load env override");
    assert_eq!(config.refresh_interval_secs, 7);
    assert_eq!(config.escalation, EscalationPolicy::LastBreach);
}

#[test]
fn explicit_path_errors_are_reported() {
    let _guard = acquire_env_guard();
    let env = ConfigTestEnv::new();

    let missing = env.home().join("absent.json");
    match MonitorConfig::load(Some(&missing)) {
        Err(ConfigError::Io(path, _)) => assert_eq!(path, missing),
        other => panic!("expected io error, got {:?}", other),
    }

    let broken = env.write(&env.home().join("broken.json"), "{ not json");
    assert!(matches!(
        MonitorConfig::load(Some(&broken)),
        Err(ConfigError::Parse(_, _))
    ));

    let invalid = env.write(
        &env.home().join("invalid.json"),
        r#"{ "notification_timeout_secs": 0 }"#,
    );
    let err = MonitorConfig::load(Some(&invalid)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("notification_timeout_secs"));
}

#[tokio::test(start_paused = true)]
async fn configured_policy_flows_into_dashboard() {
    let config = {
        let _guard = acquire_env_guard();
        let env = ConfigTestEnv::new();
        let path = env.write(
            &env.home().join("monitor.json"),
            r#"{ "escalation": "last-breach", "refresh_interval_secs": 60 }"#,
        );
        MonitorConfig::load(Some(&path)).expect("load config")
    };

    // High temperature, then a medium pH breach that overwrites it.
    let snapshot = MetricsSnapshot::new(30.0, 65.0, 10.0, 7.7);
    let sampler =
        DashboardSampler::spawn(FixedSource::new(vec![snapshot]), &config).expect("spawn sampler");
    sampler.wait_until_ready().await;

    let state = sampler.latest().await;
    let view = DashboardView::from_state(&state, sampler.alerts().current());
    assert_eq!(view.level, Some(RiskLevel::Medium));
    assert_eq!(
        view.issues,
        vec![
            "Temperature is too high (30°C)".to_string(),
            "pH level is too alkaline (7.7)".to_string(),
        ]
    );
    assert!(view.alert.is_none());
    assert!(view.render_text().contains("[MEDIUM] Attention Required"));
}
