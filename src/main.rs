use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use poultry_monitor_lib::{
    DashboardSampler, DashboardView, EscalationPolicy, MonitorConfig, SimulatedSource,
};

#[derive(Debug, Parser)]
#[command(name = "poultry-monitor", version, about = "Poultry house environment monitor")]
struct Cli {
    /// JSON config file
    #[arg(long, env = "POULTRY_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds between refreshes
    #[arg(long, env = "POULTRY_MONITOR_INTERVAL")]
    interval: Option<u64>,

    /// Stop after this many refreshes
    #[arg(long, env = "POULTRY_MONITOR_TICKS")]
    ticks: Option<u64>,

    /// Seed for the simulated readings
    #[arg(long, env = "POULTRY_MONITOR_SEED")]
    seed: Option<u64>,

    /// How breaching metrics combine into the overall level
    #[arg(long, value_enum, env = "POULTRY_MONITOR_ESCALATION")]
    escalation: Option<EscalationPolicy>,

    /// Print each refresh as JSON instead of text
    #[arg(long, env = "POULTRY_MONITOR_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = MonitorConfig::load(cli.config.as_deref())?;
    if let Some(interval) = cli.interval {
        config.refresh_interval_secs = interval;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(escalation) = cli.escalation {
        config.escalation = escalation;
    }
    config.validate()?;

    let source = match config.seed {
        Some(seed) => SimulatedSource::seeded(config.baseline, seed),
        None => SimulatedSource::from_entropy(config.baseline),
    };
    info!(
        "refreshing every {}s, escalation {:?}",
        config.refresh_interval_secs, config.escalation
    );

    let sampler = DashboardSampler::spawn(source, &config)?;
    sampler.wait_until_ready().await;

    let mut updates = sampler.subscribe();
    let _ = updates.borrow_and_update();
    let mut shown = 0u64;
    loop {
        let state = sampler.latest().await;
        let view = DashboardView::from_state(&state, sampler.alerts().current());
        if cli.json {
            println!("{}", serde_json::to_string(&view)?);
        } else {
            println!("{}", view.render_text());
        }

        shown += 1;
        if cli.ticks.is_some_and(|ticks| shown >= ticks) {
            break;
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    sampler.shutdown();
    Ok(())
}
