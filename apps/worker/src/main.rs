mod config;
mod domain_events;
mod main_lib;
mod notifier;
mod scheduler;

use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::from_env();
    let state = build_state(&config)?;

    let alert_job =
        scheduler::start_alert_scheduler(state.alert_service.clone(), config.alert_interval);
    let snapshot_job = scheduler::start_snapshot_scheduler(
        state.snapshot_service.clone(),
        config.snapshot_hour_utc,
    );
    let accounts = state.account_service.list_accounts()?.len();
    tracing::info!(
        "Worker running against {} with {} account(s) (alerts every {:?}, nightly batch at {:02}:00 UTC)",
        config.market_data_url,
        accounts,
        config.alert_interval,
        config.snapshot_hour_utc
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested; stopping schedulers");
    alert_job.abort();
    snapshot_job.abort();
    Ok(())
}
