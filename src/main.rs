use std::process::ExitCode;

use apy_watch::config::AppConfig;
use apy_watch::notify::{DryRunNotifier, Notifier, TelegramNotifier};
use apy_watch::routines::{ApyDivergenceRoutine, Routine, RunOutcome};
use apy_watch::scraping::GeckodriverEngine;

async fn run_routine<N: Notifier>(config: &AppConfig, notifier: N) -> ExitCode {
    let engine = GeckodriverEngine::new(config.webdriver.clone());
    let routine = ApyDivergenceRoutine::new(config, engine, notifier);

    println!("Scraping {}", config.scraping.url);

    match routine.run().await {
        Ok(outcome) => {
            println!("{}", outcome.render(routine.label()));
            if let RunOutcome::InsufficientData { result } = &outcome {
                log::debug!("Last attempt: {:?}", result);
            }
            log::info!("✅ {}: OK", routine.name());
            ExitCode::SUCCESS
        }
        Err(report) => {
            log::error!("❌ {}: {:?}", routine.name(), report);
            println!("Run aborted: {}", report);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("apy_watch=info"))
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(report) => {
            log::error!("{:?}", report);
            return ExitCode::FAILURE;
        }
    };

    if config.telegram.dry_run {
        return run_routine(&config, DryRunNotifier).await;
    }

    match TelegramNotifier::new(&config.telegram) {
        Ok(notifier) => run_routine(&config, notifier).await,
        Err(report) => {
            log::error!("{:?}", report);
            ExitCode::FAILURE
        }
    }
}
