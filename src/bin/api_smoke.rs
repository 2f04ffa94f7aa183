use clap::{Arg, Command};
use colored::*;
use footy_tools::{
    config::{parse_timeout, HarnessConfig},
    harness::{
        client::ApiClient,
        suites::{self, SUITE_KEYS},
        Harness, HarnessError,
    },
};
use log::{info, warn};
use std::error::Error;
use std::process;

/// Warns when the API does not answer; every case still reports the failure
/// on its own.
async fn check_reachable(config: &HarnessConfig) -> Result<(), HarnessError> {
    let client = ApiClient::new(&config.base_url, config.timeout)?;
    match client.ping().await {
        Ok(status) => info!("API at {} answered with {}", config.base_url, status),
        Err(HarnessError::Unreachable { reason, .. }) => {
            warn!("Server at {} is not reachable: {}", config.base_url, reason);
            println!(
                "{}: Server at {} is not running or unreachable.",
                "WARNING".yellow().bold(),
                config.base_url
            );
            println!("Set API_BASE_URL or pass --base-url to target another environment.");
        }
        Err(HarnessError::Timeout { secs, .. }) => {
            warn!("Server at {} did not answer within {}s", config.base_url, secs);
            println!(
                "{}: Server at {} did not respond in time. Is it overloaded?",
                "WARNING".yellow().bold(),
                config.base_url
            );
        }
        Err(e) => warn!("Connectivity check against {} failed: {}", config.base_url, e),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let matches = Command::new("api_smoke")
        .about("End-to-end smoke tests against a running FootyFortunes API")
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .takes_value(true)
                .help("API root (overrides API_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .takes_value(true)
                .help("Per-request timeout in seconds (overrides SMOKE_TIMEOUT_SECS)"),
        )
        .arg(
            Arg::new("suite")
                .long("suite")
                .takes_value(true)
                .multiple_occurrences(true)
                .possible_values(SUITE_KEYS.iter().copied())
                .help("Run only the named suite; repeatable"),
        )
        .arg(
            Arg::new("rate-limit")
                .long("rate-limit")
                .help("Also run the rate-limit suite (locks the login out for a while)"),
        )
        .get_matches();

    let mut config = HarnessConfig::from_env()?;
    if let Some(url) = matches.value_of("base-url") {
        config.set_base_url(url)?;
    }
    if let Some(raw) = matches.value_of("timeout") {
        config.timeout = parse_timeout("--timeout", raw)?;
    }

    let requested: Vec<&str> = matches
        .values_of("suite")
        .map(|keys| keys.collect())
        .unwrap_or_default();
    let selected = suites::select(&requested, matches.is_present("rate-limit"));

    info!("Running {} suites against {}", selected.len(), config.base_url);
    check_reachable(&config).await?;

    let mut harness = Harness::new(config)?;
    let results = harness.run(&selected).await;

    if !results.all_passed() {
        process::exit(1);
    }
    Ok(())
}
