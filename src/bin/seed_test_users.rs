use clap::{Arg, Command};
use colored::*;
use footy_tools::{
    config::{parse_number, SeederConfig},
    models::user::development_roster,
    seed::{self, HashedAccount, SeedResult},
};
use log::info;
use std::process;

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let matches = Command::new("seed_test_users")
        .about("Prints SQL that replaces the development user roster")
        .arg(
            Arg::new("cost")
                .long("cost")
                .takes_value(true)
                .help("bcrypt cost factor (overrides BCRYPT_COST)"),
        )
        .get_matches();

    // Only the cost is used here, so the admin fields are never validated.
    let mut cost = match SeederConfig::from_env() {
        Ok(config) => config.bcrypt_cost,
        Err(e) => fail(&e.to_string()),
    };
    if let Some(raw) = matches.value_of("cost") {
        cost = match parse_number("--cost", raw) {
            Ok(cost) => cost,
            Err(e) => fail(&e.to_string()),
        };
    }

    let roster = development_roster();
    info!("Hashing {} accounts at bcrypt cost {}", roster.len(), cost);

    let seeds: SeedResult<Vec<HashedAccount>> = roster
        .into_iter()
        .map(|account| HashedAccount::hash(account, cost))
        .collect();

    match seeds {
        Ok(seeds) => print!("{}", seed::roster_script(&seeds)),
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}: {}", "ERROR".red().bold(), message);
    process::exit(1);
}
