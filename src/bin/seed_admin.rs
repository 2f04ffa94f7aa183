use clap::{Arg, Command};
use colored::*;
use footy_tools::{
    config::{parse_number, SeederConfig},
    models::user::AccountSeed,
    seed::{self, HashedAccount},
};
use log::info;
use std::process;

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let matches = Command::new("seed_admin")
        .about("Prints SQL that deletes and re-creates the admin account")
        .arg(
            Arg::new("email")
                .long("email")
                .takes_value(true)
                .help("Admin email (overrides SEED_ADMIN_EMAIL)"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .takes_value(true)
                .help("Plaintext to hash (overrides SEED_ADMIN_PASSWORD)"),
        )
        .arg(
            Arg::new("cost")
                .long("cost")
                .takes_value(true)
                .help("bcrypt cost factor (overrides BCRYPT_COST)"),
        )
        .get_matches();

    // Load configuration
    let mut config = match SeederConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&e.to_string()),
    };

    if let Some(email) = matches.value_of("email") {
        config.admin_email = email.to_string();
    }
    if let Some(password) = matches.value_of("password") {
        config.admin_password = password.to_string();
    }
    if let Some(cost) = matches.value_of("cost") {
        config.bcrypt_cost = match parse_number("--cost", cost) {
            Ok(cost) => cost,
            Err(e) => fail(&e.to_string()),
        };
    }
    if let Err(e) = config.validate() {
        fail(&e.to_string());
    }

    info!(
        "Seeding admin {} with bcrypt cost {}",
        config.admin_email, config.bcrypt_cost
    );

    let account = AccountSeed::admin(&config.admin_email, &config.admin_password);
    let seed = match HashedAccount::hash(account, config.bcrypt_cost) {
        Ok(seed) => seed,
        Err(e) => fail(&e.to_string()),
    };

    // Rendered in full first, so a failure above leaves stdout empty.
    print!("{}", seed::admin_script(&seed));
}

fn fail(message: &str) -> ! {
    eprintln!("{}: {}", "ERROR".red().bold(), message);
    process::exit(1);
}
