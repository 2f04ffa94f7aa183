use clap::{Arg, Command};
use colored::*;
use footy_tools::auth::password;
use std::process;

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let matches = Command::new("verify_hash")
        .about("Checks a plaintext password against a stored bcrypt hash")
        .arg(Arg::new("password").required(true).help("Plaintext password"))
        .arg(Arg::new("hash").required(true).help("Stored hash, e.g. $2a$10$..."))
        .get_matches();

    // Both are required, clap exits before this on a missing one.
    let plaintext = matches.value_of("password").unwrap_or_default();
    let hash = matches.value_of("hash").unwrap_or_default();

    println!("Testing password verification...");
    println!("Hash: {}", hash);

    match password::verify_password(plaintext, hash) {
        Ok(true) => println!("Match: {}", "true".green().bold()),
        Ok(false) => {
            println!("Match: {}", "false".red().bold());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}: {}", "ERROR".red().bold(), e);
            process::exit(2);
        }
    }
}
