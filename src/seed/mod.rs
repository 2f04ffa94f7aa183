use log::debug;
use prettytable::{format, Cell, Row, Table};
use std::fmt;
use thiserror::Error;

use crate::auth::password::{self, PasswordError};
use crate::models::user::AccountSeed;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("Invalid account: {0}")]
    InvalidAccount(String),
}

pub type SeedResult<T> = Result<T, SeedError>;

const USER_COLUMNS: &str = "email, password_hash, username, full_name, role, status, created_at";

/// An account paired with the bcrypt hash of its seed password.
#[derive(Debug, Clone)]
pub struct HashedAccount {
    pub account: AccountSeed,
    pub password_hash: String,
}

impl HashedAccount {
    pub fn hash(account: AccountSeed, cost: u32) -> SeedResult<Self> {
        validate_account(&account)?;
        let password_hash = password::hash_password(&account.password, cost)?;
        debug!("Hashed seed password for {} at cost {}", account.email, cost);
        Ok(Self {
            account,
            password_hash,
        })
    }
}

fn validate_account(account: &AccountSeed) -> SeedResult<()> {
    if account.email.trim().is_empty() {
        return Err(SeedError::InvalidAccount("email must not be empty".to_string()));
    }
    if account.username.trim().is_empty() {
        return Err(SeedError::InvalidAccount(format!(
            "username for {} must not be empty",
            account.email
        )));
    }
    Ok(())
}

/// Wraps `value` in single quotes, doubling any quote it contains.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Line breaks would end a `--` comment early and leak the rest as SQL.
fn comment_text(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

pub fn delete_statement(email: &str) -> String {
    format!("DELETE FROM users WHERE email = {};", quote_literal(email))
}

pub fn insert_statement(seed: &HashedAccount) -> String {
    let account = &seed.account;
    format!(
        "INSERT INTO users ({}) VALUES ({}, {}, {}, {}, {}, {}, datetime('now'));",
        USER_COLUMNS,
        quote_literal(&account.email),
        quote_literal(&seed.password_hash),
        quote_literal(&account.username),
        quote_literal(&account.full_name),
        quote_literal(account.role.as_str()),
        quote_literal(account.status.as_str()),
    )
}

/// Line-oriented SQL text, assembled completely before anything is printed.
#[derive(Debug, Default, Clone)]
pub struct SeedScript {
    lines: Vec<String>,
}

impl SeedScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        let text = comment_text(text);
        if text.is_empty() {
            self.lines.push("--".to_string());
        } else {
            self.lines.push(format!("-- {}", text));
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    /// Delete-then-insert, so applying the script twice still leaves one row.
    pub fn replace_account(&mut self, seed: &HashedAccount) -> &mut Self {
        self.lines.push(delete_statement(&seed.account.email));
        self.blank();
        self.lines.push(insert_statement(seed));
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

impl fmt::Display for SeedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub fn admin_script(seed: &HashedAccount) -> SeedScript {
    let mut script = SeedScript::new();
    script
        .comment("Admin User SQL")
        .comment(&format!("Email: {}", seed.account.email))
        .comment(&format!("Password: {}", seed.account.password))
        .blank()
        .replace_account(seed);
    script
}

const RULE: &str = "============================================================================";

pub fn roster_script(seeds: &[HashedAccount]) -> SeedScript {
    let mut script = SeedScript::new();
    script
        .comment(RULE)
        .comment("TEST USERS WITH BCRYPT HASHED PASSWORDS")
        .comment(RULE)
        .blank();

    for seed in seeds {
        script
            .comment(&format!(
                "User: {} | Password: {}",
                seed.account.email, seed.account.password
            ))
            .replace_account(seed)
            .blank();
    }

    script
        .comment(RULE)
        .comment("CREDENTIALS FOR TESTING")
        .comment(RULE);

    for line in credentials_table(seeds).to_string().lines() {
        script.comment(line.trim_end());
    }
    script
}

fn credentials_table(seeds: &[HashedAccount]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

    table.set_titles(Row::new(vec![
        Cell::new("Role"),
        Cell::new("Email"),
        Cell::new("Password"),
    ]));

    for seed in seeds {
        table.add_row(Row::new(vec![
            Cell::new(&seed.account.role.as_str().to_uppercase()),
            Cell::new(&seed.account.email),
            Cell::new(&seed.account.password),
        ]));
    }
    table
}
