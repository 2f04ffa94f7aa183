use dotenv::dotenv;
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::auth::password::DEFAULT_COST;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@footyfortunes.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin123!@#";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8787";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Settings for the SQL seeders.
#[derive(Debug, Clone)]
pub struct SeederConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub bcrypt_cost: u32,
}

impl SeederConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so callers other than
    /// the process environment (tests, flag overrides) can feed it.
    ///
    /// Only numbers are checked here; call [`SeederConfig::validate`] once
    /// command-line overrides have been applied.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_email = lookup("SEED_ADMIN_EMAIL")
            .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());

        let admin_password = lookup("SEED_ADMIN_PASSWORD")
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => parse_number("BCRYPT_COST", &raw)?,
            None => DEFAULT_COST,
        };

        Ok(Self {
            admin_email,
            admin_password,
            bcrypt_cost,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_email.trim().is_empty() {
            return Err(ConfigError::Empty("SEED_ADMIN_EMAIL"));
        }
        if self.admin_password.is_empty() {
            return Err(ConfigError::Empty("SEED_ADMIN_PASSWORD"));
        }
        Ok(())
    }
}

/// Settings for the API smoke-test harness.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub base_url: String,
    pub user_email: String,
    pub user_password: String,
    pub admin_email: String,
    pub admin_password: String,
    pub timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_email: "test@test.com".to_string(),
            user_password: "Test123!@#".to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl HarnessConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("API_BASE_URL").unwrap_or(defaults.base_url);
        let user_email = lookup("SMOKE_USER_EMAIL").unwrap_or(defaults.user_email);
        let user_password = lookup("SMOKE_USER_PASSWORD").unwrap_or(defaults.user_password);
        let admin_email = lookup("SMOKE_ADMIN_EMAIL").unwrap_or(defaults.admin_email);
        let admin_password = lookup("SMOKE_ADMIN_PASSWORD").unwrap_or(defaults.admin_password);

        let timeout = match lookup("SMOKE_TIMEOUT_SECS") {
            Some(raw) => parse_timeout("SMOKE_TIMEOUT_SECS", &raw)?,
            None => defaults.timeout,
        };

        let mut config = Self {
            base_url: String::new(),
            user_email,
            user_password,
            admin_email,
            admin_password,
            timeout,
        };
        config.set_base_url(&base_url)?;
        Ok(config)
    }

    /// Trailing slashes are dropped so endpoints can be appended verbatim.
    pub fn set_base_url(&mut self, url: &str) -> Result<(), ConfigError> {
        let trimmed = url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::Empty("API_BASE_URL"));
        }
        self.base_url = trimmed.to_string();
        Ok(())
    }
}

pub fn parse_number(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: raw.to_string(),
        })
}

/// A zero timeout would fail every request before it is sent.
pub fn parse_timeout(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match parse_number(key, raw)? {
        0 => Err(ConfigError::Zero(key)),
        secs => Ok(Duration::from_secs(secs.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_seeder_defaults() {
        let config = SeederConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.admin_email, DEFAULT_ADMIN_EMAIL);
        assert_eq!(config.admin_password, DEFAULT_ADMIN_PASSWORD);
        assert_eq!(config.bcrypt_cost, 10);
    }

    #[test]
    fn test_seeder_overrides() {
        let config = SeederConfig::from_lookup(lookup_from(&[
            ("SEED_ADMIN_EMAIL", "ops@example.com"),
            ("SEED_ADMIN_PASSWORD", "hunter2"),
            ("BCRYPT_COST", " 12 "),
        ]))
        .unwrap();
        assert_eq!(config.admin_email, "ops@example.com");
        assert_eq!(config.admin_password, "hunter2");
        assert_eq!(config.bcrypt_cost, 12);
    }

    #[test]
    fn test_bad_cost_is_an_error_not_a_default() {
        let err = SeederConfig::from_lookup(lookup_from(&[("BCRYPT_COST", "ten")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: "BCRYPT_COST",
                value: "ten".to_string()
            }
        );
    }

    #[test]
    fn test_empty_password_is_rejected_on_validate() {
        let config = SeederConfig::from_lookup(lookup_from(&[("SEED_ADMIN_PASSWORD", "")])).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::Empty("SEED_ADMIN_PASSWORD")));
    }

    #[test]
    fn test_override_rescues_empty_env_values() {
        let mut config = SeederConfig::from_lookup(lookup_from(&[
            ("SEED_ADMIN_EMAIL", ""),
            ("SEED_ADMIN_PASSWORD", ""),
        ]))
        .unwrap();

        config.admin_email = "ops@example.com".to_string();
        config.admin_password = "good".to_string();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_harness_defaults() {
        let config = HarnessConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url, "http://localhost:8787");
        assert_eq!(config.user_email, "test@test.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_harness_base_url_is_normalized() {
        let config = HarnessConfig::from_lookup(lookup_from(&[
            ("API_BASE_URL", "https://api.example.com/"),
            ("SMOKE_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_harness_rejects_zero_timeout() {
        let err = HarnessConfig::from_lookup(lookup_from(&[("SMOKE_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_eq!(err, ConfigError::Zero("SMOKE_TIMEOUT_SECS"));
        assert_eq!(parse_timeout("--timeout", " 0 "), Err(ConfigError::Zero("--timeout")));
        assert_eq!(parse_timeout("--timeout", "2"), Ok(Duration::from_secs(2)));
    }

    #[test]
    fn test_harness_rejects_blank_base_url() {
        let err = HarnessConfig::from_lookup(lookup_from(&[("API_BASE_URL", " / ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty("API_BASE_URL"));
    }
}
