use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Tipster,
    User,
}

impl UserRole {
    pub fn from_str(role: &str) -> Option<Self> {
        match role.to_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "tipster" => Some(UserRole::Tipster),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Tipster => "tipster",
            UserRole::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login is refused by the backend for anything but `Active`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account the seeders write into the `users` table, together with the
/// plaintext it is seeded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSeed {
    pub email: String,
    pub password: String,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub status: UserStatus,
}

impl AccountSeed {
    pub fn new(
        email: &str,
        password: &str,
        username: &str,
        full_name: &str,
        role: UserRole,
    ) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            role,
            status: UserStatus::Active,
        }
    }

    pub fn admin(email: &str, password: &str) -> Self {
        Self::new(email, password, "admin", "Admin User", UserRole::Admin)
    }
}

/// Fixed set of accounts a fresh development database is populated with.
pub fn development_roster() -> Vec<AccountSeed> {
    vec![
        AccountSeed::admin("admin@footyfortunes.com", "Admin123!@#"),
        AccountSeed::new(
            "tipster@footyfortunes.com",
            "Tipster123!@#",
            "protipster",
            "Pro Tipster",
            UserRole::Tipster,
        ),
        AccountSeed::new(
            "user1@example.com",
            "User123!@#",
            "betmaster",
            "John Doe",
            UserRole::User,
        ),
        AccountSeed::new(
            "user2@example.com",
            "User123!@#",
            "predictor99",
            "Jane Smith",
            UserRole::User,
        ),
        AccountSeed::new(
            "test@test.com",
            "Test123!@#",
            "testuser",
            "Test User",
            UserRole::User,
        ),
    ]
}
