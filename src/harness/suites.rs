//! Smoke-test suites against the FootyFortunes API.
//!
//! Suites run in declaration order: `login` captures the tokens that
//! `protected`, `refresh` and `admin` replay.

use chrono::Utc;
use futures::future::BoxFuture;
use serde_json::json;

use super::tokens::TokenKind;
use super::{CaseResult, Session, Suite, TestCase};

pub const SUITE_KEYS: &[&str] = &[
    "registration",
    "login",
    "protected",
    "refresh",
    "admin",
    "public",
    "rate-limit",
];

const VALID_PASSWORD: &str = "ValidPass123!@#";
const RATE_LIMIT_ATTEMPTS: usize = 6;

/// Every suite except `rate-limit`, which locks the login out for a while.
pub fn default_suites() -> Vec<Suite> {
    vec![
        registration(),
        login(),
        protected(),
        refresh(),
        admin(),
        public(),
    ]
}

/// Resolves requested keys into suites in `SUITE_KEYS` order, each at most
/// once. No keys means the default set.
pub fn select(requested: &[&str], include_rate_limit: bool) -> Vec<Suite> {
    let defaults = default_suites();
    SUITE_KEYS
        .iter()
        .filter(|key| {
            let wanted = if requested.is_empty() {
                defaults.iter().any(|s| s.key == **key)
            } else {
                requested.contains(*key)
            };
            wanted || (include_rate_limit && **key == "rate-limit")
        })
        .filter_map(|key| suite_by_key(key))
        .collect()
}

pub fn suite_by_key(key: &str) -> Option<Suite> {
    match key {
        "registration" => Some(registration()),
        "login" => Some(login()),
        "protected" => Some(protected()),
        "refresh" => Some(refresh()),
        "admin" => Some(admin()),
        "public" => Some(public()),
        "rate-limit" => Some(rate_limit()),
        _ => None,
    }
}

fn preview(token: &str) -> String {
    let head: String = token.chars().take(50).collect();
    format!("{}...", head)
}

fn unique_suffix() -> i64 {
    Utc::now().timestamp_millis()
}

// ============================================================================
// REGISTRATION
// ============================================================================

pub fn registration() -> Suite {
    Suite {
        key: "registration",
        title: "🔐 AUTHENTICATION TESTS",
        cases: vec![
            TestCase { name: "Valid Registration", run: valid_registration },
            TestCase { name: "Invalid Email Format", run: invalid_email },
            TestCase { name: "Weak Password Rejection", run: weak_password },
            TestCase { name: "Duplicate Email Prevention", run: duplicate_email },
        ],
    }
}

fn valid_registration(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let suffix = unique_suffix();
        let body = json!({
            "email": format!("test_{}@example.com", suffix),
            "password": VALID_PASSWORD,
            "username": format!("testuser_{}", suffix),
            "fullName": "Test User",
        });
        let response = s.client.post("/api/auth/register", &body, None).await?;

        s.expect(
            response.status == 200 || response.status == 201,
            "Registration returned 200/201",
            format!("Registration failed with status {}", response.status),
        )?;
        s.expect(
            response.is_success_flag() == Some(true),
            "Response has success: true",
            "Response missing success field",
        )?;
        s.expect_str(&response, "accessToken", "Access token returned", "No access token in response")?;
        s.expect_str(&response, "refreshToken", "Refresh token returned", "No refresh token in response")?;
        s.expect(
            response.field("user").is_object(),
            "User object returned",
            "No user object in response",
        )?;

        s.info(&format!("User ID: {}", response.field("user")["id"]));
        Ok(())
    })
}

fn invalid_email(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let body = json!({ "email": "invalid-email", "password": VALID_PASSWORD });
        let response = s.client.post("/api/auth/register", &body, None).await?;

        s.expect(
            response.status == 400,
            "Returns 400 for invalid email",
            format!("Got status {}", response.status),
        )?;
        s.expect(
            response.is_success_flag() == Some(false),
            "Response has success: false",
            "Should fail for invalid email",
        )?;
        s.expect(
            !response.field("validationErrors").is_null(),
            "Has validation errors",
            "Missing validation errors",
        )
    })
}

fn weak_password(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let body = json!({ "email": "test@example.com", "password": "weak" });
        let response = s.client.post("/api/auth/register", &body, None).await?;

        s.expect(
            response.status == 400,
            "Returns 400 for weak password",
            format!("Got status {}", response.status),
        )?;
        s.expect(
            !response.field("validationErrors").is_null(),
            "Has validation errors",
            "Missing validation errors",
        )
    })
}

fn duplicate_email(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let body = json!({
            "email": format!("duplicate_{}@example.com", unique_suffix()),
            "password": VALID_PASSWORD,
        });

        s.client.post("/api/auth/register", &body, None).await?;
        let response = s.client.post("/api/auth/register", &body, None).await?;

        s.expect(
            response.status == 409,
            "Returns 409 for duplicate email",
            format!("Got status {}", response.status),
        )?;
        s.expect(
            response.is_success_flag() == Some(false),
            "Response has success: false",
            "Should fail for duplicate email",
        )
    })
}

// ============================================================================
// LOGIN
// ============================================================================

pub fn login() -> Suite {
    Suite {
        key: "login",
        title: "🔑 LOGIN TESTS",
        cases: vec![
            TestCase { name: "Valid Login with Test User", run: valid_login },
            TestCase { name: "Admin Login", run: admin_login },
            TestCase { name: "Invalid Password", run: invalid_password },
            TestCase { name: "Non-existent User", run: unknown_user },
        ],
    }
}

fn valid_login(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let body = json!({
            "email": s.config.user_email,
            "password": s.config.user_password,
        });
        let response = s.client.post("/api/auth/login", &body, None).await?;

        s.expect(
            response.status == 200,
            "Login returns 200",
            format!("Got status {}", response.status),
        )?;
        s.expect(
            response.is_success_flag() == Some(true),
            "Response has success: true",
            "Login should succeed",
        )?;
        let access = s.expect_str(&response, "accessToken", "Access token returned", "No access token")?;
        let refresh = s.expect_str(&response, "refreshToken", "Refresh token returned", "No refresh token")?;

        s.info(&format!("Access token: {}", preview(&access)));
        s.tokens.set(TokenKind::Access, access);
        s.tokens.set(TokenKind::Refresh, refresh);
        Ok(())
    })
}

fn admin_login(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let body = json!({
            "email": s.config.admin_email,
            "password": s.config.admin_password,
        });
        let response = s.client.post("/api/auth/login", &body, None).await?;

        s.expect(
            response.status == 200,
            "Admin login returns 200",
            format!("Got status {}", response.status),
        )?;
        let role = response.field("user")["role"].as_str().unwrap_or("none").to_string();
        s.expect(role == "admin", "User has admin role", format!("Role is {}", role))?;

        let access = s.expect_str(&response, "accessToken", "Admin access token returned", "No admin access token")?;
        let refresh = s.expect_str(&response, "refreshToken", "Admin refresh token returned", "No admin refresh token")?;
        s.tokens.set(TokenKind::AdminAccess, access);
        s.tokens.set(TokenKind::AdminRefresh, refresh);
        Ok(())
    })
}

fn invalid_password(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let body = json!({
            "email": s.config.user_email,
            "password": "WrongPassword123!@#",
        });
        let response = s.client.post("/api/auth/login", &body, None).await?;

        s.expect(
            response.status == 401,
            "Returns 401 for wrong password",
            format!("Got status {}", response.status),
        )?;
        s.expect(
            response.is_success_flag() == Some(false),
            "Response has success: false",
            "Should fail with wrong password",
        )
    })
}

fn unknown_user(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let body = json!({
            "email": "nonexistent@example.com",
            "password": "SomePassword123!@#",
        });
        let response = s.client.post("/api/auth/login", &body, None).await?;

        s.expect(
            response.status == 401,
            "Returns 401 for non-existent user",
            format!("Got status {}", response.status),
        )?;
        // Same message as a wrong password, so accounts cannot be enumerated.
        s.expect(
            response.str_field("error").is_some_and(|e| e.contains("Invalid")),
            "Generic error message (prevents enumeration)",
            "Error message too specific",
        )
    })
}

// ============================================================================
// PROTECTED ROUTES
// ============================================================================

pub fn protected() -> Suite {
    Suite {
        key: "protected",
        title: "🔒 PROTECTED ROUTE TESTS",
        cases: vec![
            TestCase { name: "Get Current User Info (with token)", run: me_with_token },
            TestCase { name: "Protected Route Without Token", run: me_without_token },
            TestCase { name: "Invalid Token", run: me_with_invalid_token },
        ],
    }
}

fn me_with_token(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let token = s.token(TokenKind::Access)?;
        let response = s.client.get("/api/auth/me", Some(token.as_str())).await?;

        s.expect(
            response.status == 200,
            "Returns 200 with valid token",
            format!("Got status {}", response.status),
        )?;
        let user = response.field("user");
        s.expect(user.is_object(), "User object returned", "No user object")?;

        let email = user["email"].as_str().unwrap_or_default();
        s.expect(
            email == s.config.user_email,
            "Correct user returned",
            format!("Wrong user: {}", email),
        )?;

        s.info(&format!("User: {} (ID: {})", email, user["id"]));
        Ok(())
    })
}

fn me_without_token(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let response = s.client.get("/api/auth/me", None).await?;

        s.expect(
            response.status == 401,
            "Returns 401 without token",
            format!("Got status {}", response.status),
        )?;
        s.expect(
            response.is_success_flag() == Some(false),
            "Response has success: false",
            "Should fail without token",
        )
    })
}

fn me_with_invalid_token(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let response = s.client.get("/api/auth/me", Some("invalid.token.here")).await?;

        s.expect(
            response.status == 401,
            "Returns 401 with invalid token",
            format!("Got status {}", response.status),
        )
    })
}

// ============================================================================
// TOKEN REFRESH
// ============================================================================

pub fn refresh() -> Suite {
    Suite {
        key: "refresh",
        title: "🔄 TOKEN REFRESH TESTS",
        cases: vec![
            TestCase { name: "Refresh Token with Valid Token", run: valid_refresh },
            TestCase { name: "Invalid Refresh Token", run: invalid_refresh },
        ],
    }
}

fn valid_refresh(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let refresh_token = s.token(TokenKind::Refresh)?;
        let body = json!({ "refreshToken": refresh_token });
        let response = s.client.post("/api/auth/refresh", &body, None).await?;

        s.expect(
            response.status == 200,
            "Returns 200 for valid refresh",
            format!("Got status {}", response.status),
        )?;
        let access = s.expect_str(&response, "accessToken", "New access token returned", "No access token")?;
        s.expect(
            s.tokens.get(TokenKind::Access) != Some(access.as_str()),
            "New token is different",
            "Token should be refreshed",
        )?;

        s.info(&format!("New access token: {}", preview(&access)));
        s.tokens.set(TokenKind::Access, access);
        Ok(())
    })
}

fn invalid_refresh(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let body = json!({ "refreshToken": "invalid.refresh.token" });
        let response = s.client.post("/api/auth/refresh", &body, None).await?;

        s.expect(
            response.status == 401,
            "Returns 401 for invalid token",
            format!("Got status {}", response.status),
        )
    })
}

// ============================================================================
// ADMIN ROUTES
// ============================================================================

pub fn admin() -> Suite {
    Suite {
        key: "admin",
        title: "👑 ADMIN ROUTE TESTS",
        cases: vec![
            TestCase { name: "Admin Stats (with admin token)", run: admin_stats },
            TestCase { name: "Admin Route with User Token (should fail)", run: admin_with_user_token },
            TestCase { name: "Get All Users (admin)", run: admin_users },
        ],
    }
}

fn admin_stats(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let token = s.token(TokenKind::AdminAccess)?;
        let response = s.client.get("/api/admin/stats", Some(token.as_str())).await?;

        s.expect(
            response.status == 200,
            "Returns 200 with admin token",
            format!("Got status {}", response.status),
        )?;
        let stats = response.field("stats");
        s.expect(stats.is_object(), "Stats object returned", "No stats object")?;
        s.expect(stats["totalUsers"].is_number(), "Has totalUsers", "Missing totalUsers")?;

        s.info(&format!("Total Users: {}", stats["totalUsers"]));
        s.info(&format!("Total Picks: {}", stats["totalPicks"]));
        s.info(&format!("Win Rate: {}%", stats["winRate"]));
        Ok(())
    })
}

fn admin_with_user_token(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let token = s.token(TokenKind::Access)?;
        let response = s.client.get("/api/admin/stats", Some(token.as_str())).await?;

        s.expect(
            response.status == 403,
            "Returns 403 for non-admin",
            format!("Got status {}", response.status),
        )?;
        s.expect(
            response.is_success_flag() == Some(false),
            "Access denied",
            "Should deny non-admin access",
        )
    })
}

fn admin_users(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let token = s.token(TokenKind::AdminAccess)?;
        let response = s.client.get("/api/admin/users", Some(token.as_str())).await?;

        s.expect(
            response.status == 200,
            "Returns 200",
            format!("Got status {}", response.status),
        )?;
        let count = response.field("users").as_array().map(Vec::len);
        s.expect(count.is_some(), "Users array returned", "No users array")?;
        s.expect(count.unwrap_or(0) > 0, "Has users", "No users in database")?;

        s.info(&format!("Total users in DB: {}", count.unwrap_or(0)));
        Ok(())
    })
}

// ============================================================================
// PUBLIC ROUTES
// ============================================================================

pub fn public() -> Suite {
    Suite {
        key: "public",
        title: "🌍 PUBLIC ROUTE TESTS",
        cases: vec![
            TestCase { name: "Get Today's Picks (public)", run: picks_today },
            TestCase { name: "Get Picks Archive (public)", run: picks_archive },
        ],
    }
}

fn picks_today(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let response = s.client.get("/api/picks/today", None).await?;

        s.expect(
            response.status == 200,
            "Returns 200",
            format!("Got status {}", response.status),
        )?;
        s.expect(
            response.body.get("success").is_some(),
            "Has success field",
            "Missing success field",
        )?;

        if response.field("picks").is_null() {
            s.info("No picks for today (expected if none generated)");
        } else {
            s.info("Today's picks available");
        }
        Ok(())
    })
}

fn picks_archive(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let response = s.client.get("/api/picks/archive?limit=10", None).await?;

        s.expect(
            response.status == 200,
            "Returns 200",
            format!("Got status {}", response.status),
        )?;
        s.expect(
            response.field("stats").is_object(),
            "Stats object returned",
            "No stats object",
        )?;
        let picks = response.field("picks").as_array().map(Vec::len);
        s.expect(picks.is_some(), "Picks array returned", "No picks array")?;

        s.info(&format!("Archive picks: {}", picks.unwrap_or(0)));
        Ok(())
    })
}

// ============================================================================
// RATE LIMITING
// ============================================================================

pub fn rate_limit() -> Suite {
    Suite {
        key: "rate-limit",
        title: "⏱️  RATE LIMITING TESTS",
        cases: vec![TestCase {
            name: "Rate Limiting on Auth Endpoints",
            run: login_rate_limit,
        }],
    }
}

fn login_rate_limit(s: &mut Session) -> BoxFuture<'_, CaseResult> {
    Box::pin(async move {
        let body = json!({ "email": "ratelimit@test.com", "password": "Wrong123!@#" });

        let mut last = None;
        for attempt in 1..=RATE_LIMIT_ATTEMPTS {
            let response = s.client.post("/api/auth/login", &body, None).await?;
            if attempt < RATE_LIMIT_ATTEMPTS {
                s.info(&format!("Attempt {}: {} (should be 401)", attempt, response.status));
            }
            last = Some(response);
        }

        let status = last.as_ref().map_or(0, |r| r.status);
        s.expect(
            status == 429,
            "6th attempt returns 429",
            format!("Got status {}", status),
        )?;
        let retry_after = last
            .as_ref()
            .map(|r| r.field("retryAfter").clone())
            .unwrap_or_default();
        s.expect(!retry_after.is_null(), "Has retryAfter field", "Missing retryAfter")?;

        s.info(&format!("Rate limited! Retry after: {}s", retry_after));
        Ok(())
    })
}
