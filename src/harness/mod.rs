use futures::future::BoxFuture;
use log::info;
use prettytable::{format, Cell, Row, Table};
use thiserror::Error;

use crate::config::HarnessConfig;

pub mod client;
pub mod palette;
pub mod results;
pub mod suites;
pub mod tokens;

use client::ApiClient;
use palette::{emit, Tone};
use results::{Outcome, TestResults};
use tokens::{TokenKind, TokenSet};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("{0}")]
    Assertion(String),
    #[error("No {0} available (did the login case fail?)")]
    MissingToken(TokenKind),
    #[error("API unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },
    #[error("No response from {url} within {secs}s")]
    Timeout { url: String, secs: u64 },
    #[error("Response from {url} (status {status}) is not valid JSON: {reason}")]
    InvalidBody {
        url: String,
        status: u16,
        reason: String,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type CaseResult = Result<(), HarnessError>;

/// Signature every test case implements.
pub type CaseFn = for<'s> fn(&'s mut Session) -> BoxFuture<'s, CaseResult>;

pub struct TestCase {
    pub name: &'static str,
    pub run: CaseFn,
}

pub struct Suite {
    pub key: &'static str,
    pub title: &'static str,
    pub cases: Vec<TestCase>,
}

/// State a test case may touch: the API client, captured tokens, and the
/// credentials to log in with.
pub struct Session {
    pub client: ApiClient,
    pub tokens: TokenSet,
    pub config: HarnessConfig,
}

impl Session {
    /// Prints `pass_msg` when `condition` holds, otherwise fails the case
    /// with `fail_msg`.
    pub fn expect(&self, condition: bool, pass_msg: &str, fail_msg: impl Into<String>) -> CaseResult {
        if condition {
            emit(&format!("  ✅ {}", pass_msg), Tone::Green);
            Ok(())
        } else {
            Err(HarnessError::Assertion(fail_msg.into()))
        }
    }

    /// Like [`Session::expect`], for a non-empty string field the case needs
    /// to keep.
    pub fn expect_str(
        &self,
        response: &client::ApiResponse,
        field: &str,
        pass_msg: &str,
        fail_msg: &str,
    ) -> Result<String, HarnessError> {
        match response.str_field(field) {
            Some(value) if !value.is_empty() => {
                self.expect(true, pass_msg, fail_msg)?;
                Ok(value.to_string())
            }
            _ => Err(HarnessError::Assertion(fail_msg.to_string())),
        }
    }

    pub fn info(&self, message: &str) {
        emit(&format!("  ℹ️  {}", message), Tone::Blue);
    }

    pub fn token(&self, kind: TokenKind) -> Result<String, HarnessError> {
        self.tokens.require(kind).map(str::to_string)
    }
}

pub struct Harness {
    pub session: Session,
    pub results: TestResults,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        let client = ApiClient::new(&config.base_url, config.timeout)?;
        Ok(Self {
            session: Session {
                client,
                tokens: TokenSet::new(),
                config,
            },
            results: TestResults::new(),
        })
    }

    pub fn results(&self) -> TestResults {
        self.results
    }

    pub fn tokens(&self) -> &TokenSet {
        &self.session.tokens
    }

    /// Runs one case and records exactly one outcome for it.
    pub async fn run_case(&mut self, case: &TestCase) -> Outcome {
        emit(&format!("\n📋 Test: {}", case.name), Tone::Cyan);

        let outcome = match (case.run)(&mut self.session).await {
            Ok(()) => Outcome::Passed,
            Err(e) => {
                emit(&format!("  ❌ {}", e), Tone::Red);
                Outcome::Failed
            }
        };
        self.results.record(outcome);
        outcome
    }

    pub async fn run_suite(&mut self, suite: &Suite) {
        emit(&format!("\n=== {} ===", suite.title), Tone::Yellow);
        info!("Running suite {} ({} cases)", suite.key, suite.cases.len());
        for case in &suite.cases {
            self.run_case(case).await;
        }
    }

    pub async fn run(&mut self, suites: &[Suite]) -> TestResults {
        palette::banner("FOOTYFORTUNES API TEST SUITE");
        emit(
            &format!("\n📡 Testing API: {}\n", self.session.client.base_url()),
            Tone::Blue,
        );

        for suite in suites {
            self.run_suite(suite).await;
        }

        self.print_summary();
        self.results
    }

    pub fn print_summary(&self) {
        palette::banner("TEST SUMMARY");
        summary_table(&self.results).printstd();

        if self.results.all_passed() {
            emit("\n🎉 ALL TESTS PASSED! Backend is working correctly!", Tone::Green);
        } else {
            emit("\n⚠️  Some tests failed. Please review the errors above.", Tone::Red);
        }
    }
}

pub fn summary_table(results: &TestResults) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

    let failed_style = if results.failed > 0 { "Fr" } else { "Fg" };
    let rate = format!("{:.1}%", results.pass_rate());
    let rate_style = if results.total > 0 && results.all_passed() { "Fg" } else { "Fy" };

    table.add_row(Row::new(vec![
        Cell::new("Total Tests").style_spec("Fb"),
        Cell::new(&results.total.to_string()),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Passed").style_spec("Fb"),
        Cell::new(&results.passed.to_string()).style_spec("Fg"),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Failed").style_spec("Fb"),
        Cell::new(&results.failed.to_string()).style_spec(failed_style),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Pass Rate").style_spec("Fb"),
        Cell::new(&rate).style_spec(rate_style),
    ]));
    table
}
