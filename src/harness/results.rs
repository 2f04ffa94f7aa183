/// Outcome of one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

/// Pass/fail tally for a run. `total == passed + failed` holds after every
/// recorded outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TestResults {
    pub passed: u32,
    pub failed: u32,
    pub total: u32,
}

impl TestResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed => self.failed += 1,
        }
        self.total += 1;
    }

    /// Percentage of passed cases, 0.0 for an empty run.
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.passed) / f64::from(self.total) * 100.0
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
