//! Check results and plausibility reports

use std::collections::BTreeMap;
use std::fmt;

/// Outcome of a single plausibility check on one profile.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    Passed,
    Failed {
        message: String,
        /// How often the condition was violated within the profile
        occurrences: Option<usize>,
        /// Share of candidate runs affected, in 0.0..=1.0
        share: Option<f64>,
    },
}

/// Result of one named check.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    pub check: String,
    pub outcome: CheckOutcome,
}

impl CheckResult {
    pub fn passed(check: impl Into<String>) -> Self {
        CheckResult {
            check: check.into(),
            outcome: CheckOutcome::Passed,
        }
    }

    pub fn failed(check: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            check: check.into(),
            outcome: CheckOutcome::Failed {
                message: message.into(),
                occurrences: None,
                share: None,
            },
        }
    }

    pub fn failed_with_stats(
        check: impl Into<String>,
        message: impl Into<String>,
        occurrences: usize,
        share: f64,
    ) -> Self {
        CheckResult {
            check: check.into(),
            outcome: CheckOutcome::Failed {
                message: message.into(),
                occurrences: Some(occurrences),
                share: Some(share),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Passed)
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            CheckOutcome::Passed => write!(f, "check '{}': ok", self.check),
            CheckOutcome::Failed {
                message,
                occurrences,
                share,
            } => {
                write!(f, "check '{}': failed - {}", self.check, message)?;
                if let Some(count) = occurrences {
                    write!(f, ", {} occurrences", count)?;
                }
                if let Some(share) = share {
                    write!(f, ", {:.1}% affected", share * 100.0)?;
                }
                Ok(())
            }
        }
    }
}

/// All check results for a single profile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultCollection {
    pub description: String,
    results: Vec<CheckResult>,
}

impl ResultCollection {
    pub fn new(description: impl Into<String>) -> Self {
        ResultCollection {
            description: description.into(),
            results: Vec::new(),
        }
    }

    pub fn add(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|result| !result.is_ok())
    }

    /// Share of failed checks; 0.0 when no checks ran.
    pub fn fail_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.failures().count() as f64 / self.results.len() as f64
    }

    pub fn render(&self, include_passed: bool) -> String {
        let mut report = format!("results for {}:\n", self.description);
        for result in &self.results {
            if include_passed || !result.is_ok() {
                report.push_str(&result.to_string());
                report.push('\n');
            }
        }
        report
    }
}

/// Check results across a batch of profiles.
#[derive(Clone, Debug, Default)]
pub struct PlausibilityReport {
    reports: Vec<ResultCollection>,
}

impl PlausibilityReport {
    pub fn new() -> Self {
        PlausibilityReport::default()
    }

    pub fn add_report(&mut self, report: ResultCollection) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[ResultCollection] {
        &self.reports
    }

    /// Regroup the per-profile results by check name.
    pub fn results_by_check(&self) -> BTreeMap<String, ResultCollection> {
        let mut grouped: BTreeMap<String, ResultCollection> = BTreeMap::new();
        for report in &self.reports {
            for result in report.results() {
                grouped
                    .entry(result.check.clone())
                    .or_insert_with(|| ResultCollection::new(format!("check '{}'", result.check)))
                    .add(result.clone());
            }
        }
        grouped
    }

    /// Fail rate of every check across all profiles.
    pub fn fail_rate_by_check(&self) -> BTreeMap<String, f64> {
        self.results_by_check()
            .into_iter()
            .map(|(check, collection)| (check, collection.fail_rate()))
            .collect()
    }
}
