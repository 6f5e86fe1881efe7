//! Test-runner assertion adapter
//!
//! Turns the result of [`VisualComparer::compare_screenshot`] into a pass flag
//! and a message a test framework can report.
//!
//! [`VisualComparer::compare_screenshot`]: crate::VisualComparer::compare_screenshot

use crate::error::Result;

/// Outcome of the `to_match_baseline` matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherResult {
    pub pass: bool,
    pub message: String,
}

/// Adapt a comparison result for a test framework
pub fn to_match_baseline(result: &Result<bool>) -> MatcherResult {
    match result {
        Ok(true) => MatcherResult {
            pass: true,
            message: "Expected screenshots not to match.".to_string(),
        },
        Ok(false) => MatcherResult {
            pass: false,
            message: "Expected screenshots to match.".to_string(),
        },
        Err(err) => MatcherResult {
            pass: false,
            message: err.to_string(),
        },
    }
}

/// Panic with the matcher message unless the comparison passed
#[track_caller]
pub fn assert_matches_baseline(result: &Result<bool>) {
    let outcome = to_match_baseline(result);
    if !outcome.pass {
        panic!("{}", outcome.message);
    }
}
