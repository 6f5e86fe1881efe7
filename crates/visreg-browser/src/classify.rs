//! Outcome classification for region checks

use crate::error::{EngineError, VisregError};
use visreg_core::DiffReport;

/// What a region check means for the test
#[derive(Debug)]
pub enum Verdict {
    /// Screenshot matches the baseline
    Matched,
    /// The engine reported a benign condition (e.g. first-run baseline creation)
    BaselineSaved { reason: String },
    /// Screenshot differs from the baseline by `percent` of its pixels
    Mismatched { percent: f64 },
    /// Anything else; the error is surfaced unchanged
    Failed(VisregError),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Self::Matched | Self::BaselineSaved { .. })
    }
}

/// Classify the engine's answer to a region check
///
/// `benign_errors` lists message fragments that mark an engine error as
/// harmless; empty fragments are ignored. A non-matching report over zero pixels breaks the engine's
/// contract and fails rather than producing a NaN percentage.
pub fn classify(
    outcome: std::result::Result<DiffReport, EngineError>,
    benign_errors: &[String],
) -> Verdict {
    match outcome {
        Ok(report) if report.is_match() => Verdict::Matched,
        Ok(report) => match report.mismatch_percent() {
            Some(percent) => Verdict::Mismatched { percent },
            None => Verdict::Failed(VisregError::InvalidDiffReport(format!(
                "{} differences over a zero-pixel dimension (code {})",
                report.differences, report.code
            ))),
        },
        Err(err) => match benign_errors
            .iter()
            .find(|fragment| !fragment.is_empty() && err.mentions(fragment))
        {
            Some(fragment) => Verdict::BaselineSaved {
                reason: fragment.clone(),
            },
            None => Verdict::Failed(err.into()),
        },
    }
}
