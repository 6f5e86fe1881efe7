//! Comparison error types - re-exports the unified VisregError from visreg-core
//!
//! Errors seen by callers of this crate:
//! - MissingScreenshotName - the request had no usable baseline name
//! - Mismatch { percent } - the screenshot differs from the baseline
//! - Engine(EngineError) - an unclassified diffing engine failure, message unchanged
//! - InvalidDiffReport - the engine broke its reporting contract
//! - ElementNotFound / Browser - the automation driver could not resolve the target

pub use visreg_core::{EngineError, Result, VisregError};
