//! Diffing engine abstraction
//!
//! A [`Comparator`] checks a region of the page against the stored baseline
//! named in the configuration. Comparators are stateful and bound to one
//! browser session; a [`ComparatorFactory`] creates them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{EngineError, Result};
use visreg_core::{CompareConfig, DiffReport, Region};

/// Trait for diffing engine comparators (allows mocking in tests)
#[async_trait]
pub trait Comparator: Send + Sync {
    /// Capture `region` and compare it with the baseline named in `config`
    async fn check_region(
        &self,
        region: &Region,
        config: &CompareConfig,
    ) -> std::result::Result<DiffReport, EngineError>;
}

/// Creates comparators seeded with a merged configuration
pub trait ComparatorFactory: Send + Sync {
    fn create(&self, config: &CompareConfig) -> Result<Arc<dyn Comparator>>;
}

/// Mock comparator for testing
///
/// Answers every check with the same canned outcome and records the calls.
#[derive(Debug)]
pub struct MockComparator {
    outcome: Mutex<std::result::Result<DiffReport, EngineError>>,
    checks: AtomicUsize,
    last_check: Mutex<Option<(Region, CompareConfig)>>,
}

impl Default for MockComparator {
    fn default() -> Self {
        Self::matching()
    }
}

impl MockComparator {
    /// Comparator whose checks always match
    pub fn matching() -> Self {
        Self::with_outcome(Ok(DiffReport::identical(800_000)))
    }

    pub fn with_report(report: DiffReport) -> Self {
        Self::with_outcome(Ok(report))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Err(EngineError::new(message)))
    }

    fn with_outcome(outcome: std::result::Result<DiffReport, EngineError>) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            checks: AtomicUsize::new(0),
            last_check: Mutex::new(None),
        }
    }

    /// Change the canned answer for subsequent checks
    pub fn respond_with(&self, outcome: std::result::Result<DiffReport, EngineError>) {
        *self.outcome.lock().unwrap_or_else(|p| p.into_inner()) = outcome;
    }

    /// Number of region checks performed
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn last_check(&self) -> Option<(Region, CompareConfig)> {
        self.last_check
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl Comparator for MockComparator {
    async fn check_region(
        &self,
        region: &Region,
        config: &CompareConfig,
    ) -> std::result::Result<DiffReport, EngineError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        *self.last_check.lock().unwrap_or_else(|p| p.into_inner()) =
            Some((*region, config.clone()));
        self.outcome
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

/// Mock factory for testing
///
/// Hands out the same [`MockComparator`] every time and counts creations.
#[derive(Debug, Clone)]
pub struct MockComparatorFactory {
    comparator: Arc<MockComparator>,
    created: Arc<AtomicUsize>,
    last_config: Arc<Mutex<Option<CompareConfig>>>,
}

impl Default for MockComparatorFactory {
    fn default() -> Self {
        Self::new(Arc::new(MockComparator::matching()))
    }
}

impl MockComparatorFactory {
    pub fn new(comparator: Arc<MockComparator>) -> Self {
        Self {
            comparator,
            created: Arc::new(AtomicUsize::new(0)),
            last_config: Arc::new(Mutex::new(None)),
        }
    }

    pub fn comparator(&self) -> &Arc<MockComparator> {
        &self.comparator
    }

    /// Number of comparators created
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Configuration the most recent comparator was seeded with
    pub fn last_config(&self) -> Option<CompareConfig> {
        self.last_config
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl ComparatorFactory for MockComparatorFactory {
    fn create(&self, config: &CompareConfig) -> Result<Arc<dyn Comparator>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        *self.last_config.lock().unwrap_or_else(|p| p.into_inner()) = Some(config.clone());
        let comparator: Arc<dyn Comparator> = self.comparator.clone();
        Ok(comparator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_comparator_records_checks() {
        let comparator = MockComparator::with_report(DiffReport::new(-1, 1, 2));
        let region = Region::new(0.0, 0.0, 2.0, 1.0);
        let config = CompareConfig::new().with("screenshotName", "foo");

        let report = comparator.check_region(&region, &config).await.unwrap();
        assert_eq!(report, DiffReport::new(-1, 1, 2));
        assert_eq!(comparator.checks(), 1);
        assert_eq!(comparator.last_check(), Some((region, config)));
    }

    #[tokio::test]
    async fn test_mock_comparator_respond_with() {
        let comparator = MockComparator::matching();
        comparator.respond_with(Err(EngineError::new("boom")));

        let err = comparator
            .check_region(&Region::new(0.0, 0.0, 1.0, 1.0), &CompareConfig::new())
            .await
            .unwrap_err();
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn test_mock_factory_counts_creations() {
        let factory = MockComparatorFactory::default();
        assert_eq!(factory.created(), 0);
        assert!(factory.last_config().is_none());

        let config = CompareConfig::defaults();
        factory.create(&config).unwrap();
        factory.create(&config).unwrap();

        assert_eq!(factory.created(), 2);
        assert_eq!(factory.last_config(), Some(config));
    }
}
