//! Screenshot comparison against named baselines

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::classify::{classify, Verdict};
use crate::comparator::{Comparator, ComparatorFactory};
use crate::driver::{AutomationDriver, SessionHandle};
use crate::error::{Result, VisregError};
use crate::logger::{TracingLogger, VisualLogger};
use crate::registry::ComparatorRegistry;
use crate::resolver::ConfigResolver;
use visreg_core::{CompareConfig, CompareOptions, Selector, VisregSettings};

/// Compares page regions with stored baselines through a diffing engine
///
/// One comparer serves any number of browser sessions. Each session gets its
/// own comparator, created on its first comparison and reused afterwards; the
/// configuration only seeds that creation.
///
/// # Example
/// ```no_run
/// use visreg_browser::{MockComparatorFactory, MockDriver, VisualComparer};
/// use visreg_core::CompareOptions;
///
/// #[tokio::main]
/// async fn main() {
///     let comparer = VisualComparer::new(MockComparatorFactory::default());
///     let driver = MockDriver::new();
///
///     let matched = comparer
///         .compare_screenshot(&driver, "body", CompareOptions::new("homepage"))
///         .await
///         .unwrap();
///     assert!(matched);
/// }
/// ```
pub struct VisualComparer<F: ComparatorFactory> {
    factory: F,
    resolver: ConfigResolver,
    registry: ComparatorRegistry,
    logger: Arc<dyn VisualLogger>,
    benign_errors: Vec<String>,
}

impl<F: ComparatorFactory> VisualComparer<F> {
    /// Create a comparer with default settings
    pub fn new(factory: F) -> Self {
        Self::with_settings(factory, &VisregSettings::default())
    }

    /// Create a comparer from repository settings
    pub fn with_settings(factory: F, settings: &VisregSettings) -> Self {
        Self {
            factory,
            resolver: ConfigResolver::from_settings(settings),
            registry: ComparatorRegistry::new(),
            logger: Arc::new(TracingLogger),
            benign_errors: settings.benign_errors.clone(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn VisualLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_resolver(mut self, resolver: ConfigResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn registry(&self) -> &ComparatorRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    /// Create a comparator seeded with `config`
    ///
    /// Does not register it; hosts that want to install a comparator up front
    /// pass the result to [`ComparatorRegistry::insert`].
    pub fn create_comparator(&self, config: &CompareConfig) -> Result<Arc<dyn Comparator>> {
        debug!("Creating comparator");
        self.factory.create(config)
    }

    /// Forget the comparator registered for `session`
    ///
    /// Call when the browser session closes. A later comparison on the same
    /// session creates a fresh comparator.
    pub async fn end_session(&self, session: &SessionHandle) -> Option<Arc<dyn Comparator>> {
        let removed = self.registry.remove(session.id()).await;
        if removed.is_some() {
            debug!("Released comparator for {}", session.id());
        }
        removed
    }

    /// Compare the region under `selector` with the baseline named in `options`
    ///
    /// Resolves to `true` when the screenshot matches, or when the engine
    /// reported a benign condition such as saving a new baseline. Fails with
    /// [`VisregError::Mismatch`] when the screenshot differs and with the
    /// engine's own error for anything else.
    #[instrument(
        skip_all,
        fields(session = %driver.session().id(), screenshot = ?options.screenshot_name)
    )]
    pub async fn compare_screenshot<D>(
        &self,
        driver: &D,
        selector: impl Into<Selector>,
        options: CompareOptions,
    ) -> Result<bool>
    where
        D: AutomationDriver + ?Sized,
    {
        let name = match options.screenshot_name() {
            Some(name) => name.to_string(),
            None => {
                let err = VisregError::MissingScreenshotName;
                self.logger.warn(&err.to_string());
                return Err(err);
            }
        };

        let session = driver.session();
        let config = self.resolver.resolve(session, &options);
        let comparator = self.acquire_comparator(session, &config).await?;

        let selector = selector.into();
        let region = driver.locate(&selector).await?;
        debug!("Checking {} as {:?}", selector, region);

        let outcome = comparator.check_region(&region, &config).await;

        match classify(outcome, &self.benign_errors) {
            Verdict::Matched => {
                info!("Screenshot '{}' matches baseline", name);
                Ok(true)
            }
            Verdict::BaselineSaved { reason } => {
                self.logger.info(&format!("[{}] {}", name, reason));
                Ok(true)
            }
            Verdict::Mismatched { percent } => Err(VisregError::Mismatch { percent }),
            Verdict::Failed(err) => Err(err),
        }
    }

    /// The session's comparator, created and registered on first use
    async fn acquire_comparator(
        &self,
        session: &SessionHandle,
        config: &CompareConfig,
    ) -> Result<Arc<dyn Comparator>> {
        self.registry
            .get_or_try_insert_with(session.id(), || self.create_comparator(config))
            .await
    }
}
