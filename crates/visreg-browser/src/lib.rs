//! Screenshot comparison for browser-driven end-to-end tests
//!
//! This crate checks regions of a page against named baseline images. The
//! pixel diffing itself belongs to a diffing engine behind the
//! [`Comparator`] trait; this crate validates requests, merges
//! configuration, manages one comparator per browser session and turns the
//! engine's answer into a pass or a descriptive failure.
//!
//! # Example
//!
//! ```no_run
//! use visreg_browser::{ChromeConfig, ChromeDriver, MockComparatorFactory, SessionHandle, VisualComparer};
//! use visreg_browser::matchers::assert_matches_baseline;
//! use visreg_browser::AutomationDriver;
//! use visreg_core::CompareOptions;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let driver = ChromeDriver::launch(&ChromeConfig::default(), SessionHandle::new())?;
//!     driver.navigate("https://example.com").await?;
//!
//!     // Swap the mock for a real diffing engine's factory
//!     let comparer = VisualComparer::new(MockComparatorFactory::default());
//!
//!     let result = comparer
//!         .compare_screenshot(&driver, ".main-heading", CompareOptions::new("heading"))
//!         .await;
//!     assert_matches_baseline(&result);
//!
//!     comparer.end_session(driver.session()).await;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`visual`]: the comparison entry point
//! - [`resolver`]: configuration layering
//! - [`classify`]: interpretation of engine outcomes
//! - [`registry`]: per-session comparator reuse
//! - [`comparator`]: diffing engine traits and mocks
//! - [`driver`] / [`chrome`]: browser session access
//! - [`logger`]: messages surfaced to the test author
//! - [`matchers`]: test-runner assertion adapter
//! - [`error`]: error types for comparisons

pub mod chrome;
pub mod classify;
pub mod comparator;
pub mod driver;
pub mod error;
pub mod logger;
pub mod matchers;
pub mod registry;
pub mod resolver;
pub mod visual;

// Re-export commonly used types
pub use chrome::{ChromeConfig, ChromeDriver};
pub use classify::{classify, Verdict};
pub use comparator::{Comparator, ComparatorFactory, MockComparator, MockComparatorFactory};
pub use driver::{AutomationDriver, MockDriver, SessionHandle};
pub use error::{EngineError, Result, VisregError};
pub use logger::{LogLevel, RecordingLogger, TracingLogger, VisualLogger};
pub use matchers::{assert_matches_baseline, to_match_baseline, MatcherResult};
pub use registry::ComparatorRegistry;
pub use resolver::{ConfigProvider, ConfigResolver, NamespaceProvider, ParamsProvider, StaticProvider};
pub use visual::VisualComparer;
