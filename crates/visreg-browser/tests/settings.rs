//! Integration tests for repository settings feeding the comparer.

use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use visreg_browser::{
    MockComparator, MockComparatorFactory, MockDriver, RecordingLogger, SessionHandle,
    VisualComparer,
};
use visreg_core::{CompareOptions, VisregSettings};

fn write_settings(dir: &TempDir, content: &str) {
    let config_dir = dir.path().join(".visreg");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), content).unwrap();
}

#[tokio::test]
async fn test_settings_file_drives_comparison() {
    let dir = TempDir::new().unwrap();
    write_settings(
        &dir,
        r#"
params_key = "visual"
namespace = "e2e"
benign_errors = ["baseline written"]

[compare_screenshot]
basePath = "visual/baseline"
width = 1440
"#,
    );

    let settings = VisregSettings::load_or_default(dir.path()).unwrap();
    let logger = Arc::new(RecordingLogger::new());
    let factory = MockComparatorFactory::new(Arc::new(MockComparator::failing(
        "first run: baseline written to visual/baseline/home.png",
    )));
    let comparer = VisualComparer::with_settings(factory, &settings).with_logger(logger.clone());

    let driver = MockDriver::new().with_session(
        SessionHandle::new().with_params(json!({
            "visual": { "compareScreenshot": { "height": 900 } }
        })),
    );

    let matched = comparer
        .compare_screenshot(&driver, "main", CompareOptions::new("home"))
        .await
        .unwrap();

    assert!(matched);
    assert_eq!(logger.infos(), vec!["[home] baseline written"]);

    let seeded = comparer.factory().last_config().unwrap();
    assert_eq!(seeded.get_str("basePath"), Some("visual/baseline"));
    assert_eq!(seeded.get_u64("width"), Some(1440));
    assert_eq!(seeded.get_u64("height"), Some(900));
}

#[tokio::test]
async fn test_default_settings_ignore_custom_keys() {
    let dir = TempDir::new().unwrap();
    let settings = VisregSettings::load_or_default(dir.path()).unwrap();
    let comparer = VisualComparer::with_settings(MockComparatorFactory::default(), &settings);

    let driver = MockDriver::new().with_session(SessionHandle::new().with_params(json!({
        "visual": { "compareScreenshot": { "height": 900 } }
    })));

    comparer
        .compare_screenshot(&driver, "main", CompareOptions::new("home"))
        .await
        .unwrap();

    let seeded = comparer.factory().last_config().unwrap();
    assert_eq!(seeded.get_u64("height"), Some(800));
}

#[test]
fn test_invalid_settings_file() {
    let dir = TempDir::new().unwrap();
    write_settings(&dir, "benign_errors = 3");

    assert!(VisregSettings::load_or_default(dir.path()).is_err());
}
