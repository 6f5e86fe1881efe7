//! Configuration resolution for a single comparison
//!
//! The merged configuration is folded from an ordered list of layers, lowest
//! precedence first:
//!
//! 1. built-in defaults
//! 2. each [`ConfigProvider`], in registration order
//! 3. the caller's [`CompareOptions`]
//!
//! Every layer is merged field by field. A provider with nothing to say
//! contributes an empty layer.

use serde_json::{Map, Value};
use tracing::debug;

use crate::driver::SessionHandle;
use visreg_core::{CompareConfig, CompareOptions, VisregSettings};

/// Field that holds the comparison overrides inside each session source
const COMPARE_SCREENSHOT_KEY: &str = "compareScreenshot";

/// A source of partial configuration
pub trait ConfigProvider: Send + Sync {
    fn name(&self) -> &str;

    /// The provider's layer for this session, if it has one
    fn layer(&self, session: &SessionHandle) -> Option<Map<String, Value>>;
}

/// Reads `params.<key>.compareScreenshot` from the session
#[derive(Debug, Clone)]
pub struct ParamsProvider {
    key: String,
}

impl ParamsProvider {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl ConfigProvider for ParamsProvider {
    fn name(&self) -> &str {
        "params"
    }

    fn layer(&self, session: &SessionHandle) -> Option<Map<String, Value>> {
        session
            .params()
            .get(&self.key)
            .and_then(|v| v.get(COMPARE_SCREENSHOT_KEY))
            .and_then(Value::as_object)
            .cloned()
    }
}

/// Reads `<namespace>.visualConfig.compareScreenshot` from the session
#[derive(Debug, Clone)]
pub struct NamespaceProvider {
    namespace: String,
}

impl NamespaceProvider {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl ConfigProvider for NamespaceProvider {
    fn name(&self) -> &str {
        "namespace"
    }

    fn layer(&self, session: &SessionHandle) -> Option<Map<String, Value>> {
        session
            .namespace(&self.namespace)
            .and_then(|v| v.get("visualConfig"))
            .and_then(|v| v.get(COMPARE_SCREENSHOT_KEY))
            .and_then(Value::as_object)
            .cloned()
    }
}

/// A fixed layer, independent of the session
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    layer: Map<String, Value>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, layer: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            layer,
        }
    }
}

impl ConfigProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn layer(&self, _session: &SessionHandle) -> Option<Map<String, Value>> {
        Some(self.layer.clone())
    }
}

/// Folds configuration layers into the options for one comparison
pub struct ConfigResolver {
    defaults: CompareConfig,
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::from_settings(&VisregSettings::default())
    }
}

impl ConfigResolver {
    /// Resolver with only the built-in defaults and no providers
    pub fn empty() -> Self {
        Self {
            defaults: CompareConfig::defaults(),
            providers: Vec::new(),
        }
    }

    /// Standard provider chain for the given settings
    ///
    /// Repository defaults, then session params, then the consumer namespace.
    pub fn from_settings(settings: &VisregSettings) -> Self {
        let mut resolver = Self::empty();
        if !settings.compare_screenshot.is_empty() {
            resolver = resolver.with_provider(StaticProvider::new(
                "repository",
                settings.compare_screenshot.clone(),
            ));
        }
        resolver
            .with_provider(ParamsProvider::new(&settings.params_key))
            .with_provider(NamespaceProvider::new(&settings.namespace))
    }

    pub fn with_defaults(mut self, defaults: CompareConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Append a provider; it takes precedence over every earlier one
    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Merge every layer for this session and call
    pub fn resolve(&self, session: &SessionHandle, options: &CompareOptions) -> CompareConfig {
        let mut config = self.defaults.clone();

        for provider in &self.providers {
            if let Some(layer) = provider.layer(session) {
                debug!(
                    "Applying {} configuration layer ({} fields)",
                    provider.name(),
                    layer.len()
                );
                config.merge(&layer);
            }
        }

        config.merge(&options.to_layer());
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> SessionHandle {
        SessionHandle::new()
    }

    #[test]
    fn test_defaults_only() {
        let resolver = ConfigResolver::default();
        let config = resolver.resolve(&session(), &CompareOptions::new("foo"));

        assert_eq!(config.get_u64("width"), Some(1000));
        assert_eq!(config.get_u64("height"), Some(800));
        assert_eq!(config.screenshot_name(), Some("foo"));
    }

    #[test]
    fn test_params_layer() {
        let session = session().with_params(json!({
            "skyuxVisualRegressionTestingConfig": {
                "compareScreenshot": { "width": 1200 }
            }
        }));

        let config = ConfigResolver::default().resolve(&session, &CompareOptions::new("foo"));
        assert_eq!(config.get_u64("width"), Some(1200));
        assert_eq!(config.get_u64("height"), Some(800));
    }

    #[test]
    fn test_namespace_layer() {
        let session = session().with_namespace(
            "skyE2E",
            json!({ "visualConfig": { "compareScreenshot": { "width": 1200 } } }),
        );

        let config = ConfigResolver::default().resolve(&session, &CompareOptions::new("foo"));
        assert_eq!(config.get_u64("width"), Some(1200));
    }

    #[test]
    fn test_precedence() {
        let session = session()
            .with_params(json!({
                "skyuxVisualRegressionTestingConfig": {
                    "compareScreenshot": { "width": 1100, "height": 700, "baseline": false }
                }
            }))
            .with_namespace(
                "skyE2E",
                json!({ "visualConfig": { "compareScreenshot": { "width": 1200, "height": 600 } } }),
            );
        let options = CompareOptions::new("foo").with("width", 1300);

        let config = ConfigResolver::default().resolve(&session, &options);

        assert_eq!(config.get_u64("width"), Some(1300));
        assert_eq!(config.get_u64("height"), Some(600));
        assert_eq!(config.get_bool("baseline"), Some(false));
        assert_eq!(config.get_str("diffPath"), Some("screenshots-diff"));
    }

    #[test]
    fn test_malformed_layers_are_empty() {
        let session = session()
            .with_params(json!({ "skyuxVisualRegressionTestingConfig": "oops" }))
            .with_namespace("skyE2E", json!({ "visualConfig": { "compareScreenshot": 5 } }));

        let config = ConfigResolver::default().resolve(&session, &CompareOptions::new("foo"));
        let mut expected = CompareConfig::defaults();
        expected.merge(&CompareOptions::new("foo").to_layer());
        assert_eq!(config, expected);
    }

    #[test]
    fn test_settings_layers() {
        let mut settings = VisregSettings {
            params_key: "custom".to_string(),
            namespace: "e2e".to_string(),
            ..VisregSettings::default()
        };
        settings
            .compare_screenshot
            .insert("basePath".to_string(), json!("visual/baseline"));
        settings.compare_screenshot.insert("width".to_string(), json!(900));

        let resolver = ConfigResolver::from_settings(&settings);
        assert_eq!(resolver.provider_names(), vec!["repository", "params", "namespace"]);

        let session = session().with_params(json!({
            "custom": { "compareScreenshot": { "width": 1200 } }
        }));
        let config = resolver.resolve(&session, &CompareOptions::new("foo"));

        assert_eq!(config.get_str("basePath"), Some("visual/baseline"));
        assert_eq!(config.get_u64("width"), Some(1200));
    }

    #[test]
    fn test_extra_provider_beats_session_layers() {
        let mut layer = Map::new();
        layer.insert("width".to_string(), json!(640));

        let resolver = ConfigResolver::default().with_provider(StaticProvider::new("ci", layer));
        let session = session().with_namespace(
            "skyE2E",
            json!({ "visualConfig": { "compareScreenshot": { "width": 1200 } } }),
        );

        let config = resolver.resolve(&session, &CompareOptions::new("foo"));
        assert_eq!(config.get_u64("width"), Some(640));
    }
}
