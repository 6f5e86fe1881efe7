//! Core type definitions for visual comparisons

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Key under which the baseline name travels in options and merged configuration
pub const SCREENSHOT_NAME_KEY: &str = "screenshotName";

/// Browser session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", &self.0.to_string()[..8])
    }
}

/// A drawable area of the page, in CSS pixels relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if the region covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// What to compare: a CSS selector, or a region that is already resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Css(String),
    Region(Region),
}

impl From<&str> for Selector {
    fn from(css: &str) -> Self {
        Self::Css(css.to_string())
    }
}

impl From<String> for Selector {
    fn from(css: String) -> Self {
        Self::Css(css)
    }
}

impl From<Region> for Selector {
    fn from(region: Region) -> Self {
        Self::Region(region)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(css) => write!(f, "{}", css),
            Self::Region(r) => write!(f, "region({}, {}, {}x{})", r.x, r.y, r.width, r.height),
        }
    }
}

/// Raw result of a region check from the diffing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Engine status code; negative values signal a difference
    pub code: i32,
    /// Number of differing pixels
    pub differences: u64,
    /// Total number of pixels compared
    pub dimension: u64,
}

impl DiffReport {
    pub fn new(code: i32, differences: u64, dimension: u64) -> Self {
        Self {
            code,
            differences,
            dimension,
        }
    }

    /// Identical report for a region of `dimension` pixels
    pub fn identical(dimension: u64) -> Self {
        Self::new(0, 0, dimension)
    }

    pub fn is_match(&self) -> bool {
        self.code >= 0 && self.differences == 0
    }

    /// Percentage of differing pixels rounded to hundredths, half away from
    /// zero; `None` when nothing was compared
    pub fn mismatch_percent(&self) -> Option<f64> {
        if self.dimension == 0 {
            return None;
        }
        let percent = self.differences as f64 / self.dimension as f64 * 100.0;
        Some((percent * 100.0).round() / 100.0)
    }
}

/// Per-call comparison options
///
/// Only the screenshot name is understood here. Every other field is passed to
/// the diffing engine untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CompareOptions {
    pub fn new(screenshot_name: impl Into<String>) -> Self {
        Self {
            screenshot_name: Some(screenshot_name.into()),
            extra: Map::new(),
        }
    }

    /// Options without a baseline name (always rejected by the comparer)
    pub fn unnamed() -> Self {
        Self::default()
    }

    /// Set an engine-specific field
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The baseline name, if one was given and it is not empty
    pub fn screenshot_name(&self) -> Option<&str> {
        self.screenshot_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// The options as a configuration layer
    pub fn to_layer(&self) -> Map<String, Value> {
        let mut layer = self.extra.clone();
        if let Some(name) = &self.screenshot_name {
            layer.insert(SCREENSHOT_NAME_KEY.to_string(), Value::String(name.clone()));
        }
        layer
    }
}

/// Merged configuration handed verbatim to the diffing engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompareConfig(Map<String, Value>);

impl CompareConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in defaults, the lowest configuration layer
    pub fn defaults() -> Self {
        let mut map = Map::new();
        map.insert("basePath".into(), "screenshots-baseline".into());
        map.insert("diffPath".into(), "screenshots-diff".into());
        map.insert("createdPath".into(), "screenshots-created".into());
        map.insert("createdPathDiff".into(), "screenshots-created-diff".into());
        map.insert("baseline".into(), true.into());
        map.insert("width".into(), 1000.into());
        map.insert("height".into(), 800.into());
        Self(map)
    }

    /// Shallow merge: every field of `layer` overwrites the same field here
    pub fn merge(&mut self, layer: &Map<String, Value>) {
        for (key, value) in layer {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn screenshot_name(&self) -> Option<&str> {
        self.get_str(SCREENSHOT_NAME_KEY)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for CompareConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
