//! Automation driver abstraction
//!
//! The comparer never talks to a browser directly. It reads session-scoped
//! configuration from a [`SessionHandle`] and resolves selectors through an
//! [`AutomationDriver`].

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{Result, VisregError};
use visreg_core::{Region, Selector, SessionId};

/// Current browser session as seen by the comparer
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    id: SessionId,
    /// Global test-run parameters
    params: Map<String, Value>,
    /// Consumer-owned namespaces attached to the session
    namespaces: HashMap<String, Value>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: SessionId) -> Self {
        self.id = id;
        self
    }

    /// Replace the global parameters; anything but a JSON object clears them
    pub fn with_params(mut self, params: Value) -> Self {
        self.set_params(params);
        self
    }

    pub fn with_namespace(mut self, name: impl Into<String>, value: Value) -> Self {
        self.namespaces.insert(name.into(), value);
        self
    }

    pub fn set_params(&mut self, params: Value) {
        self.params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
    }

    pub fn set_namespace(&mut self, name: impl Into<String>, value: Value) {
        self.namespaces.insert(name.into(), value);
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn namespace(&self, name: &str) -> Option<&Value> {
        self.namespaces.get(name)
    }
}

/// Trait for browser automation drivers (allows mocking in tests)
#[async_trait]
pub trait AutomationDriver: Send + Sync {
    /// The session comparisons run against
    fn session(&self) -> &SessionHandle;

    /// Resolve a selector to a concrete, drawable region
    async fn locate(&self, selector: &Selector) -> Result<Region>;
}

/// Mock driver for testing
///
/// Every CSS selector resolves to the viewport unless it was given its own
/// region or marked missing.
#[derive(Debug, Clone)]
pub struct MockDriver {
    session: SessionHandle,
    viewport: Region,
    regions: HashMap<String, Region>,
    missing: Vec<String>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            session: SessionHandle::new(),
            viewport: Region::new(0.0, 0.0, 1000.0, 800.0),
            regions: HashMap::new(),
            missing: Vec::new(),
        }
    }

    pub fn with_session(mut self, session: SessionHandle) -> Self {
        self.session = session;
        self
    }

    pub fn with_region(mut self, selector: &str, region: Region) -> Self {
        self.regions.insert(selector.to_string(), region);
        self
    }

    pub fn without_element(mut self, selector: &str) -> Self {
        self.missing.push(selector.to_string());
        self
    }

    pub fn session_mut(&mut self) -> &mut SessionHandle {
        &mut self.session
    }
}

#[async_trait]
impl AutomationDriver for MockDriver {
    fn session(&self) -> &SessionHandle {
        &self.session
    }

    async fn locate(&self, selector: &Selector) -> Result<Region> {
        match selector {
            Selector::Region(region) => Ok(*region),
            Selector::Css(css) if self.missing.iter().any(|m| m == css) => {
                Err(VisregError::ElementNotFound {
                    selector: css.clone(),
                })
            }
            Selector::Css(css) => Ok(self.regions.get(css).copied().unwrap_or(self.viewport)),
        }
    }
}
