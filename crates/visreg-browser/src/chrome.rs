//! Automation driver backed by a headless Chrome tab

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::driver::{AutomationDriver, SessionHandle};
use crate::error::{Result, VisregError};
use visreg_core::{Region, Selector};

/// How the browser under test is started
#[derive(Debug, Clone)]
pub struct ChromeConfig {
    pub headless: bool,
    /// Window size; matches the default comparison `width`/`height`
    pub viewport: (u32, u32),
    pub user_agent: Option<String>,
    /// How long `locate` waits for a selector to appear
    pub locate_timeout: Duration,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: (1000, 800),
            user_agent: None,
            locate_timeout: Duration::from_secs(30),
        }
    }
}

impl ChromeConfig {
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = (width, height);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Command-line switches passed to Chrome on top of the launcher's own
    pub fn extra_args(&self) -> Vec<String> {
        // Keep scrollbars out of captured regions
        let mut args = vec!["--hide-scrollbars".to_string()];
        if let Some(user_agent) = &self.user_agent {
            args.push(format!("--user-agent={}", user_agent));
        }
        args
    }
}

/// A Chrome tab bound to one comparison session
///
/// The host picks the [`SessionHandle`], so it decides which comparisons share
/// a comparator and can end that session on the comparer when the browser
/// goes away.
pub struct ChromeDriver {
    // Owns the browser process; the tab dies with it
    _browser: Browser,
    tab: Arc<Tab>,
    session: SessionHandle,
    locate_timeout: Duration,
}

impl ChromeDriver {
    /// Start Chrome and open a tab for `session`
    pub fn launch(config: &ChromeConfig, session: SessionHandle) -> Result<Self> {
        let (width, height) = config.viewport;
        info!(
            "Launching Chrome for {} ({}x{}, headless: {})",
            session.id(),
            width,
            height,
            config.headless
        );

        let extra_args = config.extra_args();
        let args: Vec<&OsStr> = extra_args.iter().map(OsStr::new).collect();
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.viewport))
            .args(args)
            .build()
            .map_err(|e| VisregError::Browser(format!("Invalid launch options: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| VisregError::Browser(format!("Failed to launch Chrome: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| VisregError::Browser(format!("Failed to open tab: {}", e)))?;

        Ok(Self {
            _browser: browser,
            tab,
            session,
            locate_timeout: config.locate_timeout,
        })
    }

    /// Load `url` and wait until navigation settles
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating {} to {}", self.session.id(), url);

        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| VisregError::Browser(format!("Failed to load {}: {}", url, e)))?;
        Ok(())
    }

    /// Session state read by configuration providers
    pub fn session_mut(&mut self) -> &mut SessionHandle {
        &mut self.session
    }
}

#[async_trait]
impl AutomationDriver for ChromeDriver {
    fn session(&self) -> &SessionHandle {
        &self.session
    }

    async fn locate(&self, selector: &Selector) -> Result<Region> {
        let css = match selector {
            Selector::Region(region) => return Ok(*region),
            Selector::Css(css) => css,
        };

        let element = self
            .tab
            .wait_for_element_with_custom_timeout(css, self.locate_timeout)
            .map_err(|_| VisregError::ElementNotFound {
                selector: css.clone(),
            })?;

        let content = element
            .get_box_model()
            .map_err(|e| VisregError::Browser(format!("Failed to measure {}: {}", css, e)))?
            .content_viewport();

        Ok(Region::new(content.x, content.y, content.width, content.height))
    }
}
