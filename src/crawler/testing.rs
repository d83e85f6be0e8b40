//! Scripted renderer used by the traversal tests

use crate::config::{build_config, Config, FileSettings, Overrides, ProxyConfig};
use crate::render::{Launcher, RenderError, RenderedPage, Renderer};
use crate::url::normalize;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use url::Url;

/// Config for `https://x.dev/docs` with no delays and no length minimum
pub fn create_test_config(output: &Path) -> Config {
    let overrides = Overrides {
        delay_ms: Some(0),
        settle_ms: Some(0),
        ..Overrides::default()
    };
    let mut config =
        build_config("https://x.dev/docs", output, FileSettings::default(), overrides).unwrap();
    config.crawl.min_content_length = 0;
    config
}

/// A page whose sidebar links to every href in `links`
pub fn page_with_links(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        r#"<html><body><nav class="sidebar">{}</nav><main><h1>Title</h1><p>Body text.</p></main></body></html>"#,
        anchors
    )
}

#[derive(Debug, Clone)]
struct MockPage {
    html: String,
    failures: u32,
}

/// Pages served by the mock renderer, keyed by normalized URL
#[derive(Debug, Clone, Default)]
pub struct MockSite {
    pages: HashMap<String, MockPage>,
    crash_after: Option<String>,
}

impl MockSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(key(url), MockPage { html, failures: 0 });
        self
    }

    /// A page that times out `failures` times before it loads
    pub fn flaky_page(mut self, url: &str, html: String, failures: u32) -> Self {
        self.pages.insert(key(url), MockPage { html, failures });
        self
    }

    /// Reports a crash once `url` has been loaded
    pub fn crash_after(mut self, url: &str) -> Self {
        self.crash_after = Some(key(url));
        self
    }
}

fn key(raw: &str) -> String {
    normalize(raw).unwrap().as_str().to_string()
}

#[derive(Debug, Default)]
struct Log {
    launches: Vec<bool>,
    closes: usize,
    navigations: Vec<String>,
    clicks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TunnelMode {
    Never,
    WhenProxied,
    Always,
}

/// Launches scripted renderers and records what they were asked to do
pub struct MockLauncher {
    site: MockSite,
    tunnel: TunnelMode,
    log: Arc<Mutex<Log>>,
}

impl MockLauncher {
    pub fn new(site: MockSite) -> Self {
        Self {
            site,
            tunnel: TunnelMode::Never,
            log: Arc::new(Mutex::new(Log::default())),
        }
    }

    /// Every load through a proxied session fails with a tunnel error
    pub fn tunnel_when_proxied(mut self) -> Self {
        self.tunnel = TunnelMode::WhenProxied;
        self
    }

    /// Every load fails with a tunnel error
    pub fn tunnel_always(mut self) -> Self {
        self.tunnel = TunnelMode::Always;
        self
    }

    /// Opens a renderer directly, outside of a launch
    pub fn renderer(&self) -> MockRenderer {
        MockRenderer {
            site: self.site.clone(),
            tunnel: self.tunnel == TunnelMode::Always,
            log: Arc::clone(&self.log),
            attempts: HashMap::new(),
            crash: None,
        }
    }

    /// Proxy flag of every launch, in order
    pub fn launches(&self) -> Vec<bool> {
        self.log.lock().unwrap().launches.clone()
    }

    pub fn closes(&self) -> usize {
        self.log.lock().unwrap().closes
    }

    pub fn navigations(&self) -> Vec<String> {
        self.log.lock().unwrap().navigations.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.log.lock().unwrap().clicks.clone()
    }
}

#[async_trait]
impl Launcher for MockLauncher {
    async fn launch(&self, proxy: Option<&ProxyConfig>) -> Result<Box<dyn Renderer>, RenderError> {
        self.log.lock().unwrap().launches.push(proxy.is_some());

        let mut renderer = self.renderer();
        renderer.tunnel = match self.tunnel {
            TunnelMode::Never => false,
            TunnelMode::WhenProxied => proxy.is_some(),
            TunnelMode::Always => true,
        };
        Ok(Box::new(renderer))
    }
}

pub struct MockRenderer {
    site: MockSite,
    tunnel: bool,
    log: Arc<Mutex<Log>>,
    attempts: HashMap<String, u32>,
    crash: Option<String>,
}

impl MockRenderer {
    fn load(&mut self, target: &Url) -> Result<RenderedPage, RenderError> {
        if self.tunnel {
            return Err(RenderError::Navigation(
                "net::ERR_TUNNEL_CONNECTION_FAILED".to_string(),
            ));
        }

        let key = key(target.as_str());
        let Some(page) = self.site.pages.get(&key) else {
            return Err(RenderError::Status {
                status: 404,
                url: target.to_string(),
            });
        };

        let attempts = self.attempts.entry(key.clone()).or_insert(0);
        *attempts += 1;
        if *attempts <= page.failures {
            return Err(RenderError::Timeout(format!("{} timed out", target)));
        }

        if self.site.crash_after.as_deref() == Some(key.as_str()) {
            self.crash = Some("renderer process gone".to_string());
        }

        Ok(RenderedPage {
            url: target.clone(),
            html: page.html.clone(),
        })
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn navigate(&mut self, target: &Url) -> Result<RenderedPage, RenderError> {
        self.log.lock().unwrap().navigations.push(key(target.as_str()));
        self.load(target)
    }

    async fn click(&mut self, target: &Url) -> Result<RenderedPage, RenderError> {
        self.log.lock().unwrap().clicks.push(key(target.as_str()));
        self.load(target)
    }

    async fn wait_for_selector(
        &mut self,
        _page: &RenderedPage,
        _selector: &str,
    ) -> Result<(), RenderError> {
        Ok(())
    }

    fn take_crash(&mut self) -> Option<String> {
        self.crash.take()
    }

    async fn close(&mut self) {
        self.log.lock().unwrap().closes += 1;
    }
}
