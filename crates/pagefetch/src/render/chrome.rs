use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::LoaderId;
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, FrameId, NavigateParams, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::BrowserSettings;
use crate::error::FetchError;

use super::{RenderSession, RenderedContent, RenderingClient};

/// Lifecycle event name Chromium emits once no requests are in flight.
const NETWORK_IDLE: &str = "networkIdle";

/// Launches a local Chromium through the DevTools protocol.
#[derive(Debug, Clone)]
pub struct ChromeClient {
    settings: BrowserSettings,
}

impl ChromeClient {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> Result<BrowserConfig, FetchError> {
        let mut builder =
            BrowserConfig::builder().request_timeout(self.settings.request_timeout());

        if self.settings.no_sandbox {
            builder = builder.no_sandbox().arg("--disable-setuid-sandbox");
        }
        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(ref path) = self.settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(FetchError::SessionUnavailable)
    }

    async fn prepare_page(&self, browser: &Browser) -> Result<Page, CdpError> {
        let page = browser.new_page("about:blank").await?;
        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await?;
        page.set_user_agent(SetUserAgentOverrideParams::new(
            self.settings.user_agent.clone(),
        ))
        .await?;
        Ok(page)
    }
}

#[async_trait]
impl RenderingClient for ChromeClient {
    async fn open(&self) -> Result<Box<dyn RenderSession>, FetchError> {
        let config = self.browser_config()?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::SessionUnavailable(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {}", e);
                }
            }
        });

        let page = match self.prepare_page(&browser).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(FetchError::SessionUnavailable(e.to_string()));
            }
        };

        info!("Rendering session opened");
        Ok(Box::new(ChromeSession {
            browser,
            page,
            handler,
            settings: self.settings.clone(),
            closed: false,
        }))
    }
}

/// One browser with a single reusable tab.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    settings: BrowserSettings,
    closed: bool,
}

impl ChromeSession {
    /// Navigates and waits for network idle of the document the navigation
    /// committed. Same-document navigations load nothing and return at once.
    async fn navigate(&self, url: &str) -> Result<(), FetchError> {
        let mut lifecycle = self
            .page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(|e| FetchError::Client {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let returns = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| match e {
                CdpError::Timeout => FetchError::Timeout {
                    url: url.to_string(),
                    timeout: self.settings.navigation_timeout(),
                },
                other => FetchError::Navigation {
                    url: url.to_string(),
                    reason: other.to_string(),
                },
            })?
            .result;

        let watch = match Commit::from_navigation(returns.loader_id, returns.error_text) {
            Ok(Commit::NewDocument(loader_id)) => IdleWatch {
                frame_id: returns.frame_id,
                loader_id,
            },
            Ok(Commit::SameDocument) => {
                debug!("Same-document navigation to {}", url);
                return Ok(());
            }
            Err(reason) => {
                return Err(FetchError::Navigation {
                    url: url.to_string(),
                    reason,
                })
            }
        };

        while let Some(event) = lifecycle.next().await {
            if watch.is_idle(&event.frame_id, &event.loader_id, &event.name) {
                return Ok(());
            }
        }
        debug!("Lifecycle stream ended before network idle for {}", url);
        Ok(())
    }
}

/// What a committed `Page.navigate` left to wait for.
#[derive(Debug, Clone, PartialEq)]
enum Commit {
    /// Fragment or history change inside the current document.
    SameDocument,
    NewDocument(LoaderId),
}

impl Commit {
    fn from_navigation(
        loader_id: Option<LoaderId>,
        error_text: Option<String>,
    ) -> Result<Self, String> {
        if let Some(text) = error_text.filter(|t| !t.is_empty()) {
            return Err(text);
        }
        Ok(loader_id.map_or(Commit::SameDocument, Commit::NewDocument))
    }
}

/// Matches `networkIdle` of one document. Events of an abandoned earlier
/// document carry another loader id and are skipped.
#[derive(Debug, Clone)]
struct IdleWatch {
    frame_id: FrameId,
    loader_id: LoaderId,
}

impl IdleWatch {
    fn is_idle(&self, frame_id: &FrameId, loader_id: &LoaderId, name: &str) -> bool {
        name == NETWORK_IDLE && *frame_id == self.frame_id && *loader_id == self.loader_id
    }
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn render(&self, url: &str) -> Result<RenderedContent, FetchError> {
        url::Url::parse(url).map_err(|e| FetchError::Client {
            url: url.to_string(),
            reason: format!("invalid URL: {}", e),
        })?;

        let timeout = self.settings.navigation_timeout();
        match tokio::time::timeout(timeout, self.navigate(url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                    timeout,
                })
            }
        }

        settle(self.settings.settle_delay()).await;

        let html = self.page.content().await.map_err(|e| FetchError::Client {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(RenderedContent {
            url: url.to_string(),
            html,
        })
    }

    async fn close(&mut self) -> Result<(), FetchError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();

        result
            .map(|_| info!("Rendering session closed"))
            .map_err(|e| FetchError::SessionUnavailable(e.to_string()))
    }
}

async fn settle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
