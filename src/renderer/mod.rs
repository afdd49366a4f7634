//! WebDriver backed page rendering
//!
//! One browser session is opened per handled message and reused for every
//! link in it. The session runs the provider's interaction steps (cookie
//! banner, lazy rows, translation) before handing back the page source.

pub mod user_agents;

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::models::RenderedDocument;
use crate::traits::{PageRenderer, RenderHints, SessionFactory};

pub use user_agents::UserAgentPool;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Opens headless Chrome sessions on a WebDriver server
pub struct WebDriverSessions {
    webdriver_url: String,
    user_agents: UserAgentPool,
    /// Page languages translated to English by the browser
    translate_from: Vec<&'static str>,
}

impl WebDriverSessions {
    pub fn new(
        webdriver_url: impl Into<String>,
        user_agents: UserAgentPool,
        translate_from: Vec<&'static str>,
    ) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            user_agents,
            translate_from,
        }
    }

    fn capabilities(&self) -> Map<String, Value> {
        let whitelist: Map<String, Value> = self
            .translate_from
            .iter()
            .map(|lang| ((*lang).to_string(), Value::from("en")))
            .collect();

        let mut caps = Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": [
                    "--headless",
                    "--window-size=1920x1032",
                    "--no-sandbox",
                    "--disable-blink-features=AutomationControlled",
                    "--disable-gpu",
                    "--disable-extensions",
                    "--dns-prefetch-disable",
                    format!("--user-agent={}", self.user_agents.pick()),
                ],
                "excludeSwitches": ["enable-automation"],
                "useAutomationExtension": false,
                "prefs": {
                    "translate_whitelists": whitelist,
                    "translate": { "enabled": true },
                },
            }),
        );
        caps
    }
}

#[async_trait]
impl SessionFactory for WebDriverSessions {
    async fn open(&self) -> Result<Box<dyn PageRenderer>> {
        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| anyhow!("Failed to connect to WebDriver at {}: {}", self.webdriver_url, e))?;

        // not advertising automation keeps the stricter providers from rate limiting us
        if let Err(e) = client
            .execute(
                "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})",
                vec![],
            )
            .await
        {
            debug!("Could not hide webdriver flag: {}", e);
        }

        info!("Opened browser session on {}", self.webdriver_url);
        Ok(Box::new(WebDriverRenderer {
            client: Some(client),
        }))
    }
}

/// A single browser session
pub struct WebDriverRenderer {
    client: Option<Client>,
}

impl WebDriverRenderer {
    async fn scroll_into_view(client: &Client, element: &fantoccini::elements::Element) {
        let Ok(arg) = serde_json::to_value(element) else {
            return;
        };
        if let Err(e) = client
            .execute("arguments[0].scrollIntoView();", vec![arg])
            .await
        {
            debug!("Could not scroll element into view: {}", e);
        }
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&mut self, url: &str, hints: &RenderHints) -> Result<RenderedDocument> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| anyhow!("Browser session already closed"))?;

        debug!("Rendering {}", url);
        client.goto(url).await?;

        if let Some(selector) = hints.consent {
            match client.find(Locator::Css(selector)).await {
                Ok(button) => {
                    if let Err(e) = button.click().await {
                        debug!("Cookie banner on {} not clickable: {}", url, e);
                    }
                }
                Err(_) => debug!("No cookie banner on {}", url),
            }
        }

        if let Some(selector) = hints.wait_for
            && let Err(e) = client
                .wait()
                .at_most(hints.wait_timeout)
                .every(POLL_INTERVAL)
                .for_element(Locator::Css(selector))
                .await
        {
            warn!(
                "{} not ready after {:?} ({}), parsing what is there",
                url, hints.wait_timeout, e
            );
        }

        if let Some(selector) = hints.reveal {
            for element in client.find_all(Locator::Css(selector)).await.unwrap_or_default() {
                Self::scroll_into_view(client, &element).await;
            }
        }

        if let Some(selector) = hints.click {
            for element in client.find_all(Locator::Css(selector)).await.unwrap_or_default() {
                Self::scroll_into_view(client, &element).await;
                // rows without anything to expand are not clickable
                if let Err(e) = element.click().await {
                    debug!("Skipping unclickable element on {}: {}", url, e);
                }
            }
        }

        if !hints.settle.is_zero() {
            tokio::time::sleep(hints.settle).await;
        }

        let html = client.source().await?;
        let final_url = client.current_url().await?.to_string();

        Ok(RenderedDocument {
            url: final_url,
            html,
        })
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.close().await?;
            debug!("Closed browser session");
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory renderer used by the unit tests

    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Serves canned pages; unknown URLs fail like a broken session would
    #[derive(Default, Clone)]
    pub struct FakeRenderer {
        pages: HashMap<String, RenderedDocument>,
        pub rendered: Vec<String>,
        closed: Arc<AtomicUsize>,
    }

    impl FakeRenderer {
        pub fn with_page(self, url: &str, html: &str) -> Self {
            self.with_redirect(url, url, html)
        }

        pub fn with_redirect(mut self, url: &str, final_url: &str, html: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                RenderedDocument {
                    url: final_url.to_string(),
                    html: html.to_string(),
                },
            );
            self
        }
    }

    #[async_trait]
    impl PageRenderer for FakeRenderer {
        async fn render(&mut self, url: &str, _hints: &RenderHints) -> Result<RenderedDocument> {
            self.rendered.push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow!("no page for {url}"))
        }

        async fn close(&mut self) -> Result<()> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Hands out clones of one fake renderer and counts sessions
    #[derive(Default, Clone)]
    pub struct FakeSessions {
        pub renderer: FakeRenderer,
        pub opened: Arc<AtomicUsize>,
    }

    impl FakeSessions {
        pub fn new(renderer: FakeRenderer) -> Self {
            Self {
                renderer,
                opened: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn closed(&self) -> usize {
            self.renderer.closed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionFactory for FakeSessions {
        async fn open(&self) -> Result<Box<dyn PageRenderer>> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(self.renderer.clone()))
        }
    }
}
