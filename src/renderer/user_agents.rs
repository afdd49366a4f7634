//! Browser user agents rotated across sessions
//!
//! The pool starts from a set of known desktop agents and can be refreshed
//! once at startup from useragents.me, taking the first listed agent of each
//! browser (later rows tend to be ESR or legacy builds).

use anyhow::Result;
use rand::seq::SliceRandom;
use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

const SOURCE_URL: &str = "https://www.useragents.me/";

pub const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";
pub const FIREFOX_WIN: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:136.0) Gecko/20100101 Firefox/136.0";
pub const SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_7_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.3 Safari/605.1.15";
pub const EDGE_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36 Edg/134.0.3124.95";

/// Desktop user agents, one per browser family
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    chrome: String,
    firefox: String,
    safari: String,
    edge: String,
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self {
            chrome: CHROME_WIN.to_string(),
            firefox: FIREFOX_WIN.to_string(),
            safari: SAFARI_MAC.to_string(),
            edge: EDGE_WIN.to_string(),
        }
    }
}

impl UserAgentPool {
    /// Refresh the pool from useragents.me, keeping the built-in agents on failure
    pub async fn resolve(client: &reqwest::Client) -> Self {
        match Self::fetch(client).await {
            Ok(pool) => {
                info!("Refreshed user agents from {}", SOURCE_URL);
                pool
            }
            Err(e) => {
                warn!("Could not refresh user agents, using built-in set: {}", e);
                Self::default()
            }
        }
    }

    async fn fetch(client: &reqwest::Client) -> Result<Self> {
        let html = client
            .get(SOURCE_URL)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(Self::from_html(&html))
    }

    /// Read the latest agents out of the useragents.me tables.
    ///
    /// Browsers missing from the page keep their built-in agent.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut pool = Self::default();

        let Ok(containers) = Selector::parse("div.container") else {
            return pool;
        };
        let windows = Selector::parse("h2#latest-windows-desktop-useragents").ok();
        let mac = Selector::parse("h2#latest-mac-desktop-useragents").ok();

        for section in document.select(&containers) {
            let has = |selector: &Option<Selector>| {
                selector
                    .as_ref()
                    .is_some_and(|s| section.select(s).next().is_some())
            };

            if has(&windows) {
                if let Some(agent) = first_agent(section, "Chrome") {
                    pool.chrome = agent;
                }
                if let Some(agent) = first_agent(section, "Firefox") {
                    pool.firefox = agent;
                }
                if let Some(agent) = first_agent(section, "Edge") {
                    pool.edge = agent;
                }
            }
            if has(&mac)
                && let Some(agent) = first_agent(section, "Safari")
            {
                pool.safari = agent;
            }
        }

        pool
    }

    pub fn agents(&self) -> [&str; 4] {
        [&self.chrome, &self.firefox, &self.safari, &self.edge]
    }

    /// A random agent for a new session
    pub fn pick(&self) -> &str {
        self.agents()
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(CHROME_WIN)
    }
}

/// Agent from the first table row whose label mentions the browser
fn first_agent(section: ElementRef<'_>, browser: &str) -> Option<String> {
    let rows = Selector::parse("tbody tr").ok()?;
    let label = Selector::parse("td").ok()?;
    let agent = Selector::parse("textarea").ok()?;

    section
        .select(&rows)
        .find(|row| {
            row.select(&label)
                .next()
                .is_some_and(|td| td.text().collect::<String>().contains(browser))
        })
        .and_then(|row| row.select(&agent).next())
        .map(|textarea| textarea.text().collect::<String>().trim().to_string())
        .filter(|a| !a.is_empty())
}
