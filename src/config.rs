//! Runtime settings read from the environment

use anyhow::{Context, Result, anyhow};

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
const DEFAULT_POLL_SCHEDULE: &str = "*/5 * * * * *";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub discord_token: String,
    /// Channel ids whose messages are scanned for list links
    pub watch_channels: Vec<String>,
    pub webdriver_url: String,
    /// Cron expression of the channel poll job
    pub poll_schedule: String,
    /// Fetch current browser user agents at start-up instead of using the built-in ones
    pub refresh_user_agents: bool,
}

impl Settings {
    /// Read settings from the process environment (after `.env` has been loaded)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let discord_token = var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;

        let watch_channels: Vec<String> = var("WATCH_CHANNELS")
            .context("WATCH_CHANNELS must be set")?
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(bad) = watch_channels.iter().find(|id| !id.chars().all(|c| c.is_ascii_digit())) {
            return Err(anyhow!("WATCH_CHANNELS contains an invalid channel id: {}", bad));
        }
        if watch_channels.is_empty() {
            return Err(anyhow!("WATCH_CHANNELS must list at least one channel id"));
        }

        let refresh_user_agents = match var("REFRESH_USER_AGENTS").as_deref() {
            None => true,
            Some("1" | "true" | "yes" | "on") => true,
            Some("0" | "false" | "no" | "off") => false,
            Some(other) => return Err(anyhow!("REFRESH_USER_AGENTS must be a boolean, got {}", other)),
        };

        Ok(Self {
            discord_token,
            watch_channels,
            webdriver_url: var("WEBDRIVER_URL").unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string()),
            poll_schedule: var("POLL_SCHEDULE").unwrap_or_else(|| DEFAULT_POLL_SCHEDULE.to_string()),
            refresh_user_agents,
        })
    }
}
