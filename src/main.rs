use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod aggregate;
mod config;
mod discord;
mod errors;
mod format;
mod links;
mod list_watcher;
mod models;
mod pipeline;
mod renderer;
mod scrapers;
mod traits;

use config::Settings;
use discord::DiscordClient;
use list_watcher::ListWatcher;
use pipeline::Pipeline;
use renderer::{UserAgentPool, WebDriverSessions};
use scrapers::AdapterRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting part list bot");

    let settings = Settings::from_env()?;

    let user_agents = if settings.refresh_user_agents {
        UserAgentPool::resolve(&reqwest::Client::new()).await
    } else {
        UserAgentPool::default()
    };

    let registry = Arc::new(AdapterRegistry::default());
    let sessions = Arc::new(WebDriverSessions::new(
        settings.webdriver_url.clone(),
        user_agents,
        registry.translate_languages(),
    ));
    let pipeline = Pipeline::new(registry);
    let discord = DiscordClient::new(settings.discord_token.clone());

    let watcher = ListWatcher::new(discord, pipeline, sessions, settings.watch_channels.clone()).await?;
    if let Err(e) = watcher.prime().await {
        error!("Error reading newest channel messages: {}", e);
    }

    let sched = JobScheduler::new().await?;

    let job_watcher = watcher.clone();
    sched
        .add(Job::new_async(settings.poll_schedule.as_str(), move |_uuid, _l| {
            let watcher = job_watcher.clone();
            Box::pin(async move {
                if let Err(e) = watcher.check_for_new_messages().await {
                    error!("Error polling channels: {}", e);
                }
            })
        })?)
        .await?;

    info!("Scheduler started - polling with '{}'", settings.poll_schedule);
    sched.start().await?;

    // Keep the program running
    loop {
        tokio::time::sleep(tokio::time::Duration::from_secs(30)).await;
    }
}
