use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::discord::{DiscordClient, Reply, ResponseBuilder};
use crate::errors::is_reported;
use crate::models::InboundMessage;
use crate::pipeline::{LinkOutcome, Pipeline};
use crate::scrapers::AdapterRegistry;
use crate::traits::SessionFactory;

/// Cursor for a channel that had no messages when it was first seen
const BEGINNING: &str = "0";

#[derive(Clone)]
pub struct ListWatcher {
    discord: DiscordClient,
    pipeline: Pipeline,
    sessions: Arc<dyn SessionFactory>,
    channels: Vec<String>,
    bot_id: String,
    /// Newest message id handled per channel
    cursors: Arc<Mutex<HashMap<String, String>>>,
}

impl ListWatcher {
    pub async fn new(
        discord: DiscordClient,
        pipeline: Pipeline,
        sessions: Arc<dyn SessionFactory>,
        channels: Vec<String>,
    ) -> Result<Self> {
        let bot = discord.current_user().await?;
        info!("Watching {} channel(s) as user {}", channels.len(), bot.id);

        Ok(Self {
            discord,
            pipeline,
            sessions,
            channels,
            bot_id: bot.id,
            cursors: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Start every channel at its newest message so history is not replayed
    pub async fn prime(&self) -> Result<()> {
        let mut cursors = self.cursors.lock().await;
        for channel in &self.channels {
            let cursor = self.newest_message(channel).await?;
            cursors.insert(channel.clone(), cursor);
        }
        Ok(())
    }

    async fn newest_message(&self, channel: &str) -> Result<String> {
        let newest = self.discord.channel_messages(channel, None).await?;
        Ok(match newest.into_iter().next() {
            Some(message) => message.id,
            None => BEGINNING.to_string(),
        })
    }

    pub async fn check_for_new_messages(&self) -> Result<()> {
        let mut cursors = self.cursors.lock().await;
        let mut handled = 0;

        for channel in &self.channels {
            let Some(after) = cursors.get(channel).cloned() else {
                // priming failed for this channel earlier
                match self.newest_message(channel).await {
                    Ok(cursor) => {
                        cursors.insert(channel.clone(), cursor);
                    }
                    Err(e) => warn!("Could not read channel {}: {}", channel, e),
                }
                continue;
            };

            let messages = match self.discord.channel_messages(channel, Some(&after)).await {
                Ok(messages) => oldest_first(messages),
                Err(e) => {
                    warn!("Could not read channel {}: {}", channel, e);
                    continue;
                }
            };

            if let Some(last) = messages.last() {
                cursors.insert(channel.clone(), last.id.clone());
            }

            for message in messages {
                if !is_candidate(&message, &self.bot_id, &self.pipeline) {
                    continue;
                }

                info!("Handling message {} in channel {}", message.id, message.channel_id);
                handled += 1;
                let watcher = self.clone();
                tokio::spawn(async move {
                    if let Err(e) = watcher.handle(message).await {
                        error!("Error handling message: {}", e);
                    }
                });
            }
        }

        if handled > 0 {
            info!("Dispatched {} message(s) with list links", handled);
        } else {
            debug!("No new list links");
        }

        Ok(())
    }

    async fn handle(&self, message: InboundMessage) -> Result<()> {
        let outcomes = self
            .pipeline
            .run(&message.content, self.sessions.as_ref())
            .await?;

        for reply in replies(&outcomes, &message.sender(), self.pipeline.registry()) {
            if let Err(e) = self.discord.send(&message.channel_id, reply).await {
                error!("Error sending reply to {}: {}", message.channel_id, e);
            }
        }

        Ok(())
    }
}

/// Messages from people (not this bot, not other bots) that mention a provider
fn is_candidate(message: &InboundMessage, bot_id: &str, pipeline: &Pipeline) -> bool {
    !message.author.bot && message.author.id != bot_id && pipeline.wants(&message.content)
}

/// The API returns newest first; snowflakes grow with time
fn oldest_first(mut messages: Vec<InboundMessage>) -> Vec<InboundMessage> {
    messages.sort_by_key(|m| m.id.parse::<u64>().unwrap_or_default());
    messages
}

/// One reply per listed or reported link, in message order
fn replies(outcomes: &[LinkOutcome], sender: &str, registry: &AdapterRegistry) -> Vec<Reply> {
    let builder = ResponseBuilder::new(sender);

    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            LinkOutcome::Listed(result) => {
                let adapter = registry.get(result.link.provider)?;
                Some(builder.list(result, adapter.config()))
            }
            LinkOutcome::Failed(failure) if is_reported(failure.kind) => {
                let adapter = registry.get(failure.provider)?;
                Some(builder.failure(failure, adapter.config()))
            }
            LinkOutcome::Failed(failure) => {
                debug!("Not reporting {:?} {} link", failure.kind, failure.provider);
                None
            }
            LinkOutcome::Aborted(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalLink, DiscordUser, FailureKind, FailureResult, ListResult, ProviderId};

    fn message(id: &str, author: &str, bot: bool, content: &str) -> InboundMessage {
        InboundMessage {
            id: id.to_string(),
            channel_id: "100".to_string(),
            content: content.to_string(),
            author: DiscordUser {
                id: author.to_string(),
                bot,
            },
        }
    }

    fn link() -> CanonicalLink {
        CanonicalLink {
            url: "https://pcpartpicker.com/list/AbCdEf".to_string(),
            provider: ProviderId::PcPartPicker,
            site: "PCPartPicker",
            region: Some("us".to_string()),
        }
    }

    #[test]
    fn test_candidate_messages() {
        let pipeline = Pipeline::new(Arc::new(AdapterRegistry::default()));
        let link = "https://pcpartpicker.com/list/AbCdEf";

        assert!(is_candidate(&message("1", "7", false, link), "9", &pipeline));
        assert!(!is_candidate(&message("1", "9", false, link), "9", &pipeline));
        assert!(!is_candidate(&message("1", "8", true, link), "9", &pipeline));
        assert!(!is_candidate(&message("1", "7", false, "hello there"), "9", &pipeline));
    }

    #[test]
    fn test_messages_sorted_oldest_first() {
        let sorted = oldest_first(vec![
            message("1100000000000000002", "7", false, ""),
            message("999999999999999999", "7", false, ""),
            message("1100000000000000001", "7", false, ""),
        ]);
        let ids: Vec<&str> = sorted.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["999999999999999999", "1100000000000000001", "1100000000000000002"]);
    }

    #[test]
    fn test_replies_skip_silent_outcomes() {
        let registry = AdapterRegistry::default();
        let listed = ListResult {
            link: link(),
            title: None,
            parts: Vec::new(),
            body: String::new(),
            total: "N/A".to_string(),
            wattage: None,
            compat: None,
            truncated: false,
            omitted: 0,
        };
        let outcomes = vec![
            LinkOutcome::Failed(FailureResult::new(
                FailureKind::Malformed,
                ProviderId::PcPartPicker,
                Some("https://pcpartpicker.com/list/Ab".to_string()),
            )),
            LinkOutcome::Listed(listed),
            LinkOutcome::Aborted(link()),
            LinkOutcome::Failed(FailureResult::new(FailureKind::Empty, ProviderId::PcPartPicker, None)),
        ];

        let replies = replies(&outcomes, "<@7>", &registry);
        assert_eq!(replies.len(), 2);
        assert!(replies[0].message.embeds[0].title.starts_with("PCPartPicker :flag_us:"));
        assert_eq!(replies[1].message.embeds[0].title, "PCPartIgnorer");
        assert_eq!(replies[1].attachment, Some("assets/empty_list.jpeg"));
    }
}
