//! # Discord REST Integration
//!
//! This module talks to the Discord HTTP API on behalf of the bot user. It reads
//! new messages from the watched channels and posts the part list embeds (or
//! failure notices) back into the channel the link was sent in.
//!
//! ## Features
//!
//! - **Channel polling**: Fetches messages newer than a per-channel cursor
//! - **Rich Embeds**: Posts embeds with fields, colours and an "Open List" button
//! - **Attachments**: Uploads a static illustrative image alongside a notice
//! - **Graceful Degradation**: A missing asset downgrades to a text-only notice
//!
//! ## Rate Limits
//!
//! Discord allows 50 requests per second per bot and answers `429` beyond that.
//! Rejected posts are logged with their status and dropped; the next poll
//! carries on from the cursor.
//!
//! ## Environment Configuration
//!
//! The bot token comes from `DISCORD_TOKEN`, see [`crate::config::Settings`].

pub mod response;

use std::path::Path;

use anyhow::{Result, anyhow};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, error, info, warn};

use crate::models::{DiscordMessage, DiscordUser, InboundMessage};

pub use response::{Reply, ResponseBuilder};

const API_BASE: &str = "https://discord.com/api/v10";

/// Page size used when catching up on a channel
const FETCH_LIMIT: u8 = 50;

/// Discord bot client for reading channels and posting replies.
///
/// ## Fields
///
/// - `client`: Reusable HTTP client shared by every request
/// - `token`: Bot token sent in the `Authorization` header
/// - `api_base`: Versioned REST endpoint root
///
/// ## Thread Safety
///
/// This struct is `Clone` and is shared by the poll job and every message task.
/// The underlying `reqwest::Client` is designed for concurrent use.
#[derive(Clone)]
pub struct DiscordClient {
    client: Client,
    token: String,
    api_base: String,
}

impl DiscordClient {
    /// Creates a client authenticated as the bot user owning `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: API_BASE.to_string(),
        }
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Looks up the user the token belongs to.
    ///
    /// The id is used to skip the bot's own replies while polling.
    pub async fn current_user(&self) -> Result<DiscordUser> {
        let response = self
            .client
            .get(self.url("/users/@me"))
            .header("Authorization", self.authorization())
            .send()
            .await?;

        let response = checked(response, "fetch bot user").await?;
        Ok(response.json::<DiscordUser>().await?)
    }

    /// Fetches messages of a channel, newest first.
    ///
    /// ## Parameters
    ///
    /// - `channel_id`: Channel snowflake
    /// - `after`: Only return messages newer than this message id. Without a
    ///   cursor only the newest message is returned, which is enough to start
    ///   watching a channel without replaying its history.
    pub async fn channel_messages(&self, channel_id: &str, after: Option<&str>) -> Result<Vec<InboundMessage>> {
        let query: Vec<(&str, String)> = match after {
            Some(id) => vec![("after", id.to_string()), ("limit", FETCH_LIMIT.to_string())],
            None => vec![("limit", "1".to_string())],
        };

        let response = self
            .client
            .get(self.url(&format!("/channels/{channel_id}/messages")))
            .header("Authorization", self.authorization())
            .query(&query)
            .send()
            .await?;

        let response = checked(response, "fetch channel messages").await?;
        let messages = response.json::<Vec<InboundMessage>>().await?;
        debug!("Fetched {} message(s) from channel {}", messages.len(), channel_id);
        Ok(messages)
    }

    /// Posts a reply into a channel.
    ///
    /// Replies with an attachment are sent as `multipart/form-data` with the
    /// JSON payload in `payload_json` and the file in `files[0]`. If the file
    /// cannot be read the reply goes out without it.
    pub async fn send(&self, channel_id: &str, reply: Reply) -> Result<()> {
        let Reply {
            mut message,
            attachment,
        } = reply;

        let file = match attachment {
            Some(path) => match tokio::fs::read(path).await {
                Ok(bytes) => Some((path, bytes)),
                Err(e) => {
                    warn!("Attachment {} unavailable, sending without it: {}", path, e);
                    message.attachments.clear();
                    for embed in &mut message.embeds {
                        embed.image = None;
                    }
                    None
                }
            },
            None => None,
        };

        let request = self
            .client
            .post(self.url(&format!("/channels/{channel_id}/messages")))
            .header("Authorization", self.authorization());

        let request = match file {
            Some((path, bytes)) => {
                let filename = file_name(path).to_string();
                let payload = serde_json::to_string(&message)?;
                let form = Form::new()
                    .text("payload_json", payload)
                    .part("files[0]", Part::bytes(bytes).file_name(filename));
                request.multipart(form)
            }
            None => request.json(&message),
        };

        let response = request.send().await?;
        if response.status().is_success() {
            info!("Reply sent to channel {}", channel_id);
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Failed to send Discord reply: {} {}", status, body);
        }

        Ok(())
    }
}

/// Turn a non-success status into an error carrying the response body
async fn checked(response: Response, action: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(anyhow!("Failed to {}: {} {}", action, status, body))
}

/// File name part of an asset path, as referenced by `attachment://` URLs
pub fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
