//! Embeds for parsed lists and failure notices

use chrono::Utc;
use tracing::warn;

use crate::discord::file_name;
use crate::errors::notice;
use crate::models::{
    DiscordActionRow, DiscordAttachment, DiscordButton, DiscordEmbed, DiscordField, DiscordImage,
    DiscordMessage, FailureResult, ListResult,
};
use crate::traits::AdapterConfig;

/// Discord caps embed field values at this many characters
const FIELD_LIMIT: usize = 1024;

/// Discord caps embed descriptions at this many characters.
/// List budgets stay below it by enough to fit the "Sent by" header.
const DESCRIPTION_LIMIT: usize = 4096;

const ACTION_ROW: u8 = 1;
const BUTTON: u8 = 2;
const LINK_STYLE: u8 = 5;

/// A message ready to post, plus the asset it references
#[derive(Debug)]
pub struct Reply {
    pub message: DiscordMessage,
    /// Path of an image uploaded with the message
    pub attachment: Option<&'static str>,
}

/// Builds the reply messages for one inbound message
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    sender: String,
}

impl ResponseBuilder {
    /// `sender` is the mention of the user who posted the links
    pub fn new(sender: impl Into<String>) -> Self {
        Self { sender: sender.into() }
    }

    fn description(&self, body: &str) -> String {
        let description = format!("Sent by {}\n\n{}", self.sender, body);
        let length = description.chars().count();
        if length > DESCRIPTION_LIMIT {
            warn!("Embed description is {} characters, over the {} limit", length, DESCRIPTION_LIMIT);
        }
        description
    }

    /// Embed for a successfully parsed list, with an "Open List" button
    pub fn list(&self, result: &ListResult, config: &AdapterConfig) -> Reply {
        let link = &result.link;
        let mut title = match &link.region {
            Some(region) => format!("{} :flag_{}:\n{}", link.site, region, link.url),
            None => format!("{}\n{}", link.site, link.url),
        };
        if let Some(list_title) = &result.title {
            title.push('\n');
            title.push_str(list_title);
        }

        let mut fields = vec![DiscordField {
            name: "Total:".to_string(),
            value: format!("``{}``", result.total),
            inline: false,
        }];
        if let Some(wattage) = &result.wattage {
            fields.push(DiscordField {
                name: "Estimated Wattage".to_string(),
                value: wattage.clone(),
                inline: false,
            });
        }
        if let Some(compat) = &result.compat {
            fields.push(DiscordField {
                name: compat.header.clone(),
                value: bullet_list(&compat.notes),
                inline: false,
            });
        }

        let embed = DiscordEmbed {
            title,
            description: self.description(&result.body),
            url: None,
            color: config.color,
            timestamp: Utc::now().to_rfc3339(),
            image: None,
            fields,
        };

        Reply {
            message: DiscordMessage {
                embeds: vec![embed],
                components: vec![DiscordActionRow {
                    kind: ACTION_ROW,
                    components: vec![DiscordButton {
                        kind: BUTTON,
                        style: LINK_STYLE,
                        label: "Open List".to_string(),
                        url: link.url.clone(),
                    }],
                }],
                attachments: Vec::new(),
            },
            attachment: None,
        }
    }

    /// Notice embed for a link that could not be turned into a list
    pub fn failure(&self, failure: &FailureResult, config: &AdapterConfig) -> Reply {
        let notice = notice(failure, config);

        let (image, attachments) = match notice.attachment {
            Some(path) => {
                let filename = file_name(path).to_string();
                (
                    Some(DiscordImage {
                        url: format!("attachment://{filename}"),
                    }),
                    vec![DiscordAttachment { id: 0, filename }],
                )
            }
            None => (None, Vec::new()),
        };

        let embed = DiscordEmbed {
            title: notice.title,
            description: self.description(&notice.body),
            url: None,
            color: notice.color,
            timestamp: Utc::now().to_rfc3339(),
            image,
            fields: Vec::new(),
        };

        Reply {
            message: DiscordMessage {
                embeds: vec![embed],
                components: Vec::new(),
                attachments,
            },
            attachment: notice.attachment,
        }
    }
}

/// One `- note` line per note, stopping before the field limit
fn bullet_list(notes: &[String]) -> String {
    let mut value = String::new();
    for note in notes {
        let line = format!("- {note}\n");
        if value.chars().count() + line.chars().count() > FIELD_LIMIT {
            break;
        }
        value.push_str(&line);
    }
    value
}
