//! Data models for part lists, link failures and Discord payloads

use std::fmt;

use serde::{Deserialize, Serialize};

/// Part list providers the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    PcPartPicker,
    PcPriceTracker,
    BuildApc,
    Geizhals,
    Hinta,
    Meupc,
    Tweakers,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PcPartPicker => "PCPartPicker",
            Self::PcPriceTracker => "PCPriceTracker",
            Self::BuildApc => "buildapc.gg",
            Self::Geizhals => "Geizhals",
            Self::Hinta => "Hinta.fi",
            Self::Meupc => "Meupc",
            Self::Tweakers => "Tweakers",
        };
        f.write_str(name)
    }
}

/// A validated part list link, ready to be rendered and parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalLink {
    pub url: String,
    pub provider: ProviderId,
    /// Display name of the site the link points at (mirrors share a provider)
    pub site: &'static str,
    /// Two letter region code used for the flag emoji
    pub region: Option<String>,
}

/// Page content returned by the renderer after all interaction steps
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Final URL after redirects
    pub url: String,
    pub html: String,
}

/// One row scraped from a provider's table
#[derive(Debug, Clone, PartialEq)]
pub struct RawPartEntry {
    pub category: String,
    pub name: String,
    pub link: Option<String>,
    /// Unit price as shown by the provider, dot-decimal. `None` when unavailable.
    pub price: Option<String>,
    pub quantity: u32,
    pub purchased: bool,
    /// Part was picked by a parametric filter rather than by hand
    pub parametric: bool,
}

impl RawPartEntry {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            link: None,
            price: None,
            quantity: 1,
            purchased: false,
            parametric: false,
        }
    }

    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link.filter(|l| !l.is_empty());
        self
    }

    pub fn with_price(mut self, price: Option<String>) -> Self {
        self.price = price.filter(|p| !p.is_empty());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn purchased(mut self, purchased: bool) -> Self {
        self.purchased = purchased;
        self
    }
}

/// A display row after aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPart {
    pub category: String,
    /// Name with hyperlink markup and quantity annotation
    pub name: String,
    /// Price multiplied by quantity, or `N/A`
    pub price: String,
    pub quantity: u32,
}

impl NormalizedPart {
    /// Markdown line as it appears in the list body
    pub fn line(&self) -> String {
        format!("**{}** - ``{}`` - {}", self.category, self.price, self.name)
    }
}

/// Compatibility header and notes shown below the list
#[derive(Debug, Clone, PartialEq)]
pub struct CompatNotes {
    pub header: String,
    pub notes: Vec<String>,
}

/// Everything an adapter scrapes from one rendered list
#[derive(Debug, Clone, Default)]
pub struct ParsedList {
    pub title: Option<String>,
    pub entries: Vec<RawPartEntry>,
    pub total: Option<String>,
    pub wattage: Option<String>,
    pub compat: Option<CompatNotes>,
    pub footnote: Option<String>,
}

/// Fully assembled outcome for one link
#[derive(Debug, Clone)]
pub struct ListResult {
    pub link: CanonicalLink,
    pub title: Option<String>,
    pub parts: Vec<NormalizedPart>,
    pub body: String,
    pub total: String,
    pub wattage: Option<String>,
    pub compat: Option<CompatNotes>,
    pub truncated: bool,
    pub omitted: usize,
}

/// Terminal failure states for a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Malformed,
    PrivateOrInvalid,
    Empty,
    Blank,
}

/// Tagged alternative to `ListResult`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureResult {
    pub kind: FailureKind,
    pub provider: ProviderId,
    pub link: Option<String>,
}

impl FailureResult {
    pub fn new(kind: FailureKind, provider: ProviderId, link: Option<String>) -> Self {
        Self {
            kind,
            provider,
            link,
        }
    }
}

/// Discord embed structure for rich notifications
#[derive(Debug, Serialize)]
pub struct DiscordEmbed {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub color: u32,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<DiscordImage>,
    pub fields: Vec<DiscordField>,
}

/// Full-size image for Discord embeds
#[derive(Debug, Serialize)]
pub struct DiscordImage {
    pub url: String,
}

/// Key-value field for Discord embeds
#[derive(Debug, Serialize)]
pub struct DiscordField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Row of message components
#[derive(Debug, Serialize)]
pub struct DiscordActionRow {
    #[serde(rename = "type")]
    pub kind: u8,
    pub components: Vec<DiscordButton>,
}

/// Link button below an embed
#[derive(Debug, Serialize)]
pub struct DiscordButton {
    #[serde(rename = "type")]
    pub kind: u8,
    pub style: u8,
    pub label: String,
    pub url: String,
}

/// Uploaded file referenced from an embed
#[derive(Debug, Serialize)]
pub struct DiscordAttachment {
    pub id: u32,
    pub filename: String,
}

/// Discord channel message payload
#[derive(Debug, Serialize)]
pub struct DiscordMessage {
    pub embeds: Vec<DiscordEmbed>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<DiscordActionRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<DiscordAttachment>,
}

/// Author of an inbound channel message
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    #[serde(default)]
    pub bot: bool,
}

/// Channel message as returned by the Discord REST API
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    pub author: DiscordUser,
}

impl InboundMessage {
    /// Mention string for the author
    pub fn sender(&self) -> String {
        format!("<@{}>", self.author.id)
    }
}
