//! buildapc.gg and its Swedish sister site KomponentKoll

use std::time::Duration;

use scraper::{ElementRef, Html};

use crate::aggregate::AggregationPolicy;
use crate::aggregate::price::{self, DecimalStyle};
use crate::errors::AdapterError;
use crate::format::DEFAULT_BUDGET;
use crate::models::{CanonicalLink, ParsedList, ProviderId, RawPartEntry, RenderedDocument};
use crate::scrapers::{absolute, origin_of, parse_quantity, select_text, text_of};
use crate::traits::{AdapterConfig, LinkPattern, LinkShape, ListAdapter, NoticeText, RegionRule, RenderHints};

selectors! {
    TITLE = "div.title-wrap h1";
    PARTS = "div.product-summary";
    NAME = "div.info h4";
    CATEGORY = "div.info h5";
    LINKS = "a[href]";
    COUNT = "span.count";
    PRICE = "div.price";
    TOTAL = "div.total span.price";
}

/// Adapter for buildapc.gg build lists
pub struct BuildApcAdapter {
    config: AdapterConfig,
}

impl BuildApcAdapter {
    pub fn new() -> Self {
        let config = AdapterConfig {
            provider: ProviderId::BuildApc,
            patterns: vec![
                // the bare domain is often mentioned outside of a link
                LinkPattern::new("buildapc.gg/", LinkShape::Fixed(26), "buildapc.gg", RegionRule::Slice(20))
                    .requiring("/build/"),
                LinkPattern::new(
                    "komponentkoll.se/",
                    LinkShape::Fixed(28),
                    "KomponentKoll",
                    RegionRule::Fixed("se"),
                )
                .requiring("/build/"),
            ],
            aliases: Vec::new(),
            hints: RenderHints {
                click: Some(".summary.hover"),
                // translation of the Scandinavian sites
                settle: Duration::from_secs(1),
                ..RenderHints::default()
            },
            translate_from: vec!["da", "sv", "no"],
            budget: DEFAULT_BUDGET,
            color: 0x38_AE_FC,
            aggregation: AggregationPolicy::Preserve,
            invalid_notice: NoticeText {
                title: "Private or invalid buildapc.gg build list",
                body: "I ran into some trouble opening a list you sent.\n\nPlease make sure all the buildapc.gg part list links in your message are valid.",
                attachment: None,
            },
            empty_notice: None,
        };

        Self { config }
    }

    fn parse_part(part: ElementRef<'_>, origin: &str) -> Option<RawPartEntry> {
        let name = select_text(part, &NAME)?;
        let category = select_text(part, &CATEGORY).unwrap_or_default();
        let link = part
            .select(&LINKS)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| href.contains("produkt"))
            .last()
            .map(|href| absolute(origin, href));
        let quantity = select_text(part, &COUNT)
            .and_then(|c| parse_quantity(&c))
            .unwrap_or(1);
        let price = select_text(part, &PRICE).map(|p| kronor_first(&p));

        Some(
            RawPartEntry::new(category, name)
                .with_link(link)
                .with_price(price)
                .with_quantity(quantity),
        )
    }
}

/// Normalise a price and move a trailing `kr` to the front (`1 299 kr` → `kr 1299.00`)
fn kronor_first(raw: &str) -> String {
    let normalized = price::normalize(raw, DecimalStyle::Dot);
    if !normalized.contains("kr") {
        return normalized;
    }

    let amount = normalized.replace("kr", "");
    let amount = amount.trim();
    if amount.contains('.') {
        format!("kr {amount}")
    } else {
        format!("kr {amount}.00")
    }
}

impl Default for BuildApcAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ListAdapter for BuildApcAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn parse(&self, document: &RenderedDocument, link: &CanonicalLink) -> Result<ParsedList, AdapterError> {
        let html = Html::parse_document(&document.html);
        // the title only renders on a valid list
        let title = html.select(&TITLE).next().map(text_of).ok_or(AdapterError::Missing)?;

        let origin = origin_of(&link.url);
        let entries: Vec<RawPartEntry> = html
            .select(&PARTS)
            .filter_map(|part| Self::parse_part(part, origin))
            .collect();
        if entries.is_empty() {
            return Err(AdapterError::NoParts);
        }

        Ok(ParsedList {
            title: Some(title).filter(|t| !t.is_empty()),
            entries,
            total: select_text(html.root_element(), &TOTAL).map(|t| kronor_first(&t)),
            ..ParsedList::default()
        })
    }
}
