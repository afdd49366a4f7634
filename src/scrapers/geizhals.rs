//! Geizhals price comparison network wishlists (Geizhals, Skinflint, Cenowarka)

use std::time::Duration;

use scraper::{ElementRef, Html};

use crate::aggregate::AggregationPolicy;
use crate::aggregate::price::{self, DecimalStyle};
use crate::errors::AdapterError;
use crate::format::DEFAULT_BUDGET;
use crate::models::{CanonicalLink, ParsedList, ProviderId, RawPartEntry, RenderedDocument};
use crate::scrapers::{absolute, origin_of, parse_quantity, select_attr, select_text, text_of};
use crate::traits::{AdapterConfig, LinkPattern, LinkShape, ListAdapter, NoticeText, RegionRule, RenderHints};

selectors! {
    ANCHORS = "a[href]";
    CARDS = "div.card";
    PRODUCT = "div.productname a";
    BREADCRUMB = "ol.category-breadcrumb a";
    BEST_PRICE = "span.bestprice a";
    QUANTITY = "input.quantity-input";
    SUM = "span.wishlist-sum";
}

/// Wishlist ids are seven digits on every network site
const ID_LENGTH: usize = 7;

fn wishlist(body: &'static str, site: &'static str, region: RegionRule) -> LinkPattern {
    LinkPattern::new(body, LinkShape::Fixed(body.len() + ID_LENGTH), site, region)
}

/// Adapter for the Geizhals network
pub struct GeizhalsAdapter {
    config: AdapterConfig,
}

impl GeizhalsAdapter {
    pub fn new() -> Self {
        let config = AdapterConfig {
            provider: ProviderId::Geizhals,
            patterns: vec![
                // region is the TLD: https://geizhals.de/...
                wishlist("geizhals.de/wishlists/", "Geizhals", RegionRule::Slice(17)),
                wishlist("geizhals.at/wishlists/", "Geizhals", RegionRule::Slice(17)),
                wishlist("geizhals.eu/wishlists/", "Geizhals", RegionRule::Slice(17)),
                wishlist("cenowarka.pl/wishlists/", "Cenowarka", RegionRule::Fixed("pl")),
                wishlist("skinflint.co.uk/wishlists/", "Skinflint", RegionRule::Fixed("gb")),
            ],
            aliases: Vec::new(),
            hints: RenderHints {
                consent: Some("#onetrust-reject-all-handler"),
                wait_for: Some(".card"),
                // quantities are lazy loaded as their inputs scroll into view
                reveal: Some(".quantity-input"),
                settle: Duration::from_secs(1),
                ..RenderHints::default()
            },
            translate_from: vec!["de", "pl"],
            budget: DEFAULT_BUDGET,
            color: 0x38_AE_FC,
            aggregation: AggregationPolicy::Preserve,
            invalid_notice: NoticeText {
                title: "Private or invalid Geizhals wishlist",
                body: "I ran into some trouble opening a list you sent.\n\nPlease make sure all the Geizhals network wishlist links (geizhals, skinflint, cenowarka) in your message are valid and set to Public.",
                attachment: Some("assets/private_geizhals.png"),
            },
            empty_notice: None,
        };

        Self { config }
    }

    fn parse_card(card: ElementRef<'_>, origin: &str) -> Option<RawPartEntry> {
        let name = select_text(card, &PRODUCT)?;
        let link = select_attr(card, &PRODUCT, "href").map(|href| absolute(origin, &href));

        // breadcrumb is top level, category, manufacturer
        let crumbs: Vec<String> = card.select(&BREADCRUMB).map(text_of).collect();
        let category = crumbs.get(1).or(crumbs.first()).cloned().unwrap_or_default();

        let price = select_text(card, &BEST_PRICE).map(|p| price::normalize(&p, DecimalStyle::Comma));
        // the quantity input belongs to the card it sits in
        let quantity = select_attr(card, &QUANTITY, "value")
            .and_then(|v| parse_quantity(&v))
            .unwrap_or(1);

        Some(
            RawPartEntry::new(category, name)
                .with_link(link)
                .with_price(price)
                .with_quantity(quantity),
        )
    }
}

impl Default for GeizhalsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ListAdapter for GeizhalsAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn parse(&self, document: &RenderedDocument, link: &CanonicalLink) -> Result<ParsedList, AdapterError> {
        let html = Html::parse_document(&document.html);

        // public wishlists link to themselves in their title
        let title = html
            .select(&ANCHORS)
            .find(|a| a.value().attr("href") == Some(link.url.as_str()))
            .map(text_of)
            .ok_or(AdapterError::Missing)?;

        let origin = origin_of(&link.url);
        let entries: Vec<RawPartEntry> = html
            .select(&CARDS)
            .filter_map(|card| Self::parse_card(card, origin))
            .collect();
        if entries.is_empty() {
            return Err(AdapterError::NoParts);
        }

        // the second sum is the wishlist total, the first the selected items
        let sums: Vec<String> = html.select(&SUM).map(text_of).collect();
        let total = sums
            .get(1)
            .or(sums.first())
            .filter(|s| !s.is_empty())
            .map(|s| price::normalize(s, DecimalStyle::Comma));

        Ok(ParsedList {
            title: Some(title).filter(|t| !t.is_empty()),
            entries,
            total,
            ..ParsedList::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://geizhals.de/wishlists/1234567";

    fn parse(html: &str) -> Result<ParsedList, AdapterError> {
        let link = CanonicalLink {
            url: URL.to_string(),
            provider: ProviderId::Geizhals,
            site: "Geizhals",
            region: Some("de".to_string()),
        };
        GeizhalsAdapter::new().parse(
            &RenderedDocument {
                url: URL.to_string(),
                html: html.to_string(),
            },
            &link,
        )
    }

    fn card(category: &str, name: &str, price: &str, quantity: Option<&str>) -> String {
        let input = quantity
            .map(|q| format!(r#"<input class="quantity-input" value="{q}">"#))
            .unwrap_or_default();
        format!(
            r#"<div class="card">
                <ol class="category-breadcrumb"><li><a href="/hw">Hardware</a></li><li><a href="/c">{category}</a></li><li><a href="/m">Maker</a></li></ol>
                <div class="productname"><a href="/{name}.html">{name}</a></div>
                <span class="bestprice"><a href="/o">{price}</a></span>
                {input}
            </div>"#
        )
    }

    #[test]
    fn test_parse_wishlist() {
        let html = format!(
            r#"<a href="{URL}">Mein PC</a>{}{}<span class="wishlist-sum">€ 0,00</span><span class="wishlist-sum">€ 1.539,70</span>"#,
            card("Prozessoren", "Ryzen", "€ 1.139,90", Some("1")),
            card("Lüfter", "P12", "€ 199,90", Some("2")),
        );
        let parsed = parse(&html).expect("valid wishlist");

        assert_eq!(parsed.title.as_deref(), Some("Mein PC"));
        assert_eq!(parsed.entries[0].category, "Prozessoren");
        assert_eq!(parsed.entries[0].price.as_deref(), Some("€ 1139.90"));
        assert_eq!(parsed.entries[0].link.as_deref(), Some("https://geizhals.de/Ryzen.html"));
        assert_eq!(parsed.entries[1].quantity, 2);
        assert_eq!(parsed.total.as_deref(), Some("€ 1539.70"));
    }

    #[test]
    fn test_quantity_stays_with_its_card() {
        // an out of stock card without an input must not shift later quantities
        let html = format!(
            r#"<a href="{URL}">List</a>{}{}"#,
            card("A", "First", "", None),
            card("B", "Second", "€ 10,00", Some("3")),
        );
        let parsed = parse(&html).expect("valid wishlist");

        assert_eq!(parsed.entries[0].quantity, 1);
        assert_eq!(parsed.entries[0].price, None);
        assert_eq!(parsed.entries[1].quantity, 3);
    }

    #[test]
    fn test_private_wishlist() {
        assert_eq!(
            parse("<html><body>Diese Wunschliste ist privat</body></html>").err(),
            Some(AdapterError::Missing)
        );
    }
}
