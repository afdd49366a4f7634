//! Tweakers Pricewatch wishlists and their price breakdown pages

use std::time::Duration;

use scraper::{ElementRef, Html};

use crate::aggregate::AggregationPolicy;
use crate::aggregate::price::{self, DecimalStyle};
use crate::errors::AdapterError;
use crate::format::DEFAULT_BUDGET;
use crate::models::{CanonicalLink, ParsedList, ProviderId, RawPartEntry, RenderedDocument};
use crate::scrapers::{parse_quantity, select_attr, select_text, text_of};
use crate::traits::{AdapterConfig, LinkPattern, LinkShape, ListAdapter, NoticeText, RegionRule, RenderHints};

selectors! {
    TITLE = "span.linkHover";
    ROWS = "table.galleryInnerTable tbody tr";
    TITLE_LINKS = "td.title a";
    AMOUNT = "td.amount p";
    PRICE = "td.price a";
    TOTAL = "td.price";
    CTA = "a.ctaButton";
}

const CONSENT: &str = "#pg-accept-btn";

/// Adapter for tweakers.net
pub struct TweakersAdapter {
    config: AdapterConfig,
}

impl TweakersAdapter {
    pub fn new() -> Self {
        let breakdown_hints = RenderHints {
            consent: Some(CONSENT),
            wait_for: Some("a.ctaButton"),
            wait_timeout: Duration::from_secs(5),
            ..RenderHints::default()
        };

        let config = AdapterConfig {
            provider: ProviderId::Tweakers,
            patterns: vec![
                LinkPattern::new(
                    "tweakers.net/gallery",
                    LinkShape::Terminated {
                        marker: "/wenslijst/?wish_id=",
                        tail: 7,
                    },
                    "Tweakers",
                    RegionRule::Fixed("nl"),
                ),
                LinkPattern::new(
                    "tweakers.net/pricewatch/bestelkosten/",
                    LinkShape::Fixed(44),
                    "Tweakers",
                    RegionRule::Fixed("nl"),
                )
                .resolved_with(breakdown_hints),
            ],
            aliases: vec![("tweakers.nl/", "tweakers.net/")],
            hints: RenderHints {
                consent: Some(CONSENT),
                wait_for: Some(".galleryInnerTable"),
                // categories are translated after load
                settle: Duration::from_secs(1),
                ..RenderHints::default()
            },
            translate_from: vec!["nl"],
            budget: DEFAULT_BUDGET,
            color: 0xE8_36_EB,
            aggregation: AggregationPolicy::Preserve,
            invalid_notice: NoticeText {
                title: "Private or invalid Tweakers wishlist detected",
                body: "I ran into some trouble opening a list you sent.\n\nPlease make sure all the Tweakers wishlist links in your message are valid and set to Public.",
                attachment: None,
            },
            empty_notice: None,
        };

        Self { config }
    }

    fn parse_row(row: ElementRef<'_>) -> Option<RawPartEntry> {
        // product link first, category link second
        let mut links = row.select(&TITLE_LINKS);
        let product = links.next()?;
        let category = links.next().map(text_of).unwrap_or_default();

        let name = text_of(product);
        let link = product.value().attr("href").map(|h| h.trim().to_string());
        // the amount cell is empty for a single item
        let quantity = select_text(row, &AMOUNT)
            .and_then(|a| parse_quantity(&a))
            .unwrap_or(1);
        let price = select_text(row, &PRICE).map(|p| price::normalize(&p, DecimalStyle::Comma));

        Some(
            RawPartEntry::new(category, name)
                .with_link(link)
                .with_price(price)
                .with_quantity(quantity),
        )
    }
}

impl Default for TweakersAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ListAdapter for TweakersAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn parse(&self, document: &RenderedDocument, _link: &CanonicalLink) -> Result<ParsedList, AdapterError> {
        let html = Html::parse_document(&document.html);
        let title = select_text(html.root_element(), &TITLE).ok_or(AdapterError::Missing)?;

        let mut rows: Vec<ElementRef<'_>> = html.select(&ROWS).collect();
        // the last row only carries the total
        let totals = rows.pop().ok_or(AdapterError::Missing)?;
        let total = select_text(totals, &TOTAL).map(|t| price::normalize(&t, DecimalStyle::Comma));

        let entries: Vec<RawPartEntry> = rows.into_iter().filter_map(Self::parse_row).collect();
        if entries.is_empty() {
            return Err(AdapterError::NoParts);
        }

        Ok(ParsedList {
            title: Some(title),
            entries,
            total,
            ..ParsedList::default()
        })
    }

    fn resolve(&self, document: &RenderedDocument, _link: &CanonicalLink) -> Option<String> {
        let html = Html::parse_document(&document.html);
        select_attr(html.root_element(), &CTA, "href").filter(|href| href.contains("wenslijst"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> CanonicalLink {
        CanonicalLink {
            url: "https://tweakers.net/gallery/123456/wenslijst/?wish_id=1234567".to_string(),
            provider: ProviderId::Tweakers,
            site: "Tweakers",
            region: Some("nl".to_string()),
        }
    }

    fn document(html: &str) -> RenderedDocument {
        RenderedDocument {
            url: link().url,
            html: html.to_string(),
        }
    }

    #[test]
    fn test_parse_wishlist() {
        let parsed = TweakersAdapter::new()
            .parse(
                &document(
                    r#"
                <span class="linkHover">Nieuwe game pc</span>
                <table class="galleryInnerTable"><tbody>
                  <tr>
                    <td class="title"><a href="https://tweakers.net/pricewatch/1/ryzen.html">AMD Ryzen 5 7600</a><a href="/categorie/processors">Processors</a></td>
                    <td class="amount"><p></p></td>
                    <td class="price"><a href="/prijs/1">€ 1.199,-</a></td>
                  </tr>
                  <tr>
                    <td class="title"><a href="https://tweakers.net/pricewatch/2/fan.html">Arctic P12</a><a href="/categorie/fans">Fans</a></td>
                    <td class="amount"><p>3x</p></td>
                    <td class="price"><a href="/prijs/2">€ 7,95</a></td>
                  </tr>
                  <tr><td class="price">€ 1.222,85</td></tr>
                </tbody></table>
                "#,
                ),
                &link(),
            )
            .expect("valid wishlist");

        assert_eq!(parsed.title.as_deref(), Some("Nieuwe game pc"));
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[0].category, "Processors");
        assert_eq!(parsed.entries[0].quantity, 1);
        assert_eq!(parsed.entries[0].price.as_deref(), Some("€ 1199.00"));
        assert_eq!(parsed.entries[1].quantity, 3);
        assert_eq!(parsed.entries[1].price.as_deref(), Some("€ 7.95"));
        assert_eq!(parsed.total.as_deref(), Some("€ 1222.85"));
    }

    #[test]
    fn test_private_wishlist() {
        let result = TweakersAdapter::new().parse(&document("<div>Deze lijst is privé</div>"), &link());
        assert_eq!(result.err(), Some(AdapterError::Missing));
    }

    #[test]
    fn test_breakdown_resolves_to_wishlist() {
        let adapter = TweakersAdapter::new();
        let page = document(
            r#"<a class="ctaButton" href="https://tweakers.net/gallery/1/wenslijst/?wish_id=7654321">Bekijk</a>"#,
        );
        assert_eq!(
            adapter.resolve(&page, &link()).as_deref(),
            Some("https://tweakers.net/gallery/1/wenslijst/?wish_id=7654321")
        );
        assert_eq!(adapter.resolve(&document("<p></p>"), &link()), None);
    }
}
