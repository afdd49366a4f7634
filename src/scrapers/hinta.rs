//! Hinta.fi shopping carts

use std::time::Duration;

use scraper::{ElementRef, Html};

use crate::aggregate::price::{self, DecimalStyle};
use crate::aggregate::{AggregationPolicy, total_of};
use crate::errors::AdapterError;
use crate::format::DEFAULT_BUDGET;
use crate::models::{CanonicalLink, ParsedList, ProviderId, RawPartEntry, RenderedDocument};
use crate::scrapers::{absolute, parse_quantity, select_attr, select_text};
use crate::traits::{AdapterConfig, LinkPattern, LinkShape, ListAdapter, NoticeText, RegionRule, RenderHints};

selectors! {
    LIST = "ol.hv-cprl";
    ROWS = "li.hv-cprli";
    GROUP = "div.hv-prl_group";
    NAME = "h3.hv-prl_name";
    FEATURES = "div.hv-prl_features";
    PRODUCT = "a.hv-prli-c1";
    QUANTITY = "input.hv-cart-quantity-in";
    PRICE = "a.hv-prli-c3-price";
}

const ORIGIN: &str = "https://hinta.fi";

/// Adapter for hinta.fi
pub struct HintaAdapter {
    config: AdapterConfig,
}

impl HintaAdapter {
    pub fn new() -> Self {
        let config = AdapterConfig {
            provider: ProviderId::Hinta,
            patterns: vec![LinkPattern::new(
                "hinta.fi/ostoskori/",
                LinkShape::Fixed(28),
                "Hinta.fi",
                RegionRule::Fixed("fi"),
            )],
            aliases: Vec::new(),
            hints: RenderHints {
                settle: Duration::from_secs(1),
                ..RenderHints::default()
            },
            translate_from: vec!["fi"],
            budget: DEFAULT_BUDGET,
            color: 0x4F_FF_98,
            aggregation: AggregationPolicy::Preserve,
            invalid_notice: NoticeText {
                title: "Private or invalid Hinta.fi shopping list",
                body: "I ran into some trouble opening a list you sent.\n\nPlease make sure all the Hinta.fi shopping list links in your message are valid.",
                attachment: None,
            },
            empty_notice: None,
        };

        Self { config }
    }

    fn parse_row(row: ElementRef<'_>) -> Option<RawPartEntry> {
        let mut name = select_text(row, &NAME)?;
        // capacity, form factor and similar details
        if let Some(features) = select_text(row, &FEATURES) {
            name = format!("{name} {features}");
        }

        let category = select_text(row, &GROUP).unwrap_or_default();
        let link = select_attr(row, &PRODUCT, "href").map(|href| absolute(ORIGIN, &href));
        let quantity = select_attr(row, &QUANTITY, "value")
            .and_then(|v| parse_quantity(&v))
            .unwrap_or(1);
        let price = select_text(row, &PRICE).map(|p| price::normalize(&p, DecimalStyle::Dot));

        Some(
            RawPartEntry::new(category, name)
                .with_link(link)
                .with_price(price)
                .with_quantity(quantity),
        )
    }
}

impl Default for HintaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ListAdapter for HintaAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn parse(&self, document: &RenderedDocument, _link: &CanonicalLink) -> Result<ParsedList, AdapterError> {
        let html = Html::parse_document(&document.html);
        let list = html.select(&LIST).next().ok_or(AdapterError::Missing)?;

        let entries: Vec<RawPartEntry> = list.select(&ROWS).filter_map(Self::parse_row).collect();
        if entries.is_empty() {
            return Err(AdapterError::NoParts);
        }

        // carts show no total of their own
        let total = format!("€{:.2}", total_of(&entries));

        Ok(ParsedList {
            entries,
            total: Some(total),
            ..ParsedList::default()
        })
    }
}
