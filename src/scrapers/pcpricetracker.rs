//! PCPriceTracker shared builds

use scraper::{ElementRef, Html};

use crate::aggregate::AggregationPolicy;
use crate::aggregate::price::{self, DecimalStyle};
use crate::errors::AdapterError;
use crate::format::DEFAULT_BUDGET;
use crate::models::{CanonicalLink, ParsedList, ProviderId, RawPartEntry, RenderedDocument};
use crate::scrapers::{select_attr, select_text};
use crate::traits::{AdapterConfig, LinkPattern, LinkShape, ListAdapter, NoticeText, RegionRule, RenderHints};

selectors! {
    ROWS = "table#shared_build tbody tr";
    CATEGORY = "td.category.lead";
    SELECTION = "td.selection a";
    SOURCE = "td.source";
    PRICE = "td.price a";
    TOTAL = "td.price";
}

/// Adapter for pcpricetracker.in
pub struct PcPriceTrackerAdapter {
    config: AdapterConfig,
}

impl PcPriceTrackerAdapter {
    pub fn new() -> Self {
        let config = AdapterConfig {
            provider: ProviderId::PcPriceTracker,
            patterns: vec![LinkPattern::new(
                "pcpricetracker.in/b/s/",
                LinkShape::Fixed(58),
                "PCPriceTracker",
                RegionRule::Fixed("in"),
            )],
            aliases: Vec::new(),
            hints: RenderHints {
                wait_for: Some("table#shared_build"),
                ..RenderHints::default()
            },
            translate_from: Vec::new(),
            budget: DEFAULT_BUDGET,
            color: 0x01_91_19,
            // every row carries its own id, so duplicates stay separate
            aggregation: AggregationPolicy::Preserve,
            invalid_notice: NoticeText {
                title: "Couldn't read PCPriceTracker list",
                body: "I couldn't find a valid parts table in this list link. Please make sure you've copied the link correctly.\n\nIf you're certain the link is correct and this error persists, there may be a bug - check my About Me for support.",
                attachment: None,
            },
            empty_notice: None,
        };

        Self { config }
    }

    fn parse_row(row: ElementRef<'_>) -> Option<RawPartEntry> {
        let category = select_text(row, &CATEGORY)?;
        let name = select_text(row, &SELECTION)?;
        let link = select_attr(row, &SELECTION, "href");
        let retailer = select_text(row, &SOURCE);

        let price = select_text(row, &PRICE).map(|p| {
            let amount = price::normalize(p.trim_start_matches('₹'), DecimalStyle::Dot);
            match &retailer {
                Some(retailer) => format!("₹{amount} @ {retailer}"),
                None => format!("₹{amount}"),
            }
        });

        Some(RawPartEntry::new(category, name).with_link(link).with_price(price))
    }
}

impl Default for PcPriceTrackerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ListAdapter for PcPriceTrackerAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn parse(&self, document: &RenderedDocument, _link: &CanonicalLink) -> Result<ParsedList, AdapterError> {
        let html = Html::parse_document(&document.html);
        let mut rows: Vec<ElementRef<'_>> = html.select(&ROWS).collect();

        // the last row always holds the total
        let totals = rows.pop().ok_or(AdapterError::Missing)?;
        let total = select_text(totals, &TOTAL)
            .map(|t| format!("₹{}", price::normalize(t.trim_start_matches('₹'), DecimalStyle::Dot)));

        let entries: Vec<RawPartEntry> = rows.into_iter().filter_map(Self::parse_row).collect();
        if entries.is_empty() {
            return Err(AdapterError::NoParts);
        }

        Ok(ParsedList {
            entries,
            total,
            ..ParsedList::default()
        })
    }
}
