//! Meupc.net builds

use std::time::Duration;

use scraper::{ElementRef, Html};

use crate::aggregate::AggregationPolicy;
use crate::aggregate::price::{self, DecimalStyle};
use crate::errors::AdapterError;
use crate::format::COMPACT_BUDGET;
use crate::models::{CanonicalLink, CompatNotes, ParsedList, ProviderId, RawPartEntry, RenderedDocument};
use crate::scrapers::{select_attr, select_text, text_of};
use crate::traits::{AdapterConfig, LinkPattern, LinkShape, ListAdapter, NoticeText, RegionRule, RenderHints};

selectors! {
    TABLE = "table";
    GROUPS = "tbody";
    ROWS = "tr";
    TITLE = "th.table-responsive-title a";
    SELECTION = "td.table-responsive-selection a";
    PRICE = "td.table-responsive-price";
    PRICE_BOLD = "td.table-responsive-price b";
    STORE = "td.table-responsive-loja";
    TOTAL = "b";
    NOT_PURCHASED = "strong";
    WATTAGE = "div.consumption strong";
    WARNINGS = "article.message li";
}

/// Invalid builds redirect to the empty builder, whose URL is shorter than any build link
const MIN_BUILD_URL: usize = 30;

const COMPAT_HEADER: &str = "Compatibility Notes/Warnings";

/// Adapter for meupc.net
pub struct MeupcAdapter {
    config: AdapterConfig,
}

impl MeupcAdapter {
    pub fn new() -> Self {
        let config = AdapterConfig {
            provider: ProviderId::Meupc,
            patterns: vec![LinkPattern::new(
                "meupc.net/build/",
                LinkShape::Fixed(22),
                "Meupc",
                RegionRule::Fixed("br"),
            )],
            aliases: Vec::new(),
            hints: RenderHints {
                settle: Duration::from_secs(1),
                ..RenderHints::default()
            },
            translate_from: vec!["pt"],
            budget: COMPACT_BUDGET,
            color: 0xFA_81_48,
            aggregation: AggregationPolicy::Merge,
            invalid_notice: NoticeText {
                title: "Invalid Meupc build list",
                body: "I ran into some trouble opening a list you sent.\n\nPlease make sure all the Meupc part list links in your message are valid.",
                attachment: None,
            },
            empty_notice: None,
        };

        Self { config }
    }

    fn parse_group(group: ElementRef<'_>) -> Vec<RawPartEntry> {
        let category = select_text(group, &TITLE).unwrap_or_default();

        group
            .select(&ROWS)
            .filter_map(|row| {
                let name = select_text(row, &SELECTION)?;
                let link = select_attr(row, &SELECTION, "href");
                // discounted parts show the current price in bold next to the old one
                let price = select_text(row, &PRICE_BOLD)
                    .or_else(|| select_text(row, &PRICE))
                    .map(|p| price::normalize(&p, DecimalStyle::Dot));
                // the store column is only filled in for purchased parts
                let purchased = select_text(row, &STORE).is_some_and(|s| s.chars().count() > 1);

                Some(
                    RawPartEntry::new(category.clone(), name)
                        .with_link(link)
                        .with_price(price)
                        .purchased(purchased),
                )
            })
            .collect()
    }

    /// Total, split into purchased and not yet purchased amounts when both exist
    fn parse_total(totals: &[ElementRef<'_>]) -> Option<String> {
        let total = select_text(*totals.first()?, &TOTAL).map(|t| price::normalize(&t, DecimalStyle::Dot))?;

        let Some(not_purchased) = totals
            .get(1)
            .and_then(|group| select_text(*group, &NOT_PURCHASED))
            .map(|t| price::normalize(&t, DecimalStyle::Dot))
        else {
            return Some(total);
        };

        let purchased = match (price::amount(&total), price::amount(&not_purchased)) {
            (Some(all), Some(open)) => format!("R$ {:.2}", all - open),
            _ => return Some(total),
        };
        Some(format!(
            "{total} ({not_purchased} Not Yet Purchased, {purchased} Purchased)"
        ))
    }

    fn parse_compat(document: &Html) -> Option<CompatNotes> {
        let notes: Vec<String> = document
            .select(&WARNINGS)
            .map(text_of)
            .filter(|n| !n.is_empty())
            .collect();

        if notes.is_empty() {
            return None;
        }
        Some(CompatNotes {
            header: COMPAT_HEADER.to_string(),
            notes,
        })
    }
}

impl Default for MeupcAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ListAdapter for MeupcAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn parse(&self, document: &RenderedDocument, _link: &CanonicalLink) -> Result<ParsedList, AdapterError> {
        if document.url.len() < MIN_BUILD_URL {
            return Err(AdapterError::Missing);
        }

        let html = Html::parse_document(&document.html);
        let table = html.select(&TABLE).next().ok_or(AdapterError::Missing)?;

        let (mut totals, groups): (Vec<ElementRef<'_>>, Vec<ElementRef<'_>>) = table
            .select(&GROUPS)
            .partition(|group| group.value().classes().any(|c| c.contains("total")));
        // the grand total is the last group of the table
        totals.reverse();

        let entries: Vec<RawPartEntry> = groups.into_iter().flat_map(Self::parse_group).collect();
        if entries.is_empty() {
            return Err(AdapterError::NoParts);
        }

        Ok(ParsedList {
            title: None,
            entries,
            total: Self::parse_total(&totals),
            wattage: select_text(html.root_element(), &WATTAGE),
            compat: Self::parse_compat(&html),
            footnote: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;

    const URL: &str = "https://meupc.net/build/AbC123";

    fn parse_at(url: &str, html: &str) -> Result<ParsedList, AdapterError> {
        let link = CanonicalLink {
            url: URL.to_string(),
            provider: ProviderId::Meupc,
            site: "Meupc",
            region: Some("br".to_string()),
        };
        MeupcAdapter::new().parse(
            &RenderedDocument {
                url: url.to_string(),
                html: html.to_string(),
            },
            &link,
        )
    }

    const BUILD: &str = r#"
        <table>
          <tbody>
            <tr>
              <th class="table-responsive-title"><a href="/c/memoria">Memória</a></th>
              <td class="table-responsive-selection"><a href="https://meupc.net/peca/ram">Kingston Fury 8GB</a></td>
              <td class="table-responsive-price"><s>R$ 250,00</s> <b>R$ 199.90</b></td>
              <td class="table-responsive-loja"></td>
            </tr>
            <tr>
              <td class="table-responsive-selection"><a href="https://meupc.net/peca/ram">Kingston Fury 8GB</a></td>
              <td class="table-responsive-price"><b>R$ 199.90</b></td>
              <td class="table-responsive-loja"></td>
            </tr>
            <tr>
              <td class="table-responsive-selection"><a href="https://meupc.net/peca/ram">Kingston Fury 8GB</a></td>
              <td class="table-responsive-price"><b>R$ 199.90</b></td>
              <td class="table-responsive-loja">Kabum</td>
            </tr>
          </tbody>
          <tbody>
            <tr>
              <th class="table-responsive-title"><a href="/c/gabinete">Gabinete</a></th>
              <td class="table-responsive-selection"><a href="https://meupc.net/peca/case">Caixa</a></td>
              <td class="table-responsive-price"></td>
              <td class="table-responsive-loja"></td>
            </tr>
          </tbody>
          <tbody class="total-not-purchased"><tr><td><strong>R$ 399.80</strong></td></tr></tbody>
          <tbody class="total"><tr><td><b>R$ 1,599.70</b></td></tr></tbody>
        </table>
        <div class="consumption">Consumo: <strong>250W</strong></div>
        <article class="message"><ul><li>Check the cooler height.</li></ul></article>
    "#;

    #[test]
    fn test_parse_build() {
        let parsed = parse_at(URL, BUILD).expect("valid build");

        assert_eq!(parsed.entries.len(), 4);
        assert_eq!(parsed.entries[0].category, "Memória");
        assert_eq!(parsed.entries[1].category, "Memória");
        assert_eq!(parsed.entries[0].price.as_deref(), Some("R$ 199.90"));
        assert!(parsed.entries[2].purchased);
        assert_eq!(parsed.entries[3].price, None);
        assert_eq!(parsed.wattage.as_deref(), Some("250W"));
        assert_eq!(
            parsed.compat.map(|c| c.notes),
            Some(vec!["Check the cooler height.".to_string()])
        );
    }

    #[test]
    fn test_total_split_by_purchase_state() {
        let parsed = parse_at(URL, BUILD).expect("valid build");
        assert_eq!(
            parsed.total.as_deref(),
            Some("R$ 1599.70 (R$ 399.80 Not Yet Purchased, R$ 1199.90 Purchased)")
        );
    }

    #[test]
    fn test_merge_respects_purchase_state() {
        let parsed = parse_at(URL, BUILD).expect("valid build");
        let parts = aggregate(parsed.entries, AggregationPolicy::Merge);

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].name, "**(2×)** [Kingston Fury 8GB](https://meupc.net/peca/ram)");
        assert_eq!(parts[0].price, "R$ 399.80");
        assert_eq!(parts[1].price, "R$ 199.90 (Purchased)");
    }

    #[test]
    fn test_redirect_to_empty_builder_is_invalid() {
        assert_eq!(
            parse_at("https://meupc.net/build", BUILD).err(),
            Some(AdapterError::Missing)
        );
    }
}
