//! PCPartPicker part lists, completed builds and saved lists

use std::time::Duration;

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::aggregate::AggregationPolicy;
use crate::aggregate::price::{self, DecimalStyle};
use crate::errors::AdapterError;
use crate::format::COMPACT_BUDGET;
use crate::models::{CanonicalLink, CompatNotes, ParsedList, ProviderId, RawPartEntry, RenderedDocument};
use crate::scrapers::{select_attr, select_text, text_of};
use crate::traits::{AdapterConfig, LinkPattern, LinkShape, ListAdapter, NoticeText, RegionRule, RenderHints};

selectors! {
    TABLE = "table.xs-col-12";
    PRODUCT_ROWS = "tr.tr__product";
    COMPONENT = "td.td__component";
    NAME = "td.td__name";
    NAME_LINK = "td.td__name a[href]";
    PRICE = "td.td__price";
    WHERE = "td.td__where";
    TOTAL_ROWS = "tr.tr__total";
    TOTAL_LABEL = "td.td__label";
    TOTAL_PRICE = "td.td__price";
    WATTAGE = "div.partlist__keyMetric";
    COMPAT_HEADER = "div.subTitle__header h2";
    COMPAT_NOTES = "p.note__text--info, p.note__text--warning, p.note__text--problem";
    NOTE_LABEL = "span";
    LIST_ANCHORS = "a[href^=\"/list/\"]";
    SHARE_INPUT = "input.text-input[type=\"text\"]";
}

const ORIGIN: &str = "https://pcpartpicker.com";

/// Identifier of the public list PCPartPicker shows for an empty list
const EMPTY_LIST_IDS: &[&str] = &["sF8TwP"];

const PARAMETRIC_FOOTNOTE: &str =
    "\\* Indicates a part selected by a parametric filter. Please open the full list for more information.";

const NO_ISSUES: &str = "No issues or incompatibilities detected.";

/// Adapter for pcpartpicker.com and its regional subdomains
pub struct PcPartPickerAdapter {
    config: AdapterConfig,
}

impl PcPartPickerAdapter {
    pub fn new() -> Self {
        let region = RegionRule::Subdomain { default: "us" };
        let saved_hints = RenderHints {
            click: Some("a.actionBox__options--edit"),
            settle: Duration::from_secs(4),
            ..RenderHints::default()
        };

        let config = AdapterConfig {
            provider: ProviderId::PcPartPicker,
            patterns: vec![
                LinkPattern::new("pcpartpicker.com/list/", LinkShape::Fixed(28), "PCPartPicker", region)
                    .regional()
                    .empty_ids(EMPTY_LIST_IDS)
                    .reporting_blank(),
                LinkPattern::new("pcpartpicker.com/b/", LinkShape::Fixed(25), "PCPartPicker", region)
                    .regional()
                    .resolved_with(RenderHints::default()),
                LinkPattern::new(
                    "pcpartpicker.com/user/",
                    LinkShape::Terminated {
                        marker: "/saved/",
                        tail: 6,
                    },
                    "PCPartPicker",
                    region,
                )
                .regional()
                .resolved_with(saved_hints),
            ],
            // view links of saved lists carry the id in a fragment
            aliases: vec![("#view=", "")],
            hints: RenderHints {
                // custom part URLs only load once their row is opened
                click: Some("a[href*=\"#view_custom_part\"]"),
                settle: Duration::from_millis(300),
                ..RenderHints::default()
            },
            translate_from: Vec::new(),
            budget: COMPACT_BUDGET,
            color: 0xFF_55_FF,
            aggregation: AggregationPolicy::Merge,
            invalid_notice: NoticeText {
                title: "Private or invalid link detected",
                body: "I ran into some trouble opening a list you sent.\n\nPlease make sure all the PCPartPicker links in your message are valid, and that any saved part lists are public (\"Private\" checkbox unchecked).",
                attachment: Some("assets/private_checkbox.png"),
            },
            empty_notice: Some(NoticeText {
                title: "PCPartIgnorer",
                body: "You forgot to put parts in your part list!\n\nNow I don't have a job to do... :cry:",
                attachment: Some("assets/empty_list.jpeg"),
            }),
        };

        Self { config }
    }

    fn parse_row(row: ElementRef<'_>) -> Option<RawPartEntry> {
        let category = select_text(row, &COMPONENT)?;
        let name_cell = row.select(&NAME).next()?;
        let name_text = name_cell.text().collect::<String>().replace('\u{200b}', "");
        let mut lines = name_text.lines().map(str::trim).filter(|l| !l.is_empty());
        let name = lines.next()?.to_string();
        let parametric = name_text.contains("parametric");

        let link = match select_attr(row, &NAME_LINK, "href") {
            Some(href) if !href.contains("view_custom_part") => Some(format!("{ORIGIN}{href}")),
            // custom parts show their own URL as the last line of the cell
            Some(_) => name_text
                .lines()
                .map(str::trim)
                .rfind(|l| !l.is_empty())
                .filter(|l| l.starts_with("https://"))
                .map(str::to_string),
            None => None,
        };

        let price = select_text(row, &PRICE)
            .map(|p| p.trim_start_matches("Price").trim().to_string())
            .filter(|p| !p.is_empty() && p != "No Prices Available")
            .map(|p| price::normalize(&p, DecimalStyle::Dot));

        let purchased = select_text(row, &WHERE).is_some_and(|w| w.contains("Purchased"));

        let mut entry = RawPartEntry::new(category, name)
            .with_link(link)
            .with_price(price)
            .purchased(purchased);
        entry.parametric = parametric;
        Some(entry)
    }

    /// Grand total, with purchased sub-totals in parentheses when there are any
    fn parse_total(document: &Html) -> Option<String> {
        let rows: Vec<(String, String)> = document
            .select(&TOTAL_ROWS)
            .filter_map(|row| {
                let label = select_text(row, &TOTAL_LABEL)?;
                let value = select_text(row, &TOTAL_PRICE)?;
                Some((label, value))
            })
            .collect();

        let grand: Vec<&str> = rows
            .iter()
            .filter(|(label, _)| label.contains("Total") && !label.contains("Base") && !label.contains("Purchased"))
            .map(|(_, value)| value.as_str())
            .collect();
        let purchased: Vec<(&str, &str)> = rows
            .iter()
            .filter(|(label, _)| label.contains("Purchased"))
            .map(|(label, value)| {
                let indicator = label.trim_start_matches("Total (").trim_end_matches("):");
                (indicator, value.as_str())
            })
            .collect();

        let mut total = grand.join(" + ");
        if purchased.is_empty() {
            return Some(total).filter(|t| !t.is_empty());
        }

        if total.is_empty() {
            // every part is purchased, so only the purchased total exists
            total = purchased
                .iter()
                .map(|(_, value)| format!("{value} (Purchased)"))
                .collect::<Vec<_>>()
                .join(" + ");
        } else {
            let split = purchased
                .iter()
                .map(|(indicator, value)| format!("{value} {indicator}"))
                .collect::<Vec<_>>()
                .join(", ");
            total = format!("{total} ({split})");
        }
        Some(total)
    }

    fn parse_wattage(document: &Html) -> Option<String> {
        let metric = select_text(document.root_element(), &WATTAGE)?;
        let value = match metric.split_once(':') {
            Some((_, value)) => value.trim().to_string(),
            None => metric,
        };
        Some(value).filter(|v| !v.is_empty())
    }

    fn parse_compat(document: &Html) -> Option<CompatNotes> {
        let mut notes: Vec<ElementRef<'_>> = document.select(&COMPAT_NOTES).collect();
        // the last note is the generic measurement disclaimer every list carries
        if notes.pop().is_none() {
            return None;
        }

        let header = select_text(document.root_element(), &COMPAT_HEADER)
            .unwrap_or_else(|| NO_ISSUES.to_string());
        let notes: Vec<String> = notes
            .into_iter()
            .map(|note| {
                let full = text_of(note);
                let label = select_text(note, &NOTE_LABEL).unwrap_or_default();
                full.strip_prefix(&label).unwrap_or(&full).trim().to_string()
            })
            .filter(|n| !n.is_empty() && !n.contains("currently not supported"))
            .collect();

        if notes.is_empty() {
            None
        } else {
            Some(CompatNotes { header, notes })
        }
    }
}

impl Default for PcPartPickerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ListAdapter for PcPartPickerAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn parse(&self, document: &RenderedDocument, link: &CanonicalLink) -> Result<ParsedList, AdapterError> {
        let html = Html::parse_document(&document.html);
        let table = html.select(&TABLE).next().ok_or(AdapterError::Missing)?;

        let entries: Vec<RawPartEntry> = table.select(&PRODUCT_ROWS).filter_map(Self::parse_row).collect();
        if entries.is_empty() {
            return Err(AdapterError::NoParts);
        }
        debug!("Parsed {} rows from {}", entries.len(), link.url);

        let footnote = entries
            .iter()
            .any(|e| e.parametric)
            .then(|| PARAMETRIC_FOOTNOTE.to_string());

        Ok(ParsedList {
            title: None,
            total: Self::parse_total(&html),
            wattage: Self::parse_wattage(&html),
            compat: Self::parse_compat(&html),
            footnote,
            entries,
        })
    }

    fn resolve(&self, document: &RenderedDocument, link: &CanonicalLink) -> Option<String> {
        let html = Html::parse_document(&document.html);

        if let Some(at) = link.url.find("pcpartpicker.com/b/") {
            // completed builds link back to their part list
            let origin = &link.url[..at + "pcpartpicker.com".len()];
            return html
                .select(&LIST_ANCHORS)
                .filter_map(|a| a.value().attr("href"))
                .filter(|href| href.len() > "/list/".len())
                .last()
                .map(|href| format!("{origin}{href}"));
        }

        select_attr(html.root_element(), &SHARE_INPUT, "value").filter(|v| v.contains("/list/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> CanonicalLink {
        CanonicalLink {
            url: "https://pcpartpicker.com/list/AbCdEf".to_string(),
            provider: ProviderId::PcPartPicker,
            site: "PCPartPicker",
            region: Some("us".to_string()),
        }
    }

    fn document(html: &str) -> RenderedDocument {
        RenderedDocument {
            url: link().url,
            html: html.to_string(),
        }
    }

    const LIST: &str = r##"
        <html><body>
        <div class="partlist__keyMetric">Estimated Wattage:
            350W</div>
        <div class="subTitle__header"><h2>Compatibility Notes</h2></div>
        <p class="note__text note__text--warning"><span class="note__label">Warning!</span> The case may require additional fans.</p>
        <p class="note__text note__text--info"><span>Note:</span> Fan support is currently not supported.</p>
        <p class="note__text note__text--info"><span>Disclaimer:</span> Some physical constraints are not checked.</p>
        <table class="xs-col-12">
          <thead><tr><th>Component</th></tr></thead>
          <tbody>
            <tr class="tr__product">
              <td class="td__component"><a href="/products/cpu/">CPU</a></td>
              <td class="td__name"><a href="/product/abc/amd-ryzen-5-7600x">AMD Ryzen 5 7600X</a></td>
              <td class="td__price"><h6>Price</h6>$199.99</td>
              <td class="td__where"></td>
            </tr>
            <tr class="tr__product">
              <td class="td__component"><a href="/products/memory/">Memory</a></td>
              <td class="td__name"><a href="/product/def/ram">Corsair Vengeance 16 GB</a>
                <div class="td__name--parametric">From parametric filter</div></td>
              <td class="td__price"><h6>Price</h6>$59.99</td>
              <td class="td__where"></td>
            </tr>
            <tr class="tr__product">
              <td class="td__component"><a href="/products/memory/">Memory</a></td>
              <td class="td__name"><a href="/product/def/ram">Corsair Vengeance 16 GB</a>
                <div class="td__name--parametric">From parametric filter</div></td>
              <td class="td__price"><h6>Price</h6>$59.99</td>
              <td class="td__where"></td>
            </tr>
            <tr class="tr__product">
              <td class="td__component">Case Fan</td>
              <td class="td__name">My Custom Fan
                <a href="#view_custom_part_1">View</a>
                https://example.com/fan</td>
              <td class="td__price"><h6>Price</h6>No Prices Available</td>
              <td class="td__where"><span>Purchased</span></td>
            </tr>
            <tr class="tr__total tr__total--final"><td class="td__label">Total:</td><td class="td__price">$319.97</td></tr>
          </tbody>
        </table>
        </body></html>
    "##;

    #[test]
    fn test_parse_rows() {
        let adapter = PcPartPickerAdapter::new();
        let parsed = adapter.parse(&document(LIST), &link()).expect("valid list");

        assert_eq!(parsed.entries.len(), 4);
        let cpu = &parsed.entries[0];
        assert_eq!(cpu.category, "CPU");
        assert_eq!(cpu.name, "AMD Ryzen 5 7600X");
        assert_eq!(cpu.link.as_deref(), Some("https://pcpartpicker.com/product/abc/amd-ryzen-5-7600x"));
        assert_eq!(cpu.price.as_deref(), Some("$199.99"));
        assert!(!cpu.parametric);

        assert!(parsed.entries[1].parametric);
        assert_eq!(parsed.footnote.as_deref(), Some(PARAMETRIC_FOOTNOTE));

        let fan = &parsed.entries[3];
        assert_eq!(fan.name, "My Custom Fan");
        assert_eq!(fan.link.as_deref(), Some("https://example.com/fan"));
        assert_eq!(fan.price, None);
        assert!(fan.purchased);
    }

    #[test]
    fn test_secondary_fields() {
        let adapter = PcPartPickerAdapter::new();
        let parsed = adapter.parse(&document(LIST), &link()).expect("valid list");

        assert_eq!(parsed.total.as_deref(), Some("$319.97"));
        assert_eq!(parsed.wattage.as_deref(), Some("350W"));
        let compat = parsed.compat.expect("compat notes");
        assert_eq!(compat.header, "Compatibility Notes");
        assert_eq!(compat.notes, ["The case may require additional fans."]);
    }

    #[test]
    fn test_purchased_totals() {
        let html = r#"
            <table class="xs-col-12"><tbody>
              <tr class="tr__product"><td class="td__component">CPU</td><td class="td__name">Chip</td><td class="td__price">Price$100.00</td></tr>
              <tr class="tr__total"><td class="td__label">Base Total:</td><td class="td__price">$90.00</td></tr>
              <tr class="tr__total"><td class="td__label">Total:</td><td class="td__price">$150.00</td></tr>
              <tr class="tr__total"><td class="td__label">Total (Purchased):</td><td class="td__price">$50.00</td></tr>
              <tr class="tr__total"><td class="td__label">Total (Not Yet Purchased):</td><td class="td__price">$100.00</td></tr>
            </tbody></table>
        "#;
        let parsed = PcPartPickerAdapter::new()
            .parse(&document(html), &link())
            .expect("valid list");

        assert_eq!(
            parsed.total.as_deref(),
            Some("$150.00 ($50.00 Purchased, $100.00 Not Yet Purchased)")
        );
        assert_eq!(parsed.wattage, None);
        assert_eq!(parsed.compat, None);
    }

    #[test]
    fn test_multiple_currency_totals() {
        let html = r#"
            <table class="xs-col-12"><tbody>
              <tr class="tr__product"><td class="td__component">CPU</td><td class="td__name">Chip</td><td class="td__price">Price$100.00</td></tr>
              <tr class="tr__total"><td class="td__label">Total:</td><td class="td__price">$100.00</td></tr>
              <tr class="tr__total"><td class="td__label">Total:</td><td class="td__price">€20.00</td></tr>
            </tbody></table>
        "#;
        let parsed = PcPartPickerAdapter::new()
            .parse(&document(html), &link())
            .expect("valid list");
        assert_eq!(parsed.total.as_deref(), Some("$100.00 + €20.00"));
    }

    #[test]
    fn test_private_list_is_missing() {
        let result = PcPartPickerAdapter::new().parse(
            &document("<html><body><h1>This list is private</h1></body></html>"),
            &link(),
        );
        assert_eq!(result.err(), Some(AdapterError::Missing));
    }

    #[test]
    fn test_table_without_parts() {
        let result = PcPartPickerAdapter::new().parse(
            &document(r#"<table class="xs-col-12"><tbody></tbody></table>"#),
            &link(),
        );
        assert_eq!(result.err(), Some(AdapterError::NoParts));
    }
}
