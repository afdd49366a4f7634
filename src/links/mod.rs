//! Detection of part list links inside free-form message text
//!
//! Every provider declares literal link bodies (`pcpartpicker.com/list/`,
//! `geizhals.de/wishlists/`, ...). The scanner repeatedly picks the earliest
//! body occurrence across all providers, reads the link out at its known
//! length, consumes it from the working text and starts over, so links come
//! out in the order they were written. Build, saved and breakdown links are
//! first rewritten in place to the list link they point at.

use std::ops::Range;

use tracing::{debug, warn};

use crate::models::{CanonicalLink, FailureKind, FailureResult, ProviderId};
use crate::scrapers::AdapterRegistry;
use crate::traits::{LinkPattern, LinkShape, LinkStage, PageRenderer, RegionRule};

/// One item found in a message, in message order
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Link(CanonicalLink),
    Failure(FailureResult),
}

/// An item and its byte offset in the text it was found in
pub type Positioned = (usize, Extracted);

/// Result of scanning a message
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub items: Vec<Extracted>,
    /// Message text with every consumed link removed
    pub residual: String,
}

impl Extraction {
    pub fn links(&self) -> Vec<&CanonicalLink> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Extracted::Link(link) => Some(link),
                Extracted::Failure(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<&FailureResult> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Extracted::Failure(failure) => Some(failure),
                Extracted::Link(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    provider: ProviderId,
    pattern: LinkPattern,
}

#[derive(Debug)]
enum Outcome {
    Link(CanonicalLink),
    Empty(String),
    Blank,
    /// Cut off or broken by whitespace; carries the partial text
    Malformed(String),
    /// Site mentioned outside of a list link
    Rejected,
}

#[derive(Debug)]
struct Candidate<'a> {
    entry: &'a Entry,
    start: usize,
    end: usize,
    /// Where scanning resumes when the match is not consumed
    skip_to: usize,
    outcome: Outcome,
}

/// Finds and canonicalises provider links in message text
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    entries: Vec<Entry>,
    aliases: Vec<(&'static str, &'static str)>,
}

impl LinkExtractor {
    pub fn new(registry: &AdapterRegistry) -> Self {
        let mut entries = Vec::new();
        let mut aliases = Vec::new();

        for adapter in registry.iter() {
            let config = adapter.config();
            entries.extend(config.patterns.iter().map(|pattern| Entry {
                provider: config.provider,
                pattern: pattern.clone(),
            }));
            aliases.extend(config.aliases.iter().copied());
        }

        Self { entries, aliases }
    }

    /// Rewrite mirror domains and view fragments to the primary link vocabulary
    pub fn normalize(&self, text: &str) -> String {
        self.aliases
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
    }

    /// Extract plain list links without rendering anything
    pub fn scan(&self, text: &str) -> Extraction {
        let (items, residual) = self.scan_positioned(&self.normalize(text));

        Extraction {
            items: items.into_iter().map(|(_, item)| item).collect(),
            residual,
        }
    }

    /// Scan already normalized text, tagging each item with its offset in that text
    fn scan_positioned(&self, text: &str) -> (Vec<Positioned>, String) {
        let mut working = text.to_string();
        let mut cursor = 0;
        let mut items = Vec::new();
        // bytes consumed before the cursor, to map back to offsets in `text`
        let mut removed = 0;

        while let Some(candidate) = self.next_candidate(&working, cursor, false) {
            let before = working.len();
            let consumed = apply(candidate, &mut working, &mut cursor, &mut items, removed);
            removed += before - working.len();

            if let Some((link, range)) = consumed {
                working.replace_range(range.clone(), "");
                cursor = range.start;
                items.push((removed + range.start, Extracted::Link(link)));
                removed += range.len();
            }
        }

        (items, working)
    }

    /// Resolve build/saved/breakdown links, then extract every list link
    pub async fn extract(
        &self,
        text: &str,
        renderer: &mut dyn PageRenderer,
        registry: &AdapterRegistry,
    ) -> Extraction {
        let normalized = self.normalize(text);
        let (resolved, mut items) = self.resolve(&normalized, renderer, registry).await;
        let (scanned, residual) = self.scan_positioned(&resolved);

        // stable, so a removed link comes before whatever followed it at the same offset
        items.extend(scanned);
        items.sort_by_key(|(at, _)| *at);

        Extraction {
            items: items.into_iter().map(|(_, item)| item).collect(),
            residual,
        }
    }

    /// Replace every link that has to be resolved with the list link it points at.
    ///
    /// Links that cannot be resolved are removed and reported as private or invalid.
    /// Every reported item carries its offset in the returned text.
    pub async fn resolve(
        &self,
        text: &str,
        renderer: &mut dyn PageRenderer,
        registry: &AdapterRegistry,
    ) -> (String, Vec<Positioned>) {
        let mut working = text.to_string();
        let mut cursor = 0;
        let mut items = Vec::new();

        while let Some(candidate) = self.next_candidate(&working, cursor, true) {
            let pattern = candidate.entry.pattern.clone();
            let Some((link, range)) = apply(candidate, &mut working, &mut cursor, &mut items, 0) else {
                continue;
            };

            match resolve_one(&link, &pattern, renderer, registry).await {
                Some(list_url) => {
                    debug!("Resolved {} to {}", link.url, list_url);
                    let replacement = strip_scheme(&list_url).to_string();
                    working.replace_range(range.clone(), &replacement);
                    cursor = range.start + replacement.len();
                }
                None => {
                    warn!("Could not resolve {} into a part list", link.url);
                    working.replace_range(range.clone(), "");
                    cursor = range.start;
                    items.push((
                        range.start,
                        Extracted::Failure(FailureResult::new(
                            FailureKind::PrivateOrInvalid,
                            link.provider,
                            Some(link.url),
                        )),
                    ));
                }
            }
        }

        (working, items)
    }

    /// Earliest match at or after `cursor`; ties go to the first declared pattern
    fn next_candidate(&self, text: &str, cursor: usize, resolvers: bool) -> Option<Candidate<'_>> {
        let mut best: Option<(usize, &Entry, bool)> = None;

        for entry in self
            .entries
            .iter()
            .filter(|e| e.pattern.is_resolver() == resolvers)
        {
            if let Some((at, bare)) = find_body(text, cursor, &entry.pattern)
                && best.is_none_or(|(b, _, _)| at < b)
            {
                best = Some((at, entry, bare));
            }
        }

        let (at, entry, bare) = best?;
        Some(evaluate(text, at, entry, bare))
    }
}

/// Whether the text holds a link of this pattern that would produce a reply.
///
/// Bare site mentions and cut off links do not count.
pub fn mentions(provider: ProviderId, pattern: &LinkPattern, text: &str) -> bool {
    let entry = Entry {
        provider,
        pattern: pattern.clone(),
    };
    let mut cursor = 0;

    while let Some((at, bare)) = find_body(text, cursor, &entry.pattern) {
        let candidate = evaluate(text, at, &entry, bare);
        match candidate.outcome {
            Outcome::Rejected | Outcome::Malformed(_) => cursor = candidate.skip_to,
            Outcome::Link(_) | Outcome::Empty(_) | Outcome::Blank => return true,
        }
    }

    false
}

/// Record every outcome except a link, which is handed back with its range.
///
/// `offset` is added to the recorded positions.
fn apply(
    candidate: Candidate<'_>,
    working: &mut String,
    cursor: &mut usize,
    items: &mut Vec<Positioned>,
    offset: usize,
) -> Option<(CanonicalLink, Range<usize>)> {
    let provider = candidate.entry.provider;
    let range = candidate.start..candidate.end;
    let at = offset + candidate.start;

    match candidate.outcome {
        Outcome::Link(link) => return Some((link, range)),
        Outcome::Empty(url) => {
            working.replace_range(range.clone(), "");
            *cursor = range.start;
            items.push((
                at,
                Extracted::Failure(FailureResult::new(FailureKind::Empty, provider, Some(url))),
            ));
        }
        Outcome::Blank => {
            working.replace_range(range.clone(), "");
            *cursor = range.start;
            items.push((
                at,
                Extracted::Failure(FailureResult::new(FailureKind::Blank, provider, None)),
            ));
        }
        Outcome::Malformed(partial) => {
            warn!("Dropping cut off {} link: {}", provider, partial);
            *cursor = candidate.skip_to;
            items.push((
                at,
                Extracted::Failure(FailureResult::new(FailureKind::Malformed, provider, Some(partial))),
            ));
        }
        Outcome::Rejected => {
            debug!("Ignoring {} mention that is not a list link", provider);
            *cursor = candidate.skip_to;
        }
    }

    None
}

async fn resolve_one(
    link: &CanonicalLink,
    pattern: &LinkPattern,
    renderer: &mut dyn PageRenderer,
    registry: &AdapterRegistry,
) -> Option<String> {
    let LinkStage::Resolve(hints) = &pattern.stage else {
        return None;
    };
    let adapter = registry.get(link.provider)?;

    match renderer.render(&link.url, hints).await {
        Ok(document) => adapter.resolve(&document, link),
        Err(e) => {
            warn!("Failed to render {}: {}", link.url, e);
            None
        }
    }
}

/// Find the next occurrence of a pattern body.
///
/// The flag is set for a bare body (`pcpartpicker.com/list`) followed by
/// whitespace or the end of the text, which only counts for patterns that
/// report blank links.
fn find_body(text: &str, cursor: usize, pattern: &LinkPattern) -> Option<(usize, bool)> {
    let stub = pattern.body.trim_end_matches('/');
    let slashed = stub.len() != pattern.body.len();
    let mut from = cursor;

    while let Some(offset) = text.get(from..)?.find(stub) {
        let at = from + offset;
        let rest = &text[at + stub.len()..];

        if !slashed || rest.starts_with('/') {
            return Some((at, false));
        }
        if pattern.reports_blank && rest.chars().next().is_none_or(char::is_whitespace) {
            return Some((at, true));
        }
        from = at + stub.len();
    }

    None
}

fn evaluate<'a>(text: &str, at: usize, entry: &'a Entry, bare: bool) -> Candidate<'a> {
    let pattern = &entry.pattern;
    let body_end = at + pattern.body.len();
    let candidate = |start: usize, end: usize, outcome: Outcome| Candidate {
        entry,
        start,
        end,
        skip_to: body_end,
        outcome,
    };

    if bare {
        let stub_end = at + pattern.body.trim_end_matches('/').len();
        return candidate(at, stub_end, Outcome::Blank);
    }

    let token_end = text[body_end..]
        .find(char::is_whitespace)
        .map_or(text.len(), |i| body_end + i);
    if token_end == body_end {
        let outcome = if pattern.reports_blank {
            Outcome::Blank
        } else {
            Outcome::Rejected
        };
        return candidate(at, body_end, outcome);
    }

    let start = if pattern.regional && has_region_prefix(text, at) {
        at - 3
    } else {
        at
    };

    let end = match pattern.shape {
        LinkShape::Fixed(len) => take_chars(text, start, len + (at - start)),
        LinkShape::Terminated { marker, tail } => match text[body_end..token_end].find(marker) {
            Some(m) => take_chars(text, body_end + m + marker.len(), tail),
            None => return candidate(at, body_end, Outcome::Rejected),
        },
    };

    let window = &text[start..end.unwrap_or(text.len())];
    if let Some(marker) = pattern.require
        && !window.contains(marker)
    {
        return candidate(at, body_end, Outcome::Rejected);
    }
    let Some(end) = end else {
        return candidate(start, text.len(), Outcome::Malformed(window.to_string()));
    };
    if window.contains(char::is_whitespace) {
        return candidate(start, end, Outcome::Malformed(window.to_string()));
    }

    let ident = &text[body_end..end];
    let url = format!("https://{window}");
    if pattern.empty_ids.contains(&ident) {
        return candidate(start, end, Outcome::Empty(url));
    }

    let region = region_of(pattern.region, &text[start..at], &url);
    candidate(
        start,
        end,
        Outcome::Link(CanonicalLink {
            url,
            provider: entry.provider,
            site: pattern.site,
            region,
        }),
    )
}

/// Byte offset `n` characters after `start`, if the text is long enough
fn take_chars(text: &str, start: usize, n: usize) -> Option<usize> {
    let mut chars = text[start..].char_indices();
    match chars.nth(n) {
        Some((i, _)) => Some(start + i),
        None if text[start..].chars().count() == n => Some(text.len()),
        None => None,
    }
}

/// Two letters and a dot directly before the body, not part of a longer host label
fn has_region_prefix(text: &str, at: usize) -> bool {
    let bytes = text.as_bytes();
    at >= 3
        && bytes[at - 1] == b'.'
        && bytes[at - 2].is_ascii_alphabetic()
        && bytes[at - 3].is_ascii_alphabetic()
        && (at == 3 || !bytes[at - 4].is_ascii_alphanumeric())
}

fn region_of(rule: RegionRule, prefix: &str, url: &str) -> Option<String> {
    let code = match rule {
        RegionRule::Fixed(code) => code.to_string(),
        RegionRule::Subdomain { default } => match prefix.strip_suffix('.') {
            Some(sub) if !sub.is_empty() => sub.to_ascii_lowercase(),
            _ => default.to_string(),
        },
        RegionRule::Slice(offset) => url.get(offset..offset + 2)?.to_ascii_lowercase(),
    };

    // discord only has a flag for the ISO code
    Some(if code == "uk" { "gb".to_string() } else { code })
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::testing::FakeRenderer;

    fn extractor() -> (AdapterRegistry, LinkExtractor) {
        let registry = AdapterRegistry::default();
        let extractor = LinkExtractor::new(&registry);
        (registry, extractor)
    }

    fn urls(extraction: &Extraction) -> Vec<&str> {
        extraction.links().iter().map(|l| l.url.as_str()).collect()
    }

    fn kinds(extraction: &Extraction) -> Vec<FailureKind> {
        extraction.failures().iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_no_provider_mentions() {
        let (_, extractor) = extractor();
        let text = "my new build, thoughts? https://example.com/list/abc123";
        let extraction = extractor.scan(text);
        assert!(extraction.items.is_empty());
        assert_eq!(extraction.residual, text);
    }

    #[test]
    fn test_two_links_same_provider_in_order() {
        let (_, extractor) = extractor();
        let text = "old: https://pcpartpicker.com/list/AAAAAA new: https://pcpartpicker.com/list/BBBBBB";
        let extraction = extractor.scan(text);

        assert_eq!(
            urls(&extraction),
            ["https://pcpartpicker.com/list/AAAAAA", "https://pcpartpicker.com/list/BBBBBB"]
        );
        assert!(!extraction.residual.contains("pcpartpicker.com/list/"));
        assert!(extractor.scan(&extraction.residual).items.is_empty());
    }

    #[test]
    fn test_duplicate_links_are_each_returned() {
        let (_, extractor) = extractor();
        let text = "pcpartpicker.com/list/AAAAAA pcpartpicker.com/list/AAAAAA";
        assert_eq!(extractor.scan(text).links().len(), 2);
    }

    #[test]
    fn test_links_across_providers_keep_message_order() {
        let (_, extractor) = extractor();
        let text = "a https://geizhals.de/wishlists/1234567 b https://pcpartpicker.com/list/AAAAAA c https://hinta.fi/ostoskori/123456789";
        let extraction = extractor.scan(text);

        let providers: Vec<ProviderId> = extraction.links().iter().map(|l| l.provider).collect();
        assert_eq!(
            providers,
            [ProviderId::Geizhals, ProviderId::PcPartPicker, ProviderId::Hinta]
        );
    }

    #[test]
    fn test_regional_subdomain() {
        let (_, extractor) = extractor();
        let extraction = extractor.scan("https://uk.pcpartpicker.com/list/AbCdEf");
        let links = extraction.links();

        assert_eq!(links[0].url, "https://uk.pcpartpicker.com/list/AbCdEf");
        assert_eq!(links[0].region.as_deref(), Some("gb"));

        let extraction = extractor.scan("https://pcpartpicker.com/list/AbCdEf");
        assert_eq!(extraction.links()[0].region.as_deref(), Some("us"));
    }

    #[test]
    fn test_www_is_not_a_region() {
        let (_, extractor) = extractor();
        let extraction = extractor.scan("https://www.pcpartpicker.com/list/AbCdEf");
        assert_eq!(urls(&extraction), ["https://pcpartpicker.com/list/AbCdEf"]);
    }

    #[test]
    fn test_cut_off_link_is_malformed() {
        let (_, extractor) = extractor();
        // five characters short of a full link
        let extraction = extractor.scan("check this https://pcpartpicker.com/list/A");

        assert!(extraction.links().is_empty());
        assert_eq!(kinds(&extraction), [FailureKind::Malformed]);
    }

    #[test]
    fn test_link_broken_by_whitespace_is_malformed_and_scan_continues() {
        let (_, extractor) = extractor();
        let extraction =
            extractor.scan("pcpartpicker.com/list/AB and pcpartpicker.com/list/CCCCCC");

        assert_eq!(kinds(&extraction), [FailureKind::Malformed]);
        assert_eq!(urls(&extraction), ["https://pcpartpicker.com/list/CCCCCC"]);
    }

    #[test]
    fn test_blank_list_link() {
        let (_, extractor) = extractor();
        for text in ["go to pcpartpicker.com/list", "pcpartpicker.com/list/ thanks"] {
            let extraction = extractor.scan(text);
            assert!(extraction.links().is_empty(), "{text}");
            assert_eq!(kinds(&extraction), [FailureKind::Blank], "{text}");
        }
    }

    #[test]
    fn test_listing_word_is_not_blank() {
        let (_, extractor) = extractor();
        assert!(extractor.scan("pcpartpicker.com/listings").items.is_empty());
    }

    #[test]
    fn test_known_empty_list() {
        let (_, extractor) = extractor();
        let extraction = extractor.scan("https://pcpartpicker.com/list/sF8TwP");
        assert_eq!(kinds(&extraction), [FailureKind::Empty]);
        assert!(extraction.links().is_empty());
    }

    #[test]
    fn test_bare_site_mention_is_rejected() {
        let (_, extractor) = extractor();
        let extraction = extractor.scan("have you tried buildapc.gg/ for this?");
        assert!(extraction.items.is_empty());
    }

    #[test]
    fn test_buildapc_and_komponentkoll() {
        let (_, extractor) = extractor();
        let extraction = extractor
            .scan("https://buildapc.gg/uk/build/abcde and https://komponentkoll.se/build/fghij");
        let links = extraction.links();

        assert_eq!(links[0].url, "https://buildapc.gg/uk/build/abcde");
        assert_eq!(links[0].region.as_deref(), Some("gb"));
        assert_eq!(links[0].site, "buildapc.gg");
        assert_eq!(links[1].url, "https://komponentkoll.se/build/fghij");
        assert_eq!(links[1].region.as_deref(), Some("se"));
        assert_eq!(links[1].site, "KomponentKoll");
    }

    #[test]
    fn test_geizhals_network_sites() {
        let (_, extractor) = extractor();
        let extraction = extractor.scan(
            "skinflint.co.uk/wishlists/7654321 geizhals.at/wishlists/1234567 cenowarka.pl/wishlists/1111111",
        );
        let found: Vec<(&str, Option<&str>)> = extraction
            .links()
            .iter()
            .map(|l| (l.site, l.region.as_deref()))
            .collect();

        assert_eq!(
            found,
            [("Skinflint", Some("gb")), ("Geizhals", Some("at")), ("Cenowarka", Some("pl"))]
        );
    }

    #[test]
    fn test_tweakers_mirror_domain_and_terminated_link() {
        let (_, extractor) = extractor();
        let extraction = extractor
            .scan("https://tweakers.nl/gallery/123456/wenslijst/?wish_id=1234567 is mine");

        assert_eq!(
            urls(&extraction),
            ["https://tweakers.net/gallery/123456/wenslijst/?wish_id=1234567"]
        );
    }

    #[test]
    fn test_tweakers_gallery_without_wishlist_is_ignored() {
        let (_, extractor) = extractor();
        assert!(extractor.scan("tweakers.net/gallery/123456/").items.is_empty());
    }

    #[test]
    fn test_multibyte_text_around_links() {
        let (_, extractor) = extractor();
        let extraction = extractor.scan("Käse → https://meupc.net/build/AbC123 ✓");
        assert_eq!(urls(&extraction), ["https://meupc.net/build/AbC123"]);
    }

    #[tokio::test]
    async fn test_build_link_is_resolved_before_list_scan() {
        let (registry, extractor) = extractor();
        let mut renderer = FakeRenderer::default().with_page(
            "https://uk.pcpartpicker.com/b/XyZ123",
            r#"<html><body><a href="/list/">none</a><a href="/list/QwErTy">Parts</a></body></html>"#,
        );

        let extraction = extractor
            .extract(
                "build: https://uk.pcpartpicker.com/b/XyZ123 and pcpartpicker.com/list/AAAAAA",
                &mut renderer,
                &registry,
            )
            .await;

        assert_eq!(
            urls(&extraction),
            ["https://uk.pcpartpicker.com/list/QwErTy", "https://pcpartpicker.com/list/AAAAAA"]
        );
        assert!(extraction.failures().is_empty());
    }

    #[tokio::test]
    async fn test_saved_list_is_resolved() {
        let (registry, extractor) = extractor();
        let mut renderer = FakeRenderer::default().with_page(
            "https://pcpartpicker.com/user/someone/saved/AbCdEf",
            r#"<input class="text-input" type="text" value="https://pcpartpicker.com/list/GhIjKl">"#,
        );

        let extraction = extractor
            .extract(
                "pcpartpicker.com/user/someone/saved/#view=AbCdEf",
                &mut renderer,
                &registry,
            )
            .await;

        assert_eq!(urls(&extraction), ["https://pcpartpicker.com/list/GhIjKl"]);
    }

    #[tokio::test]
    async fn test_unresolvable_build_is_private() {
        let (registry, extractor) = extractor();
        let mut renderer = FakeRenderer::default();

        let extraction = extractor
            .extract("pcpartpicker.com/b/XyZ123", &mut renderer, &registry)
            .await;

        assert!(extraction.links().is_empty());
        assert_eq!(kinds(&extraction), [FailureKind::PrivateOrInvalid]);
        assert_eq!(
            extraction.failures()[0].link.as_deref(),
            Some("https://pcpartpicker.com/b/XyZ123")
        );
    }

    #[tokio::test]
    async fn test_unresolvable_build_keeps_its_place_between_lists() {
        let (registry, extractor) = extractor();
        let mut renderer = FakeRenderer::default();

        let extraction = extractor
            .extract(
                "first pcpartpicker.com/list/AAAAAA then pcpartpicker.com/b/XyZ123 last pcpartpicker.com/list/BBBBBB",
                &mut renderer,
                &registry,
            )
            .await;

        let order: Vec<Option<&str>> = extraction
            .items
            .iter()
            .map(|item| match item {
                Extracted::Link(link) => Some(link.url.as_str()),
                Extracted::Failure(_) => None,
            })
            .collect();
        assert_eq!(
            order,
            [
                Some("https://pcpartpicker.com/list/AAAAAA"),
                None,
                Some("https://pcpartpicker.com/list/BBBBBB"),
            ]
        );
        assert_eq!(kinds(&extraction), [FailureKind::PrivateOrInvalid]);
    }

    #[tokio::test]
    async fn test_resolved_and_failed_items_interleave_with_scan_failures() {
        let (registry, extractor) = extractor();
        let mut renderer = FakeRenderer::default().with_page(
            "https://pcpartpicker.com/b/XyZ123",
            r#"<html><body><a href="/list/QwErTy">Parts</a></body></html>"#,
        );

        let extraction = extractor
            .extract(
                "pcpartpicker.com/list/sF8TwP pcpartpicker.com/b/NoPage pcpartpicker.com/b/XyZ123 pcpartpicker.com/list",
                &mut renderer,
                &registry,
            )
            .await;

        assert_eq!(
            kinds(&extraction),
            [FailureKind::Empty, FailureKind::PrivateOrInvalid, FailureKind::Blank]
        );
        assert!(matches!(&extraction.items[0], Extracted::Failure(f) if f.kind == FailureKind::Empty));
        assert!(matches!(&extraction.items[1], Extracted::Failure(f) if f.kind == FailureKind::PrivateOrInvalid));
        assert!(matches!(&extraction.items[2], Extracted::Link(l) if l.url == "https://pcpartpicker.com/list/QwErTy"));
        assert!(matches!(&extraction.items[3], Extracted::Failure(f) if f.kind == FailureKind::Blank));
    }
}
