//! Per-message processing: extract links, render and parse each one in turn

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::aggregate::aggregate;
use crate::format::OutputFormatter;
use crate::links::{Extracted, LinkExtractor};
use crate::models::{CanonicalLink, FailureResult, ListResult, ParsedList};
use crate::scrapers::AdapterRegistry;
use crate::traits::{ListAdapter, PageRenderer, SessionFactory};

/// What happened to one link of a message, in message order
#[derive(Debug, Clone)]
pub enum LinkOutcome {
    Listed(ListResult),
    Failed(FailureResult),
    /// Unexpected render failure; nothing is sent for this link
    Aborted(CanonicalLink),
}

/// Read-only processing state shared by every message task
#[derive(Clone)]
pub struct Pipeline {
    registry: Arc<AdapterRegistry>,
    extractor: Arc<LinkExtractor>,
}

impl Pipeline {
    pub fn new(registry: Arc<AdapterRegistry>) -> Self {
        let extractor = Arc::new(LinkExtractor::new(&registry));
        Self { registry, extractor }
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Whether a message is worth opening a browser session for
    pub fn wants(&self, text: &str) -> bool {
        let text = self.extractor.normalize(text);
        self.registry.iter().any(|adapter| adapter.matches(&text))
    }

    /// Handle one message in its own renderer session, closed on every path
    pub async fn run(&self, text: &str, sessions: &dyn SessionFactory) -> Result<Vec<LinkOutcome>> {
        let mut renderer = sessions.open().await?;
        let outcomes = self.process(text, renderer.as_mut()).await;

        if let Err(e) = renderer.close().await {
            warn!("Failed to close browser session: {}", e);
        }
        Ok(outcomes)
    }

    /// Extract every link of a message and process them sequentially on one session
    pub async fn process(&self, text: &str, renderer: &mut dyn PageRenderer) -> Vec<LinkOutcome> {
        let extraction = self.extractor.extract(text, renderer, &self.registry).await;
        debug!(
            "Found {} link(s) and {} failed link(s)",
            extraction.links().len(),
            extraction.failures().len()
        );
        let mut outcomes = Vec::with_capacity(extraction.items.len());

        for item in extraction.items {
            let outcome = match item {
                Extracted::Link(link) => self.process_link(link, renderer).await,
                Extracted::Failure(failure) => LinkOutcome::Failed(failure),
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn process_link(&self, link: CanonicalLink, renderer: &mut dyn PageRenderer) -> LinkOutcome {
        let Some(adapter) = self.registry.get(link.provider) else {
            error!("No adapter registered for {}", link.provider);
            return LinkOutcome::Aborted(link);
        };
        let config = adapter.config();

        let document = match renderer.render(&link.url, &config.hints).await {
            Ok(document) => document,
            Err(e) => {
                error!("Failed to render {}: {}", link.url, e);
                return LinkOutcome::Aborted(link);
            }
        };

        match adapter.parse(&document, &link) {
            Ok(parsed) => {
                info!("Parsed {} list {} ({} rows)", link.site, link.url, parsed.entries.len());
                LinkOutcome::Listed(assemble(parsed, link, adapter))
            }
            Err(e) => {
                warn!("{} list {} rejected: {}", link.site, link.url, e);
                LinkOutcome::Failed(FailureResult::new(e.into(), link.provider, Some(link.url)))
            }
        }
    }
}

/// Aggregate and format a parsed list into its final result
pub fn assemble(parsed: ParsedList, link: CanonicalLink, adapter: &dyn ListAdapter) -> ListResult {
    let parts = aggregate(parsed.entries, adapter.aggregation());
    let formatted = OutputFormatter::new(adapter.config().budget)
        .with_footnote(parsed.footnote)
        .format(&parts);

    if formatted.truncated {
        info!("{} truncated, {} row(s) not shown", link.url, formatted.omitted);
    }

    ListResult {
        link,
        title: parsed.title,
        parts,
        body: formatted.body,
        total: parsed.total.unwrap_or_else(|| "N/A".to_string()),
        wattage: parsed.wattage,
        compat: parsed.compat,
        truncated: formatted.truncated,
        omitted: formatted.omitted,
    }
}
