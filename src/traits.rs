//! Traits and interfaces for provider-agnostic list parsing

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::aggregate::AggregationPolicy;
use crate::errors::AdapterError;
use crate::models::{CanonicalLink, ParsedList, ProviderId, RenderedDocument};

/// Configuration for a part list provider
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub provider: ProviderId,
    /// Link shapes recognised in message text, in declaration order
    pub patterns: Vec<LinkPattern>,
    /// Text rewrites applied to a message before scanning (mirror domains etc.)
    pub aliases: Vec<(&'static str, &'static str)>,
    /// Interaction steps the renderer performs before handing back the page
    pub hints: RenderHints,
    /// Page languages the browser session should translate to English
    pub translate_from: Vec<&'static str>,
    /// Body length after which rows are counted but no longer rendered
    pub budget: usize,
    /// Embed colour
    pub color: u32,
    pub aggregation: AggregationPolicy,
    /// Wording used when a list of this provider is private or invalid
    pub invalid_notice: NoticeText,
    /// Wording used when a list of this provider has no parts, if it has its own
    pub empty_notice: Option<NoticeText>,
}

/// Static wording of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeText {
    pub title: &'static str,
    pub body: &'static str,
    /// Illustrative image shipped in `assets/`
    pub attachment: Option<&'static str>,
}

/// How the identifier following a link body is delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkShape {
    /// Link is exactly this many characters long, counted from the body start
    Fixed(usize),
    /// Link ends `tail` characters after the first `marker` that follows the body
    Terminated { marker: &'static str, tail: usize },
}

/// Where the region code of a link comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRule {
    Fixed(&'static str),
    /// Optional two letter subdomain (`uk.pcpartpicker.com`), else the default
    Subdomain { default: &'static str },
    /// Two characters of the canonical URL starting at this byte offset
    Slice(usize),
}

/// Whether a matched link is a list or must first be resolved into one
#[derive(Debug, Clone, PartialEq)]
pub enum LinkStage {
    List,
    Resolve(RenderHints),
}

/// One recognised link shape
#[derive(Debug, Clone, PartialEq)]
pub struct LinkPattern {
    /// Literal domain + path substring that anchors the match
    pub body: &'static str,
    pub shape: LinkShape,
    pub site: &'static str,
    pub region: RegionRule,
    /// A two letter subdomain may precede the body
    pub regional: bool,
    /// Marker the link must contain to be considered at all
    pub require: Option<&'static str>,
    pub stage: LinkStage,
    /// Identifiers of lists known to contain no parts
    pub empty_ids: &'static [&'static str],
    /// A bare body with nothing after it is reported instead of ignored
    pub reports_blank: bool,
}

impl LinkPattern {
    pub fn new(body: &'static str, shape: LinkShape, site: &'static str, region: RegionRule) -> Self {
        Self {
            body,
            shape,
            site,
            region,
            regional: false,
            require: None,
            stage: LinkStage::List,
            empty_ids: &[],
            reports_blank: false,
        }
    }

    pub fn regional(mut self) -> Self {
        self.regional = true;
        self
    }

    pub fn requiring(mut self, marker: &'static str) -> Self {
        self.require = Some(marker);
        self
    }

    pub fn resolved_with(mut self, hints: RenderHints) -> Self {
        self.stage = LinkStage::Resolve(hints);
        self
    }

    pub fn empty_ids(mut self, ids: &'static [&'static str]) -> Self {
        self.empty_ids = ids;
        self
    }

    pub fn reporting_blank(mut self) -> Self {
        self.reports_blank = true;
        self
    }

    pub fn is_resolver(&self) -> bool {
        matches!(self.stage, LinkStage::Resolve(_))
    }
}

/// Provider specific setup the renderer performs before returning a page
#[derive(Debug, Clone, PartialEq)]
pub struct RenderHints {
    /// Cookie banner button to click if it shows up
    pub consent: Option<&'static str>,
    /// Element whose presence means the dynamic content has loaded
    pub wait_for: Option<&'static str>,
    pub wait_timeout: Duration,
    /// Elements scrolled into view and clicked to reveal lazy content
    pub click: Option<&'static str>,
    /// Elements scrolled into view only
    pub reveal: Option<&'static str>,
    /// Fixed delay before the page source is taken
    pub settle: Duration,
}

impl Default for RenderHints {
    fn default() -> Self {
        Self {
            consent: None,
            wait_for: None,
            wait_timeout: Duration::from_secs(10),
            click: None,
            reveal: None,
            settle: Duration::ZERO,
        }
    }
}

/// Trait for provider-specific table adapters
pub trait ListAdapter: Send + Sync {
    /// Get the configuration for this adapter
    fn config(&self) -> &AdapterConfig;

    /// Extract the part rows and list metadata from a rendered page
    ///
    /// # Returns
    /// * `Err(AdapterError::Missing)` - the page is not a public, valid list
    /// * `Err(AdapterError::NoParts)` - the list decodes to zero usable rows
    fn parse(&self, document: &RenderedDocument, link: &CanonicalLink) -> Result<ParsedList, AdapterError>;

    /// Find the plain list link a build/saved/breakdown page points at
    fn resolve(&self, _document: &RenderedDocument, _link: &CanonicalLink) -> Option<String> {
        None
    }

    /// Does the (alias-normalised) text hold a list link of this provider worth replying to
    fn matches(&self, text: &str) -> bool {
        let config = self.config();
        config
            .patterns
            .iter()
            .any(|p| crate::links::mentions(config.provider, p, text))
    }

    fn aggregation(&self) -> AggregationPolicy {
        self.config().aggregation
    }
}

/// A browser session that turns URLs into rendered documents
#[async_trait]
pub trait PageRenderer: Send {
    /// Load a page, run the interaction steps and return its final state
    async fn render(&mut self, url: &str, hints: &RenderHints) -> Result<RenderedDocument>;

    /// Tear the session down
    async fn close(&mut self) -> Result<()>;
}

/// Opens one renderer session per handled message
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PageRenderer>>;
}
