//! Provider table adapters and the registry that owns them

use scraper::{ElementRef, Selector};

/// Declare lazily parsed, compile-time constant CSS selectors
macro_rules! selectors {
    ($($name:ident = $css:literal;)*) => {
        $(
            static $name: std::sync::LazyLock<scraper::Selector> = std::sync::LazyLock::new(|| {
                scraper::Selector::parse($css).expect(concat!("invalid selector: ", $css))
            });
        )*
    };
}

pub mod buildapc;
pub mod geizhals;
pub mod hinta;
pub mod meupc;
pub mod pcpartpicker;
pub mod pcpricetracker;
pub mod tweakers;

use crate::models::ProviderId;
use crate::traits::ListAdapter;

pub use buildapc::BuildApcAdapter;
pub use geizhals::GeizhalsAdapter;
pub use hinta::HintaAdapter;
pub use meupc::MeupcAdapter;
pub use pcpartpicker::PcPartPickerAdapter;
pub use pcpricetracker::PcPriceTrackerAdapter;
pub use tweakers::TweakersAdapter;

/// All known adapters, in link matching priority order
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn ListAdapter>>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self {
            adapters: vec![
                Box::new(PcPartPickerAdapter::new()),
                Box::new(PcPriceTrackerAdapter::new()),
                Box::new(BuildApcAdapter::new()),
                Box::new(GeizhalsAdapter::new()),
                Box::new(HintaAdapter::new()),
                Box::new(MeupcAdapter::new()),
                Box::new(TweakersAdapter::new()),
            ],
        }
    }
}

impl AdapterRegistry {
    pub fn get(&self, provider: ProviderId) -> Option<&dyn ListAdapter> {
        self.iter().find(|a| a.config().provider == provider)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ListAdapter> {
        self.adapters.iter().map(|a| a.as_ref())
    }

    /// Union of every provider's page languages, for the browser translation prefs
    pub fn translate_languages(&self) -> Vec<&'static str> {
        let mut languages: Vec<&'static str> = Vec::new();
        for lang in self.iter().flat_map(|a| a.config().translate_from.iter().copied()) {
            if !languages.contains(&lang) {
                languages.push(lang);
            }
        }
        languages
    }
}

/// Element text with runs of whitespace collapsed to single spaces
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .replace('\u{200b}', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapsed text of the first match inside `scope`, if not empty
pub(crate) fn select_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
}

/// Attribute of the first match inside `scope`
pub(crate) fn select_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Leading integer of a quantity field such as `2`, `2x` or `3 pcs`
pub(crate) fn parse_quantity(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Scheme and host of a URL (`https://buildapc.gg`)
pub(crate) fn origin_of(url: &str) -> &str {
    let host_start = url.find("://").map_or(0, |i| i + 3);
    match url[host_start..].find('/') {
        Some(i) => &url[..host_start + i],
        None => url,
    }
}

/// Resolve a possibly relative href against a site origin
pub(crate) fn absolute(origin: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(path) = href.strip_prefix('/') {
        format!("{}/{}", origin.trim_end_matches('/'), path)
    } else {
        format!("{}/{}", origin.trim_end_matches('/'), href)
    }
}
