//! Merging of raw part rows into display rows

pub mod price;

use std::collections::HashMap;

use crate::models::{NormalizedPart, RawPartEntry};

/// Marker for parts picked by a parametric filter
pub const PARAMETRIC_MARKER: &str = "**\\***";

/// Whether identical rows of a provider may be collapsed into one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationPolicy {
    /// Rows with identical category, name, price and purchase state become one row
    Merge,
    /// Every row stays as scraped, with its own quantity
    Preserve,
}

/// Merge key; the price string already carries the purchased state
type PartKey = (String, String, String);

/// Turn raw rows into display rows with quantity annotations and multiplied prices
pub fn aggregate(entries: Vec<RawPartEntry>, policy: AggregationPolicy) -> Vec<NormalizedPart> {
    let mut groups: Vec<(PartKey, u32)> = Vec::with_capacity(entries.len());
    let mut index: HashMap<PartKey, usize> = HashMap::new();

    for entry in entries {
        let key = (entry.category.clone(), display_name(&entry), display_price(&entry));

        if policy == AggregationPolicy::Merge
            && let Some(&i) = index.get(&key)
        {
            groups[i].1 += entry.quantity;
            continue;
        }

        index.insert(key.clone(), groups.len());
        groups.push((key, entry.quantity));
    }

    groups
        .into_iter()
        .map(|((category, name, price), count)| normalize(category, name, price, count))
        .collect()
}

/// Sum of unit price times quantity over every priced row
pub fn total_of(entries: &[RawPartEntry]) -> f64 {
    entries
        .iter()
        .filter_map(|e| {
            let unit = price::amount(e.price.as_deref()?)?;
            Some(unit * f64::from(e.quantity))
        })
        .sum()
}

fn display_name(entry: &RawPartEntry) -> String {
    let mut name = match &entry.link {
        Some(link) => format!("[{}]({})", entry.name, link),
        None => entry.name.clone(),
    };
    if entry.parametric {
        name.push_str(PARAMETRIC_MARKER);
    }
    name
}

fn display_price(entry: &RawPartEntry) -> String {
    let price = entry.price.as_deref().unwrap_or("N/A");
    if entry.purchased {
        format!("{price} (Purchased)")
    } else {
        price.to_string()
    }
}

fn normalize(category: String, name: String, price: String, count: u32) -> NormalizedPart {
    if count <= 1 {
        return NormalizedPart {
            category,
            name,
            price,
            quantity: count.max(1),
        };
    }

    NormalizedPart {
        category,
        name: format!("**({count}×)** {name}"),
        price: price::scale(&price, count),
        quantity: count,
    }
}
