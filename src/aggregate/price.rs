//! Price text normalisation and arithmetic on formatted price strings

use std::sync::LazyLock;

use regex::Regex;

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("amount pattern is valid"));

/// Decimal separator convention of a provider's price text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalStyle {
    /// `1,234.56`
    Dot,
    /// `1.234,56`
    Comma,
}

/// Rewrite price text into dot-decimal form without grouping separators.
///
/// Currency symbols, their placement and any surrounding words are kept as-is.
pub fn normalize(raw: &str, style: DecimalStyle) -> String {
    let raw = match style {
        DecimalStyle::Comma => raw.trim().replace(",-", ",00").replace(",\u{2013}", ",00"),
        DecimalStyle::Dot => raw.trim().to_string(),
    };
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());

    for (i, &c) in chars.iter().enumerate() {
        let between_digits = i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit);

        match c {
            ' ' | '\u{a0}' | '\u{202f}' | '\'' if between_digits => {}
            ',' if between_digits => {
                if style == DecimalStyle::Comma {
                    out.push('.');
                }
            }
            '.' if between_digits && style == DecimalStyle::Comma => {}
            _ => out.push(c),
        }
    }

    out
}

/// First numeric amount in a normalised price string
pub fn amount(display: &str) -> Option<f64> {
    AMOUNT.find(display).and_then(|m| m.as_str().parse().ok())
}

/// Multiply the amount inside a price string, keeping everything around it
pub fn scale(display: &str, count: u32) -> String {
    let Some(m) = AMOUNT.find(display) else {
        return display.to_string();
    };
    let Ok(unit) = m.as_str().parse::<f64>() else {
        return display.to_string();
    };

    format!(
        "{}{:.2}{}",
        &display[..m.start()],
        unit * f64::from(count),
        &display[m.end()..]
    )
}
