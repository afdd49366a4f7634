//! Length-bounded rendering of a part list body
//!
//! Discord embed descriptions hold 4096 characters. The list body has to leave
//! room for the "Sent by" header and, for providers with secondary fields, for
//! the wattage and compatibility footer. The budget covers the whole body,
//! footnote and truncation notice included. Rows past it are not rendered but
//! are still counted so the notice reports the exact number left out.

use crate::models::NormalizedPart;

/// Budget for providers whose embed only adds a total field
pub const DEFAULT_BUDGET: usize = 4000;

/// Budget for providers that also show wattage and compatibility notes
pub const COMPACT_BUDGET: usize = 3700;

/// Rendered body plus truncation bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedList {
    pub body: String,
    pub truncated: bool,
    pub omitted: usize,
    pub rendered: usize,
}

/// Renders normalised parts under a fixed character budget
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    budget: usize,
    footnote: Option<String>,
}

impl OutputFormatter {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            footnote: None,
        }
    }

    /// Italic note placed after the rows, before any truncation notice
    pub fn with_footnote(mut self, footnote: Option<String>) -> Self {
        self.footnote = footnote;
        self
    }

    /// Render rows until the budget is reached.
    ///
    /// The budget covers the footnote and, once rows are dropped, the
    /// truncation notice as well, so the whole body never exceeds it.
    pub fn format(&self, parts: &[NormalizedPart]) -> FormattedList {
        let lines: Vec<String> = parts.iter().map(NormalizedPart::line).collect();
        let footnote = self
            .footnote
            .as_ref()
            .map(|f| format!("\n*{f}*\n"))
            .unwrap_or_default();
        let footnote_length = footnote.chars().count();
        let full_length: usize = lines.iter().map(|l| l.chars().count() + 1).sum();

        // the notice only needs room once a row is dropped; its count never exceeds the row count
        let row_budget = if full_length + footnote_length <= self.budget {
            self.budget - footnote_length
        } else {
            let notice_length = truncation_notice(parts.len()).chars().count();
            self.budget.saturating_sub(footnote_length + notice_length)
        };

        let mut body = String::new();
        let mut length = 0;
        let mut truncated = false;
        let mut rendered = 0;
        let mut omitted = 0;

        for line in &lines {
            // keep walking after the cut so the omitted count stays exact
            if truncated {
                omitted += 1;
                continue;
            }

            let line_length = line.chars().count() + 1;
            if length + line_length > row_budget {
                truncated = true;
                omitted += 1;
                continue;
            }

            length += line_length;
            body.push_str(line);
            body.push('\n');
            rendered += 1;
        }

        body.push_str(&footnote);
        if truncated {
            body.push_str(&truncation_notice(omitted));
        }

        FormattedList {
            body,
            truncated,
            omitted,
            rendered,
        }
    }
}

/// Standard notice appended to a truncated body
pub fn truncation_notice(omitted: usize) -> String {
    format!(
        "\n*Sorry, this part list is too long. {omitted} part(s) were not shown. Please click the button below to see the full list.*"
    )
}
