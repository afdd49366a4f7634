//! Failure classification for part list links
//!
//! Adapters and the link extractor report why a link could not become a list;
//! this module turns those signals into one of four terminal states and the
//! fixed notice wording that goes with each.

use thiserror::Error;

use crate::models::{FailureKind, FailureResult};
use crate::traits::AdapterConfig;

/// Colour used for all failure embeds
pub const FAILURE_COLOR: u32 = 0xFF_00_00;

/// Colour of the lighthearted empty list notice
pub const EMPTY_COLOR: u32 = 0xE8_EB_34;

/// Structured failure returned by a table adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The structural anchor that only renders for live, public lists is absent
    #[error("list structure not found on page")]
    Missing,
    /// The page is a valid list but decodes to zero usable rows
    #[error("list contains no usable parts")]
    NoParts,
}

impl From<AdapterError> for FailureKind {
    fn from(error: AdapterError) -> Self {
        match error {
            AdapterError::Missing => FailureKind::PrivateOrInvalid,
            AdapterError::NoParts => FailureKind::Empty,
        }
    }
}

/// User-facing notice for a failed link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub color: u32,
    pub attachment: Option<&'static str>,
}

/// Malformed links are dropped quietly; the same message would fail the same way again
pub fn is_reported(kind: FailureKind) -> bool {
    !matches!(kind, FailureKind::Malformed)
}

/// Build the notice for a failure of the given provider
pub fn notice(failure: &FailureResult, config: &AdapterConfig) -> Notice {
    let with_link = |title: &str| match &failure.link {
        Some(link) => format!("{title}\n{link}"),
        None => title.to_string(),
    };

    match failure.kind {
        FailureKind::Malformed => Notice {
            title: with_link("Incomplete list link detected"),
            body: "That link looks like it was cut off before the end.\n\nPlease send the full link again.".to_string(),
            color: FAILURE_COLOR,
            attachment: None,
        },
        FailureKind::PrivateOrInvalid => Notice {
            title: with_link(config.invalid_notice.title),
            body: config.invalid_notice.body.to_string(),
            color: FAILURE_COLOR,
            attachment: config.invalid_notice.attachment,
        },
        FailureKind::Empty => match config.empty_notice {
            Some(text) => Notice {
                title: text.title.to_string(),
                body: text.body.to_string(),
                color: EMPTY_COLOR,
                attachment: text.attachment,
            },
            None => Notice {
                title: "No parts found".to_string(),
                body: format!(
                    "That {} list doesn't have any parts in it yet.\n\nAdd some parts and send the link again.",
                    failure.provider
                ),
                color: EMPTY_COLOR,
                attachment: None,
            },
        },
        FailureKind::Blank => Notice {
            title: "Empty list detected".to_string(),
            body: format!(
                "Please make sure to copy the correct link when sending your {} list, otherwise I can't read it.\n\nDon't worry, this happens all the time :pensive:",
                failure.provider
            ),
            color: FAILURE_COLOR,
            attachment: Some("assets/wrong_link.png"),
        },
    }
}
