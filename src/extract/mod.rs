//! Field extractors. Each one walks an ordered chain of strategies and stops at the first hit.

pub mod bathrooms;
pub mod date;
pub mod fields;
pub mod furnishing;
pub mod normalize;
pub mod price;
pub mod rooms;

pub use bathrooms::BathroomExtractor;
pub use date::PostedDate;
pub use furnishing::Furnishing;
pub use price::PriceExtractor;
pub use rooms::{RoomCounts, RoomExtractor};

use crate::config::{FieldLocator, ScoutConfig};
use crate::document::ListingDocument;
use crate::models::ExtractError;
use anyhow::Result;
use regex::Regex;

/// Structured lookup: label cells first, then selectors. Empty text counts as a miss.
pub fn structured_text(
    doc: &dyn ListingDocument,
    locator: &FieldLocator,
) -> Result<Option<String>, ExtractError> {
    for label in &locator.labels {
        if let Some(text) = doc.label_value(label) {
            return Ok(Some(text));
        }
    }

    for selector in &locator.selectors {
        if let Some(text) = doc.select_text(selector)? {
            return Ok(Some(text));
        }
    }

    Ok(None)
}

/// Count patterns for each keyword in configured priority: digit before, then digit after
pub(crate) fn keyword_count_patterns(keywords: &[String]) -> Result<Vec<Regex>> {
    let mut patterns = Vec::with_capacity(keywords.len() * 2);
    for keyword in keywords.iter().map(|k| k.trim().to_lowercase()).filter(|k| !k.is_empty()) {
        let escaped = regex::escape(&keyword);
        patterns.push(digit_before(&escaped)?);
        patterns.push(digit_after(&escaped)?);
    }
    Ok(patterns)
}

/// Digit right before a keyword ("2 istabas", "2-bedroom")
fn digit_before(keyword: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(r"(?i)\b(\d{{1,2}})\s*-?\s*(?:{})", keyword))?)
}

/// Digit right after a keyword that starts a word ("istabas: 2", "wc 1")
fn digit_after(keyword: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?i)\b(?:{})\w*\.?\s*[:\-]?\s*(\d{{1,2}})\b",
        keyword
    ))?)
}

/// Case-insensitive alternation of the keywords, `None` when there are none
pub(crate) fn keyword_alternation(keywords: &[String]) -> Result<Option<Regex>> {
    let escaped: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect();

    if escaped.is_empty() {
        return Ok(None);
    }
    Ok(Some(Regex::new(&format!("(?i)(?:{})", escaped.join("|")))?))
}

/// Every extractor, compiled once from configuration
pub struct FieldExtractors {
    pub price: PriceExtractor,
    pub rooms: RoomExtractor,
    pub bathrooms: BathroomExtractor,
    pub fields: fields::TextFields,
    pub furnishing: furnishing::FurnishingClassifier,
    pub today_keywords: Vec<String>,
}

impl FieldExtractors {
    pub fn new(config: &ScoutConfig) -> Result<Self> {
        Ok(Self {
            price: PriceExtractor::new(config.fields.price.clone(), &config.locale.currency_symbols)?,
            rooms: RoomExtractor::new(
                config.fields.bedrooms.clone(),
                config.fields.total_rooms.clone(),
                &config.locale.bedroom,
                &config.locale.bathroom,
            )?,
            bathrooms: BathroomExtractor::new(config.fields.bathrooms.clone(), &config.locale.bathroom)?,
            fields: fields::TextFields::new(&config.fields, &config.locale.currency_symbols),
            furnishing: furnishing::FurnishingClassifier::new(&config.locale),
            today_keywords: config.locale.today.clone(),
        })
    }
}
