use super::normalize::parse_count;
use super::{keyword_count_patterns, structured_text};
use crate::config::FieldLocator;
use crate::document::ListingDocument;
use crate::models::ExtractError;
use anyhow::Result;
use regex::Regex;

pub struct BathroomExtractor {
    locator: FieldLocator,
    /// Tried in order; keywords keep their configured priority
    patterns: Vec<Regex>,
    keywords: Vec<String>,
}

impl BathroomExtractor {
    pub fn new(locator: FieldLocator, keywords: &[String]) -> Result<Self> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(Self {
            locator,
            patterns: keyword_count_patterns(&keywords)?,
            keywords,
        })
    }

    /// Labelled cell, then digit+keyword patterns, then a bare keyword meaning one bathroom
    pub fn extract(&self, doc: &dyn ListingDocument) -> Result<Option<u32>, ExtractError> {
        if let Some(count) = structured_text(doc, &self.locator)?
            .as_deref()
            .and_then(parse_count)
        {
            return Ok(Some(count));
        }

        let text = doc.raw_text().to_lowercase();

        let counted = self
            .patterns
            .iter()
            .find_map(|re| re.captures(&text)?.get(1)?.as_str().parse().ok());
        if counted.is_some() {
            return Ok(counted);
        }

        if self.keywords.iter().any(|k| text.contains(k.as_str())) {
            return Ok(Some(1));
        }

        Ok(None)
    }
}
