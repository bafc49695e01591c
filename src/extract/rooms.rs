use super::normalize::parse_count;
use super::{keyword_alternation, keyword_count_patterns, structured_text};
use crate::config::FieldLocator;
use crate::document::ListingDocument;
use crate::models::ExtractError;
use anyhow::Result;
use regex::Regex;
use std::borrow::Cow;

/// Bedroom and total room counts. Both are found independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomCounts {
    pub true_bedrooms: Option<u32>,
    pub total_rooms: Option<u32>,
}

pub struct RoomExtractor {
    bedrooms: FieldLocator,
    total_rooms: FieldLocator,
    /// Bedroom keywords come first in configuration, so "2 guļamistabas" beats "3 istabu"
    keyword_patterns: Vec<Regex>,
    /// Bathroom phrases blanked out before the scan ("vannas istabas: 2" is not a bedroom count)
    bathroom_terms: Option<Regex>,
}

impl RoomExtractor {
    pub fn new(
        bedrooms: FieldLocator,
        total_rooms: FieldLocator,
        keywords: &[String],
        bathroom_keywords: &[String],
    ) -> Result<Self> {
        Ok(Self {
            bedrooms,
            total_rooms,
            keyword_patterns: keyword_count_patterns(keywords)?,
            bathroom_terms: keyword_alternation(bathroom_keywords)?,
        })
    }

    pub fn extract(&self, doc: &dyn ListingDocument) -> Result<RoomCounts, ExtractError> {
        let total_rooms = structured_text(doc, &self.total_rooms)?
            .as_deref()
            .and_then(parse_count);

        let explicit = structured_text(doc, &self.bedrooms)?
            .as_deref()
            .and_then(parse_count);

        let true_bedrooms = explicit
            .or_else(|| total_rooms.map(bedrooms_from_total))
            .or_else(|| self.scan(doc.raw_text()));

        Ok(RoomCounts {
            true_bedrooms,
            total_rooms,
        })
    }

    fn scan(&self, raw: &str) -> Option<u32> {
        let text = match &self.bathroom_terms {
            Some(terms) => terms.replace_all(raw, " "),
            None => Cow::Borrowed(raw),
        };

        self.keyword_patterns
            .iter()
            .find_map(|re| re.captures(&text)?.get(1)?.as_str().parse().ok())
    }
}

/// One room is assumed to be the common room when only the total is known
pub fn bedrooms_from_total(total_rooms: u32) -> u32 {
    total_rooms.saturating_sub(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlListing;
    use scraper::Html;
    use url::Url;

    fn extractor() -> RoomExtractor {
        RoomExtractor::new(
            FieldLocator {
                labels: vec!["Guļamistabas".to_string()],
                selectors: vec![],
            },
            FieldLocator {
                labels: vec!["Istabas".to_string()],
                selectors: vec![],
            },
            &[
                "guļamistab".to_string(),
                "istab".to_string(),
                "bedroom".to_string(),
                "room".to_string(),
            ],
            &["vannas istab".to_string(), "bathroom".to_string()],
        )
        .unwrap()
    }

    fn rooms_of(body: &str) -> RoomCounts {
        let html = Html::parse_document(&format!("<html><body>{}</body></html>", body));
        let base = Url::parse("https://www.ss.lv/msg/lv/abc.html").unwrap();
        extractor().extract(&HtmlListing::from_document(&html, base)).unwrap()
    }

    #[test]
    fn test_explicit_bedroom_cell() {
        let counts = rooms_of(
            "<table><tr><td>Guļamistabas:</td><td>2</td></tr><tr><td>Istabas:</td><td>4</td></tr></table>",
        );
        assert_eq!(counts.true_bedrooms, Some(2));
        assert_eq!(counts.total_rooms, Some(4));
    }

    #[test]
    fn test_bedrooms_inferred_from_total() {
        let counts = rooms_of("<table><tr><td>Istabas:</td><td>4</td></tr></table>");
        assert_eq!(counts.true_bedrooms, Some(3));
        assert_eq!(counts.total_rooms, Some(4));
    }

    #[test]
    fn test_single_room_keeps_one_bedroom() {
        assert_eq!(bedrooms_from_total(1), 1);
        assert_eq!(bedrooms_from_total(0), 1);
        assert_eq!(bedrooms_from_total(2), 1);
    }

    #[test]
    fn test_non_digit_total_is_ignored() {
        let counts = rooms_of("<table><tr><td>Istabas:</td><td>Citi</td></tr></table><p>2 guļamistabas</p>");
        assert_eq!(counts.total_rooms, None);
        assert_eq!(counts.true_bedrooms, Some(2));
    }

    #[test]
    fn test_keyword_scan_is_case_insensitive() {
        let counts = rooms_of("<p>Spacious 3-Bedroom flat</p>");
        assert_eq!(counts.true_bedrooms, Some(3));
        assert_eq!(counts.total_rooms, None);
    }

    #[test]
    fn test_keyword_priority_beats_position() {
        let counts = rooms_of("<p>3 istabu dzīvoklis, 2 guļamistabas</p>");
        assert_eq!(counts.true_bedrooms, Some(2));
    }

    #[test]
    fn test_keyword_inside_another_word_is_ignored() {
        let counts = rooms_of("<p>Bathroom: 2</p>");
        assert_eq!(counts.true_bedrooms, None);
    }

    #[test]
    fn test_bathroom_phrase_is_not_a_bedroom_count() {
        let counts = rooms_of("<p>Vannas istabas: 2, balkons</p>");
        assert_eq!(counts.true_bedrooms, None);

        let counts = rooms_of("<p>Vannas istabas: 2, guļamistabas: 3</p>");
        assert_eq!(counts.true_bedrooms, Some(3));
    }

    #[test]
    fn test_word_boundary_without_bathroom_mask() {
        let extractor = RoomExtractor::new(
            FieldLocator::default(),
            FieldLocator::default(),
            &["room".to_string()],
            &[],
        )
        .unwrap();
        assert_eq!(extractor.scan("Bathroom: 2"), None);
        assert_eq!(extractor.scan("Room: 2"), Some(2));
    }

    #[test]
    fn test_nothing_found() {
        let counts = rooms_of("<p>Skaists dzīvoklis klusā vietā</p>");
        assert_eq!(counts, RoomCounts::default());
    }
}
