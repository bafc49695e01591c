use super::normalize::normalize;
use super::structured_text;
use crate::config::FieldLocator;
use crate::document::ListingDocument;
use crate::models::{Currency, ExtractError, Price};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) static NUMERIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)*").expect("static numeric regex"));

const EURO_MARKERS: [&str; 2] = ["€", "EUR"];

/// Characters inspected on each side of a scanned token when inferring the currency
const CONTEXT_CHARS: usize = 5;

pub struct PriceExtractor {
    locator: FieldLocator,
    currency_symbols: Vec<String>,
    /// Amount directly followed by a currency symbol, thousands groups allowed.
    /// Starts at a word boundary so "m2 650 EUR" is not read as 2 650.
    anchored: Option<Regex>,
}

impl PriceExtractor {
    pub fn new(locator: FieldLocator, currency_symbols: &[String]) -> Result<Self> {
        let symbols: Vec<String> = currency_symbols
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| regex::escape(s.trim()))
            .collect();

        let anchored = if symbols.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"\b(\d+(?:[ \x{{a0}}\x{{202f}}]\d{{3}})*(?:[.,]\d+)?)[ \x{{a0}}\x{{202f}}]*(?:{})",
                symbols.join("|")
            ))?)
        };

        Ok(Self {
            locator,
            currency_symbols: currency_symbols.to_vec(),
            anchored,
        })
    }

    /// Structured cell first, then a scan of the full listing text.
    /// `MalformedDocument` means the document itself could not be queried.
    pub fn extract(&self, doc: &dyn ListingDocument) -> Result<Price, ExtractError> {
        let mut failure = ExtractError::missing("price");

        if let Some(text) = structured_text(doc, &self.locator)? {
            match self.parse_text(&text) {
                Ok(price) => return Ok(price),
                Err(err) => failure = err,
            }
        }

        match self.scan(doc.raw_text()) {
            Some(Ok(price)) => Ok(price),
            Some(Err(err)) => Err(err),
            None => Err(failure),
        }
    }

    /// Parse a price cell such as `"1 200,50 €"`
    pub fn parse_text(&self, text: &str) -> Result<Price, ExtractError> {
        let normalized = normalize(text, &self.currency_symbols);
        let token = NUMERIC_TOKEN
            .find(&normalized)
            .ok_or_else(|| ExtractError::unparseable("price", text.trim()))?;

        Ok(Price {
            amount: parse_amount(token.as_str(), text)?,
            currency: currency_of(text),
        })
    }

    fn scan(&self, raw: &str) -> Option<Result<Price, ExtractError>> {
        let (start, end) = match self.anchored.as_ref().and_then(|re| re.captures(raw)) {
            Some(caps) => {
                let amount = caps.get(1)?;
                (amount.start(), caps.get(0)?.end())
            }
            None => {
                let token = NUMERIC_TOKEN.find(raw)?;
                (token.start(), token.end())
            }
        };

        let matched = &raw[start..end];
        let token = normalize(matched, &self.currency_symbols);
        let token = NUMERIC_TOKEN.find(&token).map(|m| m.as_str().to_string())?;

        Some(parse_amount(&token, matched).map(|amount| Price {
            amount,
            currency: currency_of(surrounding(raw, start, end, CONTEXT_CHARS)),
        }))
    }
}

fn parse_amount(token: &str, original: &str) -> Result<f64, ExtractError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
        .ok_or_else(|| ExtractError::unparseable("price", original.trim()))
}

fn currency_of(text: &str) -> Currency {
    if EURO_MARKERS.iter().any(|marker| text.contains(marker)) {
        Currency::Eur
    } else {
        Currency::Unknown
    }
}

/// The matched span widened by up to `radius` characters on either side
fn surrounding(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);
    &text[from..to]
}
