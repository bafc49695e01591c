use super::normalize::{collapse_whitespace, normalize};
use super::price::NUMERIC_TOKEN;
use super::structured_text;
use crate::config::{FieldLocator, FieldLocators};
use crate::document::ListingDocument;
use crate::models::ExtractError;
use url::Url;

/// Single-strategy text fields: transaction type, description, date, utilities, link
pub struct TextFields {
    transaction_type: FieldLocator,
    description: FieldLocator,
    posted_date: FieldLocator,
    utilities: FieldLocator,
    link: FieldLocator,
    currency_symbols: Vec<String>,
}

impl TextFields {
    pub fn new(fields: &FieldLocators, currency_symbols: &[String]) -> Self {
        Self {
            transaction_type: fields.transaction_type.clone(),
            description: fields.description.clone(),
            posted_date: fields.posted_date.clone(),
            utilities: fields.utilities.clone(),
            link: fields.link.clone(),
            currency_symbols: currency_symbols.to_vec(),
        }
    }

    pub fn transaction_type(&self, doc: &dyn ListingDocument) -> Result<Option<String>, ExtractError> {
        Ok(structured_text(doc, &self.transaction_type)?
            .map(|t| collapse_whitespace(&t))
            .filter(|t| !t.is_empty()))
    }

    pub fn description(&self, doc: &dyn ListingDocument) -> Result<Option<String>, ExtractError> {
        Ok(structured_text(doc, &self.description)?
            .map(|t| collapse_whitespace(&t))
            .filter(|t| !t.is_empty()))
    }

    /// Raw posted-date text, before today-keyword resolution
    pub fn posted_date(&self, doc: &dyn ListingDocument) -> Result<Option<String>, ExtractError> {
        structured_text(doc, &self.posted_date)
    }

    pub fn utilities(&self, doc: &dyn ListingDocument) -> Result<Option<(f64, f64)>, ExtractError> {
        Ok(structured_text(doc, &self.utilities)?
            .and_then(|text| parse_utilities(&text, &self.currency_symbols)))
    }

    /// Absolute listing URL: the configured link resolved against the base, else the base itself
    pub fn url(&self, doc: &dyn ListingDocument) -> Result<Url, ExtractError> {
        let base = doc.base_url();

        for selector in &self.link.selectors {
            if let Some(href) = doc.select_attr(selector, "href")? {
                return base
                    .join(&href)
                    .map_err(|_| ExtractError::unparseable("url", href));
            }
        }

        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ExtractError::missing("url"));
        }
        Ok(base.clone())
    }
}

/// `"80-120 €"` gives (80, 120), `"90 €"` gives (90, 90). Bounds are ordered.
pub fn parse_utilities(text: &str, currency_symbols: &[String]) -> Option<(f64, f64)> {
    let normalized = normalize(text, currency_symbols);
    let mut amounts = NUMERIC_TOKEN
        .find_iter(&normalized)
        .filter_map(|m| m.as_str().parse::<f64>().ok());

    let first = amounts.next()?;
    let second = amounts.next().unwrap_or(first);
    Some((first.min(second), first.max(second)))
}
