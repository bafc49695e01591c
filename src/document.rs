use crate::extract::normalize::collapse_whitespace;
use crate::models::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th, dt").expect("static cell selector"));

/// Read-only view of one listing as handed over by the fetch layer
pub trait ListingDocument {
    /// Stable identifier used in rejection reports
    fn listing_id(&self) -> String;

    /// Text of the cell following the first cell whose text contains `label`
    fn label_value(&self, label: &str) -> Option<String>;

    /// Text of the first cell whose own text contains `keyword` (case-insensitive)
    fn cell_containing(&self, keyword: &str) -> Option<String>;

    fn select_text(&self, selector: &str) -> Result<Option<String>, ExtractError>;

    fn select_attr(&self, selector: &str, attr: &str) -> Result<Option<String>, ExtractError>;

    /// Full listing text, one text node per line
    fn raw_text(&self) -> &str;

    fn base_url(&self) -> &Url;
}

/// A listing backed by a parsed HTML element: a search-result row or a whole detail page
pub struct HtmlListing<'a> {
    root: ElementRef<'a>,
    base_url: Url,
    raw_text: String,
}

impl<'a> HtmlListing<'a> {
    pub fn new(root: ElementRef<'a>, base_url: Url) -> Self {
        // Newline-joined so digits from neighbouring cells never read as one number
        let raw_text = root
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            root,
            base_url,
            raw_text,
        }
    }

    /// Treat a whole detail page as a single listing
    pub fn from_document(document: &'a Html, base_url: Url) -> Self {
        Self::new(document.root_element(), base_url)
    }

    fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
        Selector::parse(selector)
            .map_err(|e| ExtractError::malformed(format!("invalid selector '{}': {}", selector, e)))
    }

    fn cells(&self) -> impl Iterator<Item = ElementRef<'a>> + '_ {
        self.root.select(&CELL_SELECTOR)
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text nodes directly under the element, nested markup excluded
fn own_text(element: &ElementRef<'_>) -> String {
    let parts: Vec<&str> = element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect();
    collapse_whitespace(&parts.join(" "))
}

impl ListingDocument for HtmlListing<'_> {
    fn listing_id(&self) -> String {
        match self.root.value().attr("id") {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => self.base_url.to_string(),
        }
    }

    fn label_value(&self, label: &str) -> Option<String> {
        let needle = label.to_lowercase();
        let sibling_text = |cell: ElementRef<'_>| {
            let value = cell.next_siblings().find_map(ElementRef::wrap)?;
            let text = element_text(&value);
            (!text.is_empty()).then_some(text)
        };

        // "Istabas" must not resolve to a "Guļamistabas" cell when both exist
        self.cells()
            .filter(|cell| element_text(cell).to_lowercase().starts_with(&needle))
            .find_map(sibling_text)
            .or_else(|| {
                self.cells()
                    .filter(|cell| element_text(cell).to_lowercase().contains(&needle))
                    .find_map(sibling_text)
            })
    }

    fn cell_containing(&self, keyword: &str) -> Option<String> {
        let needle = keyword.to_lowercase();

        self.cells()
            .map(|cell| own_text(&cell))
            .find(|text| text.to_lowercase().contains(&needle))
    }

    fn select_text(&self, selector: &str) -> Result<Option<String>, ExtractError> {
        let selector = Self::parse_selector(selector)?;
        Ok(self
            .root
            .select(&selector)
            .map(|el| element_text(&el))
            .find(|text| !text.is_empty()))
    }

    fn select_attr(&self, selector: &str, attr: &str) -> Result<Option<String>, ExtractError> {
        let selector = Self::parse_selector(selector)?;
        Ok(self
            .root
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string))
    }

    fn raw_text(&self) -> &str {
        &self.raw_text
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}
