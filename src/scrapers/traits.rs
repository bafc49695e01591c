use anyhow::Result;
use async_trait::async_trait;

/// Something that can hand back the HTML of a listing page.
/// Lets the crawler run against live sites or canned pages alike.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page and return its HTML
    async fn fetch_page(&self, url: &str) -> Result<String>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
