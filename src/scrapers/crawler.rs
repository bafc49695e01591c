use crate::assembler::RecordAssembler;
use crate::config::CrawlConfig;
use crate::document::HtmlListing;
use crate::models::ApartmentRecord;
use crate::observer::ListingObserver;
use crate::scrapers::traits::ListingSource;
use crate::summary::BatchSummary;
use anyhow::{anyhow, Context, Result};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Records and tallies from one parsed page
#[derive(Debug, Default)]
pub struct PageOutcome {
    pub records: Vec<ApartmentRecord>,
    pub summary: BatchSummary,
    pub next_page: Option<Url>,
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    pub records: Vec<ApartmentRecord>,
    pub summary: BatchSummary,
    pub pages: usize,
}

/// Run every listing row of one page through the assembler.
/// A page without listing rows is treated as a single detail page.
pub fn process_page<O: ListingObserver>(
    html: &str,
    page_url: &Url,
    crawl: &CrawlConfig,
    assembler: &RecordAssembler<O>,
) -> Result<PageOutcome> {
    let document = Html::parse_document(html);
    let listing_selector = parse_selector(&crawl.listing_selector)?;

    let rows: Vec<HtmlListing<'_>> = document
        .select(&listing_selector)
        .map(|row| HtmlListing::new(row, page_url.clone()))
        .collect();

    info!("🔍 Found {} listings on {}", rows.len(), page_url);

    let listings = if rows.is_empty() {
        vec![HtmlListing::from_document(&document, page_url.clone())]
    } else {
        rows
    };

    let mut outcome = PageOutcome::default();
    for result in assembler.process_all(listings) {
        outcome.summary.record(&result);
        if let Ok(record) = result {
            info!("✅ Saved: {} ({} {:?})", record.url, record.price, record.currency);
            outcome.records.push(record);
        }
    }

    if let Some(next_selector) = &crawl.next_page_selector {
        outcome.next_page = next_page_url(&document, next_selector, page_url)?;
    }

    Ok(outcome)
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("Invalid selector '{}': {}", selector, e))
}

fn next_page_url(document: &Html, selector: &str, page_url: &Url) -> Result<Option<Url>> {
    let selector = parse_selector(selector)?;
    let href = document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty());

    match href {
        Some(href) => Ok(Some(
            page_url
                .join(href)
                .with_context(|| format!("Bad next-page link '{}'", href))?,
        )),
        None => Ok(None),
    }
}

/// Walk every start URL and its pagination, up to `max_pages` pages each.
/// Pages that cannot be fetched are logged and end that chain.
pub async fn crawl<S: ListingSource, O: ListingObserver>(
    source: &S,
    crawl: &CrawlConfig,
    assembler: &RecordAssembler<O>,
) -> Result<CrawlReport> {
    let mut report = CrawlReport::default();
    let mut visited: HashSet<Url> = HashSet::new();
    let delay = Duration::from_millis(crawl.download_delay_ms);

    for start in &crawl.start_urls {
        let mut next = Some(Url::parse(start).with_context(|| format!("Invalid start URL '{}'", start))?);
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages >= crawl.max_pages || !visited.insert(url.clone()) {
                break;
            }
            if report.pages > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            pages += 1;
            report.pages += 1;

            info!("🔍 Parsing URL: {} (via {})", url, source.source_name());
            let html = match source.fetch_page(url.as_str()).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Skipping {}: {:#}", url, e);
                    break;
                }
            };

            let page = process_page(&html, &url, crawl, assembler)?;
            info!("Page {}: {}", url, page.summary);

            report.summary.merge(&page.summary);
            report.records.extend(page.records);
            next = page.next_page;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoutConfig;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn row(id: u32, kind: &str, furniture: &str, price: &str) -> String {
        format!(
            r#"<tr id="tr_{id}">
                <td><input type="checkbox"></td>
                <td>{kind}</td>
                <td><a class="am" href="/msg/lv/real-estate/flats/riga/centre/{id}.html">Dzīvoklis 2 guļamistabas, vannas istaba</a></td>
                <td>{furniture}</td>
                <td>{price}</td>
            </tr>"#
        )
    }

    fn page(rows: &[String], next: Option<&str>) -> String {
        let next = next
            .map(|href| format!(r#"<a rel="next" href="{}">Nākamie</a>"#, href))
            .unwrap_or_default();
        format!(
            "<html><body><table>{}</table>{}</body></html>",
            rows.join(""),
            next
        )
    }

    struct CannedSource {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ListingSource for CannedSource {
        async fn fetch_page(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow!("404 for {}", url))
        }

        fn source_name(&self) -> &'static str {
            "canned"
        }
    }

    fn setup() -> (ScoutConfig, RecordAssembler) {
        let mut config = ScoutConfig::sslv_riga().unwrap();
        config.crawl.download_delay_ms = 0;
        config.crawl.start_urls = vec!["https://www.ss.lv/lv/real-estate/flats/riga/centre/".to_string()];
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let assembler = RecordAssembler::new(&config, today).unwrap();
        (config, assembler)
    }

    #[test]
    fn test_process_page_filters_rows() {
        let (config, assembler) = setup();
        let html = page(
            &[
                row(1, "Izīrē", "Mēbelētu", "600&nbsp;€/mēn."),
                row(2, "Pārdod", "Mēbelētu", "90 000 €"),
                row(3, "Izīrē", "Bez mēbelēm", "700 €/mēn."),
                row(4, "Izīrē", "Mēbelētu", "300 €/mēn."),
            ],
            Some("/lv/real-estate/flats/riga/centre/page2.html"),
        );
        let url = Url::parse("https://www.ss.lv/lv/real-estate/flats/riga/centre/").unwrap();

        let outcome = process_page(&html, &url, &config.crawl, &assembler).unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            outcome.records[0].url,
            "https://www.ss.lv/msg/lv/real-estate/flats/riga/centre/1.html"
        );
        assert_eq!(outcome.records[0].price, 600.0);
        assert_eq!(outcome.records[0].true_bedrooms, Some(2));
        assert_eq!(outcome.records[0].bathrooms, Some(1));
        assert_eq!(outcome.summary.accepted, 1);
        assert_eq!(outcome.summary.rejected_total(), 3);
        assert_eq!(
            outcome.next_page.unwrap().as_str(),
            "https://www.ss.lv/lv/real-estate/flats/riga/centre/page2.html"
        );
    }

    #[tokio::test]
    async fn test_crawl_follows_pagination_once() {
        let (config, assembler) = setup();
        let first = "https://www.ss.lv/lv/real-estate/flats/riga/centre/";
        let second = "https://www.ss.lv/lv/real-estate/flats/riga/centre/page2.html";

        let mut pages = HashMap::new();
        pages.insert(
            first.to_string(),
            page(&[row(1, "Izīrē", "Mēbelētu", "600 €")], Some("page2.html")),
        );
        // Points back at page 2 itself; the visited set stops the loop
        pages.insert(
            second.to_string(),
            page(&[row(2, "Izīrē", "Mēbelētu", "650 €")], Some("page2.html")),
        );
        let source = CannedSource {
            pages,
            requested: Mutex::new(Vec::new()),
        };

        let report = crawl(&source, &config.crawl, &assembler).await.unwrap();

        assert_eq!(report.pages, 2);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.summary.accepted, 2);
        assert_eq!(*source.requested.lock().unwrap(), vec![first.to_string(), second.to_string()]);
    }

    #[tokio::test]
    async fn test_unreachable_page_is_skipped() {
        let (config, assembler) = setup();
        let source = CannedSource {
            pages: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        };

        let report = crawl(&source, &config.crawl, &assembler).await.unwrap();
        assert_eq!(report.pages, 1);
        assert!(report.records.is_empty());
    }
}
