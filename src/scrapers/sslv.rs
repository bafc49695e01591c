use crate::config::CrawlConfig;
use crate::scrapers::traits::ListingSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP source for ss.lv listing pages
pub struct SsLvScraper {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl SsLvScraper {
    pub fn new(crawl: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(crawl.timeout_secs))
            .user_agent(crawl.user_agent.as_str())
            .cookie_store(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            max_retries: crawl.max_retries,
            retry_delay: Duration::from_millis(crawl.retry_delay_ms),
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch ss.lv page")?;

        if !response.status().is_success() {
            anyhow::bail!("ss.lv returned status: {}", response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of HTML", html.len());
        Ok(html)
    }
}

#[async_trait]
impl ListingSource for SsLvScraper {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_once(url).await {
                Ok(html) => return Ok(html),
                Err(e) if attempt <= self.max_retries => {
                    warn!("Attempt {} for {} failed: {:#}. Retrying...", attempt, url, e);
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    return Err(e.context(format!("Giving up on {} after {} attempts", url, attempt)))
                }
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "ss.lv"
    }
}
