use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use flat_scout::export::write_json;
use flat_scout::observer::TracingObserver;
use flat_scout::scrapers::{crawl, process_page, SsLvScraper};
use flat_scout::{RecordAssembler, ScoutConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "flat-scout")]
#[command(about = "Extract, normalize and filter apartment listings")]
struct Args {
    /// TOML config; the bundled ss.lv Riga preset when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Process a saved HTML page instead of crawling
    #[arg(short, long, requires = "base_url")]
    file: Option<PathBuf>,

    /// URL the saved page was fetched from, used to resolve listing links
    #[arg(long)]
    base_url: Option<Url>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ScoutConfig::from_file(path)?,
        None => ScoutConfig::sslv_riga()?,
    };

    info!("🏠 Flat Scout");
    info!(
        "Filter: '{}', min price {}, bedrooms {}-{}, bathrooms {}-{}, furnished required: {}",
        config.filter.target_transaction_type,
        config.filter.min_price,
        config.filter.bedrooms.min,
        config.filter.bedrooms.max,
        config.filter.bathrooms.min,
        config.filter.bathrooms.max,
        config.filter.require_furnished
    );

    let assembler = RecordAssembler::new(&config, Local::now().date_naive())?.with_observer(TracingObserver);

    let (records, summary) = match &args.file {
        Some(file) => {
            let base = args
                .base_url
                .as_ref()
                .context("--file needs --base-url to resolve listing links")?;
            let html = tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let page = process_page(&html, base, &config.crawl, &assembler)?;
            (page.records, page.summary)
        }
        None => {
            let scraper = SsLvScraper::new(&config.crawl)?;
            let report = crawl(&scraper, &config.crawl, &assembler).await?;
            info!("Visited {} pages", report.pages);
            (report.records, report.summary)
        }
    };

    info!("✅ {}", summary);

    write_json(&config.crawl.output_path, &records).await?;
    info!(
        "💾 Saved {} apartments to {}",
        records.len(),
        config.crawl.output_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_requires_base_url() {
        assert!(Args::try_parse_from(["flat-scout", "--file", "page.html"]).is_err());

        let args = Args::try_parse_from([
            "flat-scout",
            "--file",
            "page.html",
            "--base-url",
            "https://www.ss.lv/lv/real-estate/flats/riga/centre/",
        ])
        .unwrap();
        assert_eq!(args.file, Some(PathBuf::from("page.html")));
        assert_eq!(args.base_url.unwrap().host_str(), Some("www.ss.lv"));
    }

    #[test]
    fn test_defaults_to_crawling_the_preset() {
        let args = Args::try_parse_from(["flat-scout"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.file.is_none());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let parsed = Args::try_parse_from(["flat-scout", "--file", "p.html", "--base-url", "not a url"]);
        assert!(parsed.is_err());
    }
}
