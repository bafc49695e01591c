use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const SSLV_RIGA: &str = include_str!("../config/sslv-riga.toml");

/// Everything the scout needs for one run. Every filter rule must be spelled out.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoutConfig {
    pub filter: FilterConfig,
    pub locale: LocaleKeywords,
    pub fields: FieldLocators,
    pub crawl: CrawlConfig,
}

/// Business rules applied by the validation pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Transaction-type literal a listing must carry, e.g. "Izīrē"
    pub target_transaction_type: String,
    pub transaction_match: TransactionMatch,
    /// Minimum price in listing currency
    pub min_price: f64,
    pub bedrooms: CountRange,
    pub bathrooms: CountRange,
    /// Reject listings that are not explicitly marked as furnished
    pub require_furnished: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionMatch {
    Exact,
    Contains,
}

/// Inclusive integer range
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Locale-specific vocabulary used by the extractors
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleKeywords {
    pub today: Vec<String>,
    pub bedroom: Vec<String>,
    pub bathroom: Vec<String>,
    /// Fragment identifying the cell that holds the furnishing status
    pub furnishing_label: String,
    pub furnished: String,
    pub unfurnished: String,
    pub currency_symbols: Vec<String>,
}

/// Where to look for a field: label cells first, then CSS selectors
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldLocator {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldLocators {
    pub transaction_type: FieldLocator,
    pub price: FieldLocator,
    pub bedrooms: FieldLocator,
    pub total_rooms: FieldLocator,
    pub bathrooms: FieldLocator,
    pub utilities: FieldLocator,
    pub posted_date: FieldLocator,
    pub description: FieldLocator,
    /// Only `selectors` are used; the `href` of the first match is the listing URL
    pub link: FieldLocator,
}

/// Fetch-layer settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlConfig {
    pub start_urls: Vec<String>,
    pub listing_selector: String,
    pub next_page_selector: Option<String>,
    pub max_pages: u32,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub download_delay_ms: u64,
    pub output_path: PathBuf,
}

impl ScoutConfig {
    /// Riga centre rentals on ss.lv
    pub fn sslv_riga() -> Result<Self> {
        Self::from_toml_str(SSLV_RIGA).context("Bundled ss.lv preset is invalid")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ScoutConfig = toml::from_str(raw).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let filter = &self.filter;
        if filter.target_transaction_type.trim().is_empty() {
            bail!("filter.target_transaction_type must not be empty");
        }
        if filter.min_price.is_nan() || filter.min_price < 0.0 {
            bail!("filter.min_price must be a non-negative number");
        }
        if filter.bedrooms.min > filter.bedrooms.max {
            bail!(
                "filter.bedrooms: min {} exceeds max {}",
                filter.bedrooms.min,
                filter.bedrooms.max
            );
        }
        if filter.bathrooms.min > filter.bathrooms.max {
            bail!(
                "filter.bathrooms: min {} exceeds max {}",
                filter.bathrooms.min,
                filter.bathrooms.max
            );
        }
        if self.locale.furnished.trim().is_empty() || self.locale.unfurnished.trim().is_empty() {
            bail!("locale.furnished and locale.unfurnished must not be empty");
        }
        if self.locale.furnishing_label.trim().is_empty() {
            bail!("locale.furnishing_label must not be empty");
        }
        if self.crawl.max_pages == 0 {
            bail!("crawl.max_pages must be at least 1");
        }
        Ok(())
    }
}
