pub mod crawler;
pub mod sslv;
pub mod traits;

pub use crawler::{crawl, process_page, CrawlReport, PageOutcome};
pub use sslv::SsLvScraper;
pub use traits::ListingSource;
