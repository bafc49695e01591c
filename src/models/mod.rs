mod rejection;

pub use rejection::{ExtractError, RejectionKind, RejectionReason, Stage};

use serde::{Deserialize, Serialize};

/// Currency inferred from the symbols around a price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Currency {
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Short-term rental suitability, derived from the bedroom count
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AirbnbPotential {
    Medium,
    High,
}

/// A price as recovered from the listing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price {
    pub amount: f64,
    pub currency: Currency,
}

/// Canonical apartment record, only ever built from a candidate that passed validation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApartmentRecord {
    pub url: String,
    pub price: f64,
    pub currency: Currency,
    pub true_bedrooms: Option<u32>,
    pub total_rooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub utilities_min: Option<f64>,
    pub utilities_max: Option<f64>,
    pub description: Option<String>,
    pub posted_date: String,
    pub property_type: String,
    pub is_daily_listing: bool,
    pub airbnb_potential: AirbnbPotential,
}
