use crate::derived::airbnb_potential;
use crate::extract::{Furnishing, PostedDate, RoomCounts};
use crate::models::{ApartmentRecord, ExtractError, Price, RejectionReason, Stage};

/// Everything extracted from one listing, before any business rule has run
#[derive(Debug, Clone)]
pub struct Candidate {
    pub listing_id: String,
    pub url: String,
    pub transaction_type: Option<String>,
    pub price: Result<Price, ExtractError>,
    pub rooms: RoomCounts,
    pub bathrooms: Option<u32>,
    pub utilities: Option<(f64, f64)>,
    pub description: Option<String>,
    pub posted: PostedDate,
    pub furnishing: Furnishing,
}

impl Candidate {
    pub fn builder(listing_id: impl Into<String>) -> CandidateBuilder {
        CandidateBuilder::new(listing_id)
    }

    /// Finish a candidate that went through the validation pipeline
    pub fn into_record(self, property_type: &str) -> Result<ApartmentRecord, RejectionReason> {
        let price = self
            .price
            .map_err(|err| RejectionReason::from_error(&self.listing_id, Stage::PriceFloor, &err))?;
        let bedrooms = self.rooms.true_bedrooms.ok_or_else(|| {
            RejectionReason::from_error(
                &self.listing_id,
                Stage::BedroomRange,
                &ExtractError::missing("true_bedrooms"),
            )
        })?;

        Ok(ApartmentRecord {
            url: self.url,
            price: price.amount,
            currency: price.currency,
            true_bedrooms: Some(bedrooms),
            total_rooms: self.rooms.total_rooms,
            bathrooms: self.bathrooms,
            utilities_min: self.utilities.map(|(min, _)| min),
            utilities_max: self.utilities.map(|(_, max)| max),
            description: self.description,
            posted_date: self.posted.text,
            property_type: property_type.to_string(),
            is_daily_listing: self.posted.is_daily_listing,
            airbnb_potential: airbnb_potential(bedrooms),
        })
    }
}

/// Collects fields one at a time. Nothing partially filled ever leaves it.
#[derive(Debug, Default)]
pub struct CandidateBuilder {
    listing_id: String,
    url: Option<String>,
    transaction_type: Option<String>,
    price: Option<Result<Price, ExtractError>>,
    rooms: RoomCounts,
    bathrooms: Option<u32>,
    utilities: Option<(f64, f64)>,
    description: Option<String>,
    posted: Option<PostedDate>,
    furnishing: Furnishing,
}

impl CandidateBuilder {
    pub fn new(listing_id: impl Into<String>) -> Self {
        Self {
            listing_id: listing_id.into(),
            ..Self::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn transaction_type(mut self, transaction_type: Option<String>) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn price(mut self, price: Result<Price, ExtractError>) -> Self {
        self.price = Some(price);
        self
    }

    pub fn rooms(mut self, rooms: RoomCounts) -> Self {
        self.rooms = rooms;
        self
    }

    pub fn bathrooms(mut self, bathrooms: Option<u32>) -> Self {
        self.bathrooms = bathrooms;
        self
    }

    pub fn utilities(mut self, utilities: Option<(f64, f64)>) -> Self {
        self.utilities = utilities;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn posted(mut self, posted: PostedDate) -> Self {
        self.posted = Some(posted);
        self
    }

    pub fn furnishing(mut self, furnishing: Furnishing) -> Self {
        self.furnishing = furnishing;
        self
    }

    pub fn build(self) -> Result<Candidate, RejectionReason> {
        let url = self.url.filter(|u| !u.trim().is_empty()).ok_or_else(|| {
            RejectionReason::from_error(&self.listing_id, Stage::Url, &ExtractError::missing("url"))
        })?;

        let mut rooms = self.rooms;
        if let (Some(total), Some(bedrooms)) = (rooms.total_rooms, rooms.true_bedrooms) {
            if total < bedrooms {
                rooms.total_rooms = None;
            }
        }

        Ok(Candidate {
            listing_id: self.listing_id,
            url,
            transaction_type: self.transaction_type,
            price: self.price.unwrap_or(Err(ExtractError::missing("price"))),
            rooms,
            bathrooms: self.bathrooms,
            utilities: self.utilities,
            description: self.description,
            posted: self.posted.unwrap_or(PostedDate {
                text: String::new(),
                is_daily_listing: false,
            }),
            furnishing: self.furnishing,
        })
    }
}
