//! Business-rule stages. The first failing stage decides the rejection; later stages never run.

use crate::candidate::Candidate;
use crate::config::{FilterConfig, TransactionMatch};
use crate::models::{ExtractError, RejectionReason, Stage};
use crate::observer::{ListingObserver, Outcome, StageEvent};

#[derive(Debug, Clone)]
pub struct ValidationPipeline {
    stages: Vec<Stage>,
}

impl ValidationPipeline {
    pub const STANDARD: [Stage; 6] = [
        Stage::TransactionType,
        Stage::PriceFloor,
        Stage::Unfurnished,
        Stage::FurnishedRequired,
        Stage::BedroomRange,
        Stage::BathroomRange,
    ];

    pub fn standard() -> Self {
        Self::with_stages(Self::STANDARD.to_vec())
    }

    /// Custom order. `Document` and `Url` are handled before the pipeline and are dropped here.
    pub fn with_stages(stages: Vec<Stage>) -> Self {
        let stages = stages
            .into_iter()
            .filter(|s| !matches!(s, Stage::Document | Stage::Url))
            .collect();
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn run(
        &self,
        candidate: &Candidate,
        filter: &FilterConfig,
        observer: &dyn ListingObserver,
    ) -> Result<(), RejectionReason> {
        for &stage in &self.stages {
            match check(stage, candidate, filter) {
                Ok(()) => observer.observe(&StageEvent {
                    listing_id: &candidate.listing_id,
                    stage,
                    outcome: Outcome::Passed,
                }),
                Err(err) => {
                    let reason = RejectionReason::from_error(&candidate.listing_id, stage, &err);
                    observer.observe(&StageEvent {
                        listing_id: &candidate.listing_id,
                        stage,
                        outcome: Outcome::Rejected {
                            kind: reason.kind,
                            value: reason.value.clone(),
                        },
                    });
                    return Err(reason);
                }
            }
        }
        Ok(())
    }
}

/// One stage as a pure predicate over the candidate
pub fn check(stage: Stage, candidate: &Candidate, filter: &FilterConfig) -> Result<(), ExtractError> {
    match stage {
        Stage::Document | Stage::Url => Ok(()),

        Stage::TransactionType => {
            let actual = candidate
                .transaction_type
                .as_deref()
                .ok_or_else(|| ExtractError::missing("transaction_type"))?;
            let target = filter.target_transaction_type.as_str();
            let matches = match filter.transaction_match {
                TransactionMatch::Exact => actual == target,
                TransactionMatch::Contains => actual.contains(target),
            };
            if matches {
                Ok(())
            } else {
                Err(ExtractError::violation("transaction_type", actual))
            }
        }

        Stage::PriceFloor => match &candidate.price {
            Err(err) => Err(err.clone()),
            Ok(price) if price.amount < filter.min_price => {
                Err(ExtractError::violation("min_price", price.amount.to_string()))
            }
            Ok(_) => Ok(()),
        },

        Stage::Unfurnished => {
            if candidate.furnishing.unfurnished {
                Err(ExtractError::violation(
                    "unfurnished",
                    candidate.furnishing.status.clone().unwrap_or_default(),
                ))
            } else {
                Ok(())
            }
        }

        Stage::FurnishedRequired => {
            if !filter.require_furnished || candidate.furnishing.furnished {
                return Ok(());
            }
            match &candidate.furnishing.status {
                Some(status) => Err(ExtractError::violation("furnished_required", status.clone())),
                None => Err(ExtractError::missing("furnishing")),
            }
        }

        Stage::BedroomRange => match candidate.rooms.true_bedrooms {
            None => Err(ExtractError::missing("true_bedrooms")),
            Some(n) if !filter.bedrooms.contains(n) => {
                Err(ExtractError::violation("bedroom_range", n.to_string()))
            }
            Some(_) => Ok(()),
        },

        Stage::BathroomRange => match candidate.bathrooms {
            None => Err(ExtractError::missing("bathrooms")),
            Some(n) if !filter.bathrooms.contains(n) => {
                Err(ExtractError::violation("bathroom_range", n.to_string()))
            }
            Some(_) => Ok(()),
        },
    }
}
