use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failures raised while pulling a single field out of a listing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("field '{field}' not found by any strategy")]
    MissingField { field: &'static str },

    #[error("field '{field}' has unparseable value '{value}'")]
    UnparseableValue { field: &'static str, value: String },

    #[error("rule '{rule}' violated by '{value}'")]
    RuleViolation { rule: &'static str, value: String },

    #[error("document could not be queried: {reason}")]
    MalformedDocument { reason: String },
}

impl ExtractError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn unparseable(field: &'static str, value: impl Into<String>) -> Self {
        Self::UnparseableValue {
            field,
            value: value.into(),
        }
    }

    pub fn violation(rule: &'static str, value: impl Into<String>) -> Self {
        Self::RuleViolation {
            rule,
            value: value.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::MissingField { .. } => RejectionKind::MissingField,
            Self::UnparseableValue { .. } => RejectionKind::UnparseableValue,
            Self::RuleViolation { .. } => RejectionKind::RuleViolation,
            Self::MalformedDocument { .. } => RejectionKind::MalformedDocument,
        }
    }

    /// The offending raw value, when there is one
    pub fn value(&self) -> Option<String> {
        match self {
            Self::UnparseableValue { value, .. } | Self::RuleViolation { value, .. } => {
                Some(value.clone())
            }
            Self::MalformedDocument { reason } => Some(reason.clone()),
            Self::MissingField { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    MissingField,
    UnparseableValue,
    RuleViolation,
    MalformedDocument,
}

/// Points at which a listing can be dropped, in pipeline order
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Document,
    Url,
    TransactionType,
    PriceFloor,
    Unfurnished,
    FurnishedRequired,
    BedroomRange,
    BathroomRange,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Document => "document",
            Stage::Url => "url",
            Stage::TransactionType => "transaction_type",
            Stage::PriceFloor => "price_floor",
            Stage::Unfurnished => "unfurnished",
            Stage::FurnishedRequired => "furnished_required",
            Stage::BedroomRange => "bedroom_range",
            Stage::BathroomRange => "bathroom_range",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a listing was dropped. Logged and discarded by the caller.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RejectionReason {
    pub listing_id: String,
    pub stage: Stage,
    pub kind: RejectionKind,
    pub value: Option<String>,
}

impl RejectionReason {
    pub fn new(
        listing_id: impl Into<String>,
        stage: Stage,
        kind: RejectionKind,
        value: Option<String>,
    ) -> Self {
        Self {
            listing_id: listing_id.into(),
            stage,
            kind,
            value,
        }
    }

    pub fn from_error(listing_id: impl Into<String>, stage: Stage, err: &ExtractError) -> Self {
        Self::new(listing_id, stage, err.kind(), err.value())
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(
                f,
                "{} rejected at {} ({:?}): {}",
                self.listing_id, self.stage, self.kind, value
            ),
            None => write!(
                f,
                "{} rejected at {} ({:?})",
                self.listing_id, self.stage, self.kind
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_maps_to_kind_and_value() {
        let err = ExtractError::unparseable("price", "1.2.3");
        assert_eq!(err.kind(), RejectionKind::UnparseableValue);
        assert_eq!(err.value().as_deref(), Some("1.2.3"));

        let reason = RejectionReason::from_error("tr_1", Stage::PriceFloor, &err);
        assert_eq!(reason.stage, Stage::PriceFloor);
        assert_eq!(reason.kind, RejectionKind::UnparseableValue);
    }

    #[test]
    fn test_missing_field_has_no_value() {
        let err = ExtractError::missing("bathrooms");
        assert_eq!(err.value(), None);
        assert_eq!(err.to_string(), "field 'bathrooms' not found by any strategy");
    }

    #[test]
    fn test_display_includes_stage() {
        let reason = RejectionReason::new(
            "tr_42",
            Stage::BedroomRange,
            RejectionKind::RuleViolation,
            Some("5".to_string()),
        );
        assert_eq!(
            reason.to_string(),
            "tr_42 rejected at bedroom_range (RuleViolation): 5"
        );
    }
}
