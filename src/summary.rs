use crate::models::{ApartmentRecord, RejectionReason, Stage};
use std::collections::BTreeMap;
use std::fmt;

/// Per-batch tally of accepted listings and rejections by stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub accepted: usize,
    pub rejected: BTreeMap<Stage, usize>,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &Result<ApartmentRecord, RejectionReason>) {
        match outcome {
            Ok(_) => self.accepted += 1,
            Err(reason) => *self.rejected.entry(reason.stage).or_insert(0) += 1,
        }
    }

    pub fn merge(&mut self, other: &BatchSummary) {
        self.accepted += other.accepted;
        for (stage, count) in &other.rejected {
            *self.rejected.entry(*stage).or_insert(0) += count;
        }
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn total(&self) -> usize {
        self.accepted + self.rejected_total()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} accepted, {} rejected", self.accepted, self.rejected_total())?;
        if !self.rejected.is_empty() {
            let parts: Vec<String> = self
                .rejected
                .iter()
                .map(|(stage, count)| format!("{}={}", stage, count))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RejectionKind;

    fn rejection(stage: Stage) -> Result<ApartmentRecord, RejectionReason> {
        Err(RejectionReason::new("tr_1", stage, RejectionKind::RuleViolation, None))
    }

    #[test]
    fn test_counts_and_display() {
        let mut summary = BatchSummary::default();
        summary.record(&rejection(Stage::PriceFloor));
        summary.record(&rejection(Stage::PriceFloor));
        summary.record(&rejection(Stage::TransactionType));

        let mut other = BatchSummary::default();
        other.accepted = 2;
        other.record(&rejection(Stage::BathroomRange));
        summary.merge(&other);

        assert_eq!(summary.total(), 6);
        assert_eq!(
            summary.to_string(),
            "2 accepted, 4 rejected (transaction_type=1, price_floor=2, bathroom_range=1)"
        );
    }
}
