//! Confidence Scorer
//!
//! Pure aggregation of per-service outcomes into one confidence value.
//!
//! # Formula
//! ```text
//! value = (Σ c_i / n) × (n / T)
//! ```
//! where `c_i` are the confidences of the `n` successful outcomes and `T` is
//! the number of services queried. The mean rewards agreement; the coverage
//! factor `n / T` discounts answers missing from some services.
//!
//! Non-success outcomes carry no confidence and only count towards `T`.

use crate::types::{ResolutionStatus, ServiceOutcome};

/// Aggregate confidence with its resolution status
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceScore {
    pub value: f64,
    pub status: ResolutionStatus,
}

impl ConfidenceScore {
    pub fn unresolved() -> Self {
        Self {
            value: 0.0,
            status: ResolutionStatus::Unresolved,
        }
    }
}

/// Score a set of outcomes, one per queried service
pub fn score<'a, T: 'a, I>(outcomes: I) -> ConfidenceScore
where
    I: IntoIterator<Item = &'a ServiceOutcome<T>>,
{
    let mut queried = 0usize;
    let mut sum = 0.0;
    let mut successes = 0usize;

    for outcome in outcomes {
        queried += 1;
        if let Some(c) = outcome.confidence() {
            sum += c;
            successes += 1;
        }
    }

    if successes == 0 {
        return ConfidenceScore::unresolved();
    }

    let mean = sum / successes as f64;
    let coverage = successes as f64 / queried as f64;
    let status = if successes == queried {
        ResolutionStatus::Resolved
    } else {
        ResolutionStatus::Partial
    };

    ConfidenceScore {
        value: (mean * coverage).clamp(0.0, 1.0),
        status,
    }
}
