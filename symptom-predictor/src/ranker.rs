//! Top-N selection over a class distribution

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::Distribution;
use crate::error::{PredictorError, PredictorResult};
use crate::vocabulary::Vocabulary;

/// Number of causes returned per prediction
pub const RANKED_CAUSES: usize = 3;

/// Percentage rounded to two decimal places
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// `round(p * 100, 2)`, half-to-even on the exact binary value
    pub fn from_probability(probability: f32) -> Self {
        let percent = f64::from(probability) * 100.0;
        // `{:.2}` rounds the exact binary value of `percent` half-to-even, which
        // is what pins 0.125 to 12.5. Parsing the two-decimal text back gives the
        // nearest f64 to that decimal.
        let rounded = format!("{:.2}", percent).parse().unwrap_or(percent);
        Self(rounded)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// One ranked cause; serialized as a `[label, confidence]` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "(String, Confidence)", from = "(String, Confidence)")]
pub struct RankedCause {
    pub label: String,
    pub confidence: Confidence,
}

impl From<RankedCause> for (String, Confidence) {
    fn from(cause: RankedCause) -> Self {
        (cause.label, cause.confidence)
    }
}

impl From<(String, Confidence)> for RankedCause {
    fn from((label, confidence): (String, Confidence)) -> Self {
        Self { label, confidence }
    }
}

/// Class indices ordered by descending probability
///
/// The sort is stable, so equal probabilities keep ascending index order.
pub fn rank_indices(distribution: &Distribution) -> Vec<usize> {
    let probabilities = distribution.probabilities();
    let mut indices: Vec<usize> = (0..probabilities.len()).collect();
    indices.sort_by(|&a, &b| {
        let pa = probabilities.get(a).copied().unwrap_or(f32::NEG_INFINITY);
        let pb = probabilities.get(b).copied().unwrap_or(f32::NEG_INFINITY);
        pb.total_cmp(&pa)
    });
    indices
}

/// The `n` most probable causes, labelled through the cause vocabulary
///
/// Class index `i` maps to cause id `i + 1`.
pub fn rank_top_n(
    distribution: &Distribution,
    n: usize,
    causes: &Vocabulary,
) -> PredictorResult<Vec<RankedCause>> {
    if distribution.len() < n {
        return Err(PredictorError::InsufficientClasses {
            required: n,
            available: distribution.len(),
        });
    }

    let probabilities = distribution.probabilities();
    rank_indices(distribution)
        .into_iter()
        .take(n)
        .map(|index| {
            let id = u32::try_from(index + 1).map_err(|_| PredictorError::UnmappedClass {
                id: u32::MAX,
            })?;
            let label = causes
                .lookup_token(id)
                .ok_or(PredictorError::UnmappedClass { id })?;
            let probability = probabilities.get(index).copied().unwrap_or_default();

            Ok(RankedCause {
                label: label.to_string(),
                confidence: Confidence::from_probability(probability),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn causes(n: usize) -> Vocabulary {
        Vocabulary::from_tokens((1..=n).map(|i| format!("cause{}", i))).unwrap()
    }

    #[test]
    fn test_reference_distribution() {
        let distribution =
            Distribution::from(vec![0.5, 0.25, 0.15, 0.04, 0.03, 0.01, 0.01, 0.01]);

        let ranked = rank_top_n(&distribution, RANKED_CAUSES, &causes(8)).unwrap();

        let labels: Vec<&str> = ranked.iter().map(|r| r.label.as_str()).collect();
        let values: Vec<f64> = ranked.iter().map(|r| r.confidence.value()).collect();
        assert_eq!(labels, ["cause1", "cause2", "cause3"]);
        assert_eq!(values, [50.0, 25.0, 15.0]);
    }

    #[test]
    fn test_ties_prefer_lower_index() {
        let distribution = Distribution::from(vec![0.1, 0.3, 0.3, 0.3]);

        let ranked = rank_top_n(&distribution, 3, &causes(4)).unwrap();
        let labels: Vec<&str> = ranked.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["cause2", "cause3", "cause4"]);

        assert_eq!(rank_indices(&distribution), [1, 2, 3, 0]);
    }

    #[test]
    fn test_confidence_rounding() {
        let confidence = Confidence::from_probability(0.125);
        assert_eq!(confidence.value(), 12.5);
        assert_eq!(confidence.to_string(), "12.50");

        assert_eq!(Confidence::from_probability(0.123456).value(), 12.35);
        assert_eq!(Confidence::from_probability(1.0).value(), 100.0);
        assert_eq!(Confidence::from_probability(0.0).value(), 0.0);
    }

    #[test]
    fn test_ranked_cause_serializes_as_pair() {
        let cause = RankedCause {
            label: "vomiting|gastritis".to_string(),
            confidence: Confidence::from_probability(0.25),
        };
        let json = serde_json::to_value(&cause).unwrap();
        assert_eq!(json, serde_json::json!(["vomiting|gastritis", 25.0]));

        let parsed: RankedCause = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, cause);
    }

    #[test]
    fn test_rounding_boundaries() {
        // 1/32 and 3/32 are exact, so 3.125 and 9.375 are true ties
        assert_eq!(Confidence::from_probability(0.031_25).value(), 3.12);
        assert_eq!(Confidence::from_probability(0.093_75).value(), 9.38);
        // 0.00125 is stored slightly below the tie
        assert_eq!(Confidence::from_probability(0.001_25).value(), 0.12);
    }

    #[test]
    fn test_fewer_classes_than_requested() {
        let distribution = Distribution::from(vec![0.6, 0.4]);
        let err = rank_top_n(&distribution, RANKED_CAUSES, &causes(2)).unwrap_err();
        assert!(matches!(
            err,
            PredictorError::InsufficientClasses {
                required: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn test_unlabelled_class() {
        let distribution = Distribution::from(vec![0.1, 0.2, 0.7]);
        let err = rank_top_n(&distribution, 1, &causes(2)).unwrap_err();
        assert!(matches!(err, PredictorError::UnmappedClass { id: 3 }));
    }
}
