//! Weighted aggregation of per-rater fault judgments.

use std::collections::BTreeMap;

use sr_common::{Error, Result};
use sr_config::FaultWeights;

use crate::incident::FaultJudgment;

/// Weighted mean fault fraction across raters.
///
/// Returns None when the total configured weight is zero (the weighted
/// fault is undefined, not an error). Fails loudly on a fraction
/// outside [0, 1], a negative weight, or a judgment from a rater with
/// no configured weight.
pub fn weighted_mean(
    judgments: &BTreeMap<String, FaultJudgment>,
    weights: &FaultWeights,
) -> Result<Option<f64>> {
    let mut total = 0.0;
    let mut weighted_sum = 0.0;
    for (rater, judgment) in judgments {
        let weight = rater_weight(rater, weights)?;
        check_fraction(rater, judgment.fraction)?;
        total += weight;
        weighted_sum += weight * judgment.fraction;
    }
    if total == 0.0 {
        return Ok(None);
    }
    Ok(Some(weighted_sum / total))
}

/// Weighted variance of the fault fractions around their weighted mean.
///
/// None under the same zero-total-weight condition as [`weighted_mean`].
pub fn weighted_variance(
    judgments: &BTreeMap<String, FaultJudgment>,
    weights: &FaultWeights,
) -> Result<Option<f64>> {
    let Some(mean) = weighted_mean(judgments, weights)? else {
        return Ok(None);
    };
    let mut total = 0.0;
    let mut weighted_sq = 0.0;
    for (rater, judgment) in judgments {
        let weight = rater_weight(rater, weights)?;
        let dev = judgment.fraction - mean;
        total += weight;
        weighted_sq += weight * dev * dev;
    }
    Ok(Some(weighted_sq / total))
}

fn rater_weight(rater: &str, weights: &FaultWeights) -> Result<f64> {
    let weight = weights.weight(rater).ok_or_else(|| Error::UnknownRater {
        rater: rater.to_string(),
    })?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::OutOfRange {
            field: format!("fault_weights.{rater}"),
            value: weight,
            expected: "a finite weight >= 0",
        });
    }
    Ok(weight)
}

fn check_fraction(rater: &str, fraction: f64) -> Result<()> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(Error::OutOfRange {
            field: format!("fault.{rater}"),
            value: fraction,
            expected: "within [0, 1]",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judgments(fractions: &[(&str, f64)]) -> BTreeMap<String, FaultJudgment> {
        fractions
            .iter()
            .map(|(rater, fraction)| {
                (
                    rater.to_string(),
                    FaultJudgment {
                        fraction: *fraction,
                        rationale: String::new(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn equal_weights_zero_one_zero() {
        let j = judgments(&[("claude", 0.0), ("codex", 1.0), ("gemini", 0.0)]);
        let w = FaultWeights::equal(["claude", "codex", "gemini"], 3.0);
        let mean = weighted_mean(&j, &w).unwrap().unwrap();
        let var = weighted_variance(&j, &w).unwrap().unwrap();
        assert!((mean - 1.0 / 3.0).abs() < 1e-12);
        assert!((var - 0.222).abs() < 1e-3);
    }

    #[test]
    fn unequal_weights_shift_the_mean() {
        let j = judgments(&[("a", 0.0), ("b", 1.0)]);
        let w = FaultWeights::new(
            [("a".to_string(), 1.0), ("b".to_string(), 3.0)]
                .into_iter()
                .collect(),
        );
        let mean = weighted_mean(&j, &w).unwrap().unwrap();
        assert!((mean - 0.75).abs() < 1e-12);
    }

    #[test]
    fn zero_total_weight_is_undefined_not_an_error() {
        let j = judgments(&[("a", 0.4)]);
        let w = FaultWeights::equal(["a"], 0.0);
        assert_eq!(weighted_mean(&j, &w).unwrap(), None);
        assert_eq!(weighted_variance(&j, &w).unwrap(), None);
    }

    #[test]
    fn unknown_rater_fails() {
        let j = judgments(&[("mystery", 0.5)]);
        let w = FaultWeights::default();
        assert!(matches!(
            weighted_mean(&j, &w).unwrap_err(),
            Error::UnknownRater { .. }
        ));
    }

    #[test]
    fn out_of_range_fraction_fails() {
        let j = judgments(&[("claude", 1.5)]);
        let w = FaultWeights::default();
        assert!(matches!(
            weighted_mean(&j, &w).unwrap_err(),
            Error::OutOfRange { .. }
        ));
    }

    #[test]
    fn empty_judgment_set_is_undefined() {
        let j = judgments(&[]);
        let w = FaultWeights::default();
        assert_eq!(weighted_mean(&j, &w).unwrap(), None);
    }
}
