//! Pearson Square standardization calculator
//!
//! Computes how much skim milk must be blended into raw milk to bring the
//! mix down to a target fat percentage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input field names, used in `InvalidNumber` errors
pub const FIELD_RAW_FAT: &str = "raw_fat_pct";
pub const FIELD_SKIM_FAT: &str = "skim_fat_pct";
pub const FIELD_TARGET_FAT: &str = "target_fat_pct";
pub const FIELD_RAW_VOLUME: &str = "raw_volume_l";

/// Caller-input errors. None of these are retryable; the caller re-prompts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter valid numbers for all fields")]
    InvalidNumber { field: &'static str },

    #[error("Target fat % must be less than raw milk fat %")]
    TargetNotBelowRaw,

    #[error("Target fat % must be greater than skim milk fat %")]
    TargetNotAboveSkim,

    #[error("Raw milk volume must be greater than 0")]
    NonPositiveVolume,

    #[error("Please enter both user name and company name")]
    MissingPreparer,
}

impl ValidationError {
    /// Stable tag for machine consumers
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidNumber { .. } => "invalid_number",
            ValidationError::TargetNotBelowRaw => "target_not_below_raw",
            ValidationError::TargetNotAboveSkim => "target_not_above_skim",
            ValidationError::NonPositiveVolume => "non_positive_volume",
            ValidationError::MissingPreparer => "missing_preparer",
        }
    }

    /// The offending input field, for `InvalidNumber`
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::InvalidNumber { field } => Some(*field),
            _ => None,
        }
    }
}

/// Raw, skim and target fat percentages plus the raw milk volume in liters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardizationInput {
    pub raw_fat_pct: f64,
    pub skim_fat_pct: f64,
    pub target_fat_pct: f64,
    pub raw_volume_l: f64,
}

impl StandardizationInput {
    pub fn new(raw_fat_pct: f64, skim_fat_pct: f64, target_fat_pct: f64, raw_volume_l: f64) -> Self {
        Self {
            raw_fat_pct,
            skim_fat_pct,
            target_fat_pct,
            raw_volume_l,
        }
    }

    /// Parse the four text fields in order, reporting the first bad one
    pub fn parse(
        raw_fat: &str,
        skim_fat: &str,
        target_fat: &str,
        raw_volume: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            raw_fat_pct: parse_decimal(FIELD_RAW_FAT, raw_fat)?,
            skim_fat_pct: parse_decimal(FIELD_SKIM_FAT, skim_fat)?,
            target_fat_pct: parse_decimal(FIELD_TARGET_FAT, target_fat)?,
            raw_volume_l: parse_decimal(FIELD_RAW_VOLUME, raw_volume)?,
        })
    }

    /// First non-finite field, in declaration order
    fn first_non_finite(&self) -> Option<&'static str> {
        [
            (FIELD_RAW_FAT, self.raw_fat_pct),
            (FIELD_SKIM_FAT, self.skim_fat_pct),
            (FIELD_TARGET_FAT, self.target_fat_pct),
            (FIELD_RAW_VOLUME, self.raw_volume_l),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(field, _)| field)
    }
}

impl Default for StandardizationInput {
    /// The calculator's reset values
    fn default() -> Self {
        Self::new(4.0, 0.2, 3.0, 1000.0)
    }
}

/// Pearson Square proportions, raw parts to skim parts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixRatio {
    pub part_raw: f64,
    pub part_skim: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardizationResult {
    pub skim_volume_l: f64,
    pub total_volume_l: f64,
    pub mix_ratio: MixRatio,
    /// Liters of skim per liter of raw milk
    pub ratio: f64,
}

/// Parse a decimal field, rejecting empty, non-numeric and non-finite text
pub fn parse_decimal(field: &'static str, text: &str) -> Result<f64, ValidationError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::InvalidNumber { field })
}

/// Validate the input and compute the blend.
///
/// Checks run in a fixed order and only the first failure is reported:
/// finiteness, target below raw, target above skim, positive volume.
pub fn compute(input: &StandardizationInput) -> Result<StandardizationResult, ValidationError> {
    if let Some(field) = input.first_non_finite() {
        return Err(ValidationError::InvalidNumber { field });
    }
    if input.target_fat_pct >= input.raw_fat_pct {
        return Err(ValidationError::TargetNotBelowRaw);
    }
    if input.target_fat_pct <= input.skim_fat_pct {
        return Err(ValidationError::TargetNotAboveSkim);
    }
    if input.raw_volume_l <= 0.0 {
        return Err(ValidationError::NonPositiveVolume);
    }

    let part_skim = input.raw_fat_pct - input.target_fat_pct;
    let part_raw = input.target_fat_pct - input.skim_fat_pct;

    let ratio = part_skim / part_raw;
    let skim_volume_l = input.raw_volume_l * ratio;
    let total_volume_l = input.raw_volume_l + skim_volume_l;

    Ok(StandardizationResult {
        skim_volume_l,
        total_volume_l,
        mix_ratio: MixRatio { part_raw, part_skim },
        ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_example() {
        let result = compute(&StandardizationInput::new(4.0, 0.2, 3.0, 1000.0)).unwrap();
        assert!((result.mix_ratio.part_skim - 1.0).abs() < 1e-9);
        assert!((result.mix_ratio.part_raw - 2.8).abs() < 1e-9);
        assert!((result.ratio - 0.357142857).abs() < 1e-6);
        assert!((result.skim_volume_l - 357.142857).abs() < 1e-3);
        assert!((result.total_volume_l - 1357.142857).abs() < 1e-3);
    }

    #[test]
    fn test_low_skim_example() {
        let result = compute(&StandardizationInput::new(3.5, 0.1, 2.0, 500.0)).unwrap();
        let expected = 500.0 * (1.5 / 1.9);
        assert!((result.skim_volume_l - expected).abs() < 1e-9);
        assert!((result.total_volume_l - (500.0 + expected)).abs() < 1e-9);
    }

    #[test]
    fn test_target_above_raw() {
        let err = compute(&StandardizationInput::new(3.0, 0.2, 3.5, 1000.0)).unwrap_err();
        assert_eq!(err, ValidationError::TargetNotBelowRaw);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(
            compute(&StandardizationInput::new(3.0, 0.2, 3.0, 1000.0)),
            Err(ValidationError::TargetNotBelowRaw)
        );
        assert_eq!(
            compute(&StandardizationInput::new(4.0, 0.2, 0.2, 1000.0)),
            Err(ValidationError::TargetNotAboveSkim)
        );
        assert_eq!(
            compute(&StandardizationInput::new(4.0, 0.2, 3.0, 0.0)),
            Err(ValidationError::NonPositiveVolume)
        );
        assert_eq!(
            compute(&StandardizationInput::new(4.0, 0.2, 3.0, -5.0)),
            Err(ValidationError::NonPositiveVolume)
        );
    }

    #[test]
    fn test_first_failure_wins() {
        // target above raw, below skim, and zero volume: only the first is reported
        let err = compute(&StandardizationInput::new(1.0, 5.0, 2.0, 0.0)).unwrap_err();
        assert_eq!(err, ValidationError::TargetNotBelowRaw);

        let err = compute(&StandardizationInput::new(4.0, 3.5, 3.0, 0.0)).unwrap_err();
        assert_eq!(err, ValidationError::TargetNotAboveSkim);
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = compute(&StandardizationInput::new(4.0, f64::NAN, 3.0, 1000.0)).unwrap_err();
        assert_eq!(err, ValidationError::InvalidNumber { field: FIELD_SKIM_FAT });

        let err = compute(&StandardizationInput::new(4.0, 0.2, 3.0, f64::INFINITY)).unwrap_err();
        assert_eq!(err, ValidationError::InvalidNumber { field: FIELD_RAW_VOLUME });
    }

    #[test]
    fn test_idempotent() {
        let input = StandardizationInput::new(4.2, 0.05, 3.25, 1234.5);
        assert_eq!(compute(&input), compute(&input));
    }

    #[test]
    fn test_valid_inputs_increase_volume() {
        let raws = [3.2, 3.8, 4.5, 6.0];
        let skims = [0.0, 0.05, 0.1, 0.5];
        let volumes = [0.5, 10.0, 1000.0, 25000.0];

        for &raw in &raws {
            for &skim in &skims {
                for &volume in &volumes {
                    let target = skim + (raw - skim) * 0.4;
                    let result = compute(&StandardizationInput::new(raw, skim, target, volume)).unwrap();
                    assert!(result.skim_volume_l >= 0.0);
                    assert!(result.total_volume_l > volume);
                }
            }
        }
    }

    #[test]
    fn test_blend_hits_target() {
        // fat mass balance: raw*V_raw + skim*V_skim == target*V_total
        let input = StandardizationInput::new(4.0, 0.2, 3.0, 1000.0);
        let result = compute(&input).unwrap();
        let fat = input.raw_fat_pct * input.raw_volume_l + input.skim_fat_pct * result.skim_volume_l;
        assert!((fat / result.total_volume_l - input.target_fat_pct).abs() < 1e-9);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(FIELD_RAW_FAT, " 4.0 "), Ok(4.0));
        assert_eq!(parse_decimal(FIELD_RAW_FAT, "1000"), Ok(1000.0));
        for bad in ["", "abc", "NaN", "inf", "-infinity", "4,0"] {
            assert_eq!(
                parse_decimal(FIELD_RAW_FAT, bad),
                Err(ValidationError::InvalidNumber { field: FIELD_RAW_FAT }),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_input_reports_first_bad_field() {
        let err = StandardizationInput::parse("4.0", "x", "", "1000").unwrap_err();
        assert_eq!(err, ValidationError::InvalidNumber { field: FIELD_SKIM_FAT });

        let input = StandardizationInput::parse("4.0", "0.2", "3.0", "1000").unwrap();
        assert_eq!(input, StandardizationInput::default());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ValidationError::TargetNotBelowRaw.kind(), "target_not_below_raw");
        assert_eq!(
            ValidationError::InvalidNumber { field: FIELD_RAW_FAT }.to_string(),
            "Please enter valid numbers for all fields"
        );
        assert_eq!(ValidationError::InvalidNumber { field: FIELD_SKIM_FAT }.field(), Some(FIELD_SKIM_FAT));
        assert_eq!(ValidationError::NonPositiveVolume.field(), None);
    }
}
