//! Display formatting for standardization results
//!
//! All rounding for presentation lives here. The calculator returns full
//! precision; the CLI, tool responses and PDF report read these strings.

use serde::Serialize;

use super::calculator::{StandardizationInput, StandardizationResult};

/// Decimal places for fat percentages and ratio parts
pub const PERCENT_DECIMALS: usize = 1;
/// Decimal places for computed volumes
pub const VOLUME_DECIMALS: usize = 2;

pub fn format_percent(value: f64) -> String {
    format!("{:.*}%", PERCENT_DECIMALS, value)
}

pub fn format_liters(value: f64) -> String {
    format!("{:.*} L", VOLUME_DECIMALS, value)
}

/// Raw volume is an operator-entered quantity and shown whole
pub fn format_whole_liters(value: f64) -> String {
    format!("{:.0} L", value)
}

/// One side of the Pearson Square, e.g. "2.8"
pub fn format_part(value: f64) -> String {
    format!("{:.*}", PERCENT_DECIMALS, value)
}

/// Raw:skim parts, e.g. "2.8:1.0"
pub fn format_mix_ratio(part_raw: f64, part_skim: f64) -> String {
    format!("{}:{}", format_part(part_raw), format_part(part_skim))
}

/// Rounded, unit-suffixed strings for one calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardizationDisplay {
    pub raw_fat: String,
    pub skim_fat: String,
    pub target_fat: String,
    pub raw_volume: String,
    pub skim_volume: String,
    pub total_volume: String,
    pub mixing_ratio: String,
}

impl StandardizationDisplay {
    pub fn new(input: &StandardizationInput, result: &StandardizationResult) -> Self {
        Self {
            raw_fat: format_percent(input.raw_fat_pct),
            skim_fat: format_percent(input.skim_fat_pct),
            target_fat: format_percent(input.target_fat_pct),
            raw_volume: format_whole_liters(input.raw_volume_l),
            skim_volume: format_liters(result.skim_volume_l),
            total_volume: format_liters(result.total_volume_l),
            mixing_ratio: format_mix_ratio(result.mix_ratio.part_raw, result.mix_ratio.part_skim),
        }
    }

    /// Plain-text result block for terminals
    pub fn to_text(&self) -> String {
        format!(
            "Raw Milk:          {} fat, {}\n\
             Skim Milk:         {} fat\n\
             Target:            {} fat\n\
             Skim Milk Required:      {}\n\
             Total Standardized Milk: {}\n\
             Mixing Ratio (Raw:Skim): {}\n",
            self.raw_fat,
            self.raw_volume,
            self.skim_fat,
            self.target_fat,
            self.skim_volume,
            self.total_volume,
            self.mixing_ratio,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standardization::calculator::compute;

    #[test]
    fn test_reference_display() {
        let input = StandardizationInput::default();
        let result = compute(&input).unwrap();
        let display = StandardizationDisplay::new(&input, &result);

        assert_eq!(display.raw_fat, "4.0%");
        assert_eq!(display.skim_fat, "0.2%");
        assert_eq!(display.target_fat, "3.0%");
        assert_eq!(display.raw_volume, "1000 L");
        assert_eq!(display.skim_volume, "357.14 L");
        assert_eq!(display.total_volume, "1357.14 L");
        assert_eq!(display.mixing_ratio, "2.8:1.0");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_percent(2.0), "2.0%");
        assert_eq!(format_percent(0.1), "0.1%");
        assert_eq!(format_liters(0.0), "0.00 L");
        assert_eq!(format_whole_liters(999.6), "1000 L");
        assert_eq!(format_mix_ratio(1.9, 1.5), "1.9:1.5");
    }

    #[test]
    fn test_to_text_contains_results() {
        let input = StandardizationInput::default();
        let result = compute(&input).unwrap();
        let text = StandardizationDisplay::new(&input, &result).to_text();
        assert!(text.contains("Skim Milk Required:      357.14 L"));
        assert!(text.contains("Mixing Ratio (Raw:Skim): 2.8:1.0"));
    }
}
