//! Standardization request model
//!
//! A validated calculation together with who it was prepared by.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::Preparer;
use crate::standardization::{
    compute, StandardizationDisplay, StandardizationInput, StandardizationResult, ValidationError,
};

/// Everything a report needs, computed once
#[derive(Debug, Clone, Serialize)]
pub struct StandardizationRequest {
    pub preparer: Preparer,
    pub input: StandardizationInput,
    pub result: StandardizationResult,
    pub display: StandardizationDisplay,
    pub calculated_at: DateTime<Local>,
}

impl StandardizationRequest {
    /// Validate the input and compute the blend; no partial request on error
    pub fn new(preparer: Preparer, input: StandardizationInput) -> Result<Self, ValidationError> {
        let result = compute(&input)?;
        let display = StandardizationDisplay::new(&input, &result);

        Ok(Self {
            preparer,
            input,
            result,
            display,
            calculated_at: Local::now(),
        })
    }

    /// e.g. "October 16, 2026"
    pub fn calculated_date(&self) -> String {
        self.calculated_at.format("%B %-d, %Y").to_string()
    }

    /// e.g. "October 16, 2026, 09:05 AM"
    pub fn calculated_date_time(&self) -> String {
        self.calculated_at.format("%B %-d, %Y, %I:%M %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn preparer() -> Preparer {
        Preparer::new("Ana Ruiz", "Valle Dairy").unwrap()
    }

    #[test]
    fn test_request_computes_result() {
        let req = StandardizationRequest::new(preparer(), StandardizationInput::default()).unwrap();
        assert_eq!(req.display.skim_volume, "357.14 L");
        assert!((req.result.total_volume_l - 1357.142857).abs() < 1e-3);
    }

    #[test]
    fn test_request_rejects_invalid_input() {
        let input = StandardizationInput::new(3.0, 0.2, 3.5, 1000.0);
        let err = StandardizationRequest::new(preparer(), input).unwrap_err();
        assert_eq!(err, ValidationError::TargetNotBelowRaw);
    }

    #[test]
    fn test_date_formats() {
        let mut req = StandardizationRequest::new(preparer(), StandardizationInput::default()).unwrap();
        req.calculated_at = Local.with_ymd_and_hms(2026, 3, 7, 14, 5, 0).unwrap();
        assert_eq!(req.calculated_date(), "March 7, 2026");
        assert_eq!(req.calculated_date_time(), "March 7, 2026, 02:05 PM");
    }
}
