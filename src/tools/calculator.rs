//! Standardization calculator tools
//!
//! Tool-level operations over the Pearson Square calculator: parsing loosely
//! typed field values, computing, and producing reports.

use std::path::{Path, PathBuf};

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use super::diagram::export_pearson_diagram;
use super::reports::{generate_standardization_report, GenerateReportResponse, ReportError};
use crate::config::default_report_path;
use crate::models::{Preparer, StandardizationRequest};
use crate::standardization::calculator::{
    FIELD_RAW_FAT, FIELD_RAW_VOLUME, FIELD_SKIM_FAT, FIELD_TARGET_FAT,
};
use crate::standardization::{
    compute, parse_decimal, StandardizationDisplay, StandardizationInput, StandardizationResult,
    ValidationError,
};

/// A numeric field as sent by a client: a JSON number or numeric text
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    fn resolve(&self, field: &'static str) -> Result<f64, ValidationError> {
        match self {
            NumberInput::Number(v) if v.is_finite() => Ok(*v),
            NumberInput::Number(_) => Err(ValidationError::InvalidNumber { field }),
            NumberInput::Text(s) => parse_decimal(field, s),
        }
    }
}

impl From<f64> for NumberInput {
    fn from(v: f64) -> Self {
        NumberInput::Number(v)
    }
}

impl From<&str> for NumberInput {
    fn from(s: &str) -> Self {
        NumberInput::Text(s.to_string())
    }
}

/// The four calculator fields before parsing
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct FieldValues {
    /// Raw milk fat percentage, e.g. 4.0
    pub raw_fat_pct: NumberInput,
    /// Skim milk fat percentage, e.g. 0.2
    pub skim_fat_pct: NumberInput,
    /// Target fat percentage of the blend, e.g. 3.0
    pub target_fat_pct: NumberInput,
    /// Raw milk volume in liters, e.g. 1000
    pub raw_volume_l: NumberInput,
}

impl FieldValues {
    /// Parse in field order, reporting the first bad one
    pub fn parse(&self) -> Result<StandardizationInput, ValidationError> {
        Ok(StandardizationInput {
            raw_fat_pct: self.raw_fat_pct.resolve(FIELD_RAW_FAT)?,
            skim_fat_pct: self.skim_fat_pct.resolve(FIELD_SKIM_FAT)?,
            target_fat_pct: self.target_fat_pct.resolve(FIELD_TARGET_FAT)?,
            raw_volume_l: self.raw_volume_l.resolve(FIELD_RAW_VOLUME)?,
        })
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<StandardizationInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<StandardizationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<StandardizationDisplay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub message: String,
}

impl CalculationResponse {
    pub fn rejected(err: &ValidationError) -> Self {
        Self {
            success: false,
            input: None,
            result: None,
            display: None,
            error_kind: Some(err.kind()),
            field: err.field(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DefaultInputsResponse {
    pub input: StandardizationInput,
    pub message: String,
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Parse and compute; validation failures come back as a rejected response
pub fn calculate_standardization(fields: &FieldValues) -> CalculationResponse {
    let outcome = fields
        .parse()
        .and_then(|input| compute(&input).map(|result| (input, result)));

    match outcome {
        Ok((input, result)) => {
            let shown = StandardizationDisplay::new(&input, &result);
            tracing::info!(
                "Standardized {} at {} to {}: add {} skim ({} fat)",
                shown.raw_volume,
                shown.raw_fat,
                shown.target_fat,
                shown.skim_volume,
                shown.skim_fat
            );
            let message = format!(
                "Add {} of skim milk to reach {} of standardized milk",
                shown.skim_volume, shown.total_volume
            );
            CalculationResponse {
                success: true,
                input: Some(input),
                result: Some(result),
                display: Some(shown),
                error_kind: None,
                field: None,
                message,
            }
        }
        Err(e) => {
            tracing::warn!("Standardization rejected: {}", e);
            CalculationResponse::rejected(&e)
        }
    }
}

/// The calculator's reset values
pub fn default_inputs() -> DefaultInputsResponse {
    DefaultInputsResponse {
        input: StandardizationInput::default(),
        message: "Default calculator values: 4.0% raw, 0.2% skim, 3.0% target, 1000 L raw milk"
            .to_string(),
    }
}

/// Validate preparer and fields, compute, and write the PDF report.
///
/// `output_path` defaults to a timestamped file in `report_dir`. When
/// `diagram_path` is given the Pearson Square diagram is also saved as PNG.
pub fn generate_report(
    user_name: &str,
    company_name: &str,
    fields: &FieldValues,
    output_path: Option<&str>,
    diagram_path: Option<&str>,
    report_dir: &Path,
) -> Result<GenerateReportResponse, ReportError> {
    let preparer = Preparer::new(user_name, company_name)?;
    let input = fields.parse()?;
    let request = StandardizationRequest::new(preparer, input)?;

    let path = match output_path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => PathBuf::from(p),
        None => default_report_path(report_dir, &request.calculated_at),
    };

    let mut response = generate_standardization_report(&request, &path)?;

    if let Some(diagram) = diagram_path.map(str::trim).filter(|p| !p.is_empty()) {
        match export_pearson_diagram(&request, Path::new(diagram)) {
            Ok(()) => response.message.push_str(&format!("; diagram saved to {}", diagram)),
            Err(e) => {
                tracing::warn!("Diagram export to {} failed: {}", diagram, e);
                response.message.push_str(&format!("; diagram export failed: {}", e));
            }
        }
    }

    Ok(response)
}
