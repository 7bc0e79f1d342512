//! Milk standardization module
//!
//! Pearson Square calculation and its presentation rounding.

pub mod calculator;
pub mod display;

pub use calculator::{
    compute, parse_decimal, MixRatio, StandardizationInput, StandardizationResult,
    ValidationError,
};
pub use display::StandardizationDisplay;
