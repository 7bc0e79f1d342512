//! Data models
//!
//! Report preparer and the computed standardization request.

mod preparer;
mod request;

pub use preparer::Preparer;
pub use request::StandardizationRequest;
