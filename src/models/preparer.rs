//! Preparer model
//!
//! Who a standardization report is prepared by, for report headers.

use serde::{Deserialize, Serialize};

use crate::standardization::ValidationError;

/// Person and company a report is prepared for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preparer {
    pub user_name: String,
    pub company_name: String,
}

impl Preparer {
    /// Build from form input; both names are trimmed and required
    pub fn new(user_name: &str, company_name: &str) -> Result<Self, ValidationError> {
        let user_name = user_name.trim();
        let company_name = company_name.trim();

        if user_name.is_empty() || company_name.is_empty() {
            return Err(ValidationError::MissingPreparer);
        }

        Ok(Self {
            user_name: user_name.to_string(),
            company_name: company_name.to_string(),
        })
    }
}
