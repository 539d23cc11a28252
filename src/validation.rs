//! Checks applied before a transaction reaches the pricer.
//!
//! The pricer itself accepts any input; rejecting non-positive amounts and
//! month counts outside `1..=12` happens here.

use thiserror::Error;

use crate::installment::INSTALLMENT_MONTHS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(i64),
    #[error("category is required")]
    MissingCategory,
    #[error("installment months must be between 1 and 12, got {0}")]
    InstallmentOutOfRange(i32),
}

pub fn validate_amount(amount: i64) -> Result<(), ValidationError> {
    if amount <= 0 {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}

pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    Ok(())
}

pub fn validate_installment_months(months: i32) -> Result<(), ValidationError> {
    if !INSTALLMENT_MONTHS.contains(&months) {
        return Err(ValidationError::InstallmentOutOfRange(months));
    }
    Ok(())
}
