use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::LoanId;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid principal: {amount}, must be positive")]
    InvalidPrincipal {
        amount: Money,
    },

    #[error("invalid interest rate: {rate}, must not be negative")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("invalid term: {years} years, must be at least 1")]
    InvalidTerm {
        years: u32,
    },

    #[error("invalid payment amount: {amount}, must be positive")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("unknown loan type: {value}")]
    UnknownLoanType {
        value: String,
    },

    #[error("unknown loan status: {value}")]
    UnknownStatus {
        value: String,
    },

    #[error("loan not found: {id}")]
    NotFound {
        id: LoanId,
    },

    #[error("not authorized to {action}")]
    Forbidden {
        action: String,
    },
}

impl LoanError {
    /// validation failures the caller can surface as a rejected request
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            LoanError::InvalidPrincipal { .. }
                | LoanError::InvalidInterestRate { .. }
                | LoanError::InvalidTerm { .. }
                | LoanError::InvalidPaymentAmount { .. }
                | LoanError::UnknownLoanType { .. }
                | LoanError::UnknownStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
