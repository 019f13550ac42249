use chrono::NaiveDate;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::LoanType;

/// validated loan application: the immutable draft a loan is created from.
///
/// Construction is the only validation gate for financial terms. Once an
/// application exists, the engine derives all computed fields from it in a
/// single pass, so a loan is never observable in a partially-derived state.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanApplication {
    loan_type: LoanType,
    principal: Money,
    interest_rate: Rate,
    term_years: u32,
    start_date: NaiveDate,
}

impl LoanApplication {
    pub fn new(
        loan_type: LoanType,
        principal: Money,
        interest_rate: Rate,
        term_years: u32,
        start_date: NaiveDate,
    ) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LoanError::InvalidPrincipal { amount: principal });
        }

        if interest_rate.is_negative() {
            return Err(LoanError::InvalidInterestRate {
                rate: interest_rate,
            });
        }

        if term_years < 1 {
            return Err(LoanError::InvalidTerm { years: term_years });
        }

        Ok(Self {
            loan_type,
            principal,
            interest_rate,
            term_years,
            start_date,
        })
    }

    /// personal loan application
    pub fn personal(
        principal: Money,
        rate: Rate,
        term_years: u32,
        start_date: NaiveDate,
    ) -> Result<Self> {
        Self::new(LoanType::Personal, principal, rate, term_years, start_date)
    }

    /// home loan application
    pub fn home(
        principal: Money,
        rate: Rate,
        term_years: u32,
        start_date: NaiveDate,
    ) -> Result<Self> {
        Self::new(LoanType::Home, principal, rate, term_years, start_date)
    }

    /// business loan application
    pub fn business(
        principal: Money,
        rate: Rate,
        term_years: u32,
        start_date: NaiveDate,
    ) -> Result<Self> {
        Self::new(LoanType::Business, principal, rate, term_years, start_date)
    }

    /// education loan application
    pub fn education(
        principal: Money,
        rate: Rate,
        term_years: u32,
        start_date: NaiveDate,
    ) -> Result<Self> {
        Self::new(LoanType::Education, principal, rate, term_years, start_date)
    }

    /// vehicle loan application
    pub fn vehicle(
        principal: Money,
        rate: Rate,
        term_years: u32,
        start_date: NaiveDate,
    ) -> Result<Self> {
        Self::new(LoanType::Vehicle, principal, rate, term_years, start_date)
    }

    pub fn loan_type(&self) -> LoanType {
        self.loan_type
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn interest_rate(&self) -> Rate {
        self.interest_rate
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// repayment term in months
    pub fn term_months(&self) -> u32 {
        self.term_years * 12
    }
}
