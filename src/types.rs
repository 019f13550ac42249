use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::LoanError;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for the user owning a loan
pub type OwnerId = Uuid;

/// product category of a loan, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    Personal,
    Home,
    Business,
    Education,
    Vehicle,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Personal => "personal",
            LoanType::Home => "home",
            LoanType::Business => "business",
            LoanType::Education => "education",
            LoanType::Vehicle => "vehicle",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanType {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(LoanType::Personal),
            "home" => Ok(LoanType::Home),
            "business" => Ok(LoanType::Business),
            "education" => Ok(LoanType::Education),
            "vehicle" => Ok(LoanType::Vehicle),
            other => Err(LoanError::UnknownLoanType {
                value: other.to_string(),
            }),
        }
    }
}

/// loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// applied for, awaiting review
    Pending,
    /// accepted by an administrator, not yet disbursed
    Approved,
    /// declined by an administrator
    Rejected,
    /// funds disbursed, repayment in progress
    Active,
    /// fully repaid
    Completed,
    /// borrower stopped repaying
    Defaulted,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Active => "active",
            LoanStatus::Completed => "completed",
            LoanStatus::Defaulted => "defaulted",
        }
    }

    /// terminal under the intended lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoanStatus::Rejected | LoanStatus::Completed | LoanStatus::Defaulted
        )
    }

    /// whether `next` follows this status in the intended lifecycle:
    /// pending -> approved/rejected, approved -> active,
    /// active -> completed/defaulted.
    ///
    /// Advisory only. The engine overwrites status unconditionally; callers
    /// wanting strict transitions check this themselves.
    pub fn intended_transition(&self, next: LoanStatus) -> bool {
        matches!(
            (self, next),
            (LoanStatus::Pending, LoanStatus::Approved)
                | (LoanStatus::Pending, LoanStatus::Rejected)
                | (LoanStatus::Approved, LoanStatus::Active)
                | (LoanStatus::Active, LoanStatus::Completed)
                | (LoanStatus::Active, LoanStatus::Defaulted)
        )
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LoanStatus::Pending),
            "approved" => Ok(LoanStatus::Approved),
            "rejected" => Ok(LoanStatus::Rejected),
            "active" => Ok(LoanStatus::Active),
            "completed" => Ok(LoanStatus::Completed),
            "defaulted" => Ok(LoanStatus::Defaulted),
            other => Err(LoanError::UnknownStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// settlement status of a single recorded payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}
