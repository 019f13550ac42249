use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::LoanApplication;
use crate::decimal::{Money, Rate};
use crate::types::{LoanId, LoanStatus, LoanType, OwnerId, PaymentStatus};

/// days between a recorded payment and the next expected one
pub const PAYMENT_INTERVAL_DAYS: i64 = 30;

/// a single recorded repayment, embedded in the loan it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub status: PaymentStatus,
}

/// supporting document attached to a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// free-form note attached to a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub created_by: OwnerId,
}

/// the loan record.
///
/// Financial terms are fixed at creation; `emi_amount` and `total_amount`
/// are derived once and never recomputed. `remaining_amount` always equals
/// `principal` minus the sum of recorded payment amounts, and is allowed to
/// go negative when a payment overshoots the balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub owner_id: OwnerId,
    pub loan_type: LoanType,
    pub principal: Money,
    pub interest_rate: Rate,
    pub term_years: u32,
    pub start_date: NaiveDate,
    pub status: LoanStatus,
    pub emi_amount: Money,
    pub total_amount: Money,
    pub remaining_amount: Money,
    pub next_payment_date: Option<DateTime<Utc>>,
    pub payment_history: Vec<Payment>,
    pub documents: Vec<Document>,
    pub notes: Vec<Note>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    /// materialize a loan from a validated application and its computed EMI
    pub fn originate(
        owner_id: OwnerId,
        application: &LoanApplication,
        emi_amount: Money,
        now: DateTime<Utc>,
    ) -> Self {
        let total_amount = emi_amount * Decimal::from(application.term_months());

        Self {
            id: Uuid::new_v4(),
            owner_id,
            loan_type: application.loan_type(),
            principal: application.principal(),
            interest_rate: application.interest_rate(),
            term_years: application.term_years(),
            start_date: application.start_date(),
            status: LoanStatus::Pending,
            emi_amount,
            total_amount,
            remaining_amount: application.principal(),
            next_payment_date: None,
            payment_history: Vec::new(),
            documents: Vec::new(),
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// repayment term in months
    pub fn term_months(&self) -> u32 {
        self.term_years * 12
    }

    /// amount repaid so far
    pub fn paid_to_date(&self) -> Money {
        self.principal - self.remaining_amount
    }

    /// share of the principal repaid, in percent. Not clamped: exceeds 100
    /// once the remaining balance has gone negative.
    pub fn progress_percent(&self) -> Decimal {
        (self.principal - self.remaining_amount).as_decimal() / self.principal.as_decimal()
            * Decimal::from(100)
    }

    /// whether the status is terminal under the intended lifecycle
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// overwrite the status, returning the previous one
    pub fn force_status(&mut self, new_status: LoanStatus, now: DateTime<Utc>) -> LoanStatus {
        let old = self.status;
        self.status = new_status;
        self.updated_at = now;
        old
    }

    /// append a completed payment and update every dependent field.
    /// Returns true when this payment drove the loan to completion.
    pub fn apply_payment(&mut self, amount: Money, now: DateTime<Utc>) -> bool {
        self.payment_history.push(Payment {
            amount,
            date: now,
            status: PaymentStatus::Completed,
        });

        self.remaining_amount -= amount;
        self.next_payment_date = Some(now + Duration::days(PAYMENT_INTERVAL_DAYS));
        self.updated_at = now;

        if self.remaining_amount <= Money::ZERO {
            let newly_completed = self.status != LoanStatus::Completed;
            self.status = LoanStatus::Completed;
            return newly_completed;
        }

        false
    }
}
