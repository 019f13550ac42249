use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;

use crate::application::LoanApplication;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::schedule::calculate_emi;
use crate::types::{LoanId, LoanStatus, OwnerId};

/// result of recording a payment
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub loan_id: LoanId,
    pub amount: Money,
    pub payment_date: DateTime<Utc>,
    pub remaining_after: Money,
    pub completed: bool,
}

/// the loan engine: pure domain logic over in-memory loan values.
///
/// Performs no I/O and holds no state of its own. Callers load a loan,
/// invoke an operation, and persist the result; serializing concurrent
/// mutations of one loan is the persistence layer's job.
#[derive(Debug, Default)]
pub struct LoanEngine;

impl LoanEngine {
    pub fn new() -> Self {
        Self
    }

    /// create a loan from a validated application.
    ///
    /// Derives EMI, total and remaining amounts in one pass; the returned
    /// loan is pending with an empty payment history and no scheduled
    /// payment date. Nothing is persisted here.
    pub fn create_loan(
        &self,
        owner_id: OwnerId,
        application: &LoanApplication,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Loan {
        let emi_amount = calculate_emi(
            application.principal(),
            application.interest_rate(),
            application.term_months(),
        );

        let loan = Loan::originate(owner_id, application, emi_amount, time_provider.now());

        events.emit(Event::LoanCreated {
            loan_id: loan.id,
            owner_id: loan.owner_id,
            loan_type: loan.loan_type,
            principal: loan.principal,
            emi_amount: loan.emi_amount,
            total_amount: loan.total_amount,
            timestamp: loan.created_at,
        });

        loan
    }

    /// overwrite the loan status.
    ///
    /// No transition table is enforced here: any status can be set over any
    /// other, including completed back to pending. The intended lifecycle
    /// lives in `LoanStatus::intended_transition` for callers that want it,
    /// and the admin-only restriction is the access policy's concern.
    pub fn set_status(
        &self,
        loan: &mut Loan,
        new_status: LoanStatus,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) {
        let now = time_provider.now();
        let old_status = loan.force_status(new_status, now);

        events.emit(Event::StatusChanged {
            loan_id: loan.id,
            old_status,
            new_status,
            timestamp: now,
        });
    }

    /// record a repayment against the loan.
    ///
    /// Appends a completed payment, decrements the remaining balance with
    /// no floor at zero, schedules the next payment 30 days out, and marks
    /// the loan completed once the balance reaches zero or below. Whether
    /// the loan was active to begin with is not checked here.
    pub fn record_payment(
        &self,
        loan: &mut Loan,
        amount: Money,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<PaymentReceipt> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidPaymentAmount { amount });
        }

        let now = time_provider.now();
        let completed = loan.apply_payment(amount, now);

        events.emit(Event::PaymentRecorded {
            loan_id: loan.id,
            amount,
            remaining_amount: loan.remaining_amount,
            next_payment_date: now + chrono::Duration::days(crate::loan::PAYMENT_INTERVAL_DAYS),
            timestamp: now,
        });

        if completed {
            events.emit(Event::LoanCompleted {
                loan_id: loan.id,
                final_payment: amount,
                timestamp: now,
            });
        }

        Ok(PaymentReceipt {
            loan_id: loan.id,
            amount,
            payment_date: now,
            remaining_after: loan.remaining_amount,
            completed,
        })
    }

    /// share of the principal repaid, in percent, unclamped
    pub fn payment_progress_percent(&self, loan: &Loan) -> Decimal {
        loan.progress_percent()
    }
}
