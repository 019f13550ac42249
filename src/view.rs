/// serializable response shapes for transport layers
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::loan::Loan;
use crate::types::{LoanId, LoanStatus, LoanType, OwnerId};

/// flattened view of a loan's state for API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub owner_id: OwnerId,
    pub loan_type: LoanType,
    pub status: LoanStatus,
    pub start_date: NaiveDate,
    pub financial: FinancialView,
    pub repayment: RepaymentView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinancialView {
    pub principal: Money,
    pub interest_rate: Rate,
    pub term_years: u32,
    pub emi_amount: Money,
    pub total_amount: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepaymentView {
    pub remaining_amount: Money,
    pub paid_to_date: Money,
    pub progress_percent: Decimal,
    pub payment_count: usize,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub next_payment_date: Option<DateTime<Utc>>,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        LoanView {
            id: loan.id,
            owner_id: loan.owner_id,
            loan_type: loan.loan_type,
            status: loan.status,
            start_date: loan.start_date,
            financial: FinancialView {
                principal: loan.principal,
                interest_rate: loan.interest_rate,
                term_years: loan.term_years,
                emi_amount: loan.emi_amount,
                total_amount: loan.total_amount,
            },
            repayment: RepaymentView {
                remaining_amount: loan.remaining_amount,
                paid_to_date: loan.paid_to_date(),
                progress_percent: loan.progress_percent(),
                payment_count: loan.payment_history.len(),
                last_payment_date: loan.payment_history.last().map(|p| p.date),
                next_payment_date: loan.next_payment_date,
            },
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::LoanApplication;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_view_reflects_repayment_state() {
        let application = LoanApplication::vehicle(
            Money::from_major(24_000),
            Rate::ZERO,
            2,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();

        let mut loan = Loan::originate(
            Uuid::new_v4(),
            &application,
            Money::from_major(1_000),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        loan.apply_payment(
            Money::from_major(6_000),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        );

        let view = LoanView::from_loan(&loan);

        assert_eq!(view.repayment.paid_to_date, Money::from_major(6_000));
        assert_eq!(view.repayment.progress_percent, dec!(25));
        assert_eq!(view.repayment.payment_count, 1);
        assert_eq!(view.repayment.next_payment_date, loan.next_payment_date);

        let json = view.to_json_pretty().unwrap();
        assert!(json.contains("\"loan_type\": \"vehicle\""));
        assert!(json.contains("\"status\": \"pending\""));
    }
}
