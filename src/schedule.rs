use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::loan::Loan;
use crate::types::LoanId;

/// calculate the equated monthly installment, rounded to cents.
///
/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1) with r the monthly rate.
/// A zero rate collapses the denominator, so zero-interest loans pay the
/// principal in equal slices instead.
pub fn calculate_emi(principal: Money, annual_rate: Rate, months: u32) -> Money {
    if months == 0 {
        return principal;
    }

    let r = annual_rate.monthly_fraction();

    if r.is_zero() {
        return principal / Decimal::from(months);
    }

    // (1 + r)^n
    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + r;
    for _ in 0..months {
        compound *= base;
    }

    let numerator = principal.as_decimal() * r * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}

/// one projected installment of a repayment schedule
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledInstallment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub opening_balance: Money,
    pub payment_amount: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub closing_balance: Money,
}

/// projected equal-installment repayment plan for a loan.
///
/// Driven by the EMI stored on the loan at creation, not a recomputed one,
/// so the projection matches what the borrower was quoted. The final
/// installment absorbs the rounding residue and lands on a zero balance.
#[derive(Debug, Clone)]
pub struct RepaymentSchedule {
    pub loan_id: LoanId,
    pub emi_amount: Money,
    pub installments: Vec<ScheduledInstallment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl RepaymentSchedule {
    pub fn project(loan: &Loan) -> Self {
        let months = loan.term_months();
        let r = loan.interest_rate.monthly_fraction();
        let emi = loan.emi_amount;

        let mut installments = Vec::with_capacity(months as usize);
        let mut balance = loan.principal;

        for number in 1..=months {
            let due_date = add_months(loan.start_date, number);
            let interest_portion = Money::from_decimal(balance.as_decimal() * r);

            let principal_portion = if number == months {
                // final installment clears whatever is left
                balance
            } else {
                emi - interest_portion
            };

            let payment_amount = interest_portion + principal_portion;
            let closing_balance = balance - principal_portion;

            installments.push(ScheduledInstallment {
                number,
                due_date,
                opening_balance: balance,
                payment_amount,
                interest_portion,
                principal_portion,
                closing_balance,
            });

            balance = closing_balance;
        }

        let total_interest = installments
            .iter()
            .map(|i| i.interest_portion)
            .fold(Money::ZERO, |acc, x| acc + x);

        let total_payment = installments
            .iter()
            .map(|i| i.payment_amount)
            .fold(Money::ZERO, |acc, x| acc + x);

        Self {
            loan_id: loan.id,
            emi_amount: emi,
            installments,
            total_interest,
            total_payment,
        }
    }

    /// get installment by number (1-based)
    pub fn installment(&self, number: u32) -> Option<&ScheduledInstallment> {
        self.installments.get(number.checked_sub(1)? as usize)
    }
}

/// calendar-month arithmetic with the day clamped to the target month length
fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));

    // day clamped to month length
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
