use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::{LoanId, OwnerId};

/// persistence seam for loan records.
///
/// `update_with` is the only mutation path: implementations must run
/// load -> mutate -> store as one atomic step per loan id, so two
/// concurrent mutations of the same loan can never interleave and drop a
/// payment or a balance decrement. If the closure fails the stored loan is
/// left untouched.
pub trait LoanRepository {
    fn insert(&self, loan: Loan) -> Result<()>;

    fn find_by_id(&self, id: LoanId) -> Result<Loan>;

    /// loans belonging to one owner, newest first
    fn list_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Loan>>;

    /// every loan, newest first
    fn list_all(&self) -> Result<Vec<Loan>>;

    fn update_with(
        &self,
        id: LoanId,
        mutate: &mut dyn FnMut(&mut Loan) -> Result<()>,
    ) -> Result<Loan>;
}

/// in-memory repository keyed by loan id.
///
/// A single writer lock held for the whole of `update_with` provides the
/// at-most-one-concurrent-mutation-per-loan guarantee. Clones share the
/// same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoanRepository {
    inner: Arc<RwLock<HashMap<LoanId, Loan>>>,
}

impl InMemoryLoanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LoanRepository for InMemoryLoanRepository {
    fn insert(&self, loan: Loan) -> Result<()> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(loan.id, loan);
        Ok(())
    }

    fn find_by_id(&self, id: LoanId) -> Result<Loan> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(LoanError::NotFound { id })
    }

    fn list_by_owner(&self, owner_id: OwnerId) -> Result<Vec<Loan>> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut loans: Vec<Loan> = guard
            .values()
            .filter(|loan| loan.owner_id == owner_id)
            .cloned()
            .collect();
        loans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(loans)
    }

    fn list_all(&self) -> Result<Vec<Loan>> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut loans: Vec<Loan> = guard.values().cloned().collect();
        loans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(loans)
    }

    fn update_with(
        &self,
        id: LoanId,
        mutate: &mut dyn FnMut(&mut Loan) -> Result<()>,
    ) -> Result<Loan> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let stored = guard.get_mut(&id).ok_or(LoanError::NotFound { id })?;

        // mutate a copy so a failed closure leaves the record untouched
        let mut draft = stored.clone();
        mutate(&mut draft)?;
        *stored = draft.clone();

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::LoanApplication;
    use crate::decimal::{Money, Rate};
    use crate::engine::LoanEngine;
    use crate::events::EventStore;
    use crate::types::LoanStatus;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use std::thread;
    use uuid::Uuid;

    fn stored_loan(repo: &InMemoryLoanRepository, owner: OwnerId, principal: i64) -> Loan {
        let application = LoanApplication::personal(
            Money::from_major(principal),
            Rate::from_whole_percent(10),
            1,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();

        let loan = Loan::originate(
            owner,
            &application,
            Money::from_major(principal / 12),
            Utc::now(),
        );
        repo.insert(loan.clone()).unwrap();
        loan
    }

    #[test]
    fn test_find_missing_loan_is_not_found() {
        let repo = InMemoryLoanRepository::new();
        let id = Uuid::new_v4();

        let err = repo.find_by_id(id).unwrap_err();
        assert!(matches!(err, LoanError::NotFound { id: missing } if missing == id));
    }

    #[test]
    fn test_insert_and_list_by_owner() {
        let repo = InMemoryLoanRepository::new();
        let owner = Uuid::new_v4();

        stored_loan(&repo, owner, 1_000);
        stored_loan(&repo, owner, 2_000);
        stored_loan(&repo, Uuid::new_v4(), 3_000);

        assert_eq!(repo.len(), 3);
        assert_eq!(repo.list_by_owner(owner).unwrap().len(), 2);
        assert_eq!(repo.list_all().unwrap().len(), 3);
    }

    #[test]
    fn test_failed_mutation_leaves_record_untouched() {
        let repo = InMemoryLoanRepository::new();
        let loan = stored_loan(&repo, Uuid::new_v4(), 1_000);

        let result = repo.update_with(loan.id, &mut |stored| {
            stored.force_status(LoanStatus::Defaulted, Utc::now());
            Err(LoanError::InvalidPaymentAmount {
                amount: Money::ZERO,
            })
        });

        assert!(result.is_err());
        assert_eq!(
            repo.find_by_id(loan.id).unwrap().status,
            LoanStatus::Pending
        );
    }

    #[test]
    fn test_concurrent_payments_are_never_lost() {
        let repo = InMemoryLoanRepository::new();
        let loan = stored_loan(&repo, Uuid::new_v4(), 10_000);

        let threads = 8;
        let payments_per_thread = 5;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let repo = repo.clone();
                let loan_id = loan.id;
                thread::spawn(move || {
                    let engine = LoanEngine::new();
                    let time = SafeTimeProvider::new(TimeSource::Test(
                        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
                    ));
                    for _ in 0..payments_per_thread {
                        repo.update_with(loan_id, &mut |stored| {
                            let mut events = EventStore::new();
                            engine
                                .record_payment(stored, Money::from_major(10), &time, &mut events)
                                .map(|_| ())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stored = repo.find_by_id(loan.id).unwrap();
        let total_payments = threads * payments_per_thread;
        assert_eq!(stored.payment_history.len(), total_payments);
        assert_eq!(
            stored.remaining_amount,
            Money::from_major(10_000 - 10 * total_payments as i64)
        );
    }
}
