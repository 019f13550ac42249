use std::sync::Mutex;

use hourglass_rs::SafeTimeProvider;

use crate::application::LoanApplication;
use crate::decimal::Money;
use crate::engine::LoanEngine;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::policy::{AccessPolicy, Actor};
use crate::store::LoanRepository;
use crate::types::{LoanId, LoanStatus};

/// transport-free loan service: authorization, load, engine mutation, store.
///
/// Each mutating call runs inside the repository's `update_with`, so the
/// load-mutate-save sequence for one loan id is a single atomic step and
/// concurrent requests cannot trample each other's writes.
pub struct LoanService<R, P> {
    engine: LoanEngine,
    repo: R,
    policy: P,
    time: SafeTimeProvider,
    events: Mutex<EventStore>,
}

impl<R: LoanRepository, P: AccessPolicy> LoanService<R, P> {
    pub fn new(repo: R, policy: P, time: SafeTimeProvider) -> Self {
        Self {
            engine: LoanEngine::new(),
            repo,
            policy,
            time,
            events: Mutex::new(EventStore::new()),
        }
    }

    /// submit a loan application for the calling user
    pub fn apply(&self, actor: &Actor, application: &LoanApplication) -> Result<Loan> {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        let loan = self
            .engine
            .create_loan(actor.user_id, application, &self.time, &mut events);
        drop(events);

        self.repo.insert(loan.clone())?;
        Ok(loan)
    }

    /// fetch one loan, visible to its owner and to admins
    pub fn loan(&self, actor: &Actor, id: LoanId) -> Result<Loan> {
        let loan = self.repo.find_by_id(id)?;
        self.policy.authorize_view(actor, &loan)?;
        Ok(loan)
    }

    /// the calling user's own loans, newest first
    pub fn loans_for(&self, actor: &Actor) -> Result<Vec<Loan>> {
        self.repo.list_by_owner(actor.user_id)
    }

    /// every loan in the system, admin only
    pub fn all_loans(&self, actor: &Actor) -> Result<Vec<Loan>> {
        self.policy.authorize_admin(actor)?;
        self.repo.list_all()
    }

    /// overwrite a loan's status, admin only
    pub fn set_status(&self, actor: &Actor, id: LoanId, status: LoanStatus) -> Result<Loan> {
        self.policy.authorize_admin(actor)?;

        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        self.repo.update_with(id, &mut |loan| {
            self.engine.set_status(loan, status, &self.time, &mut events);
            Ok(())
        })
    }

    /// record a repayment, allowed for the loan owner and for admins
    pub fn record_payment(&self, actor: &Actor, id: LoanId, amount: Money) -> Result<Loan> {
        let loan = self.repo.find_by_id(id)?;
        self.policy.authorize_mutate(actor, &loan)?;

        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        self.repo.update_with(id, &mut |loan| {
            self.engine
                .record_payment(loan, amount, &self.time, &mut events)
                .map(|_| ())
        })
    }

    /// drain the domain events accumulated by prior calls
    pub fn take_events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take_events()
    }
}
