use serde::{Deserialize, Serialize};

use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::OwnerId;

/// role carried by an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// an authenticated caller, as established by the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: OwnerId,
    pub role: Role,
}

impl Actor {
    pub fn user(user_id: OwnerId) -> Self {
        Self {
            user_id,
            role: Role::User,
        }
    }

    pub fn admin(user_id: OwnerId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// decides whether a caller may see or touch a given loan.
///
/// Kept out of the engine so authorization rules can vary without touching
/// the financial logic.
pub trait AccessPolicy {
    /// caller may read the loan
    fn authorize_view(&self, actor: &Actor, loan: &Loan) -> Result<()>;

    /// caller may mutate the loan (record payments)
    fn authorize_mutate(&self, actor: &Actor, loan: &Loan) -> Result<()>;

    /// caller may perform admin-only operations (status changes, listing
    /// every loan)
    fn authorize_admin(&self, actor: &Actor) -> Result<()>;
}

/// the default rule: a loan is visible and mutable to its owner and to
/// admins; everything administrative needs the admin role.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOrAdminPolicy;

impl OwnerOrAdminPolicy {
    fn owner_or_admin(actor: &Actor, loan: &Loan, action: &str) -> Result<()> {
        if actor.user_id == loan.owner_id || actor.is_admin() {
            Ok(())
        } else {
            Err(LoanError::Forbidden {
                action: format!("{} loan {}", action, loan.id),
            })
        }
    }
}

impl AccessPolicy for OwnerOrAdminPolicy {
    fn authorize_view(&self, actor: &Actor, loan: &Loan) -> Result<()> {
        Self::owner_or_admin(actor, loan, "view")
    }

    fn authorize_mutate(&self, actor: &Actor, loan: &Loan) -> Result<()> {
        Self::owner_or_admin(actor, loan, "modify")
    }

    fn authorize_admin(&self, actor: &Actor) -> Result<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(LoanError::Forbidden {
                action: "perform admin operations".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::LoanApplication;
    use crate::decimal::{Money, Rate};
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn loan_owned_by(owner: OwnerId) -> Loan {
        let application = LoanApplication::personal(
            Money::from_major(5_000),
            Rate::from_whole_percent(10),
            1,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();

        Loan::originate(
            owner,
            &application,
            Money::from_major(440),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_owner_can_view_and_mutate() {
        let owner = Uuid::new_v4();
        let loan = loan_owned_by(owner);
        let policy = OwnerOrAdminPolicy;
        let actor = Actor::user(owner);

        assert!(policy.authorize_view(&actor, &loan).is_ok());
        assert!(policy.authorize_mutate(&actor, &loan).is_ok());
        assert!(policy.authorize_admin(&actor).is_err());
    }

    #[test]
    fn test_stranger_is_forbidden() {
        let loan = loan_owned_by(Uuid::new_v4());
        let policy = OwnerOrAdminPolicy;
        let stranger = Actor::user(Uuid::new_v4());

        let err = policy.authorize_view(&stranger, &loan).unwrap_err();
        assert!(matches!(err, LoanError::Forbidden { .. }));
        assert!(policy.authorize_mutate(&stranger, &loan).is_err());
    }

    #[test]
    fn test_admin_can_do_everything() {
        let loan = loan_owned_by(Uuid::new_v4());
        let policy = OwnerOrAdminPolicy;
        let admin = Actor::admin(Uuid::new_v4());

        assert!(policy.authorize_view(&admin, &loan).is_ok());
        assert!(policy.authorize_mutate(&admin, &loan).is_ok());
        assert!(policy.authorize_admin(&admin).is_ok());
    }
}
