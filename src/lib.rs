pub mod application;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod loan;
pub mod policy;
pub mod schedule;
pub mod service;
pub mod store;
pub mod types;
pub mod view;

// re-export key types
pub use application::LoanApplication;
pub use decimal::{Money, Rate};
pub use engine::{LoanEngine, PaymentReceipt};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use loan::{Document, Loan, Note, Payment};
pub use policy::{AccessPolicy, Actor, OwnerOrAdminPolicy, Role};
pub use schedule::{calculate_emi, RepaymentSchedule, ScheduledInstallment};
pub use service::LoanService;
pub use store::{InMemoryLoanRepository, LoanRepository};
pub use types::{LoanId, LoanStatus, LoanType, OwnerId, PaymentStatus};
pub use view::LoanView;

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
