//! Case lifecycle rules.
//!
//! [`Controller`] owns every state change of a case:
//!
//! - status transitions with their guards and derived fields
//!   ([`Controller::change_status`], [`Controller::reopen`], decree)
//! - checkbox gates and the cascade table ([`cascade::CASCADE_RULES`])
//! - append-only logs (observations, escalations, assurances, linked SNs)
//! - mass operations, each committed as one atomic batch
//! - CSV import with cooperative cancellation
//!
//! Read-only helpers (filtering, case age, duplicates, related complaint
//! extraction) live in [`query`]; the stuck-case alert in [`monitor`].

pub mod cascade;
mod context;
mod controller;
mod edit;
mod error;
mod import;
pub mod monitor;
pub mod query;
mod staging;
mod transitions;
pub mod validation;

pub use context::CaseContext;
pub use controller::{Controller, EscalationInput, MassReopenReport};
pub use edit::EditField;
pub use error::{LifecycleError, Result};
pub use import::{CancellationToken, ImportOptions, ImportReport, RowFailure};
pub use monitor::{POLL_INTERVAL, STUCK_THRESHOLD_MINUTES, StuckAlert, StuckCaseMonitor};
pub use query::{CaseAge, CaseFilter, case_age, extract_related_complaint, find_duplicates};
pub use transitions::TransitionOutcome;
