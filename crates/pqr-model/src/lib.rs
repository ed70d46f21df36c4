//! Data model for PQR (Peticiones, Quejas, Reclamos) case tracking.
//!
//! This crate defines the types shared by every other crate in the
//! workspace:
//!
//! - **Case record**: [`CaseRecord`] with its conditional sub-state groups
//!   and append-only history logs
//! - **Enumerations**: [`CaseStatus`], [`Priority`], [`TicketStatus`]
//! - **Fields**: [`Gate`] and [`DependentField`], the addressable checkbox
//!   gates and the fields that hang off them
//! - **Catalogue**: [`Catalog`], the immutable lists of allowed values and the
//!   escalation area to reason mapping
//! - **Time**: [`Clock`] and the Colombian civil-date helpers
//!
//! Persisted field names are the Spanish keys used by the document store and
//! the CSV files (`SN`, `Estado_Gestion`, `Fecha Radicado`, ...). The
//! constants in [`keys`] name them.

pub mod case;
pub mod catalog;
pub mod enums;
pub mod error;
pub mod fields;
pub mod history;
pub mod keys;
pub mod time;

pub use case::{
    AdjustmentRequest, AssuranceRequest, CancellationRequest, CaseRecord, EscalationFields,
    NOT_AVAILABLE,
};
pub use catalog::{Catalog, EscalationArea};
pub use enums::{CaseStatus, Priority, TicketStatus};
pub use error::{ModelError, Result};
pub use fields::{DependentField, Gate};
pub use history::{AccumulatedSnEntry, AssuranceEntry, EscalationEntry, ObservationEntry};
pub use time::{Clock, FixedClock, SystemClock, colombian_date, format_date, parse_date};
