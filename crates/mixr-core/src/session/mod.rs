//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `HistoryRecord`)
//! - `repository`: Store trait for session persistence
//! - `ledger`: Versioning rules over a store (`SessionLedger`)

mod ledger;
mod model;
mod repository;

pub use ledger::{Outcome, SessionLedger, validate_session_name};
pub use model::{HistoryRecord, RecordOutcome, Session};
pub use repository::SessionStore;
