//! Domain layer for mixr.
//!
//! Holds the operation taxonomy, the command interpreter, the session model
//! and ledger, and the traits of the external collaborators (audio engine,
//! metadata source, session store).

pub mod config;
pub mod engine;
pub mod error;
pub mod interpreter;
pub mod operation;
pub mod preset;
pub mod session;

// Re-export common error type
pub use error::MixError;
