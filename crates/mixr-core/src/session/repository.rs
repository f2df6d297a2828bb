//! Session store trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// Durable key-value persistence for sessions, keyed by session name.
///
/// # Implementation Notes
///
/// `save` must overwrite the whole record atomically: a reader sees either
/// the previous record or the new one, never a mix.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session by name.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: No session stored under this name
    /// - `Err(_)`: The record exists but could not be read
    async fn load(&self, name: &str) -> Result<Option<Session>>;

    /// Persists the full session record, replacing any previous one.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Names of all stored sessions, sorted.
    async fn list_names(&self) -> Result<Vec<String>>;
}
