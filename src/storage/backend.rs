//! Storage backend abstraction.
//!
//! [`SessionStorage`] covers exactly what the worker needs to keep a session
//! token across plugin reloads: read it, replace it, forget it.

use crate::domain::error::Result;
use crate::storage::models::SessionRecord;

/// Persistent home of at most one session record.
///
/// # Implementations
///
/// - [`JsonSessionStorage`](crate::storage::JsonSessionStorage): JSON file
///   with atomic writes
///
/// # Examples
///
/// ```no_run
/// use zusers::storage::{JsonSessionStorage, SessionStorage};
/// use std::path::PathBuf;
///
/// let storage = JsonSessionStorage::new(PathBuf::from("/tmp/session.json"))?;
/// let record = storage.load()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait SessionStorage: Send {
    /// Returns the stored record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&self) -> Result<Option<SessionRecord>>;

    /// Replaces the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous record is then left
    /// in place.
    fn save(&mut self, record: &SessionRecord) -> Result<()>;

    /// Removes the stored record. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn clear(&mut self) -> Result<()>;
}
