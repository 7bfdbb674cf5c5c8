pub mod memory;
pub mod sqlite;

use crate::app::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key under which the tracked handle list is persisted.
pub const TRACKED_HANDLES_KEY: &str = "tracked_handles";

/// Persistence for small string lists.
pub trait KeyValueStore {
    /// `None` when the key has never been stored.
    fn load(&self, key: &str) -> Result<Option<Vec<String>>>;
    fn store(&self, key: &str, values: &[String]) -> Result<()>;
}
