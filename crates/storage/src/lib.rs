pub mod error;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use error::{StorageError, UnavailableCause};
pub use sqlite::SqliteStorage;
pub use traits::*;
