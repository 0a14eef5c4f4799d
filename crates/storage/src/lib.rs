pub mod error;
pub mod lock;
pub mod memory;
pub mod store;

pub use error::{Result, StoreError};
pub use lock::KeyedLocks;
pub use memory::InMemoryStore;
pub use store::KeyValueStore;
