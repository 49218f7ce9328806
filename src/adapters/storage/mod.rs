//! Storage Adapters
//!
//! Implementations of the `LedgerStore` port.
//!
//! ## Available Adapters
//!
//! - **InMemoryLedgerStore** - hash maps behind async locks (tests, single process)
//! - **RedisLedgerStore** - Redis hashes with server-side atomic updates
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryLedgerStore, RedisLedgerStore};
//!
//! // Production: shared Redis
//! let store = RedisLedgerStore::connect("redis://localhost:6379", "martini:").await?;
//!
//! // Testing: in-memory storage
//! let store = InMemoryLedgerStore::new();
//! ```

mod in_memory;
mod redis;

pub use self::redis::RedisLedgerStore;
pub use in_memory::InMemoryLedgerStore;
