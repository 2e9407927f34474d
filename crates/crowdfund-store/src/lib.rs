//! # Crowdfund Store
//!
//! Record provisioning and persistence for the crowdfund ledger. Provides a
//! trait-based interface over fixed-size records keyed by derived address,
//! with SQLite and in-memory implementations.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`Record`] - A stored record with its revision
//! - [`CreateResult`] / [`UpdateResult`] - Outcomes of writes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use crowdfund_store::{SqliteStore, Store, CreateResult};
//! use crowdfund_core::Address;
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("campaigns.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let address = Address::random();
//!     let program = Address::random();
//!     let result = store.create_record(&address, &program, &[0u8; 16]).await.unwrap();
//!     assert_eq!(result, CreateResult::Created);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **No idempotent creates**: creating an existing address returns `AlreadyExists`
//! - **Fixed size**: an update must keep the record's allocated size
//! - **Revisions**: every update names the revision it read; a stale write is refused

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{CreateResult, Record, Store, UpdateResult};
