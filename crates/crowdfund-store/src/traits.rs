//! Store trait: the abstract interface for record provisioning.
//!
//! This trait allows the program to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use bytes::Bytes;
use crowdfund_core::Address;

use crate::error::Result;

/// A stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The derived address the record lives at.
    pub address: Address,
    /// The program allowed to write this record.
    pub owner_program: Address,
    /// Raw record bytes. Length is fixed at creation.
    pub data: Bytes,
    /// Starts at 0, incremented by every update.
    pub revision: u64,
}

/// Result of creating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateResult {
    /// Record was allocated and written.
    Created,
    /// A record already lives at this address; nothing was written.
    AlreadyExists,
}

/// Result of updating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// Record was written; carries the new revision.
    Updated { revision: u64 },
    /// The record changed since it was read; nothing was written.
    Stale { current: u64 },
    /// No record at this address.
    NotFound,
}

/// The Store trait: async interface for record persistence.
///
/// All methods are async to support both sync (SQLite) and async backends.
/// For SQLite, we use `spawn_blocking` internally to avoid blocking the runtime.
///
/// # Design Notes
///
/// - **Create-once**: `create_record` never overwrites.
/// - **Compare-and-swap updates**: `update_record` only writes when the
///   stored revision equals `expected_revision`.
/// - **Fixed size**: `update_record` refuses data of a different length.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Allocate a record at `address` owned by `owner_program`.
    ///
    /// # Returns
    /// - `Created` if the address was free.
    /// - `AlreadyExists` if a record is already there.
    async fn create_record(
        &self,
        address: &Address,
        owner_program: &Address,
        data: &[u8],
    ) -> Result<CreateResult>;

    /// Get a record by address.
    async fn get_record(&self, address: &Address) -> Result<Option<Record>>;

    /// Check if a record exists.
    async fn has_record(&self, address: &Address) -> Result<bool>;

    /// Overwrite a record if it is still at `expected_revision`.
    async fn update_record(
        &self,
        address: &Address,
        expected_revision: u64,
        data: &[u8],
    ) -> Result<UpdateResult>;

    // ─────────────────────────────────────────────────────────────────────────
    // Bulk Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Addresses of all records owned by `owner_program`, in address order.
    async fn list_records(&self, owner_program: &Address) -> Result<Vec<Address>>;
}
