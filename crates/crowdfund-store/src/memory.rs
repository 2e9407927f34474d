//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crowdfund_core::Address;

use crate::error::{Result, StoreError};
use crate::traits::{CreateResult, Record, Store, UpdateResult};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    records: RwLock<BTreeMap<Address, Record>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_record(
        &self,
        address: &Address,
        owner_program: &Address,
        data: &[u8],
    ) -> Result<CreateResult> {
        let mut records = self.records.write().unwrap();

        if records.contains_key(address) {
            return Ok(CreateResult::AlreadyExists);
        }

        records.insert(
            *address,
            Record {
                address: *address,
                owner_program: *owner_program,
                data: Bytes::copy_from_slice(data),
                revision: 0,
            },
        );

        Ok(CreateResult::Created)
    }

    async fn get_record(&self, address: &Address) -> Result<Option<Record>> {
        let records = self.records.read().unwrap();
        Ok(records.get(address).cloned())
    }

    async fn has_record(&self, address: &Address) -> Result<bool> {
        let records = self.records.read().unwrap();
        Ok(records.contains_key(address))
    }

    async fn update_record(
        &self,
        address: &Address,
        expected_revision: u64,
        data: &[u8],
    ) -> Result<UpdateResult> {
        let mut records = self.records.write().unwrap();

        let Some(record) = records.get_mut(address) else {
            return Ok(UpdateResult::NotFound);
        };

        if record.data.len() != data.len() {
            return Err(StoreError::SizeMismatch {
                address: address.to_hex(),
                expected: record.data.len(),
                actual: data.len(),
            });
        }

        if record.revision != expected_revision {
            return Ok(UpdateResult::Stale {
                current: record.revision,
            });
        }

        record.data = Bytes::copy_from_slice(data);
        record.revision += 1;

        Ok(UpdateResult::Updated {
            revision: record.revision,
        })
    }

    async fn list_records(&self, owner_program: &Address) -> Result<Vec<Address>> {
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .filter(|r| &r.owner_program == owner_program)
            .map(|r| r.address)
            .collect())
    }
}
