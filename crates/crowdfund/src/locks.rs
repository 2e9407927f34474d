//! Per-record write locks.
//!
//! Every transition on a record runs while holding that record's lock, so
//! two donations to the same campaign never interleave their read, transfer
//! and commit steps. Transitions on different records proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crowdfund_core::Address;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table of async mutexes keyed by record address.
#[derive(Default)]
pub struct RecordLocks {
    table: Mutex<HashMap<Address, Arc<AsyncMutex<()>>>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `address`.
    ///
    /// The lock is released when the returned guard is dropped.
    pub async fn lock(&self, address: &Address) -> OwnedMutexGuard<()> {
        let entry = {
            let mut table = self.table.lock().unwrap();
            // Entries only referenced by the table are idle.
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
            table.entry(*address).or_default().clone()
        };
        entry.lock_owned().await
    }

    /// Number of addresses with a live lock entry.
    pub fn len(&self) -> usize {
        self.table.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
