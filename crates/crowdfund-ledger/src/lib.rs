//! # Crowdfund Ledger
//!
//! The token ledger the crowdfund program moves donations through.
//!
//! The program only depends on the [`TokenLedger`] trait. [`MemoryLedger`]
//! is a complete in-process ledger (mints, token accounts, transfers) used
//! by tests and local runs.
//!
//! ## Key Types
//!
//! - [`TokenLedger`] - Account creation, transfers and balance queries
//! - [`TokenAccount`] - A holding of one mint, controlled by one authority
//! - [`MemoryLedger`] - In-memory implementation with mint/faucet helpers

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{LedgerError, Result};
pub use memory::MemoryLedger;
pub use traits::{TokenAccount, TokenLedger};
