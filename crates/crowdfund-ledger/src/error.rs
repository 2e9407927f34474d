//! Error types for the token ledger.

use crowdfund_core::Address;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("unknown mint: {0}")]
    UnknownMint(Address),

    #[error("token account not found: {0}")]
    AccountNotFound(Address),

    #[error("token account already exists: {0}")]
    AccountExists(Address),

    #[error("mint mismatch: account holds {expected}, got {actual}")]
    MintMismatch { expected: Address, actual: Address },

    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: u64, requested: u64 },

    #[error("{signer} is not the authority of {account}")]
    OwnerMismatch { account: Address, signer: Address },

    #[error("account {account} still holds {amount} tokens")]
    NonZeroBalance { account: Address, amount: u64 },

    #[error("transfer amount must be greater than zero")]
    ZeroAmount,

    #[error("token amount overflow")]
    Overflow,
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
