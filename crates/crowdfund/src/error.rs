//! Error types for the Program.

use crowdfund_core::{Address, CampaignError, CoreError, DerivationError, ErrorClass};
use crowdfund_ledger::LedgerError;
use crowdfund_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Program operations.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// A campaign rule rejected the request.
    #[error(transparent)]
    Campaign(#[from] CampaignError),

    /// Address derivation failed or a stored nonce does not match.
    #[error("derivation error: {0}")]
    Derivation(#[from] DerivationError),

    /// Encoding, decoding or signature error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Ledger error with no campaign-level meaning.
    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    /// The record changed underneath a locked transition.
    #[error("record {address} changed concurrently: expected revision {expected}, found {current}")]
    Stale {
        address: Address,
        expected: u64,
        current: u64,
    },

    /// A donation's tokens moved, its record update failed and the tokens
    /// could not be returned. The receiving account now holds more than the
    /// recorded balance.
    #[error("donation of {amount} to {campaign} was not recorded ({commit}) and its refund failed: {refund}")]
    RefundFailed {
        campaign: Address,
        amount: u64,
        commit: Box<ProgramError>,
        refund: LedgerError,
    },

    /// Signature did not verify or the signer may not act on the record.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// The instruction payload could not be decoded.
    #[error("invalid instruction: {0}")]
    InvalidInstruction(String),
}

impl From<LedgerError> for ProgramError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                available,
                requested,
            } => CampaignError::InsufficientFunds {
                available,
                requested,
            }
            .into(),
            LedgerError::MintMismatch { expected, actual } => {
                CampaignError::MintMismatch { expected, actual }.into()
            }
            LedgerError::Overflow => CampaignError::BalanceOverflow.into(),
            other => ProgramError::Ledger(other),
        }
    }
}

impl ProgramError {
    /// The campaign rule behind this error, if any.
    pub fn campaign_error(&self) -> Option<&CampaignError> {
        match self {
            ProgramError::Campaign(e) => Some(e),
            _ => None,
        }
    }

    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            ProgramError::Campaign(e) => e.class(),
            ProgramError::Derivation(e) if e.is_retryable() => ErrorClass::Resource,
            ProgramError::Derivation(_) => ErrorClass::Integrity,
            ProgramError::Core(CoreError::InvalidSignature | CoreError::InvalidPublicKey) => {
                ErrorClass::Validation
            }
            ProgramError::Core(_) => ErrorClass::Integrity,
            ProgramError::Store(StoreError::Decode(_) | StoreError::SizeMismatch { .. }) => {
                ErrorClass::Integrity
            }
            ProgramError::Store(_) | ProgramError::Ledger(_) => ErrorClass::Resource,
            ProgramError::Stale { .. } => ErrorClass::StateConflict,
            ProgramError::RefundFailed { .. } => ErrorClass::Integrity,
            ProgramError::Unauthorized(_) | ProgramError::InvalidInstruction(_) => {
                ErrorClass::Validation
            }
        }
    }

    /// Whether the same request could succeed later or with corrected input.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProgramError::Stale { .. } => true,
            _ => matches!(self.class(), ErrorClass::Validation | ErrorClass::Resource),
        }
    }
}

/// Result type for Program operations.
pub type Result<T> = std::result::Result<T, ProgramError>;
