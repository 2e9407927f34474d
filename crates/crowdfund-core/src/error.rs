//! Error types for the crowdfund core.

use thiserror::Error;

use crate::types::Address;

/// Core errors: signatures, encodings and record layout.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("record discriminator mismatch")]
    WrongDiscriminator,

    #[error("unsupported record version: {0}")]
    UnsupportedVersion(u8),

    #[error("record size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Errors from deterministic address derivation.
#[derive(Debug, Error)]
pub enum DerivationError {
    /// Every nonce produced an on-curve digest. Vanishingly rare; the caller
    /// may retry with a different owner or program id.
    #[error("no off-curve address found for namespace {namespace}")]
    NonceExhausted { namespace: &'static str },

    /// A stored nonce does not reproduce the expected address.
    #[error("address {expected} is not derived from nonce {nonce} in namespace {namespace}")]
    Mismatch {
        namespace: &'static str,
        nonce: u8,
        expected: Address,
    },
}

impl DerivationError {
    /// Whether a retry with different inputs can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DerivationError::NonceExhausted { .. })
    }
}

/// Errors raised by campaign state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampaignError {
    #[error("target must be greater than zero")]
    InvalidTarget,

    #[error("description is {len} bytes, maximum is {max}")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("donation amount must be greater than zero")]
    AmountMustBePositive,

    #[error("mint mismatch: campaign accepts {expected}, got {actual}")]
    MintMismatch { expected: Address, actual: Address },

    #[error("destination {actual} is not the campaign receiving account {expected}")]
    ReceivingAccountMismatch { expected: Address, actual: Address },

    #[error("a campaign already exists at {0}")]
    DuplicateCampaign(Address),

    #[error("campaign not found: {0}")]
    CampaignNotFound(Address),

    /// An account already sits at the receiving address with another mint
    /// or authority, or holds tokens.
    #[error("receiving account {0} is held by another authority or is not empty")]
    ReceivingAccountUnavailable(Address),

    #[error("campaign is closed to donations")]
    ClosedToDonations,

    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: u64, requested: u64 },

    #[error("campaign balance overflow")]
    BalanceOverflow,

    #[error("integrity violation: campaign balance {recorded}, ledger balance {observed}")]
    IntegrityViolation { recorded: u64, observed: u64 },
}

/// How a failure should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller-input problem; retry with corrected input.
    Validation,
    /// Inapplicable given persisted state; retrying the same request fails again.
    StateConflict,
    /// Depends on external ledger state; retry once the condition changes.
    Resource,
    /// Record and ledger disagree; nothing was committed.
    Integrity,
}

impl CampaignError {
    /// Classify this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            CampaignError::InvalidTarget
            | CampaignError::DescriptionTooLong { .. }
            | CampaignError::AmountMustBePositive
            | CampaignError::MintMismatch { .. }
            | CampaignError::ReceivingAccountMismatch { .. } => ErrorClass::Validation,
            CampaignError::DuplicateCampaign(_)
            | CampaignError::CampaignNotFound(_)
            | CampaignError::ReceivingAccountUnavailable(_)
            | CampaignError::ClosedToDonations => ErrorClass::StateConflict,
            CampaignError::InsufficientFunds { .. } | CampaignError::BalanceOverflow => {
                ErrorClass::Resource
            }
            CampaignError::IntegrityViolation { .. } => ErrorClass::Integrity,
        }
    }

    /// Whether the same request could succeed later or with corrected input.
    pub fn is_retryable(&self) -> bool {
        matches!(self.class(), ErrorClass::Validation | ErrorClass::Resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(CampaignError::InvalidTarget.class(), ErrorClass::Validation);
        assert_eq!(
            CampaignError::DuplicateCampaign(Address::ZERO).class(),
            ErrorClass::StateConflict
        );
        assert_eq!(CampaignError::ClosedToDonations.class(), ErrorClass::StateConflict);
        assert_eq!(
            CampaignError::ReceivingAccountUnavailable(Address::ZERO).class(),
            ErrorClass::StateConflict
        );
        assert_eq!(CampaignError::BalanceOverflow.class(), ErrorClass::Resource);
        assert_eq!(
            CampaignError::IntegrityViolation { recorded: 1, observed: 2 }.class(),
            ErrorClass::Integrity
        );
    }

    #[test]
    fn test_retryable() {
        assert!(CampaignError::AmountMustBePositive.is_retryable());
        assert!(CampaignError::InsufficientFunds { available: 1, requested: 2 }.is_retryable());
        assert!(!CampaignError::ClosedToDonations.is_retryable());
        assert!(!CampaignError::IntegrityViolation { recorded: 0, observed: 5 }.is_retryable());
    }

    #[test]
    fn test_nonce_exhausted_is_retryable() {
        let err = DerivationError::NonceExhausted { namespace: "campaign-state" };
        assert!(err.is_retryable());
    }
}
