//! Deterministic address derivation.
//!
//! Campaign records and receiving accounts are not assigned generated ids.
//! Their addresses are computed from the program id, a namespace tag and the
//! owner, so anyone can recompute where a campaign lives.
//!
//! A derived address is the first Blake3 digest, trying nonces from 255
//! downwards, that is *not* a valid Ed25519 point. No private key exists for
//! such an address, so only the program can act for it.

use crate::crypto::is_on_curve;
use crate::error::DerivationError;
use crate::types::Address;

const DERIVE_DOMAIN: &[u8] = b"crowdfund-derive-v0:";

/// Fixed namespace tags for derived addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// The campaign state record.
    CampaignState,
    /// The campaign's token-receiving account.
    ReceivingAccount,
}

impl Namespace {
    /// The tag hashed into the address.
    pub const fn tag(&self) -> &'static str {
        match self {
            Namespace::CampaignState => "campaign-state",
            Namespace::ReceivingAccount => "receiving-account",
        }
    }
}

/// An address together with the nonce that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Address,
    pub nonce: u8,
}

fn candidate(program_id: &Address, namespace: Namespace, owner: &Address, nonce: u8) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(DERIVE_DOMAIN);
    hasher.update(&program_id.0);
    hasher.update(b":");
    hasher.update(namespace.tag().as_bytes());
    hasher.update(b":");
    hasher.update(&owner.0);
    hasher.update(&[nonce]);
    *hasher.finalize().as_bytes()
}

/// Search nonces 255..=0 for the first candidate rejected by `on_curve`.
fn search(
    namespace: Namespace,
    mut next: impl FnMut(u8) -> [u8; 32],
    on_curve: impl Fn(&[u8; 32]) -> bool,
) -> Result<DerivedAddress, DerivationError> {
    for nonce in (0..=u8::MAX).rev() {
        let bytes = next(nonce);
        if !on_curve(&bytes) {
            return Ok(DerivedAddress {
                address: Address(bytes),
                nonce,
            });
        }
    }
    Err(DerivationError::NonceExhausted {
        namespace: namespace.tag(),
    })
}

/// Derive the address of `owner`'s record in `namespace`.
pub fn derive_address(
    program_id: &Address,
    namespace: Namespace,
    owner: &Address,
) -> Result<DerivedAddress, DerivationError> {
    search(
        namespace,
        |nonce| candidate(program_id, namespace, owner, nonce),
        is_on_curve,
    )
}

/// Check that `nonce` reproduces `expected` for this owner and namespace.
pub fn verify_derivation(
    program_id: &Address,
    namespace: Namespace,
    owner: &Address,
    nonce: u8,
    expected: &Address,
) -> Result<(), DerivationError> {
    let bytes = candidate(program_id, namespace, owner, nonce);
    if bytes == expected.0 && !is_on_curve(&bytes) {
        Ok(())
    } else {
        Err(DerivationError::Mismatch {
            namespace: namespace.tag(),
            nonce,
            expected: *expected,
        })
    }
}
