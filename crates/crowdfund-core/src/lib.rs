//! # Crowdfund Core
//!
//! Pure primitives for the crowdfund ledger: addresses, deterministic address
//! derivation, the campaign record and its fixed layout, and the signed
//! instruction format.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over fixed-size records.
//!
//! ## Key Types
//!
//! - [`Address`] - 32-byte identity of an owner, mint, account or record
//! - [`DerivedAddress`] - An address computed from (namespace, owner) plus its nonce
//! - [`Campaign`] - The persistent campaign state record
//! - [`Instruction`] - A request to the program, signed into a [`SignedInstruction`]
//!
//! ## Record Layout
//!
//! Campaign records have a fixed size of [`Campaign::SIZE`] bytes regardless
//! of description length. See [`codec`] module.

pub mod campaign;
pub mod codec;
pub mod crypto;
pub mod derive;
pub mod error;
pub mod instruction;
pub mod types;
pub mod validation;

pub use campaign::{Campaign, CampaignStatus, Donation, MAX_DESCRIPTION_LEN};
pub use codec::{decode_campaign, encode_campaign};
pub use crypto::{Ed25519Signature, Keypair};
pub use derive::{derive_address, verify_derivation, DerivedAddress, Namespace};
pub use error::{CampaignError, CoreError, DerivationError, ErrorClass};
pub use instruction::{Instruction, SignedInstruction};
pub use types::Address;
pub use validation::{
    parse_amount, parse_target, validate_amount, validate_description, validate_donation,
    validate_target,
};
