//! Instructions: the call surface of the program.
//!
//! Instructions travel as CBOR and are signed by the caller. Numeric fields
//! are `i128` on the wire so the program, not the decoder, decides what a
//! zero, negative or oversized value means.

use serde::{Deserialize, Serialize};

use crate::crypto::{Ed25519Signature, Keypair};
use crate::error::CoreError;
use crate::types::Address;

/// Domain prefix of every signed instruction message.
pub const SIGN_DOMAIN: &[u8] = b"crowdfund-ix-v0:";

/// A request to the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Create the signer's campaign.
    CreateCampaign {
        description: String,
        target: i128,
        token_mint: Address,
    },
    /// Donate from one of the signer's token accounts.
    RecordDonation {
        campaign: Address,
        source: Address,
        destination: Address,
        mint: Address,
        amount: i128,
    },
}

impl Instruction {
    /// Encode to CBOR.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Decode from CBOR.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
    }

    /// Encode and sign with `keypair`.
    pub fn sign(&self, keypair: &Keypair) -> Result<SignedInstruction, CoreError> {
        let payload = self.to_bytes()?;
        let signature = keypair.sign(&signed_message(&payload));
        Ok(SignedInstruction {
            signer: keypair.address(),
            payload,
            signature,
        })
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::CreateCampaign { .. } => "create_campaign",
            Instruction::RecordDonation { .. } => "record_donation",
        }
    }
}

/// An encoded instruction with its signer and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedInstruction {
    pub signer: Address,
    pub payload: Vec<u8>,
    pub signature: Ed25519Signature,
}

impl SignedInstruction {
    /// Verify the signature and decode the instruction.
    pub fn verify(&self) -> Result<Instruction, CoreError> {
        self.signer
            .verify(&signed_message(&self.payload), &self.signature)?;
        Instruction::from_bytes(&self.payload)
    }

    /// Decode without checking the signature.
    pub fn instruction(&self) -> Result<Instruction, CoreError> {
        Instruction::from_bytes(&self.payload)
    }
}

fn signed_message(payload: &[u8]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(SIGN_DOMAIN.len() + payload.len());
    msg.extend_from_slice(SIGN_DOMAIN);
    msg.extend_from_slice(payload);
    msg
}
