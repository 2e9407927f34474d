//! Campaign: the persistent state record of a fundraiser.
//!
//! A campaign is created once and afterwards only its `balance` and `status`
//! change, through [`Campaign::apply_donation`].

use serde::{Deserialize, Serialize};

use crate::error::CampaignError;
use crate::types::Address;
use crate::validation::{validate_amount, validate_description, validate_target};

/// Maximum description length in UTF-8 bytes.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Lifecycle status. `Funded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    Active,
    Funded,
}

impl CampaignStatus {
    pub const fn to_u8(self) -> u8 {
        match self {
            CampaignStatus::Active => 0,
            CampaignStatus::Funded => 1,
        }
    }

    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CampaignStatus::Active),
            1 => Some(CampaignStatus::Funded),
            _ => None,
        }
    }
}

/// The campaign state record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// The fundraiser's owner.
    pub owner: Address,

    /// Free text, at most [`MAX_DESCRIPTION_LEN`] bytes.
    pub description: String,

    /// Amount the owner is trying to raise.
    pub target: u64,

    /// Total donated so far. Mirrors the receiving account's ledger balance.
    pub balance: u64,

    /// The only token this campaign accepts.
    pub token_mint: Address,

    /// Token account donations are transferred into.
    pub receiving_account: Address,

    pub status: CampaignStatus,

    /// Nonce of the campaign state address derivation.
    pub address_salt: u8,
}

impl Campaign {
    /// Encoded record size in bytes, independent of the description.
    pub const SIZE: usize = 8 + // discriminator
        1 +                         // layout version
        32 +                        // owner
        4 + MAX_DESCRIPTION_LEN +   // description (length + reserved bytes)
        8 +                         // target
        8 +                         // balance
        32 +                        // token_mint
        32 +                        // receiving_account
        1 +                         // status
        1; // address_salt

    /// Build a fresh, active campaign with zero balance.
    pub fn new(
        owner: Address,
        description: impl Into<String>,
        target: u64,
        token_mint: Address,
        receiving_account: Address,
        address_salt: u8,
    ) -> Result<Self, CampaignError> {
        let description = description.into();
        validate_description(&description)?;
        validate_target(target)?;

        Ok(Self {
            owner,
            description,
            target,
            balance: 0,
            token_mint,
            receiving_account,
            status: CampaignStatus::Active,
            address_salt,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }

    pub fn is_funded(&self) -> bool {
        self.status == CampaignStatus::Funded
    }

    /// Amount still missing before the target is reached.
    pub fn remaining(&self) -> u64 {
        self.target.saturating_sub(self.balance)
    }

    /// Compute the state after a donation of `amount`.
    ///
    /// Does not mutate `self`; the caller commits the returned record only
    /// once the token transfer has succeeded.
    pub fn apply_donation(&self, amount: u64) -> Result<Campaign, CampaignError> {
        validate_amount(amount)?;
        if !self.is_active() {
            return Err(CampaignError::ClosedToDonations);
        }

        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(CampaignError::BalanceOverflow)?;

        let status = if balance >= self.target {
            CampaignStatus::Funded
        } else {
            CampaignStatus::Active
        };

        Ok(Campaign {
            balance,
            status,
            ..self.clone()
        })
    }
}

/// A donation request, after the donor has been authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    /// Address of the campaign state record.
    pub campaign: Address,
    /// The authenticated donor; must be the authority of `source`.
    pub donor: Address,
    /// Donor token account the tokens are taken from.
    pub source: Address,
    /// Must equal the campaign's receiving account.
    pub destination: Address,
    /// Must equal the campaign's token mint.
    pub mint: Address,
    pub amount: u64,
}
