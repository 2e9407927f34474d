//! Input validation for campaign transitions.
//!
//! The `parse_*` functions accept the signed wire integers of an
//! [`Instruction`](crate::Instruction) so that zero and negative values are
//! rejected with the campaign error rather than a decoding error.

use crate::campaign::{Campaign, Donation, MAX_DESCRIPTION_LEN};
use crate::error::CampaignError;

/// Description must fit the reserved record space.
pub fn validate_description(description: &str) -> Result<(), CampaignError> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CampaignError::DescriptionTooLong {
            len: description.len(),
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}

pub fn validate_target(target: u64) -> Result<(), CampaignError> {
    if target == 0 {
        return Err(CampaignError::InvalidTarget);
    }
    Ok(())
}

pub fn validate_amount(amount: u64) -> Result<(), CampaignError> {
    if amount == 0 {
        return Err(CampaignError::AmountMustBePositive);
    }
    Ok(())
}

/// Convert a wire target to `u64`.
pub fn parse_target(target: i128) -> Result<u64, CampaignError> {
    if target <= 0 {
        return Err(CampaignError::InvalidTarget);
    }
    u64::try_from(target).map_err(|_| CampaignError::InvalidTarget)
}

/// Convert a wire amount to `u64`. Amounts beyond `u64` could never be
/// credited without overflowing the balance.
pub fn parse_amount(amount: i128) -> Result<u64, CampaignError> {
    if amount <= 0 {
        return Err(CampaignError::AmountMustBePositive);
    }
    u64::try_from(amount).map_err(|_| CampaignError::BalanceOverflow)
}

/// Check a donation against the campaign it targets.
///
/// This performs:
/// - Amount check
/// - Status check
/// - Mint check
/// - Destination check
///
/// Donor funds are checked by the token ledger during the transfer.
pub fn validate_donation(campaign: &Campaign, donation: &Donation) -> Result<(), CampaignError> {
    // 1. Amount
    validate_amount(donation.amount)?;

    // 2. Status
    if !campaign.is_active() {
        return Err(CampaignError::ClosedToDonations);
    }

    // 3. Mint
    if donation.mint != campaign.token_mint {
        return Err(CampaignError::MintMismatch {
            expected: campaign.token_mint,
            actual: donation.mint,
        });
    }

    // 4. Destination
    if donation.destination != campaign.receiving_account {
        return Err(CampaignError::ReceivingAccountMismatch {
            expected: campaign.receiving_account,
            actual: donation.destination,
        });
    }

    Ok(())
}
