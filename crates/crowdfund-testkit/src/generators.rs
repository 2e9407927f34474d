//! Proptest generators for property-based testing.

use proptest::prelude::*;

use crowdfund_core::{Address, Campaign, CampaignError, Keypair, MAX_DESCRIPTION_LEN};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 32]>().prop_map(Address::from_bytes)
}

/// Generate a description that fits the record.
pub fn description() -> impl Strategy<Value = String> {
    // Up to 50 chars of up to 4 bytes each stays within the byte limit.
    "\\PC{0,50}".prop_map(String::from)
}

/// Generate an ASCII description longer than the limit.
pub fn oversized_description() -> impl Strategy<Value = String> {
    (MAX_DESCRIPTION_LEN + 1..=MAX_DESCRIPTION_LEN * 2).prop_map(|len| "x".repeat(len))
}

/// Generate a valid target.
pub fn target() -> impl Strategy<Value = u64> {
    1u64..=u64::MAX
}

/// Generate a wire target the program must reject.
pub fn invalid_wire_target() -> impl Strategy<Value = i128> {
    prop_oneof![
        Just(0i128),
        i128::from(i64::MIN)..0i128,
        (i128::from(u64::MAX) + 1)..=i128::MAX,
    ]
}

/// Generate a sequence of positive donation amounts.
pub fn donation_amounts(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..=1_000, 1..=max_len)
}

/// Parameters for generating a campaign.
#[derive(Debug, Clone)]
pub struct CampaignParams {
    pub owner: Address,
    pub description: String,
    pub target: u64,
    pub token_mint: Address,
    pub receiving_account: Address,
    pub address_salt: u8,
}

impl CampaignParams {
    /// Build the campaign record these parameters describe.
    pub fn campaign(&self) -> Result<Campaign, CampaignError> {
        Campaign::new(
            self.owner,
            self.description.clone(),
            self.target,
            self.token_mint,
            self.receiving_account,
            self.address_salt,
        )
    }
}

impl Arbitrary for CampaignParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            address(),
            description(),
            target(),
            address(),
            address(),
            any::<u8>(),
        )
            .prop_map(
                |(owner, description, target, token_mint, receiving_account, address_salt)| {
                    CampaignParams {
                        owner,
                        description,
                        target,
                        token_mint,
                        receiving_account,
                        address_salt,
                    }
                },
            )
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowdfund_core::{decode_campaign, encode_campaign, parse_target};

    proptest! {
        #[test]
        fn test_generated_campaigns_are_valid(params: CampaignParams) {
            let campaign = params.campaign().unwrap();
            prop_assert!(campaign.is_active());
            prop_assert_eq!(campaign.balance, 0);
        }

        #[test]
        fn test_encoding_is_fixed_size(params: CampaignParams) {
            let bytes = encode_campaign(&params.campaign().unwrap()).unwrap();
            prop_assert_eq!(bytes.len(), Campaign::SIZE);
            prop_assert_eq!(decode_campaign(&bytes).unwrap(), params.campaign().unwrap());
        }

        #[test]
        fn test_oversized_descriptions_rejected(
            mut params: CampaignParams,
            long in oversized_description(),
        ) {
            params.description = long;
            let is_too_long = matches!(
                params.campaign(),
                Err(CampaignError::DescriptionTooLong { .. })
            );
            prop_assert!(is_too_long);
        }

        #[test]
        fn test_invalid_wire_targets_rejected(t in invalid_wire_target()) {
            prop_assert_eq!(parse_target(t), Err(CampaignError::InvalidTarget));
        }
    }
}
