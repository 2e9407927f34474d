//! Property tests over the full program.

use crowdfund_core::CampaignError;
use crowdfund_testkit::generators::{donation_amounts, invalid_wire_target};
use crowdfund_testkit::TestFixture;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn funded_exactly_when_sum_reaches_target(
        target in 1u64..5_000,
        amounts in donation_amounts(10),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let fixture = TestFixture::new();
            let owner = fixture.owner(1);
            let donor = fixture.donor(2, 10_000).unwrap();
            fixture.create_campaign(&owner, "property", i128::from(target)).await.unwrap();

            let mut sum = 0u64;
            for amount in amounts {
                match fixture.donate(&owner, &donor, i128::from(amount)).await {
                    Ok(c) => {
                        prop_assert!(sum < target);
                        sum += amount;
                        prop_assert_eq!(c.balance, sum);
                        prop_assert_eq!(c.is_funded(), sum >= target);
                    }
                    Err(e) => {
                        prop_assert!(sum >= target);
                        prop_assert_eq!(e.campaign_error(), Some(&CampaignError::ClosedToDonations));
                    }
                }
            }

            prop_assert_eq!(fixture.receiving_balance(&owner).await.unwrap(), sum);
            prop_assert_eq!(fixture.donor_balance(&donor).await.unwrap(), 10_000 - sum);
            Ok(())
        })?;
    }

    #[test]
    fn invalid_targets_create_nothing(target in invalid_wire_target()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let fixture = TestFixture::new();
            let owner = fixture.owner(1);

            let err = fixture.create_campaign(&owner, "invalid", target).await.unwrap_err();
            prop_assert_eq!(err.campaign_error(), Some(&CampaignError::InvalidTarget));
            prop_assert!(fixture.campaign(&owner).await.unwrap().is_none());
            Ok(())
        })?;
    }
}
