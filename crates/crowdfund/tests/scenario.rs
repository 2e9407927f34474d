//! End-to-end campaign scenarios through signed instructions.

use crowdfund::core::{Address, CampaignError, CampaignStatus, Instruction, Keypair};
use crowdfund::ledger::{MemoryLedger, TokenLedger};
use crowdfund::store::MemoryStore;
use crowdfund::{Campaign, Program, ProgramConfig, ProgramError};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct World {
    program: Program<MemoryStore, MemoryLedger>,
    mint: Address,
    owner: Keypair,
    donor: Keypair,
    donor_account: Address,
}

impl World {
    fn new(donor_funds: u64) -> Self {
        let ledger = MemoryLedger::new();
        let mint_authority = Keypair::from_seed(&[0xaa; 32]).address();
        let mint = ledger.create_mint(&mint_authority);

        let donor = Keypair::from_seed(&[0xd0; 32]);
        let donor_account = ledger.open_account(&mint, &donor.address()).unwrap();
        ledger
            .mint_to(&mint, &donor_account, donor_funds, &mint_authority)
            .unwrap();

        Self {
            program: Program::new(ProgramConfig::default(), MemoryStore::new(), ledger),
            mint,
            owner: Keypair::from_seed(&[0x0e; 32]),
            donor,
            donor_account,
        }
    }

    async fn create(&self, target: i128) -> Result<Campaign, ProgramError> {
        let signed = Instruction::CreateCampaign {
            description: "neighbourhood solar array".into(),
            target,
            token_mint: self.mint,
        }
        .sign(&self.owner)
        .unwrap();
        self.program.process(&signed).await
    }

    async fn donate(&self, amount: i128) -> Result<Campaign, ProgramError> {
        let owner = self.owner.address();
        let signed = Instruction::RecordDonation {
            campaign: self.program.campaign_address(&owner).unwrap(),
            source: self.donor_account,
            destination: self.program.receiving_address(&owner).unwrap(),
            mint: self.mint,
            amount,
        }
        .sign(&self.donor)
        .unwrap();
        self.program.process(&signed).await
    }

    async fn receiving_balance(&self) -> u64 {
        let receiving = self.program.receiving_address(&self.owner.address()).unwrap();
        self.program.ledger().balance(&receiving).await.unwrap()
    }
}

#[tokio::test]
async fn campaign_reaches_target_and_closes() {
    init_tracing();
    let world = World::new(1_000);
    world.create(100).await.unwrap();

    let c = world.donate(20).await.unwrap();
    assert_eq!((c.balance, c.status), (20, CampaignStatus::Active));

    let c = world.donate(50).await.unwrap();
    assert_eq!((c.balance, c.status), (70, CampaignStatus::Active));

    let c = world.donate(100).await.unwrap();
    assert_eq!((c.balance, c.status), (170, CampaignStatus::Funded));

    let err = world.donate(20).await.unwrap_err();
    assert_eq!(err.campaign_error(), Some(&CampaignError::ClosedToDonations));

    let stored = world
        .program
        .campaign_of(&world.owner.address())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.balance, 170);
    assert_eq!(stored.status, CampaignStatus::Funded);
    assert_eq!(world.receiving_balance().await, 170);
    assert_eq!(
        world.program.ledger().balance(&world.donor_account).await.unwrap(),
        830
    );
}

#[tokio::test]
async fn invalid_targets_are_rejected() {
    init_tracing();
    let world = World::new(0);

    for target in [0i128, -1, -100, i128::from(u64::MAX) + 1] {
        let err = world.create(target).await.unwrap_err();
        assert_eq!(err.campaign_error(), Some(&CampaignError::InvalidTarget));
    }

    let c = world.create(1).await.unwrap();
    assert_eq!(c.target, 1);
}

#[tokio::test]
async fn zero_and_negative_donations_are_rejected() {
    init_tracing();
    let world = World::new(50);
    world.create(100).await.unwrap();

    for amount in [0i128, -5] {
        let err = world.donate(amount).await.unwrap_err();
        assert_eq!(err.campaign_error(), Some(&CampaignError::AmountMustBePositive));
    }
    assert_eq!(world.receiving_balance().await, 0);
}

#[tokio::test]
async fn unfunded_donor_cannot_donate() {
    init_tracing();
    let world = World::new(5);
    world.create(100).await.unwrap();

    let err = world.donate(6).await.unwrap_err();
    assert!(matches!(
        err.campaign_error(),
        Some(CampaignError::InsufficientFunds { available: 5, requested: 6 })
    ));
    assert_eq!(world.receiving_balance().await, 0);
}

#[tokio::test]
async fn exact_target_funds_campaign() {
    init_tracing();
    let world = World::new(100);
    world.create(100).await.unwrap();

    let c = world.donate(100).await.unwrap();
    assert!(c.is_funded());
    assert_eq!(c.remaining(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn balance_is_sum_of_accepted_donations(
        target in 1u64..500,
        amounts in prop::collection::vec(1u64..100, 1..12),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let world = World::new(10_000);

        rt.block_on(async {
            world.create(target as i128).await.unwrap();

            let mut expected = 0u64;
            for amount in amounts {
                let result = world.donate(amount as i128).await;
                if expected >= target {
                    let err = result.unwrap_err();
                    prop_assert_eq!(err.campaign_error(), Some(&CampaignError::ClosedToDonations));
                } else {
                    let c = result.unwrap();
                    expected += amount;
                    prop_assert_eq!(c.balance, expected);
                    prop_assert_eq!(c.is_funded(), expected >= target);
                }
                prop_assert_eq!(world.receiving_balance().await, expected);
            }
            Ok(())
        })?;
    }
}
