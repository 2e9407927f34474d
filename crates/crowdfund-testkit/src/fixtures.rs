//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a program over an in-memory store
//! and ledger, one mint, and donors funded from it.

use anyhow::Context;
use crowdfund::{Program, ProgramConfig, ProgramError};
use crowdfund_core::{Address, Campaign, Instruction, Keypair};
use crowdfund_ledger::{MemoryLedger, TokenLedger};
use crowdfund_store::MemoryStore;

/// A donor identity with a funded token account.
pub struct Donor {
    pub keypair: Keypair,
    pub account: Address,
}

impl Donor {
    pub fn address(&self) -> Address {
        self.keypair.address()
    }
}

/// A program wired to an in-memory ledger holding a single mint.
pub struct TestFixture {
    pub program: Program<MemoryStore, MemoryLedger>,
    pub mint: Address,
    mint_authority: Keypair,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ProgramConfig::default())
    }

    /// Create a fixture with a specific configuration.
    pub fn with_config(config: ProgramConfig) -> Self {
        let ledger = MemoryLedger::new();
        let mint_authority = Keypair::from_seed(&[0xfa; 32]);
        let mint = ledger.create_mint(&mint_authority.address());

        Self {
            program: Program::new(config, MemoryStore::new(), ledger),
            mint,
            mint_authority,
        }
    }

    /// Deterministic owner keypair.
    pub fn owner(&self, seed: u8) -> Keypair {
        Keypair::from_seed(&[seed; 32])
    }

    /// Deterministic donor holding `funds` of the fixture mint.
    pub fn donor(&self, seed: u8, funds: u64) -> anyhow::Result<Donor> {
        let mut bytes = [seed; 32];
        bytes[0] ^= 0xd0;
        let keypair = Keypair::from_seed(&bytes);

        let ledger = self.program.ledger();
        let account = ledger
            .open_account(&self.mint, &keypair.address())
            .context("opening donor account")?;
        if funds > 0 {
            ledger
                .mint_to(&self.mint, &account, funds, &self.mint_authority.address())
                .context("funding donor account")?;
        }

        Ok(Donor { keypair, account })
    }

    /// Submit a signed `CreateCampaign` from `owner`.
    pub async fn create_campaign(
        &self,
        owner: &Keypair,
        description: &str,
        target: i128,
    ) -> Result<Campaign, ProgramError> {
        let signed = Instruction::CreateCampaign {
            description: description.to_string(),
            target,
            token_mint: self.mint,
        }
        .sign(owner)?;
        self.program.process(&signed).await
    }

    /// Submit a signed `RecordDonation` from `donor` to `owner`'s campaign.
    pub async fn donate(
        &self,
        owner: &Keypair,
        donor: &Donor,
        amount: i128,
    ) -> Result<Campaign, ProgramError> {
        let signed = Instruction::RecordDonation {
            campaign: self.program.campaign_address(&owner.address())?,
            source: donor.account,
            destination: self.program.receiving_address(&owner.address())?,
            mint: self.mint,
            amount,
        }
        .sign(&donor.keypair)?;
        self.program.process(&signed).await
    }

    /// The stored campaign of `owner`.
    pub async fn campaign(&self, owner: &Keypair) -> anyhow::Result<Option<Campaign>> {
        Ok(self.program.campaign_of(&owner.address()).await?)
    }

    /// Ledger balance of `owner`'s receiving account.
    pub async fn receiving_balance(&self, owner: &Keypair) -> anyhow::Result<u64> {
        let receiving = self.program.receiving_address(&owner.address())?;
        Ok(self.program.ledger().balance(&receiving).await?)
    }

    /// Ledger balance of a donor's account.
    pub async fn donor_balance(&self, donor: &Donor) -> anyhow::Result<u64> {
        Ok(self.program.ledger().balance(&donor.account).await?)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowdfund_core::CampaignStatus;

    #[tokio::test]
    async fn test_fixture_campaign_and_donation() {
        let fixture = TestFixture::new();
        let owner = fixture.owner(1);
        let donor = fixture.donor(2, 100).unwrap();

        let created = fixture.create_campaign(&owner, "fixture", 50).await.unwrap();
        assert_eq!(created.status, CampaignStatus::Active);

        let c = fixture.donate(&owner, &donor, 50).await.unwrap();
        assert!(c.is_funded());
        assert_eq!(fixture.receiving_balance(&owner).await.unwrap(), 50);
        assert_eq!(fixture.donor_balance(&donor).await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_donors_are_distinct() {
        let fixture = TestFixture::new();
        let a = fixture.donor(1, 0).unwrap();
        let b = fixture.donor(2, 0).unwrap();

        assert_ne!(a.address(), b.address());
        assert_ne!(a.account, b.account);
        assert_ne!(a.address(), fixture.owner(1).address());
    }
}
