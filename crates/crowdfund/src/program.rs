//! The Program: the crowdfund state machine over a store and a token ledger.
//!
//! The Program owns campaign records. It derives their addresses, serializes
//! writers per record, moves tokens through the ledger and commits the new
//! record state only when the ledger and the record agree.

use std::sync::Arc;

use crowdfund_core::{
    decode_campaign, derive_address, encode_campaign, parse_amount, parse_target,
    validate_amount, validate_description, validate_donation, validate_target,
    verify_derivation, Address, Campaign, CampaignError, CoreError, DerivationError, Donation,
    Instruction, Namespace, SignedInstruction,
};
use crowdfund_ledger::{LedgerError, TokenLedger};
use crowdfund_store::{CreateResult, Record, SqliteStore, Store, UpdateResult};

use crate::config::ProgramConfig;
use crate::error::{ProgramError, Result};
use crate::locks::RecordLocks;

/// The crowdfund program.
///
/// Provides:
/// - Campaign creation and donation recording
/// - Signed instruction processing
/// - Campaign queries and integrity audits
pub struct Program<S: Store, L: TokenLedger> {
    /// Configuration.
    config: ProgramConfig,
    /// Campaign record storage.
    store: Arc<S>,
    /// Token ledger donations move through.
    ledger: Arc<L>,
    /// Single-writer locks per record address.
    locks: RecordLocks,
}

impl<L: TokenLedger> Program<SqliteStore, L> {
    /// Open a program backed by SQLite.
    ///
    /// Uses `config.database_path`, or an in-memory database when unset.
    pub fn open(config: ProgramConfig, ledger: L) -> Result<Self> {
        let store = match &config.database_path {
            Some(path) => SqliteStore::open(path)?,
            None => SqliteStore::open_memory()?,
        };
        Ok(Self::new(config, store, ledger))
    }
}

impl<S: Store, L: TokenLedger> Program<S, L> {
    /// Create a new program instance.
    pub fn new(config: ProgramConfig, store: S, ledger: L) -> Self {
        Self {
            config,
            store: Arc::new(store),
            ledger: Arc::new(ledger),
            locks: RecordLocks::new(),
        }
    }

    /// The program id every address is derived under.
    pub fn program_id(&self) -> &Address {
        &self.config.program_id
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the ledger reference.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Address of `owner`'s campaign record.
    pub fn campaign_address(&self, owner: &Address) -> Result<Address> {
        Ok(derive_address(self.program_id(), Namespace::CampaignState, owner)?.address)
    }

    /// Address of `owner`'s receiving token account.
    pub fn receiving_address(&self, owner: &Address) -> Result<Address> {
        Ok(derive_address(self.program_id(), Namespace::ReceivingAccount, owner)?.address)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Instruction Processing
    // ─────────────────────────────────────────────────────────────────────────

    /// Authenticate and execute a signed instruction.
    ///
    /// The signer becomes the campaign owner or the donor.
    #[tracing::instrument(skip_all, fields(signer = %signed.signer))]
    pub async fn process(&self, signed: &SignedInstruction) -> Result<Campaign> {
        let decoded = if self.config.verify_signatures {
            signed.verify()
        } else {
            signed.instruction()
        };

        let instruction = decoded.map_err(|e| match e {
            CoreError::InvalidSignature | CoreError::InvalidPublicKey => {
                tracing::warn!(error = %e, "rejected instruction signature");
                ProgramError::Unauthorized(e.to_string())
            }
            other => ProgramError::InvalidInstruction(other.to_string()),
        })?;

        tracing::debug!(instruction = instruction.name(), "processing instruction");

        match instruction {
            Instruction::CreateCampaign {
                description,
                target,
                token_mint,
            } => {
                let target = parse_target(target)?;
                self.create_campaign(&signed.signer, &description, target, &token_mint)
                    .await
            }
            Instruction::RecordDonation {
                campaign,
                source,
                destination,
                mint,
                amount,
            } => {
                let amount = parse_amount(amount)?;
                let donation = Donation {
                    campaign,
                    donor: signed.signer,
                    source,
                    destination,
                    mint,
                    amount,
                };
                self.record_donation(&donation).await
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Create `owner`'s campaign and its receiving token account.
    ///
    /// Fails with `DuplicateCampaign` if the owner already has one; creation
    /// is never idempotent. Fails with `ReceivingAccountUnavailable` if
    /// someone else already holds the receiving address.
    #[tracing::instrument(skip_all, fields(owner = %owner, mint = %token_mint))]
    pub async fn create_campaign(
        &self,
        owner: &Address,
        description: &str,
        target: u64,
        token_mint: &Address,
    ) -> Result<Campaign> {
        validate_description(description)?;
        validate_target(target)?;

        let state = derive_address(self.program_id(), Namespace::CampaignState, owner)?;
        let receiving = derive_address(self.program_id(), Namespace::ReceivingAccount, owner)?;

        let campaign = Campaign::new(
            *owner,
            description,
            target,
            *token_mint,
            receiving.address,
            state.nonce,
        )?;
        let data = encode_campaign(&campaign)?;

        let _guard = self.locks.lock(&state.address).await;

        if self.store.has_record(&state.address).await? {
            tracing::warn!(campaign = %state.address, "duplicate campaign");
            return Err(CampaignError::DuplicateCampaign(state.address).into());
        }

        let opened = self
            .open_receiving_account(&receiving.address, token_mint, &state.address)
            .await?;

        let created = self
            .store
            .create_record(&state.address, self.program_id(), &data)
            .await;

        match created {
            Ok(CreateResult::Created) => {
                tracing::debug!(
                    campaign = %state.address,
                    receiving = %receiving.address,
                    goal = target,
                    "created campaign"
                );
                Ok(campaign)
            }
            Ok(CreateResult::AlreadyExists) => {
                if opened {
                    self.release_account(&receiving.address, &state.address).await;
                }
                tracing::warn!(campaign = %state.address, "duplicate campaign");
                Err(CampaignError::DuplicateCampaign(state.address).into())
            }
            Err(e) => {
                if opened {
                    self.release_account(&receiving.address, &state.address).await;
                }
                Err(e.into())
            }
        }
    }

    /// Open the receiving account, controlled by the campaign record address.
    ///
    /// The receiving address is public, so an account may already sit there.
    /// An empty one with the campaign's mint and authority is adopted;
    /// anything else fails with `ReceivingAccountUnavailable`. Returns
    /// whether this call opened the account.
    async fn open_receiving_account(
        &self,
        account: &Address,
        mint: &Address,
        authority: &Address,
    ) -> Result<bool> {
        // No private key exists for the authority.
        match self.ledger.create_token_account(account, mint, authority).await {
            Ok(()) => Ok(true),
            Err(LedgerError::AccountExists(_)) => match self.ledger.account(account).await? {
                Some(existing)
                    if existing.mint == *mint
                        && existing.authority == *authority
                        && existing.amount == 0 =>
                {
                    tracing::debug!(%account, "adopting existing receiving account");
                    Ok(false)
                }
                existing => {
                    tracing::warn!(
                        %account,
                        holder = ?existing.map(|a| a.authority),
                        "receiving account unavailable"
                    );
                    Err(CampaignError::ReceivingAccountUnavailable(*account).into())
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Move `donation.amount` tokens into the campaign and record them.
    ///
    /// The ledger transfer and the record update either both take effect
    /// or neither does.
    #[tracing::instrument(
        skip_all,
        fields(campaign = %donation.campaign, donor = %donation.donor, amount = donation.amount)
    )]
    pub async fn record_donation(&self, donation: &Donation) -> Result<Campaign> {
        validate_amount(donation.amount)?;

        let _guard = self.locks.lock(&donation.campaign).await;

        let (campaign, revision) = self.load_owned(&donation.campaign).await?;

        if let Err(e) = validate_donation(&campaign, donation) {
            tracing::warn!(error = %e, "rejected donation");
            return Err(e.into());
        }

        let recorded = campaign.balance;
        let observed = self.ledger.balance(&campaign.receiving_account).await?;
        if recorded != observed {
            tracing::error!(recorded, observed, "campaign balance diverged from ledger");
            return Err(CampaignError::IntegrityViolation { recorded, observed }.into());
        }

        // Status, overflow and target come from the record read under the lock.
        let updated = campaign.apply_donation(donation.amount)?;
        let data = encode_campaign(&updated)?;

        self.ledger
            .transfer(
                &donation.source,
                &campaign.receiving_account,
                &campaign.token_mint,
                donation.amount,
                &donation.donor,
            )
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "donation transfer refused");
                ProgramError::from(e)
            })?;

        match self.commit(donation, &updated, revision, &data).await {
            Ok(()) => {
                tracing::debug!(
                    balance = updated.balance,
                    status = ?updated.status,
                    "recorded donation"
                );
                Ok(updated)
            }
            Err(e) => Err(self.refund(donation, &campaign, e).await),
        }
    }

    /// Post-transfer check and record write.
    async fn commit(
        &self,
        donation: &Donation,
        updated: &Campaign,
        revision: u64,
        data: &[u8],
    ) -> Result<()> {
        let observed = self.ledger.balance(&updated.receiving_account).await?;
        if observed != updated.balance {
            tracing::error!(
                recorded = updated.balance,
                observed,
                "ledger balance diverged during donation"
            );
            return Err(CampaignError::IntegrityViolation {
                recorded: updated.balance,
                observed,
            }
            .into());
        }

        match self
            .store
            .update_record(&donation.campaign, revision, data)
            .await?
        {
            UpdateResult::Updated { .. } => Ok(()),
            UpdateResult::Stale { current } => Err(ProgramError::Stale {
                address: donation.campaign,
                expected: revision,
                current,
            }),
            UpdateResult::NotFound => {
                Err(CampaignError::CampaignNotFound(donation.campaign).into())
            }
        }
    }

    /// Return a donation's tokens after a failed commit.
    ///
    /// Gives back the commit error, or `RefundFailed` when the tokens stay
    /// in the receiving account.
    async fn refund(
        &self,
        donation: &Donation,
        campaign: &Campaign,
        commit: ProgramError,
    ) -> ProgramError {
        let result = self
            .ledger
            .transfer(
                &campaign.receiving_account,
                &donation.source,
                &campaign.token_mint,
                donation.amount,
                &donation.campaign,
            )
            .await;

        match result {
            Ok(()) => {
                tracing::warn!(error = %commit, amount = donation.amount, "donation refunded");
                commit
            }
            Err(refund) => {
                tracing::error!(
                    error = %refund,
                    commit = %commit,
                    amount = donation.amount,
                    "refund failed"
                );
                ProgramError::RefundFailed {
                    campaign: donation.campaign,
                    amount: donation.amount,
                    commit: Box::new(commit),
                    refund,
                }
            }
        }
    }

    /// Close a receiving account created for a campaign that was not stored.
    async fn release_account(&self, account: &Address, authority: &Address) {
        if let Err(e) = self.ledger.close_token_account(account, authority).await {
            tracing::error!(error = %e, %account, "failed to release receiving account");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the campaign stored at `address`.
    ///
    /// Fails with `Unauthorized` when the record belongs to another program.
    pub async fn campaign(&self, address: &Address) -> Result<Option<Campaign>> {
        match self.store.get_record(address).await? {
            Some(record) => {
                self.check_owner(&record)?;
                Ok(Some(decode_campaign(&record.data)?))
            }
            None => Ok(None),
        }
    }

    /// Get `owner`'s campaign.
    pub async fn campaign_of(&self, owner: &Address) -> Result<Option<Campaign>> {
        let address = self.campaign_address(owner)?;
        self.campaign(&address).await
    }

    /// All campaigns created by this program, in address order.
    pub async fn campaigns(&self) -> Result<Vec<Campaign>> {
        let addresses = self.store.list_records(self.program_id()).await?;
        let mut campaigns = Vec::with_capacity(addresses.len());
        for address in addresses {
            if let Some(campaign) = self.campaign(&address).await? {
                campaigns.push(campaign);
            }
        }
        Ok(campaigns)
    }

    /// Re-check a campaign against its derivation and the ledger.
    ///
    /// Fails with `IntegrityViolation` when the recorded balance differs
    /// from the receiving account, or with a derivation error when either
    /// stored address does not derive from the owner.
    #[tracing::instrument(skip_all, fields(campaign = %address))]
    pub async fn audit(&self, address: &Address) -> Result<Campaign> {
        let _guard = self.locks.lock(address).await;
        let (campaign, _) = self.load_owned(address).await?;

        let receiving =
            derive_address(self.program_id(), Namespace::ReceivingAccount, &campaign.owner)?;
        if receiving.address != campaign.receiving_account {
            return Err(DerivationError::Mismatch {
                namespace: Namespace::ReceivingAccount.tag(),
                nonce: receiving.nonce,
                expected: campaign.receiving_account,
            }
            .into());
        }

        let observed = self.ledger.balance(&campaign.receiving_account).await?;
        if observed != campaign.balance {
            tracing::error!(recorded = campaign.balance, observed, "audit found divergence");
            return Err(CampaignError::IntegrityViolation {
                recorded: campaign.balance,
                observed,
            }
            .into());
        }

        Ok(campaign)
    }

    /// Load a record this program owns and check its stored derivation nonce.
    async fn load_owned(&self, address: &Address) -> Result<(Campaign, u64)> {
        let record = self
            .store
            .get_record(address)
            .await?
            .ok_or(CampaignError::CampaignNotFound(*address))?;

        self.check_owner(&record)?;

        let campaign = decode_campaign(&record.data)?;
        verify_derivation(
            self.program_id(),
            Namespace::CampaignState,
            &campaign.owner,
            campaign.address_salt,
            address,
        )?;

        Ok((campaign, record.revision))
    }

    fn check_owner(&self, record: &Record) -> Result<()> {
        if &record.owner_program != self.program_id() {
            return Err(ProgramError::Unauthorized(format!(
                "record {} is owned by program {}",
                record.address, record.owner_program
            )));
        }
        Ok(())
    }
}
