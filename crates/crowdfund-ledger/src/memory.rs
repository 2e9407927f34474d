//! In-memory token ledger.
//!
//! Besides the [`TokenLedger`] contract it offers the faucet-style helpers
//! tests need: creating mints, opening donor accounts and minting tokens.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use crowdfund_core::Address;

use crate::error::{LedgerError, Result};
use crate::traits::{TokenAccount, TokenLedger};

struct Mint {
    authority: Address,
    supply: u64,
}

#[derive(Default)]
struct LedgerInner {
    mints: HashMap<Address, Mint>,
    accounts: HashMap<Address, TokenAccount>,
}

/// In-memory ledger implementation.
///
/// Thread-safe via RwLock; every operation holds the lock for its whole
/// duration, so transfers are atomic.
#[derive(Default)]
pub struct MemoryLedger {
    inner: RwLock<LedgerInner>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new mint controlled by `authority`.
    pub fn create_mint(&self, authority: &Address) -> Address {
        let address = Address::random();
        let mut inner = self.inner.write().unwrap();
        inner.mints.insert(
            address,
            Mint {
                authority: *authority,
                supply: 0,
            },
        );
        address
    }

    /// Open an account at a fresh random address.
    pub fn open_account(&self, mint: &Address, authority: &Address) -> Result<Address> {
        let address = Address::random();
        let mut inner = self.inner.write().unwrap();
        inner.insert_account(address, *mint, *authority)?;
        Ok(address)
    }

    /// Issue `amount` new tokens into `account`.
    pub fn mint_to(
        &self,
        mint: &Address,
        account: &Address,
        amount: u64,
        mint_authority: &Address,
    ) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let inner = &mut *inner;

        let mint_state = inner
            .mints
            .get_mut(mint)
            .ok_or(LedgerError::UnknownMint(*mint))?;
        if &mint_state.authority != mint_authority {
            return Err(LedgerError::OwnerMismatch {
                account: *mint,
                signer: *mint_authority,
            });
        }

        let target = inner
            .accounts
            .get_mut(account)
            .ok_or(LedgerError::AccountNotFound(*account))?;
        if &target.mint != mint {
            return Err(LedgerError::MintMismatch {
                expected: target.mint,
                actual: *mint,
            });
        }

        let supply = mint_state
            .supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = target.amount.checked_add(amount).ok_or(LedgerError::Overflow)?;

        mint_state.supply = supply;
        target.amount = balance;
        Ok(())
    }

    /// Total tokens issued for `mint`.
    pub fn supply(&self, mint: &Address) -> Result<u64> {
        let inner = self.inner.read().unwrap();
        inner
            .mints
            .get(mint)
            .map(|m| m.supply)
            .ok_or(LedgerError::UnknownMint(*mint))
    }
}

impl LedgerInner {
    fn insert_account(&mut self, address: Address, mint: Address, authority: Address) -> Result<()> {
        if !self.mints.contains_key(&mint) {
            return Err(LedgerError::UnknownMint(mint));
        }
        if self.accounts.contains_key(&address) {
            return Err(LedgerError::AccountExists(address));
        }
        self.accounts.insert(
            address,
            TokenAccount {
                address,
                mint,
                authority,
                amount: 0,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl TokenLedger for MemoryLedger {
    async fn create_token_account(
        &self,
        address: &Address,
        mint: &Address,
        authority: &Address,
    ) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.insert_account(*address, *mint, *authority)
    }

    async fn close_token_account(&self, address: &Address, authority: &Address) -> Result<()> {
        let mut inner = self.inner.write().unwrap();

        let account = inner
            .accounts
            .get(address)
            .ok_or(LedgerError::AccountNotFound(*address))?;
        if &account.authority != authority {
            return Err(LedgerError::OwnerMismatch {
                account: *address,
                signer: *authority,
            });
        }
        if account.amount != 0 {
            return Err(LedgerError::NonZeroBalance {
                account: *address,
                amount: account.amount,
            });
        }

        inner.accounts.remove(address);
        Ok(())
    }

    async fn transfer(
        &self,
        source: &Address,
        destination: &Address,
        mint: &Address,
        amount: u64,
        authority: &Address,
    ) -> Result<()> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let mut inner = self.inner.write().unwrap();

        // Validate everything before touching either balance.
        let from = inner
            .accounts
            .get(source)
            .ok_or(LedgerError::AccountNotFound(*source))?;
        if &from.authority != authority {
            return Err(LedgerError::OwnerMismatch {
                account: *source,
                signer: *authority,
            });
        }
        if &from.mint != mint {
            return Err(LedgerError::MintMismatch {
                expected: from.mint,
                actual: *mint,
            });
        }
        if from.amount < amount {
            return Err(LedgerError::InsufficientFunds {
                available: from.amount,
                requested: amount,
            });
        }

        let to = inner
            .accounts
            .get(destination)
            .ok_or(LedgerError::AccountNotFound(*destination))?;
        if &to.mint != mint {
            return Err(LedgerError::MintMismatch {
                expected: to.mint,
                actual: *mint,
            });
        }

        if source == destination {
            return Ok(());
        }

        let credited = to.amount.checked_add(amount).ok_or(LedgerError::Overflow)?;

        if let Some(from) = inner.accounts.get_mut(source) {
            from.amount -= amount;
        }
        if let Some(to) = inner.accounts.get_mut(destination) {
            to.amount = credited;
        }

        tracing::trace!(%source, %destination, amount, "ledger transfer");
        Ok(())
    }

    async fn balance(&self, account: &Address) -> Result<u64> {
        let inner = self.inner.read().unwrap();
        inner
            .accounts
            .get(account)
            .map(|a| a.amount)
            .ok_or(LedgerError::AccountNotFound(*account))
    }

    async fn account(&self, address: &Address) -> Result<Option<TokenAccount>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.accounts.get(address).cloned())
    }
}
