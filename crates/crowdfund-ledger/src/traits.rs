//! TokenLedger trait: the contract the program expects from a token ledger.

use async_trait::async_trait;
use crowdfund_core::Address;

use crate::error::Result;

/// A token account: a balance of one mint, moved only by its authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccount {
    pub address: Address,
    pub mint: Address,
    pub authority: Address,
    pub amount: u64,
}

/// Token ledger operations used by the program.
///
/// Every call is atomic: a failed transfer moves nothing.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Open an empty account for `mint` at `address`, controlled by `authority`.
    async fn create_token_account(
        &self,
        address: &Address,
        mint: &Address,
        authority: &Address,
    ) -> Result<()>;

    /// Remove an empty account. Only its authority may close it.
    async fn close_token_account(&self, address: &Address, authority: &Address) -> Result<()>;

    /// Move `amount` of `mint` from `source` to `destination`.
    ///
    /// # Errors
    /// - `InsufficientFunds` if `source` holds less than `amount`.
    /// - `MintMismatch` if either account holds a different mint.
    /// - `OwnerMismatch` if `authority` does not control `source`.
    async fn transfer(
        &self,
        source: &Address,
        destination: &Address,
        mint: &Address,
        amount: u64,
        authority: &Address,
    ) -> Result<()>;

    /// Current balance of an account.
    async fn balance(&self, account: &Address) -> Result<u64>;

    /// Look up an account.
    async fn account(&self, address: &Address) -> Result<Option<TokenAccount>>;
}

#[async_trait]
impl<L: TokenLedger + ?Sized> TokenLedger for std::sync::Arc<L> {
    async fn create_token_account(
        &self,
        address: &Address,
        mint: &Address,
        authority: &Address,
    ) -> Result<()> {
        (**self).create_token_account(address, mint, authority).await
    }

    async fn close_token_account(&self, address: &Address, authority: &Address) -> Result<()> {
        (**self).close_token_account(address, authority).await
    }

    async fn transfer(
        &self,
        source: &Address,
        destination: &Address,
        mint: &Address,
        amount: u64,
        authority: &Address,
    ) -> Result<()> {
        (**self)
            .transfer(source, destination, mint, amount, authority)
            .await
    }

    async fn balance(&self, account: &Address) -> Result<u64> {
        (**self).balance(account).await
    }

    async fn account(&self, address: &Address) -> Result<Option<TokenAccount>> {
        (**self).account(address).await
    }
}
