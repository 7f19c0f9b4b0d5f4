use ethers::types::{Address, TxHash, U256};

use crate::errors::LedgerError;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[async_trait::async_trait]
pub trait TransactionTracker: Send + Sync {
	/// Waits until the given transaction has been confirmed by the network. A reverted or dropped
	/// transaction is returned as an error.
	async fn wait_for_confirmation(&self, tx_hash: TxHash) -> LedgerResult<()>;
}

#[async_trait::async_trait]
/// The fungible token the coordinator stakes.
pub trait TokenLedger: TransactionTracker {
	/// The number of decimals used by the token's smallest unit.
	async fn decimals(&self) -> LedgerResult<u8>;

	/// Returns the token balance of the given account.
	async fn balance_of(&self, account: Address) -> LedgerResult<U256>;

	/// Returns the amount `spender` may transfer on behalf of `owner`.
	async fn allowance(&self, owner: Address, spender: Address) -> LedgerResult<U256>;

	/// Submits a transaction that sets the allowance of `spender` to exactly `amount`.
	async fn approve(&self, spender: Address, amount: U256) -> LedgerResult<TxHash>;
}

#[async_trait::async_trait]
/// The staking contract holding deposited tokens in custody.
pub trait StakingLedger: TransactionTracker {
	/// The address of the staking contract. Used as the spender on approvals.
	fn address(&self) -> Address;

	/// Returns the amount currently staked by the given account.
	async fn staked_balance_of(&self, account: Address) -> LedgerResult<U256>;

	/// Submits a transaction moving `amount` from the caller into custody.
	async fn stake(&self, amount: U256) -> LedgerResult<TxHash>;

	/// Submits a transaction returning `amount` from custody to the caller.
	async fn withdraw(&self, amount: U256) -> LedgerResult<TxHash>;
}

#[async_trait::async_trait]
/// The one-time airdrop distributor.
pub trait AirdropLedger: TransactionTracker {
	/// Returns the administrator account.
	async fn owner(&self) -> LedgerResult<Address>;

	/// Returns whether the given account already received the airdrop.
	async fn has_received(&self, account: Address) -> LedgerResult<bool>;

	/// Submits a transaction that transfers the fixed airdrop amount to `recipient`.
	async fn airdrop(&self, recipient: Address) -> LedgerResult<TxHash>;
}
