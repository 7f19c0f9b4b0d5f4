use std::sync::Arc;

use ethers::{
	abi::Detokenize,
	contract::ContractCall,
	middleware::SignerMiddleware,
	providers::{JsonRpcClient, PendingTransaction, Provider},
	signers::LocalWallet,
	types::{Address, TxHash, U256, U64},
};
use htk_primitives::{
	contracts::{airdrop::AirdropContract, erc20::Erc20Contract, staking::StakingContract},
	log_and_capture, sub_display_format,
};

use super::{
	prompt::UserPrompt,
	traits::{AirdropLedger, LedgerResult, StakingLedger, TokenLedger, TransactionTracker},
};
use crate::errors::LedgerError;

const SUB_LOG_TARGET: &str = "contract-handle";

/// The middleware every contract handle signs with.
pub type SessionMiddleware<T> = SignerMiddleware<Arc<Provider<T>>, LocalWallet>;

/// The submission and confirmation plumbing shared by every contract handle.
pub struct TxContext<T> {
	/// The ethers.rs wrapper for the connected chain.
	provider: Arc<Provider<T>>,
	/// The gate every transaction passes before it is signed.
	prompt: Arc<dyn UserPrompt>,
	/// The number of confirmations awaited per transaction.
	confirmations: usize,
	/// The name of the connected chain. Used as the log target.
	chain_name: String,
}

impl<T: JsonRpcClient + 'static> TxContext<T> {
	pub fn new(
		provider: Arc<Provider<T>>,
		prompt: Arc<dyn UserPrompt>,
		confirmations: u64,
		chain_name: String,
	) -> Self {
		Self { provider, prompt, confirmations: confirmations.max(1) as usize, chain_name }
	}

	async fn read<D>(&self, method: &str, call: ContractCall<SessionMiddleware<T>, D>) -> LedgerResult<D>
	where
		D: Detokenize + Send + Sync,
	{
		call.call().await.map_err(|error| {
			log::warn!(
				target: self.chain_name.as_str(),
				"-[{}] ⚠️  Failed to call {}: {}",
				sub_display_format(SUB_LOG_TARGET),
				method,
				error
			);
			LedgerError::Transport(format!("{}: {}", method, error))
		})
	}

	async fn submit<D>(
		&self,
		description: String,
		call: ContractCall<SessionMiddleware<T>, D>,
	) -> LedgerResult<TxHash>
	where
		D: Detokenize + Send + Sync,
	{
		if !self.prompt.confirm_transaction(&description).await {
			log::warn!(
				target: self.chain_name.as_str(),
				"-[{}] ✋ Transaction declined by the user: {}",
				sub_display_format(SUB_LOG_TARGET),
				description
			);
			return Err(LedgerError::Rejected);
		}

		match call.send().await {
			Ok(pending) => {
				let tx_hash = pending.tx_hash();
				log::info!(
					target: self.chain_name.as_str(),
					"-[{}] 🔖 Submitted transaction: {}, {:?}",
					sub_display_format(SUB_LOG_TARGET),
					description,
					tx_hash
				);
				Ok(tx_hash)
			},
			Err(error) => {
				log_and_capture!(
					error,
					self.chain_name.as_str(),
					SUB_LOG_TARGET,
					"❗️ Failed to submit transaction: {}, Error: {}",
					description,
					error
				);
				Err(LedgerError::Transport(error.to_string()))
			},
		}
	}

	async fn confirm(&self, tx_hash: TxHash) -> LedgerResult<()> {
		let receipt = PendingTransaction::new(tx_hash, &*self.provider)
			.confirmations(self.confirmations)
			.await
			.map_err(|error| LedgerError::Transport(error.to_string()))?;

		match receipt {
			Some(receipt) if receipt.status == Some(U64::one()) => {
				log::info!(
					target: self.chain_name.as_str(),
					"-[{}] 🎁 The requested transaction has been successfully mined in block: {:?}-{:?}",
					sub_display_format(SUB_LOG_TARGET),
					receipt.block_number.unwrap_or_default(),
					tx_hash
				);
				Ok(())
			},
			Some(receipt) => {
				log_and_capture!(
					warn,
					self.chain_name.as_str(),
					SUB_LOG_TARGET,
					"⚠️  Error encountered during contract execution [execution reverted]: {:?}-{:?}",
					receipt.block_number.unwrap_or_default(),
					tx_hash
				);
				Err(LedgerError::Reverted(tx_hash))
			},
			None => Err(LedgerError::Dropped(tx_hash)),
		}
	}
}

/// The ERC20 token bound to the session signer.
pub struct TokenHandle<T> {
	contract: Erc20Contract<SessionMiddleware<T>>,
	context: Arc<TxContext<T>>,
}

impl<T: JsonRpcClient + 'static> TokenHandle<T> {
	pub fn new(
		address: Address,
		middleware: Arc<SessionMiddleware<T>>,
		context: Arc<TxContext<T>>,
	) -> Self {
		Self { contract: Erc20Contract::new(address, middleware), context }
	}

	pub fn address(&self) -> Address {
		self.contract.address()
	}
}

#[async_trait::async_trait]
impl<T: JsonRpcClient + 'static> TransactionTracker for TokenHandle<T> {
	async fn wait_for_confirmation(&self, tx_hash: TxHash) -> LedgerResult<()> {
		self.context.confirm(tx_hash).await
	}
}

#[async_trait::async_trait]
impl<T: JsonRpcClient + 'static> TokenLedger for TokenHandle<T> {
	async fn decimals(&self) -> LedgerResult<u8> {
		self.context.read("decimals", self.contract.decimals()).await
	}

	async fn balance_of(&self, account: Address) -> LedgerResult<U256> {
		self.context.read("balanceOf", self.contract.balance_of(account)).await
	}

	async fn allowance(&self, owner: Address, spender: Address) -> LedgerResult<U256> {
		self.context.read("allowance", self.contract.allowance(owner, spender)).await
	}

	async fn approve(&self, spender: Address, amount: U256) -> LedgerResult<TxHash> {
		self.context
			.submit(
				format!("approve(spender: {:?}, amount: {})", spender, amount),
				self.contract.approve(spender, amount),
			)
			.await
	}
}

/// The staking contract bound to the session signer.
pub struct StakingHandle<T> {
	contract: StakingContract<SessionMiddleware<T>>,
	context: Arc<TxContext<T>>,
}

impl<T: JsonRpcClient + 'static> StakingHandle<T> {
	pub fn new(
		address: Address,
		middleware: Arc<SessionMiddleware<T>>,
		context: Arc<TxContext<T>>,
	) -> Self {
		Self { contract: StakingContract::new(address, middleware), context }
	}
}

#[async_trait::async_trait]
impl<T: JsonRpcClient + 'static> TransactionTracker for StakingHandle<T> {
	async fn wait_for_confirmation(&self, tx_hash: TxHash) -> LedgerResult<()> {
		self.context.confirm(tx_hash).await
	}
}

#[async_trait::async_trait]
impl<T: JsonRpcClient + 'static> StakingLedger for StakingHandle<T> {
	fn address(&self) -> Address {
		self.contract.address()
	}

	async fn staked_balance_of(&self, account: Address) -> LedgerResult<U256> {
		self.context.read("getStakedBalance", self.contract.get_staked_balance(account)).await
	}

	async fn stake(&self, amount: U256) -> LedgerResult<TxHash> {
		self.context
			.submit(format!("stake(amount: {})", amount), self.contract.stake(amount))
			.await
	}

	async fn withdraw(&self, amount: U256) -> LedgerResult<TxHash> {
		self.context
			.submit(format!("withdraw(amount: {})", amount), self.contract.withdraw(amount))
			.await
	}
}

/// The airdrop distributor bound to the session signer.
pub struct AirdropHandle<T> {
	contract: AirdropContract<SessionMiddleware<T>>,
	context: Arc<TxContext<T>>,
}

impl<T: JsonRpcClient + 'static> AirdropHandle<T> {
	pub fn new(
		address: Address,
		middleware: Arc<SessionMiddleware<T>>,
		context: Arc<TxContext<T>>,
	) -> Self {
		Self { contract: AirdropContract::new(address, middleware), context }
	}

	pub fn address(&self) -> Address {
		self.contract.address()
	}
}

#[async_trait::async_trait]
impl<T: JsonRpcClient + 'static> TransactionTracker for AirdropHandle<T> {
	async fn wait_for_confirmation(&self, tx_hash: TxHash) -> LedgerResult<()> {
		self.context.confirm(tx_hash).await
	}
}

#[async_trait::async_trait]
impl<T: JsonRpcClient + 'static> AirdropLedger for AirdropHandle<T> {
	async fn owner(&self) -> LedgerResult<Address> {
		self.context.read("owner", self.contract.owner()).await
	}

	async fn has_received(&self, account: Address) -> LedgerResult<bool> {
		self.context.read("hasReceived", self.contract.has_received(account)).await
	}

	async fn airdrop(&self, recipient: Address) -> LedgerResult<TxHash> {
		self.context
			.submit(format!("airdrop(recipient: {:?})", recipient), self.contract.airdrop(recipient))
			.await
	}
}
