use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use ethers::types::{Address, U256};
use htk_primitives::{
	log_and_capture, sub_display_format,
	utils::{format_amount, parse_amount},
};
use tokio::sync::{Mutex, RwLock};

use crate::{
	errors::{LedgerError, StakeError, StakeStage, WithdrawStage},
	eth::{LedgerResult, StakingLedger, TokenLedger},
};

const SUB_LOG_TARGET: &str = "stake-coordinator";

/// The lifecycle of a [`StakeCoordinator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeState {
	/// Nothing has been read from the ledger yet.
	Disconnected,
	Loaded,
	Staking,
	Withdrawing,
}

/// The balances of the session account, as last read from the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenView {
	pub wallet_balance: U256,
	pub staked_balance: U256,
	/// The token precision used to parse and format amounts.
	pub decimals: u8,
}

impl Display for TokenView {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"wallet: {}, staked: {}",
			format_amount(self.wallet_balance, self.decimals),
			format_amount(self.staked_balance, self.decimals)
		)
	}
}

/// Coordinates the stake and withdraw flows of a single account.
///
/// Balances are never computed locally. Every successful write is followed by a re-read of both
/// balances from the token and staking contracts.
pub struct StakeCoordinator<K, S> {
	/// The session account.
	account: Address,
	/// The token being staked.
	token: Arc<K>,
	/// The staking contract. Also the spender of every approval.
	staking: Arc<S>,
	log_target: String,
	view: RwLock<Option<TokenView>>,
	state: RwLock<StakeState>,
	/// Held for the whole duration of a write.
	write_lock: Mutex<()>,
}

impl<K: TokenLedger, S: StakingLedger> StakeCoordinator<K, S> {
	/// Instantiates a new `StakeCoordinator` in the `Disconnected` state.
	pub fn new(account: Address, token: Arc<K>, staking: Arc<S>, log_target: String) -> Self {
		Self {
			account,
			token,
			staking,
			log_target,
			view: RwLock::new(None),
			state: RwLock::new(StakeState::Disconnected),
			write_lock: Mutex::new(()),
		}
	}

	pub async fn state(&self) -> StakeState {
		*self.state.read().await
	}

	/// Returns the last refreshed balances, if loaded.
	pub async fn view(&self) -> Option<TokenView> {
		*self.view.read().await
	}

	/// Reads the token precision and the initial balances and enters `Loaded`.
	pub async fn load(&self) -> Result<TokenView, StakeError> {
		let decimals = self.token.decimals().await.map_err(StakeError::Refresh)?;
		let view = self.fetch_view(decimals).await.map_err(StakeError::Refresh)?;

		*self.view.write().await = Some(view);
		let mut state = self.state.write().await;
		if *state == StakeState::Disconnected {
			*state = StakeState::Loaded;
		}
		log::info!(
			target: self.log_target.as_str(),
			"-[{}] 💰 Loaded balances of {:?}: {}",
			sub_display_format(SUB_LOG_TARGET),
			self.account,
			view
		);
		Ok(view)
	}

	/// Re-reads both balances of the session account and updates the cached view.
	pub async fn refresh(&self) -> Result<TokenView, StakeError> {
		let decimals = self.decimals().await?;
		self.reload(decimals).await.map_err(StakeError::Refresh)
	}

	/// Stakes `amount` tokens, approving the staking contract first when the current allowance
	/// does not cover the amount.
	pub async fn stake(&self, amount: &str) -> Result<TokenView, StakeError> {
		let decimals = self.decimals().await?;
		let amount = parse_amount(amount, decimals).map_err(StakeError::InvalidAmount)?;
		let _guard = self.write_lock.try_lock().map_err(|_| StakeError::OperationInProgress)?;

		self.set_state(StakeState::Staking).await;
		let result = self.execute_stake(amount, decimals).await;
		self.set_state(StakeState::Loaded).await;

		match result {
			Ok(view) => {
				log::info!(
					target: self.log_target.as_str(),
					"-[{}] 🎉 Successfully staked {} tokens: {}",
					sub_display_format(SUB_LOG_TARGET),
					format_amount(amount, decimals),
					view
				);
				Ok(view)
			},
			Err(error) => {
				log_and_capture!(
					error,
					self.log_target.as_str(),
					SUB_LOG_TARGET,
					"❗️ Failed to stake {} tokens: {}",
					format_amount(amount, decimals),
					error
				);
				Err(error)
			},
		}
	}

	/// Withdraws `amount` tokens from the staking contract.
	pub async fn withdraw(&self, amount: &str) -> Result<TokenView, StakeError> {
		let decimals = self.decimals().await?;
		let amount = parse_amount(amount, decimals).map_err(StakeError::InvalidAmount)?;
		let _guard = self.write_lock.try_lock().map_err(|_| StakeError::OperationInProgress)?;

		self.set_state(StakeState::Withdrawing).await;
		let result = self.execute_withdraw(amount, decimals).await;
		self.set_state(StakeState::Loaded).await;

		match result {
			Ok(view) => {
				log::info!(
					target: self.log_target.as_str(),
					"-[{}] 🎉 Successfully withdrew {} tokens: {}",
					sub_display_format(SUB_LOG_TARGET),
					format_amount(amount, decimals),
					view
				);
				Ok(view)
			},
			Err(error) => {
				log_and_capture!(
					error,
					self.log_target.as_str(),
					SUB_LOG_TARGET,
					"❗️ Failed to withdraw {} tokens: {}",
					format_amount(amount, decimals),
					error
				);
				Err(error)
			},
		}
	}

	async fn execute_stake(&self, amount: U256, decimals: u8) -> Result<TokenView, StakeError> {
		let spender = self.staking.address();
		let allowance = self
			.token
			.allowance(self.account, spender)
			.await
			.map_err(stake_failed(StakeStage::Allowance))?;

		if allowance < amount {
			log::info!(
				target: self.log_target.as_str(),
				"-[{}] 🔖 Approving {} tokens to {:?} (current allowance: {})",
				sub_display_format(SUB_LOG_TARGET),
				format_amount(amount, decimals),
				spender,
				format_amount(allowance, decimals)
			);
			let tx_hash =
				self.token.approve(spender, amount).await.map_err(stake_failed(StakeStage::Approval))?;
			self.token
				.wait_for_confirmation(tx_hash)
				.await
				.map_err(stake_failed(StakeStage::ApprovalConfirmation))?;
		}

		let tx_hash = self.staking.stake(amount).await.map_err(stake_failed(StakeStage::Stake))?;
		self.staking
			.wait_for_confirmation(tx_hash)
			.await
			.map_err(stake_failed(StakeStage::StakeConfirmation))?;

		self.reload(decimals).await.map_err(stake_failed(StakeStage::Refresh))
	}

	async fn execute_withdraw(&self, amount: U256, decimals: u8) -> Result<TokenView, StakeError> {
		let tx_hash =
			self.staking.withdraw(amount).await.map_err(withdraw_failed(WithdrawStage::Withdraw))?;
		self.staking
			.wait_for_confirmation(tx_hash)
			.await
			.map_err(withdraw_failed(WithdrawStage::WithdrawConfirmation))?;

		self.reload(decimals).await.map_err(withdraw_failed(WithdrawStage::Refresh))
	}

	async fn decimals(&self) -> Result<u8, StakeError> {
		self.view.read().await.map(|view| view.decimals).ok_or(StakeError::NotLoaded)
	}

	async fn reload(&self, decimals: u8) -> LedgerResult<TokenView> {
		let view = self.fetch_view(decimals).await?;
		*self.view.write().await = Some(view);
		Ok(view)
	}

	async fn fetch_view(&self, decimals: u8) -> LedgerResult<TokenView> {
		let wallet_balance = self.token.balance_of(self.account).await?;
		let staked_balance = self.staking.staked_balance_of(self.account).await?;
		Ok(TokenView { wallet_balance, staked_balance, decimals })
	}

	async fn set_state(&self, state: StakeState) {
		*self.state.write().await = state;
	}
}

fn stake_failed(stage: StakeStage) -> impl FnOnce(LedgerError) -> StakeError {
	move |source| StakeError::StakeFailed { stage, source }
}

fn withdraw_failed(stage: WithdrawStage) -> impl FnOnce(LedgerError) -> StakeError {
	move |source| StakeError::WithdrawFailed { stage, source }
}
