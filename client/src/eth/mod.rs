pub mod contracts;
pub mod prompt;
pub mod traits;
pub mod wallet;

pub use contracts::*;
pub use prompt::*;
pub use traits::*;
pub use wallet::*;

use ethers::{
	middleware::SignerMiddleware,
	providers::{JsonRpcClient, Middleware, Provider},
	types::{Address, U256},
};
use htk_primitives::{cli::SessionConfig, log_and_capture, sub_display_format};
use std::sync::Arc;

use crate::errors::SetupError;

const SUB_LOG_TARGET: &str = "chain-session";

/// The connectivity status of a chain session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
	Uninitialized,
	Connecting,
	Ready,
	Failed,
}

/// An authenticated connection to one account on one network.
pub struct Session<T> {
	/// The connected account.
	pub account: Address,
	/// The chain ID reported by the connected network.
	pub chain_id: u64,
	/// The name of the connected network. Used as the log target.
	pub chain_name: String,
	/// The token contract bound to the session signer.
	pub token: Arc<TokenHandle<T>>,
	/// The staking contract bound to the session signer.
	pub staking: Arc<StakingHandle<T>>,
	/// The airdrop contract bound to the session signer.
	pub airdrop: Arc<AirdropHandle<T>>,
}

/// Establishes the [`Session`] the coordinators work on.
pub struct ChainSession<T> {
	/// The validated session settings.
	config: SessionConfig,
	/// The ethers.rs wrapper for the connected chain.
	provider: Arc<Provider<T>>,
	/// The configured wallet, if any.
	wallet: Option<WalletManager>,
	/// The gate for account access and transaction requests.
	prompt: Arc<dyn UserPrompt>,
	status: SessionStatus,
	session: Option<Arc<Session<T>>>,
}

impl<T: JsonRpcClient + 'static> ChainSession<T> {
	/// Instantiates a new uninitialized `ChainSession`.
	pub fn new(
		config: SessionConfig,
		provider: Arc<Provider<T>>,
		wallet: Option<WalletManager>,
		prompt: Arc<dyn UserPrompt>,
	) -> Self {
		Self { config, provider, wallet, prompt, status: SessionStatus::Uninitialized, session: None }
	}

	pub fn status(&self) -> SessionStatus {
		self.status
	}

	/// Returns the established session once ready.
	pub fn session(&self) -> Option<Arc<Session<T>>> {
		self.session.clone()
	}

	/// Requests account access, verifies the connected network and binds the contract handles.
	///
	/// This is meant to be called once per process. Further calls return the already
	/// established session, or [`SetupError::SessionFailed`] if the first attempt failed.
	pub async fn initialize(&mut self) -> Result<Arc<Session<T>>, SetupError> {
		match self.status {
			SessionStatus::Uninitialized => {},
			SessionStatus::Ready | SessionStatus::Connecting => {
				log::warn!(
					target: self.config.name.as_str(),
					"-[{}] ⚠️  The chain session has already been initialized",
					sub_display_format(SUB_LOG_TARGET),
				);
				return self.session.clone().ok_or(SetupError::SessionFailed);
			},
			SessionStatus::Failed => return Err(SetupError::SessionFailed),
		}

		self.status = SessionStatus::Connecting;
		match self.connect().await {
			Ok(session) => {
				let session = Arc::new(session);
				log::info!(
					target: self.config.name.as_str(),
					"-[{}] 🔨 Connected account {:?} to chain {}",
					sub_display_format(SUB_LOG_TARGET),
					session.account,
					session.chain_id
				);
				self.session = Some(session.clone());
				self.status = SessionStatus::Ready;
				Ok(session)
			},
			Err(error) => {
				log_and_capture!(
					error,
					self.config.name.as_str(),
					SUB_LOG_TARGET,
					"❗️ Failed to initialize the chain session: {}",
					error
				);
				self.status = SessionStatus::Failed;
				Err(error)
			},
		}
	}

	async fn connect(&self) -> Result<Session<T>, SetupError> {
		let wallet = self.wallet.as_ref().ok_or(SetupError::NoWallet)?;
		let account = wallet.address();
		let expected = self.config.expected_chain_id;

		if !self.prompt.allow_account_access(account, expected).await {
			return Err(SetupError::AccountAccessDenied(account));
		}

		let chain_id = self
			.provider
			.get_chainid()
			.await
			.map_err(|error| SetupError::Provider(error.to_string()))?;
		if chain_id != U256::from(expected) {
			return Err(SetupError::NetworkMismatch { expected, actual: chain_id });
		}

		let middleware =
			Arc::new(SignerMiddleware::new(self.provider.clone(), wallet.signer(expected)));
		let context = Arc::new(TxContext::new(
			self.provider.clone(),
			self.prompt.clone(),
			self.config.block_confirmations,
			self.config.name.clone(),
		));

		Ok(Session {
			account,
			chain_id: expected,
			chain_name: self.config.name.clone(),
			token: Arc::new(TokenHandle::new(self.config.token, middleware.clone(), context.clone())),
			staking: Arc::new(StakingHandle::new(
				self.config.staking,
				middleware.clone(),
				context.clone(),
			)),
			airdrop: Arc::new(AirdropHandle::new(self.config.airdrop, middleware, context)),
		})
	}
}
