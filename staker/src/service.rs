use std::{sync::Arc, time::Duration};

use ethers::providers::{Http, Provider};
use htk_client::{
	airdrop::AirdropCoordinator,
	eth::{
		AirdropHandle, AutoApprove, ChainSession, Session, StakingHandle, TokenHandle, UserPrompt,
		WalletManager,
	},
	stake::StakeCoordinator,
	AirdropError, ErrorKind, SetupError, StakeError,
};
use htk_primitives::{
	cli::{Configuration, Error as CliError, SessionConfig},
	sub_display_format, INVALID_PROVIDER_URL,
};

use crate::{
	cli::{Subcommand, LOG_TARGET, SUB_LOG_TARGET},
	commands::{shell_cmd, stake_cmd},
	prompt::{TerminalInput, TerminalPrompt},
};

pub type StakeService = StakeCoordinator<TokenHandle<Http>, StakingHandle<Http>>;
pub type AirdropService = AirdropCoordinator<AirdropHandle<Http>>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Config(#[from] CliError),

	#[error(transparent)]
	Setup(#[from] SetupError),

	#[error(transparent)]
	Stake(#[from] StakeError),

	#[error(transparent)]
	Airdrop(#[from] AirdropError),
}

impl ServiceError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			ServiceError::Io(_) | ServiceError::Config(_) => ErrorKind::Setup,
			ServiceError::Setup(error) => error.kind(),
			ServiceError::Stake(error) => error.kind(),
			ServiceError::Airdrop(error) => error.kind(),
		}
	}
}

/// The established session and the coordinators bound to it.
pub struct Services {
	pub session: Arc<Session<Http>>,
	/// The terminal input shared by the shell and the prompt.
	pub input: Arc<TerminalInput>,
	pub stake: StakeService,
	pub airdrop: AirdropService,
}

/// Connects to the configured network and builds both coordinators. Nothing is read from the
/// contracts yet.
pub async fn build_services(config: &Configuration) -> Result<Services, ServiceError> {
	let session_config = SessionConfig::try_from(&config.staker_config)?;

	let provider = Provider::<Http>::try_from(session_config.provider_url.as_str())
		.map_err(|_| CliError::from(INVALID_PROVIDER_URL))?
		.interval(Duration::from_millis(session_config.call_interval));
	let wallet = WalletManager::from_config(config.staker_config.wallet.as_ref())?;
	let input = Arc::new(TerminalInput::stdin());
	let prompt: Arc<dyn UserPrompt> = if config.assume_yes {
		Arc::new(AutoApprove)
	} else {
		Arc::new(TerminalPrompt::new(input.clone()))
	};

	log::info!(
		target: LOG_TARGET,
		"-[{}] 🔨 Connecting to {} ({})",
		sub_display_format(SUB_LOG_TARGET),
		session_config.name,
		session_config.provider_url
	);
	let mut chain_session = ChainSession::new(session_config, Arc::new(provider), wallet, prompt);
	let session = chain_session.initialize().await?;

	let stake = StakeCoordinator::new(
		session.account,
		session.token.clone(),
		session.staking.clone(),
		session.chain_name.clone(),
	);
	let airdrop =
		AirdropCoordinator::new(session.account, session.airdrop.clone(), session.chain_name.clone());

	Ok(Services { session, input, stake, airdrop })
}

/// Runs a single staker subcommand.
pub async fn run(config: Configuration, subcommand: Subcommand) -> Result<(), ServiceError> {
	let services = build_services(&config).await?;

	match subcommand {
		Subcommand::Balances => stake_cmd::balances(&services).await,
		Subcommand::Stake(cmd) => cmd.stake(&services).await,
		Subcommand::Withdraw(cmd) => cmd.withdraw(&services).await,
		Subcommand::Airdrop(cmd) => cmd.run(&services).await,
		Subcommand::Shell => shell_cmd::run(&services).await,
	}
}
