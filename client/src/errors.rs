use std::fmt::{Display, Formatter};

use ethers::types::{Address, TxHash, U256};
use htk_primitives::{NO_WALLET_CONFIGURED, PROVIDER_INTERNAL_ERROR};

use crate::airdrop::AirdropReport;

/// The coarse category of a failure, as seen by a UI or CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	/// Fatal to session start. No retry path is offered.
	Setup,
	/// Rejected before any remote call, immediately correctable by the caller.
	Validation,
	/// A remote read or write failed. Previously confirmed steps stay in effect.
	Remote,
	/// The connected account is not allowed to perform the operation.
	Authorization,
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
	#[error("{}", NO_WALLET_CONFIGURED)]
	NoWallet,

	#[error("Please connect to the correct network. Expected network ID: {expected}, connected: {actual}")]
	NetworkMismatch { expected: u64, actual: U256 },

	#[error("Access to account {0:?} was denied")]
	AccountAccessDenied(Address),

	#[error("Invalid wallet: {0}")]
	InvalidWallet(String),

	#[error("{} ({})", PROVIDER_INTERNAL_ERROR, .0)]
	Provider(String),

	#[error("The chain session has already failed to initialize")]
	SessionFailed,
}

impl SetupError {
	pub fn kind(&self) -> ErrorKind {
		ErrorKind::Setup
	}
}

/// A failed remote read or write.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
	#[error("The transaction request was declined by the user")]
	Rejected,

	#[error("The transaction has been reverted: {0:?}")]
	Reverted(TxHash),

	#[error("The transaction was dropped before confirmation: {0:?}")]
	Dropped(TxHash),

	#[error("Provider error: {0}")]
	Transport(String),
}

/// The step of the stake sequence that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeStage {
	Allowance,
	Approval,
	ApprovalConfirmation,
	Stake,
	StakeConfirmation,
	Refresh,
}

impl Display for StakeStage {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let stage = match self {
			StakeStage::Allowance => "allowance check",
			StakeStage::Approval => "approval submission",
			StakeStage::ApprovalConfirmation => "approval confirmation",
			StakeStage::Stake => "stake submission",
			StakeStage::StakeConfirmation => "stake confirmation",
			StakeStage::Refresh => "balance refresh",
		};
		write!(f, "{}", stage)
	}
}

/// The step of the withdraw sequence that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WithdrawStage {
	Withdraw,
	WithdrawConfirmation,
	Refresh,
}

impl Display for WithdrawStage {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let stage = match self {
			WithdrawStage::Withdraw => "withdraw submission",
			WithdrawStage::WithdrawConfirmation => "withdraw confirmation",
			WithdrawStage::Refresh => "balance refresh",
		};
		write!(f, "{}", stage)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum StakeError {
	#[error("Invalid amount: {0}")]
	InvalidAmount(String),

	#[error("Another stake or withdraw operation is already in progress")]
	OperationInProgress,

	#[error("Balances have not been loaded yet")]
	NotLoaded,

	#[error("Staking failed at {stage}: {source}")]
	StakeFailed { stage: StakeStage, source: LedgerError },

	#[error("Withdrawal failed at {stage}: {source}")]
	WithdrawFailed { stage: WithdrawStage, source: LedgerError },

	#[error("Failed to read balances: {0}")]
	Refresh(#[source] LedgerError),
}

impl StakeError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			StakeError::InvalidAmount(_) | StakeError::OperationInProgress | StakeError::NotLoaded => {
				ErrorKind::Validation
			},
			StakeError::StakeFailed { .. } |
			StakeError::WithdrawFailed { .. } |
			StakeError::Refresh(_) => ErrorKind::Remote,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum AirdropError {
	#[error("Invalid Ethereum address: {0}")]
	InvalidAddress(String),

	#[error("This address has already received the airdrop: {0:?}")]
	AlreadyAirdropped(Address),

	#[error("Only admin can perform airdrops. Connected account: {0:?}")]
	NotAuthorized(Address),

	#[error("There are no pending addresses to airdrop")]
	NothingToSubmit,

	#[error("An airdrop submission is already in progress")]
	OperationInProgress,

	#[error("The airdrop contract state has not been loaded yet")]
	NotLoaded,

	#[error("Failed to query the airdrop contract: {0}")]
	Query(#[source] LedgerError),

	#[error("The airdrop batch was interrupted. {0}")]
	BatchInterrupted(AirdropReport),
}

impl AirdropError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			AirdropError::InvalidAddress(_) |
			AirdropError::AlreadyAirdropped(_) |
			AirdropError::NothingToSubmit |
			AirdropError::OperationInProgress |
			AirdropError::NotLoaded => ErrorKind::Validation,
			AirdropError::NotAuthorized(_) => ErrorKind::Authorization,
			AirdropError::Query(_) | AirdropError::BatchInterrupted(_) => ErrorKind::Remote,
		}
	}
}
