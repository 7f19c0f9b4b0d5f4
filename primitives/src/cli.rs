use crate::{
	constants::{
		cli::{
			DEFAULT_BLOCK_CONFIRMATIONS, DEFAULT_CALL_INTERVAL_MS, MAX_BLOCK_CONFIRMATIONS,
			MAX_CALL_INTERVAL_MS,
		},
		errors::{
			INVALID_CHAIN_ID, INVALID_CONTRACT_ADDRESS, MISSING_CONTRACT_ADDRESS,
			PARAMETER_OUT_OF_RANGE,
		},
	},
	utils::parse_address,
};
use ethers::types::Address;
use serde::Deserialize;

pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the CLI.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Yaml(#[from] serde_yaml::Error),

	#[error("Invalid input: {0}")]
	Input(String),
}

impl From<&str> for Error {
	fn from(s: &str) -> Error {
		Error::Input(s.to_string())
	}
}

impl From<String> for Error {
	fn from(s: String) -> Error {
		Error::Input(s)
	}
}

#[derive(Debug, Clone)]
pub struct Configuration {
	/// The raw configuration loaded from the YAML file.
	pub staker_config: StakerConfig,
	/// Ask no questions and approve every prompt.
	pub assume_yes: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StakerConfig {
	/// EVM provider config
	pub provider: EVMProvider,
	/// Deployed contract addresses
	pub contracts: ContractsConfig,
	/// Local wallet config. A missing wallet fails the session on start.
	pub wallet: Option<WalletConfig>,
	/// Sentry config
	pub sentry_config: Option<SentryConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EVMProvider {
	/// Network name
	pub name: String,
	/// The expected chain ID of the connected network.
	pub id: Option<u64>,
	/// Endpoint provider
	pub provider: String,
	/// The time interval(ms) used when polling for transaction receipts.
	pub call_interval: Option<u64>,
	/// The number of confirmations required for a transaction to be treated as final.
	pub block_confirmations: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractsConfig {
	/// The ERC20 token contract address.
	pub token: Option<String>,
	/// The staking contract address.
	pub staking: Option<String>,
	/// The airdrop contract address.
	pub airdrop: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
	/// Hex encoded private key.
	pub private_key: Option<String>,
	/// BIP-39 mnemonic phrase or a path to a file holding it.
	pub mnemonic: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentryConfig {
	/// Enable sentry error reporting.
	pub is_enabled: bool,
	/// The sentry DSN.
	pub dsn: Option<String>,
	/// The sentry environment tag.
	pub environment: Option<String>,
}

/// The validated settings a chain session is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
	/// Network name, used as the log target.
	pub name: String,
	/// The chain ID the connected network must report.
	pub expected_chain_id: u64,
	/// Endpoint provider
	pub provider_url: String,
	/// Receipt polling interval in milliseconds.
	pub call_interval: u64,
	/// Confirmations awaited per transaction.
	pub block_confirmations: u64,
	pub token: Address,
	pub staking: Address,
	pub airdrop: Address,
}

impl TryFrom<&StakerConfig> for SessionConfig {
	type Error = Error;

	fn try_from(config: &StakerConfig) -> Result<Self> {
		let provider = &config.provider;
		let contracts = &config.contracts;

		let expected_chain_id = provider
			.id
			.ok_or_else(|| format!("{} [parameter: provider.id]", INVALID_CHAIN_ID))?;
		let call_interval = provider.call_interval.unwrap_or(DEFAULT_CALL_INTERVAL_MS);
		let block_confirmations =
			provider.block_confirmations.unwrap_or(DEFAULT_BLOCK_CONFIRMATIONS);

		if !(0..=MAX_CALL_INTERVAL_MS).contains(&call_interval) {
			return Err(format!(
				"{} [parameter: {}, range: 0…{}]",
				PARAMETER_OUT_OF_RANGE, "provider.call_interval", MAX_CALL_INTERVAL_MS
			)
			.into());
		}
		if !(0..=MAX_BLOCK_CONFIRMATIONS).contains(&block_confirmations) {
			return Err(format!(
				"{} [parameter: {}, range: 0…{}]",
				PARAMETER_OUT_OF_RANGE, "provider.block_confirmations", MAX_BLOCK_CONFIRMATIONS
			)
			.into());
		}

		Ok(Self {
			name: provider.name.clone(),
			expected_chain_id,
			provider_url: provider.provider.clone(),
			call_interval,
			block_confirmations,
			token: required_address("contracts.token", contracts.token.as_deref())?,
			staking: required_address("contracts.staking", contracts.staking.as_deref())?,
			airdrop: required_address("contracts.airdrop", contracts.airdrop.as_deref())?,
		})
	}
}

fn required_address(field: &str, value: Option<&str>) -> Result<Address> {
	let value = value
		.filter(|v| !v.trim().is_empty())
		.ok_or_else(|| format!("{} [parameter: {}]", MISSING_CONTRACT_ADDRESS, field))?;
	parse_address(value).ok_or_else(|| {
		format!("{} [parameter: {}, value: {}]", INVALID_CONTRACT_ADDRESS, field, value).into()
	})
}
