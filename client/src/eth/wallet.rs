use ethers::{
	signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer},
	types::{Address, PathOrString},
};
use htk_primitives::{cli::WalletConfig, INVALID_MNEMONIC, INVALID_PRIVATE_KEY};

use crate::errors::SetupError;

type WalletResult<T = ()> = Result<T, SetupError>;

#[derive(Debug, Clone)]
pub struct WalletManager {
	signer: LocalWallet,
}

impl WalletManager {
	/// Loads the wallet described by the configuration. Returns `None` when nothing is configured.
	pub fn from_config(config: Option<&WalletConfig>) -> WalletResult<Option<Self>> {
		let Some(config) = config else { return Ok(None) };

		if let Some(private_key) = config.private_key.as_deref().filter(|k| !k.trim().is_empty()) {
			return Self::from_private_key(private_key).map(Some);
		}
		if let Some(mnemonic) = config.mnemonic.as_deref().filter(|m| !m.trim().is_empty()) {
			return Self::from_phrase_or_file(mnemonic).map(Some);
		}
		Ok(None)
	}

	pub fn from_phrase_or_file<P: Into<PathOrString>>(input_path: P) -> WalletResult<Self> {
		let signer = MnemonicBuilder::<English>::default()
			.phrase(input_path)
			.build()
			.map_err(|_| SetupError::InvalidWallet(INVALID_MNEMONIC.into()))?;

		Ok(Self { signer })
	}

	pub fn from_private_key(private_key: &str) -> WalletResult<Self> {
		let signer = private_key
			.trim()
			.trim_start_matches("0x")
			.parse::<LocalWallet>()
			.map_err(|_| SetupError::InvalidWallet(INVALID_PRIVATE_KEY.into()))?;

		Ok(Self { signer })
	}

	/// Returns the signer bound to the given chain.
	pub fn signer(&self, chain_id: u64) -> LocalWallet {
		self.signer.clone().with_chain_id(chain_id)
	}

	pub fn address(&self) -> Address {
		self.signer.address()
	}
}
