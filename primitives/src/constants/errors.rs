pub const INVALID_CONTRACT_ADDRESS: &str =
	"Invalid contract address provided. Please check your `contracts` configuration.";

pub const MISSING_CONTRACT_ADDRESS: &str =
	"Some contracts are missing. Please check your `contracts` configuration.";

pub const INVALID_PRIVATE_KEY: &str =
	"Invalid private key provided. Please check your wallet's private key.";

pub const INVALID_MNEMONIC: &str =
	"Invalid mnemonic provided. Please check your wallet's mnemonic phrase.";

pub const INVALID_PROVIDER_URL: &str =
	"Invalid provider URL provided. Please check your provider's URL.";

pub const INVALID_CHAIN_ID: &str =
	"Invalid chain ID provided. Please check your provider's chain ID.";

pub const INVALID_CONFIG_FILE_PATH: &str =
	"Invalid config.yaml file path provided. Please check your file path.";

pub const INVALID_CONFIG_FILE_STRUCTURE: &str =
	"Invalid config.yaml file structure provided. Please check your file structure.";

pub const NO_WALLET_CONFIGURED: &str =
	"No wallet configured. Please provide `wallet.private_key` or `wallet.mnemonic`.";

pub const PROVIDER_INTERNAL_ERROR: &str =
	"An internal error thrown when making a call to the provider. Please check your provider's status";

pub const PARAMETER_OUT_OF_RANGE: &str =
	"An invalid parameter is out of range. Please check your configuration file.";
