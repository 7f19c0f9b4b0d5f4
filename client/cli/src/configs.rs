use htk_primitives::{
	cli::{Configuration, Error, Result, SessionConfig, StakerConfig},
	INVALID_CONFIG_FILE_PATH, INVALID_CONFIG_FILE_STRUCTURE,
};

/// Loads and validates the YAML configuration file at `path`.
pub fn create_configuration(path: &str, assume_yes: bool) -> Result<Configuration> {
	let config_file = std::fs::File::open(path)
		.map_err(|error| Error::Input(format!("{} [path: {}, {}]", INVALID_CONFIG_FILE_PATH, path, error)))?;
	let staker_config: StakerConfig = serde_yaml::from_reader(config_file).map_err(|error| {
		Error::Input(format!("{} [path: {}, {}]", INVALID_CONFIG_FILE_STRUCTURE, path, error))
	})?;

	// fail on start rather than on the first command
	SessionConfig::try_from(&staker_config)?;

	Ok(Configuration { staker_config, assume_yes })
}
