use chrono::{Datelike, Local};
use clap::{CommandFactory, FromArgMatches, Parser};
use htk_primitives::{constants::cli::DEFAULT_CONFIG_PATH, sub_display_format};

use crate::commands::{AirdropCmd, AmountCmd};

pub const LOG_TARGET: &str = "htk-staker";
pub const SUB_LOG_TARGET: &str = "main";

#[derive(Debug, Parser)]
pub struct Cli {
	/// The path of the YAML configuration file.
	#[arg(long, short, default_value = DEFAULT_CONFIG_PATH)]
	pub config: String,

	/// Approve the account access and every transaction without asking.
	#[arg(long, short)]
	pub yes: bool,

	#[command(subcommand)]
	pub subcommand: Subcommand,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Subcommand {
	/// Show the wallet and staked balances of the connected account.
	Balances,

	/// Stake tokens. The staking contract is approved for the exact amount first if the current
	/// allowance does not cover it.
	Stake(AmountCmd),

	/// Withdraw staked tokens back to the wallet.
	Withdraw(AmountCmd),

	/// Queue the given addresses and submit the airdrop to each of them. Admin only.
	Airdrop(AirdropCmd),

	/// Start an interactive shell that keeps the balances and the airdrop list across commands.
	Shell,
}

impl Cli {
	/// Helper function used to parse the command line arguments. This is the equivalent of
	/// [`clap::Parser::parse()`].
	///
	/// Creates `Self` from the command line arguments. Print the
	/// error message and quit the program in case of failure.
	pub fn from_args() -> Self
	where
		Self: Parser + Sized,
	{
		Self::from_iter(&mut std::env::args_os())
	}

	/// Helper function used to parse the command line arguments. This is the equivalent of
	/// [`clap::Parser::parse_from`].
	///
	/// Creates `Self` from any iterator over arguments.
	/// Print the error message and quit the program in case of failure.
	fn from_iter<I>(iter: I) -> Self
	where
		Self: Parser + Sized,
		I: IntoIterator,
		I::Item: Into<std::ffi::OsString> + Clone,
	{
		let app = <Self as CommandFactory>::command();

		let name = Self::executable_name();
		let author = Self::author();
		let about = Self::description();
		let app = app
			.name(name)
			.author(author)
			.about(about)
			.version(Self::impl_version())
			.propagate_version(true);

		let matches = app.try_get_matches_from(iter).unwrap_or_else(|e| e.exit());

		<Self as FromArgMatches>::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
	}

	/// Implementation name.
	fn impl_name() -> String {
		"HTK Staker".into()
	}

	/// Implementation version.
	fn impl_version() -> String {
		env!("CARGO_PKG_VERSION").into()
	}

	/// Executable file name.
	///
	/// Extracts the file name from `std::env::current_exe()`.
	/// Resorts to the env var `CARGO_PKG_NAME` in case of Error.
	fn executable_name() -> String {
		std::env::current_exe()
			.ok()
			.and_then(|e| e.file_name().map(|s| s.to_os_string()))
			.and_then(|w| w.into_string().ok())
			.unwrap_or_else(|| env!("CARGO_PKG_NAME").into())
	}

	/// Executable file description.
	fn description() -> String {
		env!("CARGO_PKG_DESCRIPTION").into()
	}

	/// Executable file author.
	fn author() -> String {
		env!("CARGO_PKG_AUTHORS").into()
	}

	/// Copyright starting year (x-current year)
	fn copyright_start_year() -> i32 {
		2024
	}

	/// Log information about the staker itself.
	pub fn print_staker_infos(&self) {
		let sub_target = sub_display_format(SUB_LOG_TARGET);

		log::info!(target: LOG_TARGET, "-[{}] {}", sub_target, Self::impl_name());
		log::info!(target: LOG_TARGET, "-[{}] ✌️  version {}", sub_target, Self::impl_version());
		log::info!(
			target: LOG_TARGET,
			"-[{}] ❤️  by {}, {}-{}",
			sub_target,
			Self::author(),
			Self::copyright_start_year(),
			Local::now().year()
		);
		log::info!(target: LOG_TARGET, "-[{}] 📄 Configuration: {}", sub_target, self.config);
		if self.yes {
			log::info!(target: LOG_TARGET, "-[{}] ⚡ Every prompt is approved automatically", sub_target);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
		Cli::try_parse_from(std::iter::once("htk-staker").chain(args.iter().copied()))
	}

	#[test]
	fn defaults_to_config_yaml() {
		let cli = parse(&["balances"]).unwrap();
		assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
		assert!(!cli.yes);
		assert!(matches!(cli.subcommand, Subcommand::Balances));
	}

	#[test]
	fn parses_amounts_and_airdrop_lists() {
		let cli = parse(&["--config", "local.yaml", "-y", "stake", "12.5"]).unwrap();
		assert_eq!(cli.config, "local.yaml");
		assert!(cli.yes);
		assert!(matches!(cli.subcommand, Subcommand::Stake(AmountCmd { ref amount }) if amount == "12.5"));

		let cli = parse(&["airdrop", "--dry-run", "0xa", "0xb"]).unwrap();
		match cli.subcommand {
			Subcommand::Airdrop(cmd) => {
				assert!(cmd.dry_run);
				assert_eq!(cmd.addresses, vec!["0xa".to_string(), "0xb".to_string()]);
			},
			other => panic!("unexpected subcommand: {other:?}"),
		}
	}

	#[test]
	fn airdrop_requires_an_address() {
		assert!(parse(&["airdrop"]).is_err());
		assert!(parse(&[]).is_err());
	}
}
