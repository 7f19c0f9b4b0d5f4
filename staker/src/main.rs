mod cli;
mod commands;
mod prompt;
mod service;

use std::io::Write;

use chrono::Local;
use env_logger::fmt::Color;
use htk_cli::{
	create_configuration,
	runner::{build_runtime, Runner},
};
use htk_primitives::sub_display_format;
use log::Level;

use crate::{
	cli::{Cli, LOG_TARGET, SUB_LOG_TARGET},
	service::ServiceError,
};

fn main() {
	env_logger::Builder::new()
		.format(|buf, record| {
			let mut level_style = buf.style();
			let color = match record.level() {
				Level::Info => Color::Green,
				Level::Warn => Color::Yellow,
				_ => Color::Red,
			};

			level_style.set_color(color).set_bold(true);

			writeln!(
				buf,
				"{} {:05} {:020}]{}",
				Local::now().format("%Y-%m-%dT%H:%M:%S"),
				level_style.value(record.level()),
				record.target(),
				record.args(),
			)
		})
		.filter(None, log::LevelFilter::Info)
		.parse_default_env()
		.init();

	let cli = Cli::from_args();

	if let Err(error) = run(cli) {
		log::error!(
			target: LOG_TARGET,
			"-[{}] ❗️ [{:?}] {}",
			sub_display_format(SUB_LOG_TARGET),
			error.kind(),
			error
		);
		std::process::exit(1);
	}
}

fn run(cli: Cli) -> Result<(), ServiceError> {
	let tokio_runtime = build_runtime()?;
	let configuration = create_configuration(&cli.config, cli.yes)?;

	cli.print_staker_infos();

	let runner = Runner::new(configuration, tokio_runtime);
	let subcommand = cli.subcommand;
	runner.run_until_exit(|config| service::run(config, subcommand))
}
