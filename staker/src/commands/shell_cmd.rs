use std::{fmt::Display, io::Write};

use htk_client::{airdrop::CandidateOutcome, AirdropError, ErrorKind};
use htk_primitives::utils::short_address;

use super::{format_pending, print_report};
use crate::service::{ServiceError, Services};

const HELP: &str = "\
Commands:
  balances              show the cached balances
  refresh               re-read the balances from the contracts
  stake <amount>        stake tokens
  withdraw <amount>     withdraw staked tokens
  propose <address>...  queue airdrop candidates
  pending               list the queued candidates
  submit                airdrop to every queued candidate (admin only)
  help                  show this message
  quit                  leave the shell";

/// A line entered in the shell.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
	Balances,
	Refresh,
	Stake(&'a str),
	Withdraw(&'a str),
	Propose(Vec<&'a str>),
	Pending,
	Submit,
	Help,
	Quit,
	Empty,
	Unknown(&'a str),
}

impl<'a> Command<'a> {
	fn parse(line: &'a str) -> Self {
		let mut words = line.split_whitespace();
		let Some(command) = words.next() else { return Command::Empty };
		let args: Vec<&str> = words.collect();

		match (command, args.as_slice()) {
			("balances", []) => Command::Balances,
			("refresh", []) => Command::Refresh,
			("stake", [amount]) => Command::Stake(*amount),
			("withdraw", [amount]) => Command::Withdraw(*amount),
			("propose", [_, ..]) => Command::Propose(args.clone()),
			("pending", []) => Command::Pending,
			("submit", []) => Command::Submit,
			("help", _) => Command::Help,
			("quit" | "exit", _) => Command::Quit,
			_ => Command::Unknown(line.trim()),
		}
	}
}

/// Runs the interactive shell until `quit` or the end of input.
pub async fn run(services: &Services) -> Result<(), ServiceError> {
	let view = services.stake.load().await?;
	let is_admin = services.airdrop.load().await?;

	println!(
		"Connected {} on {} (chain {}){}",
		short_address(&services.session.account),
		services.session.chain_name,
		services.session.chain_id,
		if is_admin { " as airdrop admin" } else { "" }
	);
	println!("{}", view);
	println!("{}", HELP);

	loop {
		print!("htk> ");
		std::io::stdout().flush()?;

		let Some(line) = services.input.next_line().await? else { break };
		match Command::parse(&line) {
			Command::Balances => match services.stake.view().await {
				Some(view) => println!("{}", view),
				None => println!("Balances have not been loaded yet"),
			},
			Command::Refresh => report(services.stake.refresh().await),
			Command::Stake(amount) => report(services.stake.stake(amount).await),
			Command::Withdraw(amount) => report(services.stake.withdraw(amount).await),
			Command::Propose(addresses) => {
				for address in addresses {
					match services.airdrop.propose_candidate(address).await {
						Ok(CandidateOutcome::Queued) => println!("Queued {}", address),
						Ok(CandidateOutcome::AlreadyPending) => println!("Already pending: {}", address),
						Err(error) => print_error(error.kind(), &error),
					}
				}
			},
			Command::Pending => print!("{}", format_pending(&services.airdrop.pending().await)),
			Command::Submit => match services.airdrop.submit_airdrop().await {
				Ok(report) => {
					println!("Airdrop completed");
					print_report(&report);
				},
				Err(AirdropError::BatchInterrupted(report)) => {
					println!("Airdrop interrupted, {}", report);
					print_report(&report);
				},
				Err(error) => print_error(error.kind(), &error),
			},
			Command::Help => println!("{}", HELP),
			Command::Quit => break,
			Command::Empty => {},
			Command::Unknown(line) => println!("Unknown command: `{}`. Type `help`.", line),
		}
	}
	Ok(())
}

fn report<T: Display>(result: Result<T, htk_client::StakeError>) {
	match result {
		Ok(view) => println!("{}", view),
		Err(error) => print_error(error.kind(), &error),
	}
}

fn print_error(kind: ErrorKind, error: &dyn Display) {
	println!("[{:?}] {}", kind, error);
}
