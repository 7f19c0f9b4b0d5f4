use clap::Parser;
use htk_client::{airdrop::CandidateOutcome, AirdropError};
use super::{format_pending, print_report};
use crate::service::{ServiceError, Services};

#[derive(Debug, Clone, Parser)]
/// A command to airdrop to a list of addresses.
/// Addresses that already received the airdrop or are malformed are reported and skipped.
/// The remaining ones are submitted one by one, stopping at the first failure.
pub struct AirdropCmd {
	/// The recipient addresses.
	#[arg(required = true)]
	pub addresses: Vec<String>,

	#[arg(long)]
	/// Only check and list the candidates without submitting anything.
	pub dry_run: bool,
}

impl AirdropCmd {
	pub async fn run(&self, services: &Services) -> Result<(), ServiceError> {
		let airdrop = &services.airdrop;
		if !airdrop.load().await? && !self.dry_run {
			return Err(AirdropError::NotAuthorized(services.session.account).into());
		}

		for address in &self.addresses {
			match airdrop.propose_candidate(address).await {
				Ok(CandidateOutcome::Queued) => {},
				Ok(CandidateOutcome::AlreadyPending) => println!("Skipping duplicate: {}", address),
				Err(error @ (AirdropError::InvalidAddress(_) | AirdropError::AlreadyAirdropped(_))) => {
					println!("Skipping {}: {}", address, error)
				},
				Err(error) => return Err(error.into()),
			}
		}

		let pending = airdrop.pending().await;
		if self.dry_run {
			print!("{}", format_pending(&pending));
			return Ok(());
		}

		match airdrop.submit_airdrop().await {
			Ok(report) => {
				println!("Airdropped to {} address(es):", report.succeeded.len());
				print_report(&report);
				Ok(())
			},
			Err(AirdropError::BatchInterrupted(report)) => {
				print_report(&report);
				Err(AirdropError::BatchInterrupted(report).into())
			},
			Err(error) => Err(error.into()),
		}
	}
}
